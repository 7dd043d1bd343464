use crate::config::Tone;
use crate::dto::{ClaimDto, NewClaim};
use crate::error::ClaimFormError;
use crate::format::{display_date, PLACEHOLDER};
use chrono::{NaiveDate, Utc};

pub const NEW_CLAIM_STATUS: &str = "pending";

impl ClaimDto {
    /// True when either customer key names `customer`.
    pub fn belongs_to(&self, customer: &str) -> bool {
        self.customer_id_camel.as_deref() == Some(customer)
            || self.customer_id_snake.as_deref() == Some(customer)
    }

    pub fn type_label(&self) -> &str {
        non_empty(&self.kind)
            .or_else(|| non_empty(&self.claim_type))
            .unwrap_or("Claim")
    }

    pub fn status_label(&self) -> &str {
        non_empty(&self.status).unwrap_or(NEW_CLAIM_STATUS)
    }

    pub fn status_tone(&self) -> Tone {
        match self.status.as_deref() {
            Some("pending") => Tone::Amber,
            Some("approved") => Tone::Green,
            Some("rejected") => Tone::Red,
            Some("processing") => Tone::Blue,
            _ => Tone::Muted,
        }
    }

    pub fn amount_value(&self) -> f64 {
        self.amount.filter(|a| a.is_finite()).unwrap_or(0.0)
    }

    pub fn description_label(&self) -> &str {
        non_empty(&self.description).unwrap_or(PLACEHOLDER)
    }

    pub fn date_label(&self) -> String {
        non_empty(&self.incident_date)
            .or_else(|| non_empty(&self.created_at))
            .map(display_date)
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    /// Stable list key: `id`, then `_id`, then the position in the list.
    pub fn list_key(&self, position: usize) -> String {
        non_empty(&self.id)
            .or_else(|| non_empty(&self.mongo_id))
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("#{position}"))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn claims_for_customer(claims: &[ClaimDto], customer: &str) -> Vec<ClaimDto> {
    claims
        .iter()
        .filter(|c| c.belongs_to(customer))
        .cloned()
        .collect()
}

pub fn pending_count(claims: &[ClaimDto]) -> usize {
    claims
        .iter()
        .filter(|c| c.status.as_deref() == Some(NEW_CLAIM_STATUS))
        .count()
}

/// Claim form contents as typed by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimDraft {
    pub kind: String,
    pub amount: String,
    pub description: String,
    pub incident_date: String,
}

impl ClaimDraft {
    pub fn blank(default_kind: &str, today: NaiveDate) -> Self {
        Self {
            kind: default_kind.to_string(),
            amount: String::new(),
            description: String::new(),
            incident_date: today.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn blank_today(default_kind: &str) -> Self {
        Self::blank(default_kind, Utc::now().date_naive())
    }

    /// Presence checks plus a parseable amount of at least 1; the request body
    /// carries the customer under both key spellings.
    pub fn to_new_claim(&self, customer: &str) -> Result<NewClaim, ClaimFormError> {
        let kind = required(&self.kind, "claim type")?;
        let amount_raw = required(&self.amount, "amount")?;
        let incident_date = required(&self.incident_date, "incident date")?;
        let description = required(&self.description, "description")?;

        let amount = amount_raw
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
            .ok_or_else(|| ClaimFormError::InvalidAmount(amount_raw.to_string()))?;
        if amount < 1.0 {
            return Err(ClaimFormError::AmountTooSmall);
        }

        Ok(NewClaim {
            customer_id_camel: customer.to_string(),
            customer_id: customer.to_string(),
            kind: kind.to_string(),
            amount,
            description: description.to_string(),
            incident_date: incident_date.to_string(),
            status: NEW_CLAIM_STATUS.into(),
        })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ClaimFormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ClaimFormError::Missing(field))
    } else {
        Ok(trimmed)
    }
}

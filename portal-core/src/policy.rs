use crate::config::Tone;
use crate::dto::{CoverageDto, PolicyDto};
use crate::format::title_case;

impl CoverageDto {
    /// Share of the limit already used, clamped to 0..=100. A zero or missing
    /// limit reads as 0.
    pub fn usage_percent(&self) -> f64 {
        let used = self.used.unwrap_or(0.0);
        match self.limit {
            Some(limit) if limit > 0.0 => (used / limit * 100.0).clamp(0.0, 100.0),
            _ => 0.0,
        }
    }

    pub fn usage_tone(&self) -> Tone {
        let pct = self.usage_percent();
        if pct > 80.0 {
            Tone::Red
        } else if pct > 50.0 {
            Tone::Amber
        } else {
            Tone::Green
        }
    }
}

impl PolicyDto {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    pub fn type_icon(&self) -> &'static str {
        match self.policy_type.as_str() {
            "health" => "🏥",
            "auto" => "🚗",
            "property" => "🏠",
            "life" => "💛",
            _ => "📋",
        }
    }

    pub fn type_label(&self) -> String {
        format!("{} Insurance", title_case(&self.policy_type))
    }

    pub fn status_tone(&self) -> Tone {
        match self.status.as_str() {
            "active" => Tone::Green,
            "suspended" => Tone::Red,
            _ => Tone::Muted,
        }
    }

    pub fn premium_label(&self) -> String {
        match self.premium_amount {
            Some(amount) => format!("${amount}"),
            None => "$0".into(),
        }
    }
}

pub fn active_policy(policies: &[PolicyDto]) -> Option<&PolicyDto> {
    policies.iter().find(|p| p.is_active())
}

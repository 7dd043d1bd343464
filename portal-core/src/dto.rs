use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthDto {
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDto {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub policy_number: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub policy_type: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub premium_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start_date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub end_date: String,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub coverages: Vec<CoverageDto>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageDto {
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub coverage_type: String,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub used: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub limit: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub available: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDto {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub portfolio_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub portfolio_name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub last_updated: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub holdings: Vec<HoldingDto>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingDto {
    #[serde(default, deserialize_with = "lenient::string")]
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub shares: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub current_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub change_percent: Option<f64>,
}

/// A claim as the gateway stores it. Records written by different backends
/// disagree on key names, so both spellings are kept side by side.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimDto {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    #[serde(rename = "_id", default, deserialize_with = "lenient::opt_string")]
    pub mongo_id: Option<String>,
    #[serde(rename = "customerId", default, deserialize_with = "lenient::opt_string")]
    pub customer_id_camel: Option<String>,
    #[serde(rename = "customer_id", default, deserialize_with = "lenient::opt_string")]
    pub customer_id_snake: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub claim_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub incident_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created_at: Option<String>,
}

/// Body of `POST /api/claims`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewClaim {
    #[serde(rename = "customerId")]
    pub customer_id_camel: String,
    pub customer_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub description: String,
    pub incident_date: String,
    pub status: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChaosStatusDto {
    #[serde(default, deserialize_with = "lenient::map")]
    pub services: BTreeMap<String, ServiceHealthDto>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealthDto {
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub healthy: Option<bool>,
    #[serde(default, deserialize_with = "lenient::flags")]
    pub chaos: BTreeMap<String, bool>,
}

impl ServiceHealthDto {
    pub fn fault_active(&self, fault: &str) -> bool {
        self.chaos.get(fault).copied().unwrap_or(false)
    }
}

/// Body of `POST /api/chaos/toggle`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub service: String,
    pub fault: String,
    pub enabled: bool,
}

/// Gateway payloads are not validated; these accept whatever shape shows up
/// and fall back to empty values instead of failing the whole document.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::collections::BTreeMap;

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        opt_string(d).map(Option::unwrap_or_default)
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
    }

    pub fn opt_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(Value::deserialize(d)?.as_bool())
    }

    /// Only a literal `true` turns a flag on.
    pub fn flags<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, bool>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Object(entries) => entries
                .into_iter()
                .map(|(key, value)| (key, value == Value::Bool(true)))
                .collect(),
            _ => BTreeMap::new(),
        })
    }

    pub fn map<'de, D, T>(d: D) -> Result<BTreeMap<String, T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            Value::Object(entries) => entries
                .into_iter()
                .filter_map(|(key, value)| Some((key, serde_json::from_value(value).ok()?)))
                .collect(),
            _ => BTreeMap::new(),
        })
    }

    pub fn vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}

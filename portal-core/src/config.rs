//! Startup configuration and the static catalogs the portal is built around.
//!
//! Everything here is constructed once and then only read. The browser app
//! builds it from compile-time values, the CLI from the process environment.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

pub const DEFAULT_API_ORIGIN: &str = "https://insurewatch-api-gateway-production.up.railway.app";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const RESET_SCENARIO_ID: &str = "reset_all";

pub const ENV_API_ORIGIN: &str = "PORTAL_API_ORIGIN";
pub const ENV_POLL_INTERVAL_MS: &str = "PORTAL_POLL_INTERVAL_MS";
pub const ENV_LOG_FILTER: &str = "PORTAL_LOG";

/// Colour family used for badges, cards and buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Green,
    Amber,
    Red,
    Blue,
    Muted,
}

impl Tone {
    pub fn css(self) -> &'static str {
        match self {
            Tone::Green => "green",
            Tone::Amber => "amber",
            Tone::Red => "red",
            Tone::Blue => "blue",
            Tone::Muted => "muted",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tab {
    Overview,
    Policy,
    Investments,
    Claims,
    Chaos,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Policy,
        Tab::Investments,
        Tab::Claims,
        Tab::Chaos,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Policy => "Policy",
            Tab::Investments => "Investments",
            Tab::Claims => "Claims",
            Tab::Chaos => "System Status",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tab::Overview => "🏠",
            Tab::Policy => "📋",
            Tab::Investments => "📈",
            Tab::Claims => "📝",
            Tab::Chaos => "⚡",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultDef {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDef {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub tone: Tone,
    pub faults: BTreeSet<String>,
}

impl ScenarioDef {
    pub fn is_reset(&self) -> bool {
        self.id == RESET_SCENARIO_ID
    }

    /// Desired state of `fault` once this scenario has been applied.
    pub fn wants_enabled(&self, fault: &str) -> bool {
        !self.is_reset() && self.faults.contains(fault)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaosCatalog {
    pub services: Vec<String>,
    pub faults: Vec<FaultDef>,
    pub scenarios: Vec<ScenarioDef>,
}

impl ChaosCatalog {
    pub fn scenario(&self, id: &str) -> Option<&ScenarioDef> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn fault(&self, key: &str) -> Option<&FaultDef> {
        self.faults.iter().find(|f| f.key == key)
    }

    pub fn has_service(&self, name: &str) -> bool {
        self.services.iter().any(|s| s == name)
    }
}

impl Default for ChaosCatalog {
    fn default() -> Self {
        let fault = |key: &str, label: &str, icon: &str, description: &str| FaultDef {
            key: key.into(),
            label: label.into(),
            icon: icon.into(),
            description: description.into(),
        };
        let scenario = |id: &str, label: &str, icon: &str, tone: Tone, faults: &[&str]| ScenarioDef {
            id: id.into(),
            label: label.into(),
            icon: icon.into(),
            tone,
            faults: faults.iter().map(|f| f.to_string()).collect(),
        };

        Self {
            services: ["claims", "policy", "investment", "notification"]
                .into_iter()
                .map(String::from)
                .collect(),
            faults: vec![
                fault("service_crash", "Service Crash", "💥", "Service returns 503 on every request"),
                fault("high_latency", "High Latency", "🐢", "Adds 3–8 second delay to responses"),
                fault("db_failure", "DB Failure", "🗄️", "Simulates database connection failure"),
                fault("memory_spike", "Memory Spike", "🧠", "Allocates 50 MB on each request"),
                fault("cpu_spike", "CPU Spike", "🔥", "Burns CPU for 2 seconds per request"),
            ],
            scenarios: vec![
                scenario("cascading_failure", "Cascading Failure", "🌊", Tone::Red, &["service_crash"]),
                scenario("system_wide_latency", "System Latency", "🐌", Tone::Amber, &["high_latency"]),
                scenario("database_blackout", "DB Blackout", "💾", Tone::Red, &["db_failure"]),
                scenario("memory_pressure", "Memory Pressure", "📊", Tone::Amber, &["memory_spike"]),
                scenario(RESET_SCENARIO_ID, "Reset All", "✅", Tone::Green, &[]),
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortalConfig {
    pub api_origin: String,
    pub poll_interval: Duration,
    pub log_filter: String,
    pub customers: Vec<String>,
    pub default_customer: String,
    pub claim_types: Vec<String>,
    pub chaos: ChaosCatalog,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_origin: DEFAULT_API_ORIGIN.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            log_filter: DEFAULT_LOG_FILTER.into(),
            customers: (1..=5).map(|n| format!("CUST{n:03}")).collect(),
            default_customer: "CUST001".into(),
            claim_types: [
                "Medical",
                "Property Damage",
                "Auto Accident",
                "Theft",
                "Life",
                "Emergency",
                "Dental",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            chaos: ChaosCatalog::default(),
        }
    }
}

impl PortalConfig {
    /// Builds the configuration from a key lookup, falling back to defaults
    /// for anything unset or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(origin) = get(ENV_API_ORIGIN) {
            config.api_origin = normalize_origin(&origin)?;
        }
        if let Some(raw) = get(ENV_POLL_INTERVAL_MS) {
            let millis = raw
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| ConfigError::InvalidPollInterval(raw.clone()))?;
            config.poll_interval = Duration::from_millis(millis);
        }
        if let Some(filter) = get(ENV_LOG_FILTER) {
            config.log_filter = filter;
        }

        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn with_api_origin(mut self, origin: &str) -> Result<Self, ConfigError> {
        self.api_origin = normalize_origin(origin)?;
        Ok(self)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_origin, path)
    }
}

fn normalize_origin(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidOrigin(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

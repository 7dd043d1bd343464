mod app;
mod bridge;
mod components;
mod logging;

use app::App;
use leptos::*;
use portal_core::config::{ENV_API_ORIGIN, ENV_LOG_FILTER, ENV_POLL_INTERVAL_MS};
use portal_core::PortalConfig;

/// Settings baked in at build time (`PORTAL_API_ORIGIN=... trunk build`).
fn build_time_setting(key: &str) -> Option<String> {
    let value = match key {
        ENV_API_ORIGIN => option_env!("PORTAL_API_ORIGIN"),
        ENV_POLL_INTERVAL_MS => option_env!("PORTAL_POLL_INTERVAL_MS"),
        ENV_LOG_FILTER => option_env!("PORTAL_LOG"),
        _ => None,
    };
    value.map(String::from)
}

fn main() {
    let (config, problem) = match PortalConfig::from_lookup(build_time_setting) {
        Ok(config) => (config, None),
        Err(e) => (PortalConfig::default(), Some(e)),
    };

    logging::init(&config.log_filter);
    if let Some(e) = problem {
        tracing::warn!(error = %e, "invalid build-time configuration, using defaults");
    }
    tracing::info!(origin = %config.api_origin, "starting portal");

    mount_to_body(move || view! { <App config=config/> });
}

//! Plain-text rendering of chaos status for terminals.

use portal_core::chaos::{service_rows, ScenarioOutcome, ToggleOutcome};
use portal_core::config::ChaosCatalog;
use portal_core::dto::ChaosStatusDto;
use portal_core::poller::ChaosState;

const SERVICE_HEADER: &str = "SERVICE";
const HEALTH_WIDTH: usize = 8;

/// One row per configured service, one column per catalog fault.
pub fn status_table(catalog: &ChaosCatalog, status: &ChaosStatusDto) -> String {
    let rows = service_rows(catalog, status);
    let name_width = rows
        .iter()
        .map(|r| r.display_name.chars().count())
        .max()
        .unwrap_or(0)
        .max(SERVICE_HEADER.len());

    let mut lines = Vec::with_capacity(rows.len() + 1);
    let mut header = format!(
        "{:<name_width$}  {:<health_width$}",
        SERVICE_HEADER,
        "HEALTH",
        health_width = HEALTH_WIDTH
    );
    for fault in &catalog.faults {
        header.push_str("  ");
        header.push_str(&fault.key);
    }
    lines.push(header);

    for row in rows {
        let health = if row.healthy { "healthy" } else { "degraded" };
        let mut line = format!(
            "{:<name_width$}  {health:<health_width$}",
            row.display_name,
            health_width = HEALTH_WIDTH
        );
        for cell in &row.faults {
            let flag = if cell.active { "ON" } else { "off" };
            line.push_str(&format!("  {flag:<width$}", width = cell.key.len()));
        }
        lines.push(line);
    }

    let mut out = lines
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');
    out
}

pub fn state_report(catalog: &ChaosCatalog, state: &ChaosState) -> String {
    match state {
        ChaosState::Loading => "waiting for first status read\n".to_string(),
        ChaosState::Live(status) => status_table(catalog, status),
        ChaosState::Failed(reason) => format!("status unavailable: {reason}\n"),
    }
}

pub fn toggle_summary(outcome: &ToggleOutcome) -> String {
    match outcome {
        ToggleOutcome::Acknowledged => "toggle acknowledged".into(),
        ToggleOutcome::Unacknowledged { status } => {
            format!("toggle sent, gateway answered {status}")
        }
        ToggleOutcome::Failed { error } => format!("toggle failed: {error}"),
    }
}

pub fn scenario_summary(outcome: &ScenarioOutcome) -> String {
    match outcome {
        ScenarioOutcome::Applied {
            issued,
            unacknowledged: 0,
        } => format!("applied: {issued} requests"),
        ScenarioOutcome::Applied {
            issued,
            unacknowledged,
        } => format!("applied: {issued} requests, {unacknowledged} not acknowledged"),
        ScenarioOutcome::Aborted {
            issued,
            failed,
            error,
        } => format!(
            "aborted after {issued} requests at {}/{}: {error}",
            failed.service, failed.fault
        ),
        ScenarioOutcome::Busy => "another scenario is still running".into(),
    }
}

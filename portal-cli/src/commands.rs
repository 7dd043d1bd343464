use crate::http::{self, CliGateway};
use crate::report;
use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use futures::StreamExt;
use portal_core::chaos::{apply_scenario, service_rows, toggle_fault, ChaosView, InFlightKey, ScenarioOutcome};
use portal_core::claims::{claims_for_customer, ClaimDraft};
use portal_core::config::ChaosCatalog;
use portal_core::dto::{ChaosStatusDto, ToggleRequest};
use portal_core::error::GatewayError;
use portal_core::gateway::{GatewayStatus, StatusCheck};
use portal_core::overview::{load_overview, summarize};
use portal_core::poller::{poll_status, StatusBoard};
use portal_core::PortalConfig;
use serde::Serialize;
use std::cell::RefCell;
use std::io::Write;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "portal", about = "Operator tool for the InsureWatch API gateway")]
pub struct Cli {
    /// Gateway origin; overrides PORTAL_API_ORIGIN.
    #[arg(long, global = true)]
    pub api_origin: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Gateway liveness as the portal badge shows it.
    Health,
    /// Summary cards for one customer.
    Overview {
        #[arg(long)]
        customer: Option<String>,
    },
    Policies {
        #[arg(long)]
        customer: Option<String>,
    },
    Portfolio {
        #[arg(long)]
        customer: Option<String>,
    },
    /// All claims, or those of one customer.
    Claims {
        #[arg(long)]
        customer: Option<String>,
    },
    FileClaim {
        #[arg(long)]
        customer: Option<String>,
        /// Defaults to the first configured claim type.
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        description: String,
        /// YYYY-MM-DD; defaults to today.
        #[arg(long)]
        incident_date: Option<String>,
    },
    #[command(subcommand)]
    Chaos(ChaosCommand),
}

#[derive(Debug, Subcommand)]
pub enum ChaosCommand {
    Status {
        #[arg(long)]
        json: bool,
    },
    Toggle {
        service: String,
        fault: String,
        #[arg(value_enum)]
        state: FaultState,
    },
    Scenario {
        id: String,
    },
    /// Re-reads the status every poll interval.
    Watch {
        /// Stop after this many reads.
        #[arg(long)]
        ticks: Option<usize>,
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FaultState {
    On,
    Off,
}

pub async fn run<W: Write>(command: Command, config: &PortalConfig, out: &mut W) -> anyhow::Result<()> {
    let gateway = http::gateway(&config.api_origin);
    let customer_or_default =
        |customer: Option<String>| customer.unwrap_or_else(|| config.default_customer.clone());

    match command {
        Command::Health => {
            let health = gateway.health().await;
            let status = GatewayStatus::from_health(&health);
            match health {
                Ok(h) => writeln!(out, "{} ({})", status.label(), h.status)?,
                Err(e) => writeln!(out, "{} ({e})", status.label())?,
            }
        }
        Command::Overview { customer } => {
            let customer = customer_or_default(customer);
            let sources = load_overview(&gateway, &customer).await;
            let summary = summarize(&sources, &customer, config.chaos.services.len());
            print_json(out, &summary)?;
        }
        Command::Policies { customer } => {
            let customer = customer_or_default(customer);
            let policies = gateway
                .policies(&customer, StatusCheck::Enforce)
                .await
                .with_context(|| format!("loading policies for {customer}"))?;
            print_json(out, &policies)?;
        }
        Command::Portfolio { customer } => {
            let customer = customer_or_default(customer);
            let portfolio = gateway
                .portfolio(&customer, StatusCheck::Enforce)
                .await
                .with_context(|| format!("loading portfolio for {customer}"))?;
            print_json(out, &portfolio)?;
        }
        Command::Claims { customer } => {
            let claims = gateway
                .claims(StatusCheck::Enforce)
                .await
                .context("loading claims")?;
            match customer {
                Some(id) => print_json(out, &claims_for_customer(&claims, &id))?,
                None => print_json(out, &claims)?,
            }
        }
        Command::FileClaim {
            customer,
            kind,
            amount,
            description,
            incident_date,
        } => {
            let customer = customer_or_default(customer);
            let default_kind = config.claim_types.first().map(String::as_str).unwrap_or_default();
            let mut draft = ClaimDraft::blank_today(default_kind);
            if let Some(kind) = kind {
                draft.kind = kind;
            }
            if let Some(date) = incident_date {
                draft.incident_date = date;
            }
            draft.amount = amount;
            draft.description = description;

            let claim = draft.to_new_claim(&customer)?;
            let created = gateway.file_claim(&claim).await.map_err(|e| match e {
                GatewayError::Status { status } => anyhow::anyhow!("Server error {status}"),
                other => anyhow::Error::new(other),
            })?;
            tracing::info!(%customer, amount = claim.amount, "claim filed");
            print_json(out, &created)?;
        }
        Command::Chaos(chaos) => run_chaos(chaos, &gateway, config, out).await?,
    }
    Ok(())
}

async fn run_chaos<W: Write>(
    command: ChaosCommand,
    gateway: &CliGateway,
    config: &PortalConfig,
    out: &mut W,
) -> anyhow::Result<()> {
    let catalog = &config.chaos;
    match command {
        ChaosCommand::Status { json } => {
            let status = gateway
                .chaos_status(StatusCheck::Enforce)
                .await
                .context("reading chaos status")?;
            if json {
                print_json(out, &service_rows(catalog, &status))?;
            } else {
                write!(out, "{}", report::status_table(catalog, &status))?;
            }
        }
        ChaosCommand::Toggle {
            service,
            fault,
            state,
        } => {
            check_target(catalog, &service, &fault)?;
            let board = StatusBoard::default();
            let toggle = ToggleRequest {
                service,
                fault,
                enabled: state == FaultState::On,
            };
            let outcome = toggle_fault(gateway, &board, toggle).await;
            writeln!(out, "{}", report::toggle_summary(&outcome))?;
            write!(out, "{}", report::state_report(catalog, &board.state()))?;
        }
        ChaosCommand::Scenario { id } => {
            let Some(scenario) = catalog.scenario(&id) else {
                let known: Vec<&str> = catalog.scenarios.iter().map(|s| s.id.as_str()).collect();
                bail!("unknown scenario '{id}', expected one of: {}", known.join(", "));
            };
            let board = StatusBoard::default();
            let outcome = apply_scenario(gateway, catalog, scenario, &board).await;
            writeln!(out, "{}", report::scenario_summary(&outcome))?;
            if let ScenarioOutcome::Aborted { issued, error, .. } = outcome {
                bail!("scenario '{id}' aborted after {issued} requests: {error}");
            }
            write!(out, "{}", report::state_report(catalog, &board.state()))?;
        }
        ChaosCommand::Watch { ticks, interval_ms } => {
            let period = interval_ms
                .map(Duration::from_millis)
                .unwrap_or(config.poll_interval);
            if period.is_zero() {
                bail!("interval must be greater than zero");
            }
            let view = PrintingView {
                board: StatusBoard::default(),
                catalog,
                out: RefCell::new(out),
            };
            let interval = tokio::time::interval(period);
            let stream = futures::stream::unfold(interval, |mut interval| async move {
                interval.tick().await;
                Some(((), interval))
            })
            .take(ticks.unwrap_or(usize::MAX));
            let polls = poll_status(gateway, &view, stream).await;
            tracing::info!(polls, "watch finished");
        }
    }
    Ok(())
}

fn check_target(catalog: &ChaosCatalog, service: &str, fault: &str) -> anyhow::Result<()> {
    if !catalog.has_service(service) {
        bail!("unknown service '{service}', expected one of: {}", catalog.services.join(", "));
    }
    if catalog.fault(fault).is_none() {
        let keys: Vec<&str> = catalog.faults.iter().map(|f| f.key.as_str()).collect();
        bail!("unknown fault '{fault}', expected one of: {}", keys.join(", "));
    }
    Ok(())
}

fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    writeln!(out, "{text}")?;
    Ok(())
}

/// Prints every published snapshot as it arrives.
struct PrintingView<'a, W: Write> {
    board: StatusBoard,
    catalog: &'a ChaosCatalog,
    out: RefCell<&'a mut W>,
}

impl<W: Write> ChaosView for PrintingView<'_, W> {
    fn set_pending(&self, key: &InFlightKey, pending: bool) {
        self.board.set_pending(key, pending);
    }

    fn is_pending(&self, key: &InFlightKey) -> bool {
        self.board.is_pending(key)
    }

    fn publish(&self, status: Result<ChaosStatusDto, GatewayError>) {
        self.board.publish(status);
        let text = report::state_report(self.catalog, &self.board.state());
        let mut out = self.out.borrow_mut();
        if let Err(e) = write!(out, "{text}").and_then(|_| writeln!(out)) {
            tracing::warn!(error = %e, "could not write status");
        }
    }
}

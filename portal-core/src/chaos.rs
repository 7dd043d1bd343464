//! Fault toggling and scenario application against the gateway's chaos API.
//!
//! Both operations report progress through a [`ChaosView`]: which controls
//! are pending, and the status snapshot fetched afterwards. A pending key is
//! held by a guard, so it is released on every exit path.

use crate::config::{ChaosCatalog, ScenarioDef};
use crate::dto::{ChaosStatusDto, ToggleRequest};
use crate::error::GatewayError;
use crate::format::title_case;
use crate::gateway::{Gateway, StatusCheck};
use crate::transport::Transport;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum InFlightKey {
    Fault { service: String, fault: String },
    Scenario,
}

impl InFlightKey {
    pub fn fault(service: &str, fault: &str) -> Self {
        InFlightKey::Fault {
            service: service.to_string(),
            fault: fault.to_string(),
        }
    }
}

pub trait ChaosView {
    fn set_pending(&self, key: &InFlightKey, pending: bool);
    fn is_pending(&self, key: &InFlightKey) -> bool;
    /// Replaces the displayed snapshot, or switches to the error view.
    fn publish(&self, status: Result<ChaosStatusDto, GatewayError>);
}

struct Pending<'a, V: ChaosView + ?Sized> {
    view: &'a V,
    key: InFlightKey,
}

impl<'a, V: ChaosView + ?Sized> Pending<'a, V> {
    fn hold(view: &'a V, key: InFlightKey) -> Self {
        view.set_pending(&key, true);
        Self { view, key }
    }
}

impl<V: ChaosView + ?Sized> Drop for Pending<'_, V> {
    fn drop(&mut self) {
        self.view.set_pending(&self.key, false);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToggleOutcome {
    Acknowledged,
    /// The gateway answered with a non-2xx status. Treated as sent.
    Unacknowledged { status: u16 },
    Failed { error: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    /// Every pair was sent. `unacknowledged` counts non-2xx replies.
    Applied { issued: usize, unacknowledged: usize },
    /// The request for `failed` never completed; later pairs were not sent.
    /// Pairs before it keep their new value.
    Aborted {
        issued: usize,
        failed: ToggleRequest,
        error: String,
    },
    /// Another scenario was still being applied.
    Busy,
}

/// Full target state for `scenario`: every fault of every service, in service
/// order then catalog order, independent of what is currently live.
pub fn scenario_targets(catalog: &ChaosCatalog, scenario: &ScenarioDef) -> Vec<ToggleRequest> {
    catalog
        .services
        .iter()
        .flat_map(|service| {
            catalog.faults.iter().map(move |fault| ToggleRequest {
                service: service.clone(),
                fault: fault.key.clone(),
                enabled: scenario.wants_enabled(&fault.key),
            })
        })
        .collect()
}

/// One status read; the result goes straight to the view.
pub async fn refresh_status<T, V>(gateway: &Gateway<T>, view: &V)
where
    T: Transport,
    V: ChaosView + ?Sized,
{
    let status = gateway.chaos_status(StatusCheck::Enforce).await;
    if let Err(e) = &status {
        tracing::warn!(error = %e, "chaos status unavailable");
    }
    view.publish(status);
}

/// Sets one fault flag, then resynchronises the snapshot whatever happened.
pub async fn toggle_fault<T, V>(gateway: &Gateway<T>, view: &V, toggle: ToggleRequest) -> ToggleOutcome
where
    T: Transport,
    V: ChaosView + ?Sized,
{
    let _pending = Pending::hold(view, InFlightKey::fault(&toggle.service, &toggle.fault));
    tracing::info!(
        service = %toggle.service,
        fault = %toggle.fault,
        enabled = toggle.enabled,
        "toggling fault"
    );

    let outcome = match gateway.toggle_fault(&toggle).await {
        Ok(ack) if ack.is_success() => ToggleOutcome::Acknowledged,
        Ok(ack) => {
            tracing::warn!(service = %toggle.service, fault = %toggle.fault, status = ack.status, "toggle not acknowledged");
            ToggleOutcome::Unacknowledged { status: ack.status }
        }
        Err(e) => {
            tracing::warn!(service = %toggle.service, fault = %toggle.fault, error = %e, "toggle failed");
            ToggleOutcome::Failed {
                error: e.to_string(),
            }
        }
    };

    refresh_status(gateway, view).await;
    outcome
}

/// Drives every (service, fault) pair to the scenario's target, one request at
/// a time. The first request that fails to complete stops the run.
pub async fn apply_scenario<T, V>(
    gateway: &Gateway<T>,
    catalog: &ChaosCatalog,
    scenario: &ScenarioDef,
    view: &V,
) -> ScenarioOutcome
where
    T: Transport,
    V: ChaosView + ?Sized,
{
    if view.is_pending(&InFlightKey::Scenario) {
        return ScenarioOutcome::Busy;
    }
    let _pending = Pending::hold(view, InFlightKey::Scenario);

    let targets = scenario_targets(catalog, scenario);
    let total = targets.len();
    tracing::info!(scenario = %scenario.id, requests = total, "applying scenario");

    let mut unacknowledged = 0;
    for (index, target) in targets.into_iter().enumerate() {
        match gateway.toggle_fault(&target).await {
            Ok(ack) if ack.is_success() => {}
            Ok(ack) => {
                unacknowledged += 1;
                tracing::warn!(
                    service = %target.service,
                    fault = %target.fault,
                    status = ack.status,
                    "scenario toggle not acknowledged"
                );
            }
            Err(e) => {
                tracing::warn!(
                    scenario = %scenario.id,
                    sent = index + 1,
                    of = total,
                    error = %e,
                    "scenario aborted"
                );
                return ScenarioOutcome::Aborted {
                    issued: index + 1,
                    failed: target,
                    error: e.to_string(),
                };
            }
        }
    }

    refresh_status(gateway, view).await;
    ScenarioOutcome::Applied {
        issued: total,
        unacknowledged,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FaultCell {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub description: String,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ServiceRow {
    pub name: String,
    pub display_name: String,
    pub healthy: bool,
    pub faults: Vec<FaultCell>,
}

/// Health grid rows for every configured service. A service missing from the
/// snapshot, or one that does not report `healthy`, shows as healthy.
pub fn service_rows(catalog: &ChaosCatalog, status: &ChaosStatusDto) -> Vec<ServiceRow> {
    catalog
        .services
        .iter()
        .map(|name| {
            let health = status.services.get(name);
            ServiceRow {
                name: name.clone(),
                display_name: title_case(name),
                healthy: health.and_then(|h| h.healthy) != Some(false),
                faults: catalog
                    .faults
                    .iter()
                    .map(|f| FaultCell {
                        key: f.key.clone(),
                        label: f.label.clone(),
                        icon: f.icon.clone(),
                        description: f.description.clone(),
                        active: health.is_some_and(|h| h.fault_active(&f.key)),
                    })
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Tone, RESET_SCENARIO_ID};
    use crate::gateway::CHAOS_STATUS_PATH;
    use crate::poller::{ChaosState, StatusBoard};
    use crate::testing::{MockTransport, WireEvent};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::{BTreeMap, BTreeSet};

    /// Remembers which keys were still pending whenever a snapshot landed.
    #[derive(Default)]
    struct PendingAtPublish {
        board: StatusBoard,
        seen: RefCell<Vec<BTreeSet<InFlightKey>>>,
    }

    impl ChaosView for PendingAtPublish {
        fn set_pending(&self, key: &InFlightKey, pending: bool) {
            self.board.set_pending(key, pending);
        }

        fn is_pending(&self, key: &InFlightKey) -> bool {
            self.board.is_pending(key)
        }

        fn publish(&self, status: Result<ChaosStatusDto, GatewayError>) {
            self.seen.borrow_mut().push(self.board.pending());
            self.board.publish(status);
        }
    }

    fn catalog() -> ChaosCatalog {
        ChaosCatalog::default()
    }

    fn truth_table(mock: &MockTransport) -> BTreeMap<(String, String), bool> {
        mock.chaos()
            .into_iter()
            .flat_map(|(service, health)| {
                health
                    .chaos
                    .into_iter()
                    .map(move |(fault, on)| ((service.clone(), fault), on))
            })
            .collect()
    }

    fn custom(faults: &[&str]) -> ScenarioDef {
        ScenarioDef {
            id: "custom".into(),
            label: "Custom".into(),
            icon: "🧪".into(),
            tone: Tone::Red,
            faults: faults.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn scenario_sends_every_pair_one_at_a_time() {
        let catalog = catalog();
        let gateway = Gateway::new(MockTransport::with_services(&["claims"]));
        let board = StatusBoard::default();
        let scenario = catalog.scenario("cascading_failure").expect("scenario").clone();

        let outcome = apply_scenario(&gateway, &catalog, &scenario, &board).await;

        let expected = catalog.services.len() * catalog.faults.len();
        assert_eq!(
            outcome,
            ScenarioOutcome::Applied {
                issued: expected,
                unacknowledged: 0
            }
        );

        let mock = gateway.transport();
        assert_eq!(mock.toggles().len(), expected);
        assert_eq!(mock.max_in_flight(), 1);
        let events = mock.events();
        for pair in events.chunks(2) {
            match pair {
                [WireEvent::Dispatch(a), WireEvent::Settle(b)] => assert_eq!(a, b),
                other => panic!("interleaved requests: {other:?}"),
            }
        }

        let order: Vec<(String, String)> = mock
            .toggles()
            .into_iter()
            .map(|t| (t.service, t.fault))
            .collect();
        assert_eq!(order[0], ("claims".to_string(), "service_crash".to_string()));
        assert_eq!(order[4], ("claims".to_string(), "cpu_spike".to_string()));
        assert_eq!(order[5], ("policy".to_string(), "service_crash".to_string()));
        assert_eq!(mock.count(CHAOS_STATUS_PATH), 1);
        assert!(board.pending().is_empty());
    }

    #[tokio::test]
    async fn applying_twice_matches_applying_once() {
        let catalog = catalog();
        let scenario = custom(&["high_latency", "cpu_spike"]);

        let once = Gateway::new(MockTransport::new());
        once.transport().set_fault("policy", "db_failure", true);
        apply_scenario(&once, &catalog, &scenario, &StatusBoard::default()).await;

        let twice = Gateway::new(MockTransport::new());
        twice.transport().set_fault("policy", "db_failure", true);
        let board = StatusBoard::default();
        apply_scenario(&twice, &catalog, &scenario, &board).await;
        apply_scenario(&twice, &catalog, &scenario, &board).await;

        assert_eq!(truth_table(once.transport()), truth_table(twice.transport()));
    }

    #[tokio::test]
    async fn rejection_stops_the_run_and_releases_the_flag() {
        let catalog = catalog();
        let gateway = Gateway::new(MockTransport::new());
        gateway.transport().reject_toggle_at(7);
        let board = StatusBoard::default();
        let scenario = catalog.scenario("database_blackout").expect("scenario").clone();

        let outcome = apply_scenario(&gateway, &catalog, &scenario, &board).await;

        match outcome {
            ScenarioOutcome::Aborted { issued, failed, .. } => {
                assert_eq!(issued, 7);
                assert_eq!(failed.service, "policy");
                assert_eq!(failed.fault, "high_latency");
            }
            other => panic!("expected abort, got {other:?}"),
        }
        assert_eq!(gateway.transport().toggles().len(), 7);
        assert_eq!(gateway.transport().count(CHAOS_STATUS_PATH), 0);
        assert!(!board.is_pending(&InFlightKey::Scenario));

        // Pairs before the failure were applied, the rest were never touched.
        let table = truth_table(gateway.transport());
        assert_eq!(table.get(&("claims".into(), "db_failure".into())), Some(&true));
        assert_eq!(table.get(&("investment".into(), "db_failure".into())), None);
    }

    #[tokio::test]
    async fn reset_turns_everything_off() {
        let catalog = catalog();
        let gateway = Gateway::new(MockTransport::new());
        for service in &catalog.services {
            for fault in &catalog.faults {
                gateway.transport().set_fault(service, &fault.key, true);
            }
        }
        let reset = catalog.scenario(RESET_SCENARIO_ID).expect("reset").clone();

        apply_scenario(&gateway, &catalog, &reset, &StatusBoard::default()).await;

        let table = truth_table(gateway.transport());
        assert_eq!(table.len(), catalog.services.len() * catalog.faults.len());
        assert!(table.values().all(|on| !on));
    }

    #[tokio::test]
    async fn scenario_overwrites_every_service_not_just_known_ones() {
        let catalog = catalog();
        // The gateway only reports one service; all four must still be written.
        let gateway = Gateway::new(MockTransport::with_services(&["claims"]));
        gateway.transport().set_fault("claims", "db_failure", true);
        let board = StatusBoard::default();

        apply_scenario(&gateway, &catalog, &custom(&["service_crash", "memory_spike"]), &board).await;

        let table = truth_table(gateway.transport());
        for service in &catalog.services {
            for fault in &catalog.faults {
                let want = fault.key == "service_crash" || fault.key == "memory_spike";
                assert_eq!(
                    table.get(&(service.clone(), fault.key.clone())),
                    Some(&want),
                    "{service}/{}",
                    fault.key
                );
            }
        }
        assert!(matches!(board.state(), ChaosState::Live(_)));
    }

    #[tokio::test]
    async fn non_2xx_replies_do_not_stop_a_scenario() {
        let catalog = catalog();
        let gateway = Gateway::new(MockTransport::new());
        gateway
            .transport()
            .reply_to(crate::gateway::CHAOS_TOGGLE_PATH, 503, "");

        let outcome = apply_scenario(
            &gateway,
            &catalog,
            catalog.scenario("memory_pressure").expect("scenario"),
            &StatusBoard::default(),
        )
        .await;

        assert_eq!(
            outcome,
            ScenarioOutcome::Applied {
                issued: 20,
                unacknowledged: 20
            }
        );
    }

    #[tokio::test]
    async fn second_scenario_is_refused_while_one_is_pending() {
        let catalog = catalog();
        let gateway = Gateway::new(MockTransport::new());
        let board = StatusBoard::default();
        board.set_pending(&InFlightKey::Scenario, true);

        let outcome = apply_scenario(
            &gateway,
            &catalog,
            catalog.scenario(RESET_SCENARIO_ID).expect("reset"),
            &board,
        )
        .await;

        assert_eq!(outcome, ScenarioOutcome::Busy);
        assert!(gateway.transport().requests().is_empty());
        assert!(board.is_pending(&InFlightKey::Scenario));
    }

    #[tokio::test]
    async fn toggle_resyncs_even_when_the_request_fails() {
        let gateway = Gateway::new(MockTransport::with_services(&["claims"]));
        gateway.transport().reject_toggle_at(1);
        let board = StatusBoard::default();

        let outcome = toggle_fault(
            &gateway,
            &board,
            ToggleRequest {
                service: "claims".into(),
                fault: "cpu_spike".into(),
                enabled: true,
            },
        )
        .await;

        assert!(matches!(outcome, ToggleOutcome::Failed { .. }));
        assert_eq!(gateway.transport().count(CHAOS_STATUS_PATH), 1);
        assert!(board.pending().is_empty());
        let history = board.pending_history();
        assert_eq!(
            history,
            vec![
                (InFlightKey::fault("claims", "cpu_spike"), true),
                (InFlightKey::fault("claims", "cpu_spike"), false)
            ]
        );
        let state = board.state();
        let snapshot = state.snapshot().expect("live");
        assert!(!snapshot.services["claims"].fault_active("cpu_spike"));
    }

    #[tokio::test]
    async fn toggle_holds_its_flag_until_the_resync_lands() {
        let gateway = Gateway::new(MockTransport::with_services(&["claims"]));
        let view = PendingAtPublish::default();
        let key = InFlightKey::fault("claims", "db_failure");

        toggle_fault(
            &gateway,
            &view,
            ToggleRequest {
                service: "claims".into(),
                fault: "db_failure".into(),
                enabled: true,
            },
        )
        .await;

        assert_eq!(*view.seen.borrow(), vec![BTreeSet::from([key.clone()])]);
        assert!(!view.is_pending(&key));
        let requests = gateway.transport().requests();
        assert_eq!(requests.last().map(|r| r.path.as_str()), Some(CHAOS_STATUS_PATH));
    }

    #[tokio::test]
    async fn scenario_holds_its_flag_until_the_resync_lands() {
        let catalog = catalog();
        let gateway = Gateway::new(MockTransport::new());
        let view = PendingAtPublish::default();

        apply_scenario(&gateway, &catalog, &custom(&["cpu_spike"]), &view).await;

        assert_eq!(
            *view.seen.borrow(),
            vec![BTreeSet::from([InFlightKey::Scenario])]
        );
        assert!(!view.is_pending(&InFlightKey::Scenario));
    }

    #[test]
    fn rows_cover_configured_services() {
        let catalog = catalog();
        let status: ChaosStatusDto = serde_json::from_value(serde_json::json!({
            "services": {
                "claims": {"healthy": false, "chaos": {"service_crash": true}},
                "notification": {"chaos": {}}
            }
        }))
        .expect("decode");

        let rows = service_rows(&catalog, &status);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].display_name, "Claims");
        assert!(!rows[0].healthy);
        assert!(rows[0].faults[0].active);
        assert!(rows[1].healthy);
        assert!(rows[3].healthy);
        assert!(rows[1].faults.iter().all(|f| !f.active));
    }
}

use super::states::{ErrorState, LoadingState};
use super::tone_color;
use crate::app::{portal_config, portal_gateway};
use leptos::*;
use portal_core::chaos::{
    apply_scenario, refresh_status, service_rows, toggle_fault, ChaosView, InFlightKey, ServiceRow,
};
use portal_core::config::ScenarioDef;
use portal_core::dto::{ChaosStatusDto, ToggleRequest};
use portal_core::error::GatewayError;
use portal_core::poller::ChaosState;
use std::collections::BTreeSet;
use wasm_bindgen_futures::spawn_local;

/// Reactive [`ChaosView`]. Writes after the panel is gone are dropped.
#[derive(Clone, Copy)]
struct SignalChaosView {
    state: RwSignal<ChaosState>,
    pending: RwSignal<BTreeSet<InFlightKey>>,
}

impl ChaosView for SignalChaosView {
    fn set_pending(&self, key: &InFlightKey, pending: bool) {
        self.pending.try_update(|set| {
            if pending {
                set.insert(key.clone());
            } else {
                set.remove(key);
            }
        });
    }

    fn is_pending(&self, key: &InFlightKey) -> bool {
        self.pending
            .try_with_untracked(|set| set.contains(key))
            .unwrap_or(false)
    }

    fn publish(&self, status: Result<ChaosStatusDto, GatewayError>) {
        self.state.try_update(|state| state.absorb(status));
    }
}

#[component]
pub fn ChaosPanel() -> impl IntoView {
    let config = portal_config();
    let gateway = store_value(portal_gateway());
    let catalog = store_value(config.chaos.clone());
    let board = SignalChaosView {
        state: create_rw_signal(ChaosState::Loading),
        pending: create_rw_signal(BTreeSet::new()),
    };

    let poll = move || {
        let Some(gw) = gateway.try_get_value() else {
            return;
        };
        spawn_local(async move { refresh_status(&gw, &board).await });
    };
    poll();
    match set_interval_with_handle(poll, config.poll_interval) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(e) => tracing::warn!(error = ?e, "could not start status polling"),
    }

    let on_toggle = Callback::new(move |toggle: ToggleRequest| {
        let gw = gateway.get_value();
        spawn_local(async move {
            toggle_fault(&gw, &board, toggle).await;
        });
    });

    let on_scenario = Callback::new(move |id: String| {
        let gw = gateway.get_value();
        let catalog = catalog.get_value();
        spawn_local(async move {
            let Some(scenario) = catalog.scenario(&id) else {
                tracing::warn!(scenario = %id, "unknown scenario");
                return;
            };
            let outcome = apply_scenario(&gw, &catalog, scenario, &board).await;
            tracing::info!(?outcome, "scenario finished");
        });
    });

    let scenario_running = move || board.pending.with(|p| p.contains(&InFlightKey::Scenario));
    let scenarios = catalog.with_value(|c| c.scenarios.clone());

    view! {
      <div class="panel chaos-panel">
        <div class="panel-header">
          <h2 class="panel-title">"⚙️ System Status & Chaos Control"</h2>
          <span class="live-indicator"><span class="pulse"></span>"Live"</span>
        </div>

        <div class="chaos-warning">
          "⚠️ Fault toggles act on the live services. Use Reset All to restore normal operation."
        </div>

        <section class="scenarios">
          <h3>"Scenarios"</h3>
          <div class="scenario-grid">
            {scenarios
                .into_iter()
                .map(|s| view! { <ScenarioButton scenario=s disabled=Signal::derive(scenario_running) on_apply=on_scenario/> })
                .collect_view()}
          </div>
          <Show when=scenario_running fallback=|| ()>
            <p class="applying">"Applying scenario across all services…"</p>
          </Show>
        </section>

        <section class="services">
          <h3>"Services"</h3>
          {move || match board.state.get() {
              ChaosState::Loading => view! { <LoadingState label="Loading system status…"/> }.into_view(),
              ChaosState::Failed(msg) => view! { <ErrorState msg=msg/> }.into_view(),
              ChaosState::Live(status) => {
                  let rows = catalog.with_value(|c| service_rows(c, &status));
                  view! {
                    <div class="service-grid">
                      {rows
                          .into_iter()
                          .map(|row| view! { <ServiceCard row=row pending=board.pending on_toggle=on_toggle/> })
                          .collect_view()}
                    </div>
                  }
                  .into_view()
              }
          }}
        </section>
      </div>
    }
}

#[component]
fn ScenarioButton(
    scenario: ScenarioDef,
    #[prop(into)] disabled: Signal<bool>,
    on_apply: Callback<String>,
) -> impl IntoView {
    let color = tone_color(scenario.tone);
    let id = scenario.id.clone();
    view! {
      <button
        class="scenario-btn"
        style=format!("border-color: {color}")
        disabled=move || disabled.get()
        on:click=move |_| on_apply.call(id.clone())
      >
        <span class="scenario-icon">{scenario.icon}</span>
        <span>{scenario.label}</span>
      </button>
    }
}

#[component]
fn ServiceCard(
    row: ServiceRow,
    pending: RwSignal<BTreeSet<InFlightKey>>,
    on_toggle: Callback<ToggleRequest>,
) -> impl IntoView {
    let health = if row.healthy { "healthy" } else { "degraded" };
    let service = row.name;

    view! {
      <div class=format!("service-card {health}")>
        <div class="service-header">
          <span class="service-name">{row.display_name}</span>
          <span class=format!("health-dot {health}")></span>
          <span class="health-label">{if row.healthy { "Healthy" } else { "Degraded" }}</span>
        </div>
        <div class="fault-list">
          {row
              .faults
              .into_iter()
              .map(|cell| {
                  let key = InFlightKey::fault(&service, &cell.key);
                  let toggle = ToggleRequest {
                      service: service.clone(),
                      fault: cell.key.clone(),
                      enabled: !cell.active,
                  };
                  view! {
                    <button
                      class="fault-btn"
                      class:active=cell.active
                      title=cell.description
                      disabled=move || pending.with(|p| p.contains(&key))
                      on:click=move |_| on_toggle.call(toggle.clone())
                    >
                      <span>{cell.icon}</span>
                      <span>{cell.label}</span>
                      <span class="fault-state">{if cell.active { "ON" } else { "OFF" }}</span>
                    </button>
                  }
              })
              .collect_view()}
        </div>
      </div>
    }
}

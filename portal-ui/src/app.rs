use crate::bridge::{self, PortalGateway};
use crate::components::chaos::ChaosPanel;
use crate::components::claims::ClaimsPanel;
use crate::components::investments::InvestmentPanel;
use crate::components::overview::OverviewPanel;
use crate::components::policy::PolicyPanel;
use leptos::*;
use portal_core::config::Tab;
use portal_core::gateway::GatewayStatus;
use portal_core::PortalConfig;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

pub fn portal_config() -> Rc<PortalConfig> {
    expect_context::<Rc<PortalConfig>>()
}

pub fn portal_gateway() -> PortalGateway {
    expect_context::<PortalGateway>()
}

#[component]
pub fn App(config: PortalConfig) -> impl IntoView {
    let config = Rc::new(config);
    let gateway = bridge::gateway(&config.api_origin);
    provide_context(config.clone());
    provide_context(gateway.clone());

    let customer = create_rw_signal(config.default_customer.clone());
    let tab = create_rw_signal(Tab::Overview);
    let gw_status = create_rw_signal(GatewayStatus::Connecting);

    spawn_local(async move {
        let health = gateway.health().await;
        let status = GatewayStatus::from_health(&health);
        tracing::info!(?status, "gateway health");
        gw_status.set(status);
    });

    let customers = config.customers.clone();

    view! {
      <div class="app">
        <header class="header">
          <div class="header-brand">
            <span class="brand-mark">"🛡"</span>
            <span class="brand-name">"InsureWatch"</span>
            <span class="brand-tag">"Portal"</span>
          </div>
          <div class="header-controls">
            <div class="customer-selector">
              <label>"Customer"</label>
              <select
                prop:value=move || customer.get()
                on:change=move |ev| customer.set(event_target_value(&ev))
              >
                {customers
                    .into_iter()
                    .map(|c| view! { <option value=c.clone()>{c}</option> })
                    .collect_view()}
              </select>
            </div>
            <div class=move || format!("gw-badge {}", gw_status.get().css())>
              <span class="dot"></span>
              {move || gw_status.get().label()}
            </div>
          </div>
        </header>

        <nav class="tabbar">
          {Tab::ALL
              .into_iter()
              .map(|t| view! {
                <button
                  class="tab-btn"
                  class:active=move || tab.get() == t
                  on:click=move |_| tab.set(t)
                >
                  <span>{t.icon()}</span>
                  " "
                  {t.label()}
                </button>
              })
              .collect_view()}
        </nav>

        <main class="content">
          {move || match tab.get() {
              Tab::Overview => view! { <OverviewPanel customer=customer tab=tab/> }.into_view(),
              Tab::Policy => view! { <PolicyPanel customer=customer/> }.into_view(),
              Tab::Investments => view! { <InvestmentPanel customer=customer/> }.into_view(),
              Tab::Claims => view! { <ClaimsPanel customer=customer/> }.into_view(),
              Tab::Chaos => view! { <ChaosPanel/> }.into_view(),
          }}
        </main>
      </div>
    }
}

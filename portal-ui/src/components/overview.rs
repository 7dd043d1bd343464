use super::coverage::CoverageBar;
use super::spawn_latest;
use crate::app::{portal_config, portal_gateway};
use leptos::*;
use portal_core::config::Tab;
use portal_core::loadable::Latest;
use portal_core::overview::{load_overview, summarize, OverviewSummary, SummaryCard};

#[component]
pub fn OverviewPanel(#[prop(into)] customer: Signal<String>, tab: RwSignal<Tab>) -> impl IntoView {
    let gateway = store_value(portal_gateway());
    let service_count = portal_config().chaos.services.len();
    let latest = store_value(Latest::default());
    let summary = create_rw_signal(None::<OverviewSummary>);

    create_effect(move |_| {
        let id = customer.get();
        summary.set(None);
        let gw = gateway.get_value();
        spawn_latest(
            latest,
            async move {
                let sources = load_overview(&gw, &id).await;
                summarize(&sources, &id, service_count)
            },
            move |s| summary.set(Some(s)),
        );
    });

    view! {
      <div class="overview">
        <h2 class="section-title">"Welcome, " <span class="accent">{move || customer.get()}</span></h2>
        {move || match summary.get() {
            None => view! { <div class="spinner-wrap"><div class="spinner"></div></div> }.into_view(),
            Some(s) => view! {
              <div class="overview-grid">
                {s.cards.into_iter().map(|card| view! { <Card card=card tab=tab/> }).collect_view()}
              </div>
              {s.active_policy.map(|p| view! {
                <div class="overview-policy">
                  <h3>"Policy at a Glance"</h3>
                  <div class="coverage-bars">
                    {p.coverages
                        .into_iter()
                        .map(|c| view! { <CoverageBar coverage=c/> })
                        .collect_view()}
                  </div>
                </div>
              })}
            }
            .into_view(),
        }}
      </div>
    }
}

#[component]
fn Card(card: SummaryCard, tab: RwSignal<Tab>) -> impl IntoView {
    let target = card.tab;
    view! {
      <button class=format!("summary-card card-{}", card.tone.css()) on:click=move |_| tab.set(target)>
        <div class="card-icon">{card.icon}</div>
        <div class="card-body">
          <div class="card-title">{card.title}</div>
          <div class="card-value">{card.value}</div>
          <div class="card-sub">{card.sub}</div>
        </div>
        <span class="card-arrow">"→"</span>
      </button>
    }
}

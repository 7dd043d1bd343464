use super::coverage::CoverageBar;
use super::spawn_latest;
use super::states::{EmptyState, ErrorState, LoadingState};
use crate::app::portal_gateway;
use leptos::*;
use portal_core::dto::PolicyDto;
use portal_core::gateway::StatusCheck;
use portal_core::loadable::{Latest, Loadable};

#[component]
pub fn PolicyPanel(#[prop(into)] customer: Signal<String>) -> impl IntoView {
    let gateway = store_value(portal_gateway());
    let latest = store_value(Latest::default());
    let policies = create_rw_signal(Loadable::<Vec<PolicyDto>>::Loading);

    create_effect(move |_| {
        let id = customer.get();
        policies.set(Loadable::Loading);
        let gw = gateway.get_value();
        spawn_latest(
            latest,
            async move { gw.policies(&id, StatusCheck::Enforce).await },
            move |result| policies.set(Loadable::from_result(result)),
        );
    });

    move || match policies.get() {
        Loadable::Loading => view! { <LoadingState label="Loading policies…"/> }.into_view(),
        Loadable::Failed(msg) => view! { <ErrorState msg=msg/> }.into_view(),
        Loadable::Loaded(list) if list.is_empty() => {
            view! { <EmptyState label="No policies found for this customer."/> }.into_view()
        }
        Loadable::Loaded(list) => view! {
          <div class="panel">
            <h2 class="panel-title">"📋 Policies for " <span class="accent">{customer.get_untracked()}</span></h2>
            <div class="policy-list">
              {list.into_iter().map(|p| view! { <PolicyCard policy=p/> }).collect_view()}
            </div>
          </div>
        }
        .into_view(),
    }
}

#[component]
fn PolicyCard(policy: PolicyDto) -> impl IntoView {
    let expanded = create_rw_signal(true);
    let badge = format!("badge badge-{}", policy.status_tone().css());
    let icon = policy.type_icon();
    let type_label = policy.type_label();
    let premium = policy.premium_label();
    let PolicyDto {
        id,
        policy_number,
        status,
        start_date,
        end_date,
        coverages,
        ..
    } = policy;

    view! {
      <div class="policy-card card">
        <div class="policy-header" style="cursor: pointer" on:click=move |_| expanded.update(|e| *e = !*e)>
          <div class="policy-meta">
            <span class="policy-type-icon">{icon}</span>
            <div>
              <div class="policy-number">{policy_number}</div>
              <div class="policy-type">{type_label}</div>
            </div>
          </div>
          <div class="policy-summary">
            <span class=badge>{status}</span>
            <div class="policy-premium">{premium}<span>"/mo"</span></div>
          </div>
          <span class="expand-arrow">{move || if expanded.get() { "▲" } else { "▼" }}</span>
        </div>

        <Show when=move || expanded.get() fallback=|| ()>
          <div class="policy-body">
            <div class="policy-dates">
              <div><label>"Start Date"</label><span>{start_date.clone()}</span></div>
              <div><label>"End Date"</label><span>{end_date.clone()}</span></div>
              <div><label>"Policy ID"</label><span class="mono">{id.clone()}</span></div>
            </div>
            {(!coverages.is_empty()).then(|| view! {
              <div class="coverages">
                <h4>"Coverage Breakdown"</h4>
                {coverages.iter().cloned().map(|c| view! { <CoverageBar coverage=c/> }).collect_view()}
              </div>
            })}
          </div>
        </Show>
      </div>
    }
}

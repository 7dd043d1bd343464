use super::states::{ErrorState, LoadingState};
use super::{spawn_latest, tone_color};
use crate::app::portal_gateway;
use leptos::*;
use portal_core::config::Tone;
use portal_core::dto::{HoldingDto, PortfolioDto};
use portal_core::format::{display_timestamp, signed_usd_whole, usd_whole, PLACEHOLDER};
use portal_core::gateway::StatusCheck;
use portal_core::loadable::{Latest, Loadable};

#[component]
pub fn InvestmentPanel(#[prop(into)] customer: Signal<String>) -> impl IntoView {
    let gateway = store_value(portal_gateway());
    let latest = store_value(Latest::default());
    let portfolio = create_rw_signal(Loadable::<PortfolioDto>::Loading);
    let refreshing = create_rw_signal(false);

    // Refreshes leave the current portfolio on screen until the reply lands.
    let load = move |id: String| {
        let gw = gateway.get_value();
        spawn_latest(
            latest,
            async move { gw.portfolio(&id, StatusCheck::Enforce).await },
            move |result| {
                portfolio.set(Loadable::from_result(result));
                refreshing.set(false);
            },
        );
    };

    create_effect(move |_| {
        let id = customer.get();
        portfolio.set(Loadable::Loading);
        refreshing.set(false);
        load(id);
    });

    let refresh = move |_: ev::MouseEvent| {
        refreshing.set(true);
        load(customer.get_untracked());
    };

    move || match portfolio.get() {
        Loadable::Loading => view! { <LoadingState label="Loading portfolio…"/> }.into_view(),
        Loadable::Failed(msg) => view! { <ErrorState msg=msg/> }.into_view(),
        Loadable::Loaded(p) => {
            let change = p.estimated_change();
            let change_color = tone_color(if change >= 0.0 { Tone::Green } else { Tone::Red });
            let total = p.total_value.map(usd_whole).unwrap_or_else(|| PLACEHOLDER.to_string());
            let currency = p.currency_or_default().to_string();
            let updated = p
                .last_updated
                .as_deref()
                .map(display_timestamp)
                .unwrap_or_else(|| PLACEHOLDER.to_string());
            let holdings_count = p.holdings.len();

            view! {
              <div class="panel">
                <div class="panel-header">
                  <h2 class="panel-title">"📈 Investment Portfolio"</h2>
                  <button class="btn btn-secondary" on:click=refresh disabled=move || refreshing.get()>
                    {move || if refreshing.get() { "Refreshing…" } else { "↻ Refresh" }}
                  </button>
                </div>

                <div class="portfolio-summary">
                  <div class="summary-item">
                    <label>"Total Value"</label>
                    <span class="big-number">{total}</span>
                    <span class="muted">{currency}</span>
                  </div>
                  <div class="summary-item">
                    <label>"Today's Change (est.)"</label>
                    <span class="big-number" style=format!("color: {change_color}")>
                      {signed_usd_whole(change)}
                    </span>
                  </div>
                  <div class="summary-item">
                    <label>"Holdings"</label>
                    <span class="big-number">{holdings_count}</span>
                  </div>
                  <div class="summary-item">
                    <label>"Portfolio"</label>
                    <span class="mono">{p.portfolio_id}</span>
                    <span class="muted">{p.portfolio_name}</span>
                  </div>
                </div>

                <table class="holdings-table">
                  <thead>
                    <tr>
                      <th>"Symbol"</th>
                      <th>"Name"</th>
                      <th>"Shares"</th>
                      <th>"Price"</th>
                      <th>"Value"</th>
                      <th>"Change"</th>
                    </tr>
                  </thead>
                  <tbody>
                    {p.holdings.into_iter().map(|h| view! { <HoldingRow holding=h/> }).collect_view()}
                  </tbody>
                </table>

                <p class="note">{format!("Last updated: {updated} · Prices fluctuate on each refresh")}</p>
              </div>
            }
            .into_view()
        }
    }
}

#[component]
fn HoldingRow(holding: HoldingDto) -> impl IntoView {
    let price = holding
        .current_price
        .map(|p| format!("${p:.2}"))
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let value = holding.value.map(usd_whole).unwrap_or_else(|| PLACEHOLDER.to_string());
    let shares = holding
        .shares
        .map(|s| s.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let color = tone_color(holding.change_tone());
    let change = holding.change_label();

    view! {
      <tr>
        <td class="mono strong">{holding.symbol}</td>
        <td>{holding.name}</td>
        <td>{shares}</td>
        <td>{price}</td>
        <td>{value}</td>
        <td style=format!("color: {color}")>{change}</td>
      </tr>
    }
}

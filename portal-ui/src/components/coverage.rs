use super::tone_color;
use leptos::*;
use portal_core::dto::CoverageDto;
use portal_core::format::usd;

#[component]
pub fn CoverageBar(coverage: CoverageDto) -> impl IntoView {
    let pct = coverage.usage_percent();
    let color = tone_color(coverage.usage_tone());
    let nums = format!(
        "{} used / {} limit",
        usd(coverage.used.unwrap_or(0.0)),
        usd(coverage.limit.unwrap_or(0.0))
    );
    let remaining = format!("{} remaining", usd(coverage.available.unwrap_or(0.0)));

    view! {
      <div class="cov-bar-wrap">
        <div class="cov-bar-header">
          <span class="cov-type">{coverage.coverage_type}</span>
          <span class="cov-nums">{nums}</span>
        </div>
        <div class="cov-track">
          <div class="cov-fill" style=format!("width: {pct}%; background: {color}")></div>
        </div>
        <span class="cov-available" style=format!("color: {color}")>{remaining}</span>
      </div>
    }
}

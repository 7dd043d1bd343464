use leptos::*;

#[component]
pub fn LoadingState(#[prop(into)] label: String) -> impl IntoView {
    view! {
      <div class="state-wrap">
        <div class="spinner"></div>
        <p>{label}</p>
      </div>
    }
}

#[component]
pub fn ErrorState(#[prop(into)] msg: String) -> impl IntoView {
    view! {
      <div class="state-wrap error-state">
        <span>"⚠️"</span>
        <p>{format!("Error: {msg}")}</p>
      </div>
    }
}

#[component]
pub fn EmptyState(#[prop(into)] label: String) -> impl IntoView {
    view! {
      <div class="state-wrap muted-state">
        <span>"📭"</span>
        <p>{label}</p>
      </div>
    }
}

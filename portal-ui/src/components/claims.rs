use super::spawn_latest;
use super::states::{EmptyState, ErrorState, LoadingState};
use crate::app::{portal_config, portal_gateway};
use crate::bridge::PortalGateway;
use leptos::*;
use portal_core::claims::{claims_for_customer, ClaimDraft};
use portal_core::dto::ClaimDto;
use portal_core::error::GatewayError;
use portal_core::format::usd;
use portal_core::gateway::StatusCheck;
use portal_core::loadable::{Latest, Loadable};
use wasm_bindgen_futures::spawn_local;

/// Inline feedback under the form header: `Ok` for success, `Err` for a
/// rejected or failed submission.
type SubmitMessage = Result<String, String>;

fn claims_title(customer: &str) -> String {
    format!("📝 Claims — {customer}")
}

/// Runs from the submit future too, so the panel may already be gone.
fn reload_claims(
    gateway: StoredValue<PortalGateway>,
    latest: StoredValue<Latest>,
    claims: RwSignal<Loadable<Vec<ClaimDto>>>,
) {
    let Some(gw) = gateway.try_get_value() else {
        return;
    };
    claims.try_set(Loadable::Loading);
    spawn_latest(
        latest,
        async move { gw.claims(StatusCheck::Enforce).await },
        move |result| {
            claims.try_set(Loadable::from_result(result));
        },
    );
}

#[component]
pub fn ClaimsPanel(#[prop(into)] customer: Signal<String>) -> impl IntoView {
    let gateway = store_value(portal_gateway());
    let latest = store_value(Latest::default());
    let default_kind = store_value(
        portal_config()
            .claim_types
            .first()
            .cloned()
            .unwrap_or_default(),
    );
    let claim_types = portal_config().claim_types.clone();

    let claims = create_rw_signal(Loadable::<Vec<ClaimDto>>::Loading);
    let show_form = create_rw_signal(false);
    let submitting = create_rw_signal(false);
    let draft = create_rw_signal(default_kind.with_value(|k| ClaimDraft::blank_today(k)));
    let submit_msg = create_rw_signal(None::<SubmitMessage>);

    let load = move || reload_claims(gateway, latest, claims);

    create_effect(move |_| {
        customer.with(|_| ());
        load();
    });

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let id = customer.get_untracked();
        let claim = match draft.with_untracked(|d| d.to_new_claim(&id)) {
            Ok(claim) => claim,
            Err(e) => {
                submit_msg.set(Some(Err(format!("Failed to submit: {e}"))));
                return;
            }
        };

        submitting.set(true);
        submit_msg.set(None);
        let gw = gateway.get_value();
        spawn_local(async move {
            let result = gw.file_claim(&claim).await;
            submitting.try_set(false);
            match result {
                Ok(_) => {
                    tracing::info!(customer = %claim.customer_id, amount = claim.amount, "claim filed");
                    submit_msg.try_set(Some(Ok("Claim submitted successfully!".into())));
                    show_form.try_set(false);
                    if let Some(blank) = default_kind.try_with_value(|k| ClaimDraft::blank_today(k)) {
                        draft.try_set(blank);
                    }
                    load();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "claim submission failed");
                    let msg = match e {
                        GatewayError::Status { status } => {
                            format!("Failed to submit: Server error {status}")
                        }
                        other => format!("Failed to submit: {other}"),
                    };
                    submit_msg.try_set(Some(Err(msg)));
                }
            }
        });
    };

    view! {
      <div class="panel">
        <div class="panel-header">
          <h2 class="panel-title">{move || claims_title(&customer.get())}</h2>
          <button class="btn btn-primary" on:click=move |_| show_form.update(|s| *s = !*s)>
            {move || if show_form.get() { "✕ Cancel" } else { "+ File New Claim" }}
          </button>
        </div>

        {move || submit_msg.get().map(|msg| match msg {
            Ok(text) => view! { <div class="alert alert-success">{text}</div> },
            Err(text) => view! { <div class="alert alert-error">{text}</div> },
        })}

        <Show when=move || show_form.get() fallback=|| ()>
          <form class="claim-form card" on:submit=submit>
            <h3>"New Claim"</h3>
            <div class="form-grid">
              <div class="form-group">
                <label>"Claim Type"</label>
                <select
                  prop:value=move || draft.with(|d| d.kind.clone())
                  on:change=move |ev| draft.update(|d| d.kind = event_target_value(&ev))
                >
                  {claim_types
                      .iter()
                      .cloned()
                      .map(|t| view! { <option value=t.clone()>{t}</option> })
                      .collect_view()}
                </select>
              </div>
              <div class="form-group">
                <label>"Amount ($)"</label>
                <input
                  type="number"
                  min="1"
                  step="0.01"
                  placeholder="0.00"
                  required
                  prop:value=move || draft.with(|d| d.amount.clone())
                  on:input=move |ev| draft.update(|d| d.amount = event_target_value(&ev))
                />
              </div>
              <div class="form-group">
                <label>"Incident Date"</label>
                <input
                  type="date"
                  required
                  prop:value=move || draft.with(|d| d.incident_date.clone())
                  on:input=move |ev| draft.update(|d| d.incident_date = event_target_value(&ev))
                />
              </div>
              <div class="form-group full">
                <label>"Description"</label>
                <textarea
                  rows="3"
                  placeholder="Describe the incident…"
                  required
                  prop:value=move || draft.with(|d| d.description.clone())
                  on:input=move |ev| draft.update(|d| d.description = event_target_value(&ev))
                ></textarea>
              </div>
            </div>
            <button class="btn btn-primary" type="submit" disabled=move || submitting.get()>
              {move || if submitting.get() { "Submitting…" } else { "Submit Claim" }}
            </button>
          </form>
        </Show>

        {move || match claims.get() {
            Loadable::Loading => view! { <LoadingState label="Loading claims…"/> }.into_view(),
            Loadable::Failed(msg) => view! { <ErrorState msg=msg/> }.into_view(),
            Loadable::Loaded(all) => {
                let id = customer.get();
                let mine = claims_for_customer(&all, &id);
                if mine.is_empty() {
                    return view! { <EmptyState label="No claims found for this customer."/> }.into_view();
                }
                let note = (mine.len() < all.len()).then(|| {
                    format!("Showing {} of {} total claims for {id}.", mine.len(), all.len())
                });
                view! {
                  <div class="claims-list">
                    {mine
                        .into_iter()
                        .enumerate()
                        .map(|(i, c)| view! { <ClaimCard claim=c position=i/> })
                        .collect_view()}
                  </div>
                  {note.map(|n| view! { <p class="note">{n}</p> })}
                }
                .into_view()
            }
        }}
      </div>
    }
}

#[component]
fn ClaimCard(claim: ClaimDto, position: usize) -> impl IntoView {
    let key = claim.list_key(position);
    let badge = format!("badge badge-{}", claim.status_tone().css());
    let kind = claim.type_label().to_string();
    let status = claim.status_label().to_string();
    let amount = usd(claim.amount_value());
    let description = claim.description_label().to_string();
    let date = claim.date_label();

    view! {
      <div class="claim-card card" data-key=key>
        <div class="claim-header">
          <span class="claim-type">{kind}</span>
          <span class=badge>{status}</span>
        </div>
        <div class="claim-amount">{amount}</div>
        <p class="claim-desc">{description}</p>
        <div class="claim-date">{format!("Incident: {date}")}</div>
      </div>
    }
}

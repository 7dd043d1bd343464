pub mod chaos;
pub mod claims;
pub mod coverage;
pub mod investments;
pub mod overview;
pub mod policy;
pub mod states;

use leptos::*;
use portal_core::config::Tone;
use portal_core::loadable::Latest;
use std::future::Future;
use wasm_bindgen_futures::spawn_local;

/// Runs `fut` and hands its output to `apply` only if no newer request was
/// started through `latest` meanwhile and the owning view still exists.
pub fn spawn_latest<T, Fut, A>(latest: StoredValue<Latest>, fut: Fut, apply: A)
where
    T: 'static,
    Fut: Future<Output = T> + 'static,
    A: FnOnce(T) + 'static,
{
    let Some(ticket) = latest.try_with_value(Latest::begin) else {
        return;
    };
    spawn_local(async move {
        let output = fut.await;
        if latest
            .try_with_value(|l| l.is_current(ticket))
            .unwrap_or(false)
        {
            apply(output);
        } else {
            tracing::debug!("dropping stale response");
        }
    });
}

pub fn tone_color(tone: Tone) -> &'static str {
    match tone {
        Tone::Red => "#a20a29",
        Tone::Amber => "#b45309",
        Tone::Green => "#1a8f4e",
        Tone::Blue => "#1d4ed8",
        Tone::Muted => "#6b7280",
    }
}

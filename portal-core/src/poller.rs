//! Periodic chaos status reads.

use crate::chaos::{refresh_status, ChaosView, InFlightKey};
use crate::dto::ChaosStatusDto;
use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::transport::Transport;
use futures::{Stream, StreamExt};
use std::cell::RefCell;
use std::collections::BTreeSet;

/// What the health grid shows. A failed read hides the grid until the next
/// successful one; a success always replaces the previous snapshot whole.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ChaosState {
    #[default]
    Loading,
    Live(ChaosStatusDto),
    Failed(String),
}

impl ChaosState {
    pub fn absorb(&mut self, result: Result<ChaosStatusDto, GatewayError>) {
        *self = match result {
            Ok(status) => ChaosState::Live(status),
            Err(e) => ChaosState::Failed(e.to_string()),
        };
    }

    pub fn snapshot(&self) -> Option<&ChaosStatusDto> {
        match self {
            ChaosState::Live(status) => Some(status),
            _ => None,
        }
    }
}

/// Reads the status once per tick until the stream ends. A failed read is
/// published like any other result and never ends the loop.
pub async fn poll_status<T, V, S>(gateway: &Gateway<T>, view: &V, ticks: S) -> usize
where
    T: Transport,
    V: ChaosView + ?Sized,
    S: Stream,
{
    let mut ticks = std::pin::pin!(ticks);
    let mut polls = 0;
    while ticks.next().await.is_some() {
        refresh_status(gateway, view).await;
        polls += 1;
    }
    polls
}

/// [`ChaosView`] for hosts without a reactive UI: keeps the latest state and
/// pending set in memory, along with everything that was published.
#[derive(Debug, Default)]
pub struct StatusBoard {
    state: RefCell<ChaosState>,
    pending: RefCell<BTreeSet<InFlightKey>>,
    published: RefCell<Vec<ChaosState>>,
    pending_history: RefCell<Vec<(InFlightKey, bool)>>,
}

impl StatusBoard {
    pub fn state(&self) -> ChaosState {
        self.state.borrow().clone()
    }

    pub fn pending(&self) -> BTreeSet<InFlightKey> {
        self.pending.borrow().clone()
    }

    pub fn published(&self) -> Vec<ChaosState> {
        self.published.borrow().clone()
    }

    pub fn pending_history(&self) -> Vec<(InFlightKey, bool)> {
        self.pending_history.borrow().clone()
    }
}

impl ChaosView for StatusBoard {
    fn set_pending(&self, key: &InFlightKey, pending: bool) {
        if pending {
            self.pending.borrow_mut().insert(key.clone());
        } else {
            self.pending.borrow_mut().remove(key);
        }
        self.pending_history
            .borrow_mut()
            .push((key.clone(), pending));
    }

    fn is_pending(&self, key: &InFlightKey) -> bool {
        self.pending.borrow().contains(key)
    }

    fn publish(&self, status: Result<ChaosStatusDto, GatewayError>) {
        let mut state = self.state.borrow_mut();
        state.absorb(status);
        self.published.borrow_mut().push(state.clone());
    }
}

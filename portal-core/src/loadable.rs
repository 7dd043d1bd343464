use crate::error::GatewayError;
use std::cell::Cell;

/// View state of a panel that shows one fetched resource.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Loadable<T> {
    #[default]
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn from_result(result: Result<T, GatewayError>) -> Self {
        match result {
            Ok(value) => Loadable::Loaded(value),
            Err(e) => Loadable::Failed(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Identifies one request issued through a [`Latest`] counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Generation counter that lets only the most recently issued request write
/// its result. Responses for an earlier customer id are dropped on arrival.
#[derive(Debug, Default)]
pub struct Latest {
    issued: Cell<u64>,
}

impl Latest {
    pub fn begin(&self) -> Ticket {
        let next = self.issued.get().wrapping_add(1);
        self.issued.set(next);
        Ticket(next)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.get() == ticket.0
    }
}

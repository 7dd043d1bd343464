//! In-memory gateway used by the unit tests.

use crate::dto::{ChaosStatusDto, ServiceHealthDto, ToggleRequest};
use crate::error::GatewayError;
use crate::gateway::{CHAOS_STATUS_PATH, CHAOS_TOGGLE_PATH};
use crate::transport::{ApiReply, ApiRequest, Transport};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireEvent {
    Dispatch(usize),
    Settle(usize),
}

#[derive(Default)]
pub struct MockTransport {
    requests: RefCell<Vec<ApiRequest>>,
    events: RefCell<Vec<WireEvent>>,
    in_flight: Cell<usize>,
    max_in_flight: Cell<usize>,
    fixed: RefCell<HashMap<String, (u16, String)>>,
    scripted: RefCell<HashMap<String, VecDeque<Result<ApiReply, GatewayError>>>>,
    reject_toggle_at: Cell<Option<usize>>,
    toggles_seen: Cell<usize>,
    chaos: RefCell<BTreeMap<String, ServiceHealthDto>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(services: &[&str]) -> Self {
        let mock = Self::new();
        for name in services {
            mock.chaos.borrow_mut().insert(
                name.to_string(),
                ServiceHealthDto {
                    healthy: Some(true),
                    chaos: BTreeMap::new(),
                },
            );
        }
        mock
    }

    /// Every request to `path` gets this reply unless a scripted one is queued.
    pub fn reply_to(&self, path: &str, status: u16, body: &str) {
        self.fixed
            .borrow_mut()
            .insert(path.to_string(), (status, body.to_string()));
    }

    /// Queues one-shot outcomes for `path`, consumed in order.
    pub fn script(&self, path: &str, outcomes: Vec<Result<ApiReply, GatewayError>>) {
        self.scripted
            .borrow_mut()
            .entry(path.to_string())
            .or_default()
            .extend(outcomes);
    }

    /// The `position`-th toggle (1-indexed) never completes.
    pub fn reject_toggle_at(&self, position: usize) {
        self.reject_toggle_at.set(Some(position));
    }

    pub fn set_fault(&self, service: &str, fault: &str, enabled: bool) {
        self.chaos
            .borrow_mut()
            .entry(service.to_string())
            .or_default()
            .chaos
            .insert(fault.to_string(), enabled);
    }

    pub fn chaos(&self) -> BTreeMap<String, ServiceHealthDto> {
        self.chaos.borrow().clone()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn toggles(&self) -> Vec<ToggleRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.path == CHAOS_TOGGLE_PATH)
            .filter_map(|r| r.body.clone())
            .filter_map(|b| serde_json::from_value(b).ok())
            .collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests.borrow().iter().filter(|r| r.path == path).count()
    }

    pub fn events(&self) -> Vec<WireEvent> {
        self.events.borrow().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.get()
    }

    fn respond(&self, request: &ApiRequest) -> Result<ApiReply, GatewayError> {
        if let Some(next) = self
            .scripted
            .borrow_mut()
            .get_mut(&request.path)
            .and_then(VecDeque::pop_front)
        {
            return next;
        }

        if request.path == CHAOS_TOGGLE_PATH {
            let seen = self.toggles_seen.get() + 1;
            self.toggles_seen.set(seen);
            if self.reject_toggle_at.get() == Some(seen) {
                return Err(GatewayError::Transport("connection reset".into()));
            }
        }

        if let Some((status, body)) = self.fixed.borrow().get(&request.path).cloned() {
            return Ok(ApiReply { status, body });
        }

        match request.path.as_str() {
            CHAOS_TOGGLE_PATH => {
                let toggle: ToggleRequest = request
                    .body
                    .clone()
                    .and_then(|b| serde_json::from_value(b).ok())
                    .ok_or_else(|| GatewayError::Decode("bad toggle body".into()))?;
                self.set_fault(&toggle.service, &toggle.fault, toggle.enabled);
                Ok(ApiReply {
                    status: 200,
                    body: "{}".into(),
                })
            }
            CHAOS_STATUS_PATH => {
                let status = ChaosStatusDto {
                    services: self.chaos(),
                };
                Ok(ApiReply {
                    status: 200,
                    body: serde_json::to_string(&status).unwrap_or_default(),
                })
            }
            _ => Ok(ApiReply {
                status: 404,
                body: "{}".into(),
            }),
        }
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply, GatewayError> {
        let index = {
            let mut requests = self.requests.borrow_mut();
            requests.push(request.clone());
            requests.len() - 1
        };
        self.events.borrow_mut().push(WireEvent::Dispatch(index));
        self.in_flight.set(self.in_flight.get() + 1);
        self.max_in_flight
            .set(self.max_in_flight.get().max(self.in_flight.get()));

        tokio::task::yield_now().await;

        let reply = self.respond(&request);
        self.in_flight.set(self.in_flight.get() - 1);
        self.events.borrow_mut().push(WireEvent::Settle(index));
        reply
    }
}

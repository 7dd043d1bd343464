//! Typed client for the portal's HTTP gateway.

use crate::dto::{
    ChaosStatusDto, ClaimDto, HealthDto, NewClaim, PolicyDto, PortfolioDto, ToggleRequest,
};
use crate::error::GatewayError;
use crate::transport::{ApiReply, ApiRequest, Transport};
use serde::de::DeserializeOwned;

pub const HEALTH_PATH: &str = "/health";
pub const CLAIMS_PATH: &str = "/api/claims";
pub const CHAOS_STATUS_PATH: &str = "/api/chaos/status";
pub const CHAOS_TOGGLE_PATH: &str = "/api/chaos/toggle";

pub fn policy_path(customer: &str) -> String {
    format!("/api/policy/{customer}")
}

pub fn investments_path(customer: &str) -> String {
    format!("/api/investments/{customer}")
}

/// Whether a non-2xx reply fails the call. The panels check, the overview
/// fan-out and the health probe read whatever body comes back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCheck {
    Enforce,
    Ignore,
}

/// What the gateway said to a fault toggle. The status is never turned into
/// an error; it is only reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleAck {
    pub status: u16,
}

impl ToggleAck {
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatewayStatus {
    Connecting,
    Online,
    Degraded,
    Offline,
}

impl GatewayStatus {
    pub fn from_health(result: &Result<HealthDto, GatewayError>) -> Self {
        match result {
            Ok(h) if h.status == "ok" => GatewayStatus::Online,
            Ok(_) => GatewayStatus::Degraded,
            Err(_) => GatewayStatus::Offline,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GatewayStatus::Connecting => "Connecting…",
            GatewayStatus::Online => "Gateway Online",
            GatewayStatus::Degraded => "Gateway Degraded",
            GatewayStatus::Offline => "Gateway Offline",
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            GatewayStatus::Connecting => "gw-connecting",
            GatewayStatus::Online => "gw-online",
            GatewayStatus::Degraded => "gw-degraded",
            GatewayStatus::Offline => "gw-offline",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Gateway<T> {
    transport: T,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<ApiReply, GatewayError> {
        let method = request.method;
        let path = request.path.clone();
        tracing::debug!(method = method.as_str(), %path, "gateway request");
        let reply = self.transport.send(request).await;
        match &reply {
            Ok(r) => tracing::debug!(method = method.as_str(), %path, status = r.status, "gateway reply"),
            Err(e) => tracing::debug!(method = method.as_str(), %path, error = %e, "gateway request failed"),
        }
        reply
    }

    async fn read<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
        check: StatusCheck,
    ) -> Result<R, GatewayError> {
        checked(self.dispatch(request).await?, check)?.json()
    }

    pub async fn health(&self) -> Result<HealthDto, GatewayError> {
        self.read(ApiRequest::get(HEALTH_PATH), StatusCheck::Ignore)
            .await
    }

    pub async fn policies(
        &self,
        customer: &str,
        check: StatusCheck,
    ) -> Result<Vec<PolicyDto>, GatewayError> {
        let value: serde_json::Value = self
            .read(ApiRequest::get(policy_path(customer)), check)
            .await?;
        Ok(lenient_list(value))
    }

    pub async fn portfolio(
        &self,
        customer: &str,
        check: StatusCheck,
    ) -> Result<PortfolioDto, GatewayError> {
        self.read(ApiRequest::get(investments_path(customer)), check)
            .await
    }

    /// Every claim the gateway holds; filtering by customer happens locally.
    /// A body that is not an array reads as no claims.
    pub async fn claims(&self, check: StatusCheck) -> Result<Vec<ClaimDto>, GatewayError> {
        let value: serde_json::Value = self.read(ApiRequest::get(CLAIMS_PATH), check).await?;
        Ok(lenient_list(value))
    }

    pub async fn file_claim(&self, claim: &NewClaim) -> Result<serde_json::Value, GatewayError> {
        let body = serde_json::to_value(claim).map_err(|e| GatewayError::Decode(e.to_string()))?;
        let reply = self
            .dispatch(ApiRequest::post(CLAIMS_PATH, body))
            .await?
            .ensure_success()?;
        // The created record is informational; an empty body is still a success.
        Ok(reply.json().unwrap_or(serde_json::Value::Null))
    }

    pub async fn chaos_status(&self, check: StatusCheck) -> Result<ChaosStatusDto, GatewayError> {
        self.read(ApiRequest::get(CHAOS_STATUS_PATH), check).await
    }

    /// Sets one fault flag. Only a request that never completes is an error.
    pub async fn toggle_fault(&self, toggle: &ToggleRequest) -> Result<ToggleAck, GatewayError> {
        let body = serde_json::to_value(toggle).map_err(|e| GatewayError::Decode(e.to_string()))?;
        let reply = self
            .dispatch(ApiRequest::post(CHAOS_TOGGLE_PATH, body))
            .await?;
        Ok(ToggleAck {
            status: reply.status,
        })
    }
}

fn checked(reply: ApiReply, check: StatusCheck) -> Result<ApiReply, GatewayError> {
    match check {
        StatusCheck::Enforce => reply.ensure_success(),
        StatusCheck::Ignore => Ok(reply),
    }
}

fn lenient_list<T: DeserializeOwned>(value: serde_json::Value) -> Vec<T> {
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use crate::transport::Method;

    #[tokio::test]
    async fn enforced_reads_fail_on_error_status() {
        let transport = MockTransport::new();
        transport.reply_to(&policy_path("CUST001"), 503, "{}");
        let gateway = Gateway::new(transport);

        let err = gateway
            .policies("CUST001", StatusCheck::Enforce)
            .await
            .expect_err("503 must fail");
        assert_eq!(err, GatewayError::Status { status: 503 });
        assert_eq!(err.to_string(), "503");
    }

    #[tokio::test]
    async fn ignored_reads_decode_error_bodies() {
        let transport = MockTransport::new();
        transport.reply_to(&investments_path("CUST009"), 404, r#"{"error":"not found"}"#);
        transport.reply_to(CLAIMS_PATH, 500, r#"{"error":"boom"}"#);
        let gateway = Gateway::new(transport);

        let portfolio = gateway
            .portfolio("CUST009", StatusCheck::Ignore)
            .await
            .expect("decoded");
        assert_eq!(portfolio.total_value, None);
        assert!(portfolio.holdings.is_empty());

        let claims = gateway.claims(StatusCheck::Ignore).await.expect("decoded");
        assert!(claims.is_empty());
    }

    #[tokio::test]
    async fn toggle_reports_status_without_failing() {
        let transport = MockTransport::new();
        transport.reply_to(CHAOS_TOGGLE_PATH, 500, "");
        let gateway = Gateway::new(transport);

        let ack = gateway
            .toggle_fault(&ToggleRequest {
                service: "claims".into(),
                fault: "cpu_spike".into(),
                enabled: true,
            })
            .await
            .expect("non-2xx is not an error");
        assert!(!ack.is_success());

        let sent = gateway.transport().requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(
            sent[0].body,
            Some(serde_json::json!({"service": "claims", "fault": "cpu_spike", "enabled": true}))
        );
    }

    #[tokio::test]
    async fn file_claim_requires_success_status() {
        let transport = MockTransport::new();
        transport.reply_to(CLAIMS_PATH, 422, "{}");
        let gateway = Gateway::new(transport);
        let claim = NewClaim {
            customer_id_camel: "CUST001".into(),
            customer_id: "CUST001".into(),
            kind: "Medical".into(),
            amount: 10.0,
            description: "x".into(),
            incident_date: "2024-01-01".into(),
            status: "pending".into(),
        };

        let err = gateway.file_claim(&claim).await.expect_err("422");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn health_maps_to_badge() {
        let ok = Ok(HealthDto { status: "ok".into() });
        let degraded = Ok(HealthDto {
            status: "starting".into(),
        });
        let offline = Err(GatewayError::Transport("refused".into()));

        assert_eq!(GatewayStatus::from_health(&ok), GatewayStatus::Online);
        assert_eq!(GatewayStatus::from_health(&degraded), GatewayStatus::Degraded);
        assert_eq!(GatewayStatus::from_health(&offline), GatewayStatus::Offline);
    }
}

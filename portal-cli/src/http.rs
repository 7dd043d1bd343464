//! reqwest transport for the gateway client.

use async_trait::async_trait;
use portal_core::error::GatewayError;
use portal_core::transport::{ApiReply, ApiRequest, Method, Transport};
use portal_core::Gateway;

pub type CliGateway = Gateway<ReqwestTransport>;

#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    origin: String,
}

impl ReqwestTransport {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            origin: origin.into(),
        }
    }
}

pub fn gateway(origin: &str) -> CliGateway {
    Gateway::new(ReqwestTransport::new(origin))
}

fn net_err(e: reqwest::Error) -> GatewayError {
    GatewayError::Transport(e.to_string())
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply, GatewayError> {
        let url = format!("{}{}", self.origin, request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(net_err)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(net_err)?;
        Ok(ApiReply { status, body })
    }
}

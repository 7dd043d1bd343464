//! `window.fetch` transport for the gateway client.

use async_trait::async_trait;
use js_sys::Promise;
use portal_core::error::GatewayError;
use portal_core::transport::{ApiReply, ApiRequest, Transport};
use portal_core::Gateway;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

pub type PortalGateway = Gateway<FetchTransport>;

#[derive(Clone, Debug)]
pub struct FetchTransport {
    origin: String,
}

impl FetchTransport {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }
}

pub fn gateway(origin: &str) -> PortalGateway {
    Gateway::new(FetchTransport::new(origin))
}

fn rejected(context: &str, err: JsValue) -> GatewayError {
    GatewayError::Transport(format!("{context}: {err:?}"))
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply, GatewayError> {
        let window =
            web_sys::window().ok_or_else(|| GatewayError::Transport("window not available".into()))?;

        let init = RequestInit::new();
        init.set_method(request.method.as_str());
        if let Some(body) = &request.body {
            let text = serde_json::to_string(body).map_err(|e| GatewayError::Decode(e.to_string()))?;
            init.set_body(&JsValue::from_str(&text));
        }

        let url = format!("{}{}", self.origin, request.path);
        let js_request = Request::new_with_str_and_init(&url, &init)
            .map_err(|e| rejected("invalid request", e))?;
        if request.body.is_some() {
            js_request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(|e| rejected("failed to set headers", e))?;
        }

        let promise: Promise = window.fetch_with_request(&js_request);
        let response: Response = JsFuture::from(promise)
            .await
            .map_err(|e| rejected("fetch rejected", e))?
            .dyn_into()
            .map_err(|_| GatewayError::Transport("fetch did not return a Response".into()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| rejected("body unavailable", e))?;
        let body = JsFuture::from(text)
            .await
            .map_err(|e| rejected("body read failed", e))?
            .as_string()
            .unwrap_or_default();

        Ok(ApiReply { status, body })
    }
}

// Upstream client: forwards proxied calls to the backend and captures the reply

use axum::{
    body::Bytes,
    response::{IntoResponse, Json, Response},
};
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    multipart::Form,
    Client, Method, StatusCode,
};
use serde_json::Value;
use std::collections::HashMap;

use crate::proxy::common::utils::should_relay_response_header;
use crate::proxy::common::ProxyError;
use crate::proxy::config::UpstreamProxyConfig;
use crate::utils::http::create_client_with_proxy;

/// Backend reply as relayed to the caller
#[derive(Debug, Clone)]
pub struct RelayedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl IntoResponse for RelayedResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        let headers = response.headers_mut();
        for (name, value) in self.headers.iter() {
            if should_relay_response_header(name.as_str()) {
                headers.append(name.clone(), value.clone());
            }
        }
        response
    }
}

pub struct UpstreamClient {
    http_client: Client,
}

impl UpstreamClient {
    pub fn new(timeout_secs: u64, proxy_config: Option<&UpstreamProxyConfig>) -> Self {
        Self {
            http_client: create_client_with_proxy(timeout_secs, proxy_config),
        }
    }

    /// Structured call: JSON content type, caller headers on top, optional JSON body
    pub async fn send_json(
        &self,
        method: Method,
        url: &str,
        extra_headers: &HashMap<String, String>,
        data: Option<&Value>,
    ) -> Result<RelayedResponse, ProxyError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        for (name, value) in extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ProxyError::InvalidRequest(format!("Invalid header name: {}", name)))?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                ProxyError::InvalidRequest(format!("Invalid header value for {}", name))
            })?;
            headers.insert(name, value);
        }

        let mut request = self.http_client.request(method, url).headers(headers);
        if let Some(data) = data {
            let body = serde_json::to_vec(data).map_err(|e| ProxyError::Internal(e.to_string()))?;
            request = request.body(body);
        }

        let response = request.send().await?;
        Self::relay(response).await
    }

    /// Multipart call; only the caller's Authorization header travels along
    pub async fn send_multipart(
        &self,
        url: &str,
        authorization: Option<HeaderValue>,
        form: Form,
    ) -> Result<RelayedResponse, ProxyError> {
        let mut request = self.http_client.post(url).multipart(form);
        if let Some(auth) = authorization {
            request = request.header(header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::relay(response).await
    }

    /// Passthrough call with pre-filtered headers and an optional raw body
    pub async fn send_raw(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<RelayedResponse, ProxyError> {
        let mut request = self.http_client.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        Self::relay(response).await
    }

    async fn relay(response: reqwest::Response) -> Result<RelayedResponse, ProxyError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body: Value = response
            .json()
            .await
            .map_err(|e| ProxyError::Upstream(format!("Failed to parse upstream response: {}", e)))?;

        Ok(RelayedResponse {
            status,
            headers,
            body,
        })
    }
}

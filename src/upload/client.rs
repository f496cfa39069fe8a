// Upload helper: compress, package as multipart, deliver directly or via the proxy route

use reqwest::{
    header,
    multipart::{Form, Part},
    Client, StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::models::{AppConfig, Environment, StoredObject, UploadConfig, UploadFile, UploadResult};
use crate::modules::token::TokenProvider;
use crate::upload::compress::{compress_in_background, CompressOptions};
use crate::utils::http::create_client_with_proxy;

/// Only envelope code treated as success
pub const ENVELOPE_SUCCESS_CODE: i64 = 200;

#[derive(Debug, Error)]
pub enum UploadError {
    /// Non-2xx HTTP response
    #[error("Upload failed: {status} {status_text}")]
    Transport { status: u16, status_text: String },

    /// HTTP succeeded but the backend rejected the upload
    #[error("Upload failed with code: {code}")]
    Envelope { code: i64 },

    #[error("Upload request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid upload response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid upload request: {0}")]
    InvalidRequest(String),
}

/// Transport layer: HTTP status must be 2xx
pub fn check_transport(status: StatusCode) -> Result<(), UploadError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(UploadError::Transport {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        })
    }
}

/// Failure envelopes carry arbitrary `data` (or none), so only `code` is typed up front
#[derive(Debug, Deserialize)]
struct EnvelopeHead {
    code: i64,
    #[serde(default)]
    data: Value,
}

/// Envelope layer: `code` must be 200 before `data` is read
pub fn unwrap_envelope(body: &[u8]) -> Result<UploadResult, UploadError> {
    let head: EnvelopeHead = serde_json::from_slice(body)?;
    if head.code != ENVELOPE_SUCCESS_CODE {
        return Err(UploadError::Envelope { code: head.code });
    }
    let stored: StoredObject = serde_json::from_value(head.data)?;
    Ok(stored.into())
}

pub struct UploadClient {
    http_client: Client,
    config: UploadConfig,
    proxy_endpoint: String,
    api_url: String,
    environment: Environment,
    tokens: Arc<dyn TokenProvider>,
}

impl UploadClient {
    pub fn new(config: &AppConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http_client: create_client_with_proxy(
                config.proxy.request_timeout,
                Some(&config.proxy.upstream_proxy),
            ),
            config: config.upload.clone(),
            proxy_endpoint: config.upload_proxy_endpoint(),
            api_url: config.proxy.base_url().unwrap_or("").to_string(),
            environment: config.environment,
            tokens,
        }
    }

    /// Storage endpoint on the backend
    pub fn upload_target(&self) -> String {
        format!("{}{}", self.api_url, self.config.upload_path)
    }

    pub async fn upload_file(&self, file: UploadFile) -> Result<UploadResult, UploadError> {
        let file = compress_in_background(file, CompressOptions::from(&self.config)).await;

        let mut part = Part::bytes(file.bytes).file_name(file.name.clone());
        if !file.content_type.is_empty() {
            part = part
                .mime_str(&file.content_type)
                .map_err(|e| UploadError::InvalidRequest(e.to_string()))?;
        }
        let mut form = Form::new().part("file", part);

        let target_url = self.upload_target();
        let endpoint = if self.environment.is_production() {
            form = form.text("url", target_url.clone());
            self.proxy_endpoint.clone()
        } else {
            target_url
        };

        info!(
            "Uploading {} to {} ({})",
            file.name,
            endpoint,
            if self.environment.is_production() { "via proxy" } else { "direct" }
        );

        let mut request = self.http_client.post(&endpoint).multipart(form);
        if let Some(token) = self.tokens.access_token() {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await?;
        check_transport(response.status())?;

        let body = response.bytes().await?;
        let result = unwrap_envelope(&body)?;
        info!("Upload stored as {}", result.s3_key);
        Ok(result)
    }
}

// 错误处理
use axum::{
    extract::rejection::{BytesRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// POST body (JSON or multipart) without a `url`
    #[error("URL is required")]
    MissingUrl,

    /// Query-addressed verbs without `?url=`
    #[error("URL parameter is required")]
    MissingUrlParameter,

    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Extractor rejection; keeps axum's status (400, 413, ...)
    #[error("Invalid request: {1}")]
    Rejected(StatusCode, String),

    #[error("API base URL is not configured")]
    MissingBaseUrl,

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingUrl
            | ProxyError::MissingUrlParameter
            | ProxyError::InvalidMethod(_)
            | ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Rejected(status, _) => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        ProxyError::Upstream(e.to_string())
    }
}

impl From<QueryRejection> for ProxyError {
    fn from(rejection: QueryRejection) -> Self {
        ProxyError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<BytesRejection> for ProxyError {
    fn from(rejection: BytesRejection) -> Self {
        ProxyError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("[API Proxy Error] {}", self);
        }

        let body = serde_json::json!({
            "error": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

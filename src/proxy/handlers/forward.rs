// Generic forwarding handler for /api/proxy
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        FromRequest, Multipart, Query, Request, State,
    },
    http::{header, HeaderMap, Method},
    response::IntoResponse,
};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::proxy::common::utils::{has_payload, resolve_target_url, should_forward_request_header};
use crate::proxy::common::ProxyError;
use crate::proxy::server::AppState;

/// JSON body accepted by POST /api/proxy
#[derive(Debug, Deserialize)]
pub struct ProxyRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// POST: JSON description of the call, or a multipart form carrying `url`
pub async fn handle_post(
    State(state): State<AppState>,
    request: Request,
) -> Result<impl IntoResponse, ProxyError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        forward_multipart(state, request).await
    } else {
        forward_json(state, request).await
    }
}

async fn forward_json(
    state: AppState,
    request: Request,
) -> Result<axum::response::Response, ProxyError> {
    let bytes = axum::body::to_bytes(request.into_body(), state.config.body_limit)
        .await
        .map_err(|e| ProxyError::Internal(e.to_string()))?;
    let body: ProxyRequest =
        serde_json::from_slice(&bytes).map_err(|e| ProxyError::Internal(e.to_string()))?;

    let url = body
        .url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or(ProxyError::MissingUrl)?;
    let method_name = body.method.as_deref().unwrap_or("POST").to_ascii_uppercase();
    let method = Method::from_bytes(method_name.as_bytes())
        .map_err(|_| ProxyError::InvalidMethod(method_name.clone()))?;

    let api_url = resolve_target_url(url, state.config.base_url())?;
    info!("[API Proxy] {} {}", method, api_url);

    let data = body.data.as_ref().filter(|_| has_payload(body.data.as_ref()));
    let relayed = state
        .upstream
        .send_json(method, &api_url, &body.headers, data)
        .await?;

    debug!("[API Proxy] {} <- {}", relayed.status, api_url);
    Ok(relayed.into_response())
}

async fn forward_multipart(
    state: AppState,
    request: Request,
) -> Result<axum::response::Response, ProxyError> {
    let authorization = request.headers().get(header::AUTHORIZATION).cloned();

    let mut multipart = Multipart::from_request(request, &state)
        .await
        .map_err(|e| ProxyError::InvalidRequest(e.body_text()))?;

    let mut target: Option<String> = None;
    let mut form = Form::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ProxyError::InvalidRequest(format!("Failed to read form: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "url" {
            let value = field
                .text()
                .await
                .map_err(|e| ProxyError::InvalidRequest(format!("Failed to read form: {}", e)))?;
            target = Some(value);
            continue;
        }

        let file_name = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| ProxyError::InvalidRequest(format!("Failed to read form: {}", e)))?;

        let mut part = Part::bytes(data.to_vec());
        if let Some(file_name) = file_name {
            part = part.file_name(file_name);
        }
        if let Some(content_type) = content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|e| ProxyError::InvalidRequest(e.to_string()))?;
        }
        form = form.part(name, part);
    }

    let url = target.filter(|u| !u.is_empty()).ok_or(ProxyError::MissingUrl)?;
    let api_url = resolve_target_url(&url, state.config.base_url())?;
    info!("[API Proxy] POST {} (multipart)", api_url);

    let relayed = state
        .upstream
        .send_multipart(&api_url, authorization, form)
        .await?;

    debug!("[API Proxy] {} <- {}", relayed.status, api_url);
    Ok(relayed.into_response())
}

/// GET/PUT/PATCH/DELETE: target in `?url=`, headers and raw body passed through
pub async fn handle_query(
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    inbound_headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ProxyError> {
    let Query(params) = query?;
    let body = body?;
    let target = params
        .get("url")
        .filter(|u| !u.is_empty())
        .ok_or(ProxyError::MissingUrlParameter)?;
    let api_url = resolve_target_url(target, state.config.base_url())?;
    info!("[API Proxy] {} {}", method, api_url);

    let mut headers = HeaderMap::new();
    for (name, value) in inbound_headers.iter() {
        if should_forward_request_header(name.as_str()) {
            headers.append(name.clone(), value.clone());
        }
    }

    let body = if method == Method::GET { None } else { Some(body) };
    let relayed = state
        .upstream
        .send_raw(method, &api_url, headers, body)
        .await?;

    debug!("[API Proxy] {} <- {}", relayed.status, api_url);
    Ok(relayed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::config::ProxyConfig;
    use crate::proxy::server::build_router;
    use crate::test_support::spawn_router;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        response::Json,
        routing::{any, get, post},
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt;

    fn header_str(headers: &HeaderMap, name: &str) -> Value {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| Value::String(s.to_string()))
            .unwrap_or(Value::Null)
    }

    async fn echo(method: Method, headers: HeaderMap, body: String) -> impl IntoResponse {
        (
            [("x-backend", "echo")],
            Json(json!({
                "method": method.as_str(),
                "contentType": header_str(&headers, "content-type"),
                "authorization": header_str(&headers, "authorization"),
                "custom": header_str(&headers, "x-custom"),
                "body": body,
            })),
        )
    }

    async fn upload(headers: HeaderMap, mut multipart: Multipart) -> Json<Value> {
        let mut fields = Vec::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or("").to_string();
            let file_name = field.file_name().map(|s| s.to_string());
            let content_type = field.content_type().map(|s| s.to_string());
            let data = field.bytes().await.unwrap();
            fields.push(json!({
                "name": name,
                "fileName": file_name,
                "contentType": content_type,
                "size": data.len(),
            }));
        }
        Json(json!({
            "authorization": header_str(&headers, "authorization"),
            "custom": header_str(&headers, "x-custom"),
            "fields": fields,
        }))
    }

    fn backend() -> Router {
        Router::new()
            .route("/echo", any(echo))
            .route(
                "/items",
                get(|| async { ([("x-total", "2")], Json(json!({ "items": [1, 2] }))) }),
            )
            .route(
                "/missing",
                get(|| async { (StatusCode::NOT_FOUND, Json(json!({ "msg": "not found" }))) }),
            )
            .route("/text", get(|| async { "plain text" }))
            .route("/upload", post(upload))
            .route(
                "/blob",
                any(|body: Bytes| async move {
                    Json(json!({ "size": body.len(), "bytes": body.to_vec() }))
                }),
            )
    }

    async fn proxy_for(backend_base: Option<String>) -> Router {
        let mut config = ProxyConfig::default();
        config.api_url = backend_base;
        build_router(AppState::new(config))
    }

    async fn call(app: Router, request: HttpRequest<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_post(body: Value) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri("/api/proxy")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_post_without_url_is_rejected() {
        let app = proxy_for(Some("http://127.0.0.1:9".to_string())).await;
        let (status, _, body) = call(app, json_post(json!({ "method": "GET" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "URL is required" }));
    }

    #[tokio::test]
    async fn test_query_without_url_is_rejected() {
        let app = proxy_for(Some("http://127.0.0.1:9".to_string())).await;
        for method in ["GET", "PUT", "PATCH", "DELETE"] {
            let request = HttpRequest::builder()
                .method(method)
                .uri("/api/proxy?other=1")
                .body(Body::empty())
                .unwrap();
            let (status, _, body) = call(app.clone(), request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "URL parameter is required" }));
        }
    }

    #[tokio::test]
    async fn test_json_mode_forwards_method_headers_and_data() {
        let base = spawn_router(backend()).await;
        let app = proxy_for(Some(base)).await;

        let (status, headers, body) = call(
            app,
            json_post(json!({
                "url": "/echo",
                "method": "put",
                "data": { "name": "Bori" },
                "headers": { "Authorization": "Bearer t0k", "X-Custom": "1" }
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["method"], "PUT");
        assert_eq!(body["contentType"], "application/json");
        assert_eq!(body["authorization"], "Bearer t0k");
        assert_eq!(body["custom"], "1");
        assert_eq!(body["body"], r#"{"name":"Bori"}"#);
        assert_eq!(headers["x-backend"], "echo");
    }

    #[tokio::test]
    async fn test_json_mode_defaults_to_post_without_body() {
        let base = spawn_router(backend()).await;
        let app = proxy_for(Some(base.clone())).await;

        let (_, _, body) = call(
            app,
            json_post(json!({ "url": format!("{}/echo", base), "data": null })),
        )
        .await;
        assert_eq!(body["method"], "POST");
        assert_eq!(body["body"], "");
    }

    #[tokio::test]
    async fn test_backend_error_status_relayed_unchanged() {
        let base = spawn_router(backend()).await;
        let app = proxy_for(Some(base)).await;

        let (status, _, body) =
            call(app.clone(), json_post(json!({ "url": "/missing", "method": "GET" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "msg": "not found" }));

        let request = HttpRequest::builder()
            .uri("/api/proxy?url=/missing")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = call(app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "msg": "not found" }));
    }

    #[tokio::test]
    async fn test_non_json_backend_body_is_server_error() {
        let base = spawn_router(backend()).await;
        let app = proxy_for(Some(base)).await;

        let (status, _, body) =
            call(app, json_post(json!({ "url": "/text", "method": "GET" }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("parse"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_server_error() {
        let app = proxy_for(None).await;
        let (status, _, body) = call(
            app,
            json_post(json!({ "url": "http://127.0.0.1:9/nothing", "method": "GET" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_relative_url_without_base_is_server_error() {
        let app = proxy_for(None).await;
        let (status, _, body) = call(app, json_post(json!({ "url": "/items" }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "API base URL is not configured" }));
    }

    #[tokio::test]
    async fn test_invalid_method_rejected() {
        let app = proxy_for(Some("http://127.0.0.1:9".to_string())).await;
        let (status, _, body) =
            call(app, json_post(json!({ "url": "/items", "method": "GE T" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid method: GE T" }));
    }

    #[tokio::test]
    async fn test_query_mode_passthrough() {
        let base = spawn_router(backend()).await;
        let app = proxy_for(Some(base)).await;

        let request = HttpRequest::builder()
            .method("PATCH")
            .uri("/api/proxy?url=/echo")
            .header("authorization", "Bearer abc")
            .header("x-custom", "kept")
            .header("content-type", "text/plain")
            .body(Body::from("raw body"))
            .unwrap();
        let (status, headers, body) = call(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["method"], "PATCH");
        assert_eq!(body["authorization"], "Bearer abc");
        assert_eq!(body["custom"], "kept");
        assert_eq!(body["contentType"], "text/plain");
        assert_eq!(body["body"], "raw body");
        assert_eq!(headers["x-backend"], "echo");
    }

    #[tokio::test]
    async fn test_query_mode_forwards_binary_body() {
        let base = spawn_router(backend()).await;
        let app = proxy_for(Some(base)).await;

        let payload = vec![0xff, 0xfe, 0x00, 0x80];
        let request = HttpRequest::builder()
            .method("PUT")
            .uri("/api/proxy?url=/blob")
            .header("content-type", "application/octet-stream")
            .body(Body::from(payload.clone()))
            .unwrap();
        let (status, _, body) = call(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["size"], 4);
        assert_eq!(body["bytes"], json!(payload));
    }

    #[tokio::test]
    async fn test_query_mode_oversized_body_is_json_error() {
        let mut config = ProxyConfig::default();
        config.api_url = Some("http://127.0.0.1:9".to_string());
        config.body_limit = 16;
        let app = build_router(AppState::new(config));

        let request = HttpRequest::builder()
            .method("PUT")
            .uri("/api/proxy?url=/blob")
            .body(Body::from(vec![b'x'; 64]))
            .unwrap();
        let (status, _, body) = call(app, request).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request:"));
    }

    #[tokio::test]
    async fn test_query_get_sends_no_body() {
        let base = spawn_router(backend()).await;
        let app = proxy_for(Some(base)).await;

        let request = HttpRequest::builder()
            .method("GET")
            .uri("/api/proxy?url=/echo")
            .body(Body::from("ignored"))
            .unwrap();
        let (_, _, body) = call(app, request).await;
        assert_eq!(body["method"], "GET");
        assert_eq!(body["body"], "");
    }

    #[tokio::test]
    async fn test_repeated_get_is_idempotent() {
        let base = spawn_router(backend()).await;
        let app = proxy_for(Some(base)).await;

        let first = call(app.clone(), json_post(json!({ "url": "/items", "method": "GET" }))).await;
        let second = call(app, json_post(json!({ "url": "/items", "method": "GET" }))).await;

        assert_eq!(first.0, second.0);
        assert_eq!(first.2, second.2);
        assert_eq!(first.1["x-total"], second.1["x-total"]);
        assert_eq!(first.2, json!({ "items": [1, 2] }));
    }

    #[tokio::test]
    async fn test_multipart_mode_strips_url_and_keeps_only_authorization() {
        let base = spawn_router(backend()).await;
        let app = proxy_for(Some(base)).await;

        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"dog.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             PNGDATA\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"note\"\r\n\r\n\
             hello\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"url\"\r\n\r\n\
             /upload\r\n\
             --{b}--\r\n",
            b = boundary
        );
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/api/proxy")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", boundary),
            )
            .header("authorization", "Bearer up")
            .header("x-custom", "dropped")
            .body(Body::from(body))
            .unwrap();

        let (status, _, body) = call(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["authorization"], "Bearer up");
        assert_eq!(body["custom"], Value::Null);

        let fields = body["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["name"], "file");
        assert_eq!(fields[0]["fileName"], "dog.png");
        assert_eq!(fields[0]["contentType"], "image/png");
        assert_eq!(fields[0]["size"], 7);
        assert_eq!(fields[1]["name"], "note");
    }

    #[tokio::test]
    async fn test_multipart_without_url_is_rejected() {
        let app = proxy_for(Some("http://127.0.0.1:9".to_string())).await;
        let boundary = "B";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhi\r\n--{b}--\r\n",
            b = boundary
        );
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/api/proxy")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, _, body) = call(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "URL is required" }));
    }
}

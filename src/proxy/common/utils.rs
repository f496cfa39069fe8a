// Utility functions

use serde_json::Value;

use super::error::ProxyError;

/// Resolve the forwarding target.
///
/// Anything starting with `http` is used as-is; everything else is appended to
/// the base origin verbatim, without slash normalization.
pub fn resolve_target_url(url: &str, base_url: Option<&str>) -> Result<String, ProxyError> {
    if url.starts_with("http") {
        return Ok(url.to_string());
    }
    match base_url {
        Some(base) => Ok(format!("{}{}", base, url)),
        None => Err(ProxyError::MissingBaseUrl),
    }
}

/// Inbound headers that are not copied in query passthrough mode (prefix match)
const SKIPPED_REQUEST_PREFIXES: [&str; 3] = ["host", "connection", "content-length"];

pub fn should_forward_request_header(name: &str) -> bool {
    // Bodies are decoded as JSON here, so compression is not negotiated upstream
    if name.eq_ignore_ascii_case("accept-encoding") {
        return false;
    }
    let lower = name.to_ascii_lowercase();
    !SKIPPED_REQUEST_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

/// Backend response headers that no longer describe the re-serialized JSON body
const SKIPPED_RESPONSE_HEADERS: [&str; 11] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "content-length",
    "content-encoding",
    "content-type",
];

pub fn should_relay_response_header(name: &str) -> bool {
    !SKIPPED_RESPONSE_HEADERS
        .iter()
        .any(|skipped| name.eq_ignore_ascii_case(skipped))
}

/// Whether a JSON-mode `data` value produces a request body
pub fn has_payload(data: Option<&Value>) -> bool {
    match data {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

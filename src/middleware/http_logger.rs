use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;

use crate::config::APP_CONFIG;

const REDACTED: &str = "[REDACTED]";

const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "password1",
    "password2",
    "token",
    "access_token",
    "authorization",
    "secret",
];

fn should_ignore_path(path: &str) -> bool {
    matches!(path, "/health" | "/health/")
        || path.starts_with("/swagger-ui")
        || path.starts_with("/api-docs")
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

fn filter_sensitive_data(mut value: Value) -> Value {
    if let Value::Object(ref mut map) = value {
        for field in SENSITIVE_FIELDS {
            if let Some(entry) = map.get_mut(*field) {
                *entry = Value::String(REDACTED.to_string());
            }
        }
    }
    value
}

fn filter_sensitive_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered_headers = headers.clone();
    for name in [header::AUTHORIZATION, header::COOKIE, header::SET_COOKIE] {
        if filtered_headers.contains_key(&name) {
            filtered_headers.insert(name, HeaderValue::from_static(REDACTED));
        }
    }
    filtered_headers
}

fn json_body(bytes: &Bytes) -> Value {
    serde_json::from_slice::<Value>(bytes)
        .map(filter_sensitive_data)
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

pub async fn http_logger(
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if should_ignore_path(req.uri().path()) || req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let start_time = Instant::now();

    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();
    let req_headers = req.headers().clone();
    let x_request_id = req_headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // multipart uploads are passed through untouched
    let (req, req_body) = if is_json(&req_headers) {
        let (parts, body) = req.into_parts();
        let bytes = buffer_body("request", body).await?;
        let logged = json_body(&bytes);
        (Request::from_parts(parts, Body::from(bytes)), logged)
    } else {
        (req, Value::Object(serde_json::Map::new()))
    };

    let mut response = next.run(req).await;
    let latency = start_time.elapsed();

    let status = response.status();
    let res_headers = response.headers().clone();

    let res_body = if !status.is_success() && is_json(&res_headers) {
        let (parts, body) = response.into_parts();
        let bytes = buffer_body("response", body).await?;
        let logged = json_body(&bytes);
        response = Response::from_parts(parts, Body::from(bytes));
        logged
    } else {
        Value::Object(serde_json::Map::new())
    };

    tracing::info!(
        method = ?method,
        uri = ?uri,
        path = %uri.path(),
        x_request_id = %x_request_id,
        version = ?version,
        req_headers = ?filter_sensitive_headers(&req_headers),
        req_body = %req_body,
        status = ?status,
        latency_ms = latency.as_millis(),
        res_headers = ?filter_sensitive_headers(&res_headers),
        res_body = %res_body,
        app_env = %APP_CONFIG.app_env,
        "HTTP request completed"
    );

    Ok(response)
}

pub async fn buffer_body<B>(direction: &str, body: B) -> Result<Bytes, (StatusCode, String)>
where
    B: BodyExt,
    B::Error: std::fmt::Display,
{
    match body.collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) => Err((
            StatusCode::BAD_REQUEST,
            format!("failed to read {direction} body: {err}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redacts_password_fields() {
        let filtered = filter_sensitive_data(json!({
            "username": "nadia",
            "password1": "hunter2hunter2",
            "password2": "hunter2hunter2",
        }));
        assert_eq!(filtered["username"], "nadia");
        assert_eq!(filtered["password1"], REDACTED);
        assert_eq!(filtered["password2"], REDACTED);
    }

    #[test]
    fn test_redacts_auth_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let filtered = filter_sensitive_headers(&headers);
        assert_eq!(filtered[header::AUTHORIZATION], REDACTED);
        assert_eq!(filtered[header::ACCEPT], "application/json");
    }

    #[test]
    fn test_ignored_paths() {
        assert!(should_ignore_path("/health"));
        assert!(should_ignore_path("/swagger-ui/index.html"));
        assert!(!should_ignore_path("/api/v1/materials"));
    }
}

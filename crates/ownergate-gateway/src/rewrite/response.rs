//! Response builders for the rewrite layer.
//!
//! - `replace`: new body on the upstream response head, length recomputed
//! - `access_denied`: fixed 403 payload, nothing of the original survives
//! - `engine_error` / `body_too_large`: server-side failures

use axum::{
    body::Body,
    http::{header, response::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::json;

use ownergate_core::OwnerGateError;

/// Message of the fixed denial payload.
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied to resource";

/// Re-attach a rewritten body to the upstream response head.
pub fn replace(mut parts: Parts, status: u16, body: Bytes) -> Response {
    parts.status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
    parts.headers.remove(header::TRANSFER_ENCODING);
    parts.headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Response::from_parts(parts, Body::from(body))
}

pub fn access_denied() -> Response {
    (StatusCode::FORBIDDEN, Json(json!({ "message": ACCESS_DENIED_MESSAGE }))).into_response()
}

/// Engine failures are upstream contract violations, reported as 500.
pub fn engine_error(err: &OwnerGateError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": err.to_string(), "code": err.client_code().as_str() })),
    )
        .into_response()
}

pub fn body_too_large(limit: usize) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({
            "message": format!("upstream response exceeds {limit} bytes"),
            "code": "UPSTREAM_TOO_LARGE"
        })),
    )
        .into_response()
}

//! Response rewrite layer.
//!
//! Flow per request:
//! - only GET requests on a registered list/inspect route are intercepted
//! - the upstream (inner service) runs first; non-200 responses pass through
//! - the body is buffered (bounded), the caller's ownership snapshot loaded,
//!   and the engine decides: rewritten body, fixed denial, or 500 on a
//!   malformed upstream body

pub mod response;

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};

use ownergate_core::engine::{self, Rewrite};

use crate::app_state::AppState;
use crate::context::CallerIdentity;

pub async fn rewrite_layer(State(app): State<AppState>, req: Request, next: Next) -> Response {
    if req.method() != Method::GET {
        return next.run(req).await;
    }
    let Some((op, compiled)) = app.registry().classify(req.uri().path()) else {
        return next.run(req).await;
    };
    let Some(identity) = req.extensions().get::<CallerIdentity>().cloned() else {
        // No auth layer in front of us: refuse rather than leak unfiltered data.
        tracing::error!(path = %req.uri().path(), "rewrite layer reached without caller identity");
        return response::engine_error(&ownergate_core::OwnerGateError::Internal(
            "caller identity missing".into(),
        ));
    };

    let labels = [("kind", compiled.name.as_str()), ("op", op.as_str())];
    let upstream = next.run(req).await;
    // Only 200 carries item bodies; errors hold no resource data.
    if upstream.status() != StatusCode::OK {
        app.metrics().rewrites.inc(&[labels[0], labels[1], ("outcome", "passthrough")]);
        return upstream;
    }

    let started = Instant::now();
    let limit = app.cfg().gateway.max_body_bytes;
    let (parts, body) = upstream.into_parts();
    let raw = match axum::body::to_bytes(body, limit).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(kind = %compiled.name, op = op.as_str(), error = %e, "upstream body not buffered");
            app.metrics().rewrites.inc(&[labels[0], labels[1], ("outcome", "error")]);
            return response::body_too_large(limit);
        }
    };

    let snapshot = match app.ownership().snapshot(&identity).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(source = app.ownership().name(), error = %e, "ownership snapshot failed");
            app.metrics().rewrites.inc(&[labels[0], labels[1], ("outcome", "error")]);
            return response::engine_error(&e);
        }
    };
    let caller = identity.into_caller(snapshot);

    let (outcome, resp) = match engine::process(&raw, op, &compiled.kind, &caller) {
        Ok(Rewrite::Body { status, body }) => ("rewritten", response::replace(parts, status, body)),
        Ok(Rewrite::Denied) => ("denied", response::access_denied()),
        Err(e) => {
            tracing::error!(kind = %compiled.name, op = op.as_str(), error = %e, "response rewrite failed");
            ("error", response::engine_error(&e))
        }
    };

    app.metrics().rewrites.inc(&[labels[0], labels[1], ("outcome", outcome)]);
    app.metrics().rewrite_duration.observe(&labels, started.elapsed());
    resp
}

//! Axum router wiring.
//!
//! Ops endpoints are served directly; everything else goes to the upstream
//! router, wrapped by authentication then the response rewrite layer.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, context, ops, rewrite};

pub fn build_router(state: AppState, upstream: Router) -> Router {
    let proxied = upstream
        .layer(middleware::from_fn_with_state(state.clone(), rewrite::rewrite_layer))
        .layer(middleware::from_fn_with_state(state.clone(), context::authenticate));

    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
        .merge(proxied)
}

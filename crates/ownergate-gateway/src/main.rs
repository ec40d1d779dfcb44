//! ownergate gateway binary.
//!
//! - Loads `ownergate.yaml` (or `$OWNERGATE_CONFIG`)
//! - Serves `/healthz` and `/metrics`
//! - Mounts auth + rewrite layers over the upstream router; forwarding to
//!   the orchestration API is supplied by the embedding proxy, so the
//!   standalone binary answers 502 for proxied paths

use std::net::SocketAddr;

use axum::{http::StatusCode, Router};
use tracing_subscriber::{fmt, EnvFilter};

use ownergate_gateway::{app_state, config, router};

async fn upstream_unavailable() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "no upstream configured")
}

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::var("OWNERGATE_CONFIG").unwrap_or_else(|_| "ownergate.yaml".into());
    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(%path, error = %e, "config load failed");
            std::process::exit(1);
        }
    };
    let listen: SocketAddr = match cfg.gateway.listen.parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(listen = %cfg.gateway.listen, error = %e, "gateway.listen must be a valid SocketAddr");
            std::process::exit(1);
        }
    };

    let state = match app_state::AppState::new(cfg) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "gateway state init failed");
            std::process::exit(1);
        }
    };
    let app = router::build_router(state, Router::new().fallback(upstream_unavailable));

    tracing::info!(%listen, "ownergate-gateway starting");
    let listener = match tokio::net::TcpListener::bind(listen).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%listen, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
    }
}

//! Caller identity and bearer-token authentication middleware.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use ownergate_core::{CallerContext, OwnershipSnapshot};

use crate::app_state::AppState;
use crate::config::CallerConfig;

/// Authenticated caller (identity and blanket grants, no ownership data yet).
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub user_id: String,
    pub team_ids: BTreeSet<String>,
    pub is_admin: bool,
    pub has_endpoint_access: bool,
}

impl CallerIdentity {
    pub fn into_caller(self, snapshot: Arc<OwnershipSnapshot>) -> CallerContext {
        CallerContext {
            user_id: self.user_id,
            team_ids: self.team_ids,
            is_admin: self.is_admin,
            has_endpoint_access: self.has_endpoint_access,
            snapshot,
        }
    }
}

impl From<&CallerConfig> for CallerIdentity {
    fn from(c: &CallerConfig) -> Self {
        Self {
            user_id: c.user_id.clone(),
            team_ids: c.teams.iter().cloned().collect(),
            is_admin: c.admin,
            has_endpoint_access: c.endpoint_access,
        }
    }
}

/// Bearer-token authentication against the configured callers.
///
/// Requests that already carry a `CallerIdentity` (set by an outer auth
/// layer) pass through untouched.
pub async fn authenticate(State(app): State<AppState>, mut req: Request, next: Next) -> Response {
    if req.extensions().get::<CallerIdentity>().is_some() {
        return next.run(req).await;
    }

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    let Some(identity) = token.and_then(|t| app.resolve_token(t)) else {
        app.metrics().auth_rejections.inc(&[("reason", if token.is_some() { "unknown_token" } else { "missing_token" })]);
        tracing::debug!(path = %req.uri().path(), "caller authentication failed");
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" }))).into_response();
    };

    tracing::trace!(user = %identity.user_id, admin = identity.is_admin, "caller authenticated");
    req.extensions_mut().insert(identity);
    next.run(req).await
}

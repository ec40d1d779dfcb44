//! End-to-end tests of the auth + rewrite layers over a stub upstream.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::{
    body::Body,
    extract::Path,
    http::{header, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use ownergate_gateway::{app_state::AppState, config, router};

const CFG: &str = r#"
version: 1
callers:
  - { token: admin-token, user_id: "1", admin: true }
  - { token: endpoint-token, user_id: "4", endpoint_access: true }
  - { token: ops-token, user_id: "2", teams: ["ops"] }
  - { token: solo-token, user_id: "3" }
ownership:
  - { resource_id: shop, resource_type: stack, teams: ["ops"] }
  - { resource_id: v3, resource_type: volume, users: ["3"] }
"#;

fn volume_list() -> Value {
    json!({
        "Volumes": [
            { "Name": "v1", "Driver": "local" },
            { "Name": "v2", "Driver": "local", "Labels": { "com.docker.stack.namespace": "shop" } },
            { "Name": "v3", "Driver": "local", "Options": null }
        ],
        "Warnings": null
    })
}

async fn volume_inspect(Path(id): Path<String>) -> Json<Value> {
    match id.as_str() {
        "broken" => Json(json!({ "Driver": "local" })),
        "v2" => Json(json!({ "Name": "v2", "Labels": { "com.docker.stack.namespace": "shop" } })),
        _ => Json(json!({ "Name": id, "Driver": "local" })),
    }
}

fn upstream() -> Router {
    Router::new()
        .route("/volumes", get(|| async { Json(volume_list()) }))
        .route("/v1.41/volumes", get(|| async { Json(volume_list()) }))
        .route("/v1.41.0/volumes", get(|| async { Json(volume_list()) }))
        .route("/v1/volumes", get(|| async { Json(volume_list()) }))
        .route("/v1.41.0/volumes/:id", get(volume_inspect))
        .route("/volumes/:id", get(volume_inspect))
        .route("/volumes/create", post(|| async { Json(json!({ "Name": "new" })) }))
        .route(
            "/networks",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "daemon down" }))) }),
        )
        .route("/info", get(|| async { Json(json!({ "ID": "node-1" })) }))
}

fn app() -> Router {
    let cfg = config::load_from_str(CFG).unwrap();
    let state = AppState::new(cfg).unwrap();
    router::build_router(state, upstream())
}

struct Reply {
    status: StatusCode,
    content_length: Option<usize>,
    raw: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.raw).unwrap()
    }

    fn names(&self) -> Vec<String> {
        self.json()["Volumes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["Name"].as_str().unwrap().to_string())
            .collect()
    }
}

async fn send(app: &Router, method: &str, path: &str, token: Option<&str>) -> Reply {
    let mut req = Request::builder().method(method).uri(path);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let resp = app.clone().oneshot(req.body(Body::empty()).unwrap()).await.unwrap();

    let status = resp.status();
    let content_length = resp
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());
    let raw = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec();
    Reply {
        status,
        content_length,
        raw,
    }
}

async fn get_as(app: &Router, path: &str, token: &str) -> Reply {
    send(app, "GET", path, Some(token)).await
}

#[tokio::test]
async fn blanket_callers_see_everything_decorated() {
    let app = app();
    for token in ["admin-token", "endpoint-token"] {
        let r = get_as(&app, "/volumes", token).await;
        assert_eq!(r.status, StatusCode::OK);
        assert_eq!(r.names(), ["v1", "v2", "v3"]);

        let body = r.json();
        let items = body["Volumes"].as_array().unwrap();
        assert_eq!(items[0]["Ownership"], json!({ "ResourceControl": null }));
        assert_eq!(items[1]["Ownership"]["ResourceControl"]["ResourceId"], json!("shop"));
        assert_eq!(items[2]["Ownership"]["ResourceControl"]["UserAccesses"], json!(["3"]));
        assert_eq!(items[2]["Options"], Value::Null);
        assert_eq!(body["Warnings"], Value::Null);
    }
}

#[tokio::test]
async fn restricted_callers_see_only_granted_items() {
    let app = app();

    let r = get_as(&app, "/volumes", "ops-token").await;
    assert_eq!(r.names(), ["v2"]);

    let r = get_as(&app, "/volumes", "solo-token").await;
    assert_eq!(r.names(), ["v3"]);
    assert_eq!(r.content_length, Some(r.raw.len()));

    let r = get_as(&app, "/v1.41/volumes", "ops-token").await;
    assert_eq!(r.names(), ["v2"]);
}

#[tokio::test]
async fn any_version_prefix_is_filtered() {
    let app = app();
    for path in ["/v1.41.0/volumes", "/v1/volumes"] {
        let r = get_as(&app, path, "solo-token").await;
        assert_eq!(r.status, StatusCode::OK, "path={path}");
        assert_eq!(r.names(), ["v3"], "path={path}");
    }

    let r = get_as(&app, "/v1.41.0/volumes/v1", "solo-token").await;
    assert_eq!(r.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn inspect_denial_is_fixed_and_content_free() {
    let app = app();
    let r = get_as(&app, "/volumes/v1", "solo-token").await;
    assert_eq!(r.status, StatusCode::FORBIDDEN);
    assert_eq!(r.json(), json!({ "message": "Access denied to resource" }));
    let text = String::from_utf8(r.raw.clone()).unwrap();
    assert!(!text.contains("v1"));
    assert!(!text.contains("local"));
}

#[tokio::test]
async fn inspect_outcomes() {
    let app = app();

    // admin, no record: body unchanged
    let r = get_as(&app, "/volumes/v1", "admin-token").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json(), json!({ "Name": "v1", "Driver": "local" }));

    // team member, inherited stack record: decorated
    let r = get_as(&app, "/volumes/v2", "ops-token").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json()["Ownership"]["ResourceControl"]["TeamAccesses"], json!(["ops"]));

    // owner: decorated
    let r = get_as(&app, "/volumes/v3", "solo-token").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json()["Ownership"]["ResourceControl"]["ResourceId"], json!("v3"));
}

#[tokio::test]
async fn missing_identifier_is_server_error() {
    let app = app();
    let r = get_as(&app, "/volumes/broken", "admin-token").await;
    assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(r.json()["code"], json!("MISSING_IDENTIFIER"));
}

#[tokio::test]
async fn authentication_required_for_proxied_routes() {
    let app = app();
    assert_eq!(send(&app, "GET", "/volumes", None).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(get_as(&app, "/volumes", "nope").await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(send(&app, "GET", "/healthz", None).await.status, StatusCode::OK);
}

#[tokio::test]
async fn non_intercepted_responses_pass_through() {
    let app = app();

    let r = get_as(&app, "/networks", "solo-token").await;
    assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(r.json(), json!({ "message": "daemon down" }));

    let r = get_as(&app, "/info", "solo-token").await;
    assert_eq!(r.json(), json!({ "ID": "node-1" }));

    let r = send(&app, "POST", "/volumes/create", Some("solo-token")).await;
    assert_eq!(r.json(), json!({ "Name": "new" }));
}

#[tokio::test]
async fn metrics_count_outcomes() {
    let app = app();
    get_as(&app, "/volumes", "ops-token").await;
    get_as(&app, "/volumes/v1", "solo-token").await;

    let r = send(&app, "GET", "/metrics", None).await;
    let text = String::from_utf8(r.raw).unwrap();
    assert!(text.contains(r#"ownergate_rewrites_total{kind="volumes",op="list",outcome="rewritten"} 1"#));
    assert!(text.contains(r#"ownergate_rewrites_total{kind="volumes",op="inspect",outcome="denied"} 1"#));
}

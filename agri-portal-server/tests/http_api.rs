//! HTTP-level tests for the agri portal router.
//!
//! Drives the full router (middleware included) in-process with
//! `tower::ServiceExt::oneshot`; the static bundle lives in a temp dir.

use agri_portal_core::{ReplyMatcher, ServiceCatalog, ServiceDescriptor};
use agri_portal_server::{build_router, with_middleware, AppState};
use axum::body::Body;
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use hyper::{Method, Request, StatusCode};
use tempfile::TempDir;
use tower::ServiceExt;

const INDEX_HTML: &str = "<!doctype html><title>Agri Portal</title>";
const APP_JS: &str = "console.log('agri');";

// ── Test app builder ───────────────────────────────────────────

fn bundle() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::create_dir(dir.path().join("assets")).unwrap();
    std::fs::write(dir.path().join("assets/app.js"), APP_JS).unwrap();
    dir
}

fn app(bundle: &TempDir) -> Router {
    build_router(AppState::new(
        ReplyMatcher::builtin(),
        ServiceCatalog::builtin(),
        bundle.path(),
    ))
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// ── Helpers to read response bodies ────────────────────────────

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(
        |_| serde_json::json!({ "raw": String::from_utf8_lossy(&bytes).to_string() }),
    )
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

async fn chat(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
    let resp = app.oneshot(post_json("/api/chat", body)).await.unwrap();
    let status = resp.status();
    (status, body_json(resp).await)
}

// ── Health ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_ok() {
    let dir = bundle();
    let resp = app(&dir)
        .oneshot(request(Method::GET, "/api/health"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["status"], "ok");
    assert!(json["time"].is_i64());
}

#[tokio::test]
async fn test_health_time_increases() {
    let dir = bundle();
    let app = app(&dir);

    let mut previous = 0;
    for _ in 0..5 {
        let resp = app
            .clone()
            .oneshot(request(Method::GET, "/api/health"))
            .await
            .unwrap();
        let time = body_json(resp).await["time"].as_i64().unwrap();
        assert!(time > previous, "{time} should be after {previous}");
        previous = time;
    }
}

// ── Chat ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_chat_disease_reply() {
    let dir = bundle();
    let (status, json) = chat(app(&dir), r#"{"message":"What about my disease risk?"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["reply"],
        "Disease: Moisture + temperature + crop stage influence risk scoring."
    );
    assert!(json["ts"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_chat_first_match_wins() {
    let dir = bundle();
    let (status, json) = chat(app(&dir), r#"{"message":"Will the RAIN change my yield?"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["reply"],
        "Weather: 5-day forecast integration planned. Meanwhile use the Weather service panel."
    );
}

#[tokio::test]
async fn test_chat_fallback_reply() {
    let dir = bundle();
    let (status, json) = chat(app(&dir), r#"{"message":"random unrelated text"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["reply"],
        "I will learn this soon. Ask about yield, weather, disease or fertilizer for now."
    );
}

#[tokio::test]
async fn test_chat_uses_configured_rules() {
    let dir = bundle();
    let matcher = ReplyMatcher::new(
        vec![agri_portal_core::PatternRule::new("mandi", "Market prices update daily.").unwrap()],
        "Ask about mandi prices.",
    );
    let app = build_router(AppState::new(matcher, ServiceCatalog::builtin(), dir.path()));

    let (_, json) = chat(app.clone(), r#"{"message":"Mandi rates?"}"#).await;
    assert_eq!(json["reply"], "Market prices update daily.");
    let (_, json) = chat(app, r#"{"message":"rain?"}"#).await;
    assert_eq!(json["reply"], "Ask about mandi prices.");
}

#[tokio::test]
async fn test_chat_rejects_bad_messages() {
    let dir = bundle();
    let app = app(&dir);

    for body in [
        "",
        "{}",
        "not json at all",
        r#"{"message":""}"#,
        r#"{"message":7}"#,
        r#"{"message":null}"#,
        r#"{"msg":"rain"}"#,
        r#"["rain"]"#,
    ] {
        let (status, json) = chat(app.clone(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(json, serde_json::json!({ "error": "message required" }));
    }
}

#[tokio::test]
async fn test_chat_wrong_method() {
    let dir = bundle();
    let app = app(&dir);

    for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
        let resp = app
            .clone()
            .oneshot(request(method.clone(), "/api/chat"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({ "error": "Method not allowed" })
        );
    }
}

#[tokio::test]
async fn test_read_only_routes_reject_wrong_method() {
    let dir = bundle();
    let app = app(&dir);

    for uri in ["/api/health", "/api/services"] {
        for method in [Method::POST, Method::PUT, Method::DELETE] {
            let resp = app
                .clone()
                .oneshot(request(method.clone(), uri))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
            assert_eq!(
                body_json(resp).await,
                serde_json::json!({ "error": "Method not allowed" })
            );
        }
    }
}

// ── Service catalog ────────────────────────────────────────────

#[tokio::test]
async fn test_services_listed_in_order() {
    let dir = bundle();
    let resp = app(&dir)
        .oneshot(request(Method::GET, "/api/services"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let services = json["services"].as_array().unwrap();
    assert_eq!(services.len(), 6);
    assert_eq!(services[0]["label"], "Crop Recommendation");
    assert_eq!(services[0]["url"], "https://crop-recommendation-juhl.onrender.com/");
    assert_eq!(services[0]["embed"], true);
    assert_eq!(services[1]["label"], "Yield Prediction");
    assert_eq!(services[1]["embed"], false);
}

#[tokio::test]
async fn test_services_from_custom_catalog() {
    let dir = bundle();
    let catalog = ServiceCatalog::new(vec![ServiceDescriptor::new(
        "Soil Lab",
        "https://soil.example.org/",
        true,
    )])
    .unwrap();
    let app = build_router(AppState::new(ReplyMatcher::builtin(), catalog, dir.path()));

    let resp = app
        .oneshot(request(Method::GET, "/api/services"))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(
        json,
        serde_json::json!({
            "services": [{ "label": "Soil Lab", "url": "https://soil.example.org/", "embed": true }]
        })
    );
}

// ── Unknown API paths ──────────────────────────────────────────

#[tokio::test]
async fn test_unknown_api_paths_are_json_404() {
    let dir = bundle();
    let app = app(&dir);

    for uri in ["/api/unknown", "/api/chat/history", "/api", "/apiary"] {
        let resp = app
            .clone()
            .oneshot(request(Method::GET, uri))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({ "error": "Not found" })
        );
    }
}

// ── Static bundle ──────────────────────────────────────────────

#[tokio::test]
async fn test_root_serves_index() {
    let dir = bundle();
    let resp = app(&dir).oneshot(request(Method::GET, "/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, INDEX_HTML);
}

#[tokio::test]
async fn test_client_routes_fall_back_to_index() {
    let dir = bundle();
    let resp = app(&dir)
        .oneshot(request(Method::GET, "/services/crop-recommendation"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, INDEX_HTML);
}

#[tokio::test]
async fn test_assets_served_from_bundle() {
    let dir = bundle();
    let resp = app(&dir)
        .oneshot(request(Method::GET, "/assets/app.js"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, APP_JS);
}

// ── Middleware ─────────────────────────────────────────────────

#[tokio::test]
async fn test_panic_becomes_generic_500() {
    async fn boom() -> &'static str {
        panic!("database password is hunter2")
    }
    let app = with_middleware(Router::new().route("/api/boom", get(boom)));

    let resp = app.oneshot(request(Method::GET, "/api/boom")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let text = body_text(resp).await;
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&text).unwrap(),
        serde_json::json!({ "error": "server error" })
    );
    assert!(!text.contains("hunter2"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let dir = bundle();
    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/health")
        .header("origin", "https://farmer.example.org")
        .body(Body::empty())
        .unwrap();
    let resp = app(&dir).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

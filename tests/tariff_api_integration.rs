//! HTTP-level tests for the tariff widget API.
//!
//! Drives the router in-process with `oneshot`; no listener is bound.

#![cfg(feature = "server")]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::time::Duration;

use tariff_calculator::api::{build_router, AppState, SessionFactory};
use tariff_calculator::config::SessionLimits;
use tariff_calculator::{GenerationPolicy, TariffConfig};
use tower::ServiceExt;

fn app(policy: GenerationPolicy) -> Router {
    let factory = SessionFactory::new(TariffConfig::default(), policy, Some(1234))
        .expect("default config is valid");
    build_router(AppState::new(factory), None)
}

/// Parse response body as JSON.
async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Failed to parse JSON")
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    (status, body_json(resp).await)
}

async fn create_session(app: &Router) -> String {
    let (status, json) = send(app, "POST", "/api/session", None).await;
    assert_eq!(status, StatusCode::OK, "Failed to create session");
    json["session_id"]
        .as_str()
        .expect("Response must contain session_id")
        .to_string()
}

async fn select(app: &Router, id: &str, country: &str) -> (StatusCode, Value) {
    send(
        app,
        "PUT",
        &format!("/api/session/{}/selection", id),
        Some(serde_json::json!({ "country": country })),
    )
    .await
}

async fn generate(app: &Router, id: &str) -> Value {
    let (status, json) = send(app, "POST", &format!("/api/session/{}/generate", id), None).await;
    assert_eq!(status, StatusCode::OK, "Generate failed: {:?}", json);
    json
}

#[tokio::test]
async fn test_health() {
    let app = app(GenerationPolicy::Regenerate);
    let (status, json) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"], "OK");
}

#[tokio::test]
async fn test_index_page_is_served() {
    let app = app(GenerationPolicy::Regenerate);
    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Generate Tariff"));
}

#[tokio::test]
async fn test_countries_and_tiers() {
    let app = app(GenerationPolicy::Regenerate);

    let (status, json) = send(&app, "GET", "/api/countries", None).await;
    assert_eq!(status, StatusCode::OK);
    let countries = json.as_array().unwrap();
    assert_eq!(countries.len(), 193);
    assert_eq!(countries[0]["name"], "Afghanistan");
    assert_eq!(countries[0]["flag"], "\u{1F1E6}\u{1F1EB}");

    let (status, json) = send(&app, "GET", "/api/tiers", None).await;
    assert_eq!(status, StatusCode::OK);
    let bounds: Vec<(String, u64, u64)> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| {
            (
                t["tier"].as_str().unwrap().to_string(),
                t["min"].as_u64().unwrap(),
                t["max"].as_u64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        bounds,
        vec![
            ("low".to_string(), 10, 50),
            ("medium".to_string(), 51, 100),
            ("high".to_string(), 101, 200),
        ]
    );
}

#[tokio::test]
async fn test_new_session_has_no_result_and_cannot_generate() {
    let app = app(GenerationPolicy::Regenerate);
    let id = create_session(&app).await;

    let (status, json) = send(&app, "GET", &format!("/api/session/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "no_result");
    assert_eq!(json["can_generate"], false);
    assert!(json["selection"].is_null());
    assert!(json["result"].is_null());
}

#[tokio::test]
async fn test_generate_without_selection_is_noop() {
    let app = app(GenerationPolicy::Regenerate);
    let id = create_session(&app).await;

    let json = generate(&app, &id).await;
    assert!(json["result"].is_null());
    assert_eq!(json["state"], "no_result");
}

#[tokio::test]
async fn test_select_generate_flow() {
    let app = app(GenerationPolicy::Regenerate);
    let id = create_session(&app).await;

    let (status, json) = select(&app, &id, "Vietnam").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["selection"]["code"], "VN");
    assert_eq!(json["can_generate"], true);

    let json = generate(&app, &id).await;
    assert_eq!(json["state"], "result_present");
    let result = &json["result"];
    assert_eq!(result["country"], "Vietnam");

    let value = result["value"].as_u64().unwrap();
    assert!((10..=200).contains(&value));
    let expected_tier = match value {
        0..=50 => "low",
        51..=100 => "medium",
        _ => "high",
    };
    assert_eq!(result["tier"], expected_tier);
    assert!(result["asset"].as_str().unwrap().starts_with("https://"));
}

#[tokio::test]
async fn test_changing_selection_clears_result() {
    let app = app(GenerationPolicy::Regenerate);
    let id = create_session(&app).await;

    select(&app, &id, "Germany").await;
    let json = generate(&app, &id).await;
    assert!(!json["result"].is_null());

    let (_, json) = select(&app, &id, "FR").await;
    assert!(json["result"].is_null());
    assert_eq!(json["selection"]["name"], "France");

    let (status, json) = send(&app, "DELETE", &format!("/api/session/{}/selection", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["selection"].is_null());
    assert_eq!(json["can_generate"], false);
}

#[tokio::test]
async fn test_reset_keeps_selection() {
    let app = app(GenerationPolicy::Regenerate);
    let id = create_session(&app).await;

    select(&app, &id, "Norway").await;
    generate(&app, &id).await;

    let (status, json) = send(&app, "POST", &format!("/api/session/{}/reset", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["result"].is_null());
    assert_eq!(json["selection"]["name"], "Norway");
}

#[tokio::test]
async fn test_once_per_country_policy() {
    let app = app(GenerationPolicy::OncePerCountry);
    let id = create_session(&app).await;

    select(&app, &id, "Oman").await;
    let first = generate(&app, &id).await;
    assert_eq!(first["can_generate"], false);

    let second = generate(&app, &id).await;
    assert_eq!(second["result"], first["result"]);
}

#[tokio::test]
async fn test_error_responses() {
    let app = app(GenerationPolicy::Regenerate);
    let id = create_session(&app).await;

    let (status, json) = select(&app, &id, "Atlantis").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Atlantis"));

    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(&app, "GET", &format!("/api/session/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/api/session/not-a-uuid/generate", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_session() {
    let app = app(GenerationPolicy::Regenerate);
    let id = create_session(&app).await;

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/session/{}", id))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/session/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_store_is_capped() {
    let factory = SessionFactory::new(TariffConfig::default(), GenerationPolicy::Regenerate, None)
        .expect("default config is valid");
    let state = AppState::new(factory).with_limits(SessionLimits {
        idle_ttl: Duration::from_secs(3600),
        max_sessions: 2,
    });
    let sessions = state.sessions.clone();
    let app = build_router(state, None);

    let first = create_session(&app).await;
    {
        let mut write = sessions.write().await;
        let session = write.get_mut(&first.parse::<uuid::Uuid>().unwrap()).unwrap();
        session.updated_at = session.updated_at - chrono::Duration::seconds(1);
    }
    for _ in 0..5 {
        create_session(&app).await;
    }

    assert_eq!(sessions.read().await.len(), 2);
    let (status, json) = send(&app, "GET", &format!("/api/session/{}", first), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains(&first));
}

#[tokio::test]
async fn test_idle_sessions_are_evicted_on_create() {
    let factory = SessionFactory::new(TariffConfig::default(), GenerationPolicy::Regenerate, None)
        .expect("default config is valid");
    let state = AppState::new(factory).with_limits(SessionLimits {
        idle_ttl: Duration::from_secs(60),
        max_sessions: 100,
    });
    let sessions = state.sessions.clone();
    let app = build_router(state, None);

    let stale = create_session(&app).await;
    {
        let mut write = sessions.write().await;
        let session = write.get_mut(&stale.parse::<uuid::Uuid>().unwrap()).unwrap();
        session.updated_at = session.updated_at - chrono::Duration::minutes(5);
    }

    let fresh = create_session(&app).await;
    let ids: Vec<String> = sessions.read().await.keys().map(|id| id.to_string()).collect();
    assert_eq!(ids, vec![fresh]);
}

#[tokio::test]
async fn test_selection_on_evicted_session_is_a_json_404() {
    let app = app(GenerationPolicy::Regenerate);
    let id = create_session(&app).await;

    select(&app, &id, "Germany").await;
    generate(&app, &id).await;
    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/session/{}", id))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The page recreates its session on this status and hides the old result
    let (status, json) = select(&app, &id, "France").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].is_string());

    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("err.status !== 404"));
    assert!(html.contains("sessionStorage"));
}

//! # Integration Tests for verdex-api
//!
//! Exercises the fully assembled app: health probes, metrics exposition,
//! catalog listing and mutation, batch and discovery checks against a
//! wiremock chat-completions server, the feedback lifecycle, and the
//! error envelope.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use verdex_api::config::ApiConfig;
use verdex_api::state::AppState;
use verdex_catalog::CatalogStore;
use verdex_feedback::FeedbackStore;
use verdex_model::{HttpModelClient, ModelConfig};
use verdex_pipeline::CheckEngine;

/// Helper: write a two-law, two-feature catalog into `dir`.
fn write_tables(dir: &Path) {
    fs::write(
        dir.join("laws.csv"),
        "id,title,description,jurisdiction\n\
         EU-2016-679,GDPR,EU data protection regulation,EU\n\
         US-CA-1798,CCPA,California privacy act,US-CA\n",
    )
    .unwrap();
    fs::write(
        dir.join("features.csv"),
        "name,description\n\
         Dark Mode,Inverts the palette\n\
         Analytics Export,Exports usage counters to a partner\n",
    )
    .unwrap();
}

/// Helper: build the app over stores in `dir` and a model client aimed
/// at `model_base`.
fn test_app(dir: &Path, model_base: &str) -> (axum::Router, AppState) {
    let catalog = Arc::new(CatalogStore::load(
        dir.join("laws.csv"),
        dir.join("features.csv"),
        ',',
    ));
    let feedback = Arc::new(FeedbackStore::open(dir.join("feedback.json")).unwrap());
    let client = Arc::new(
        HttpModelClient::new(ModelConfig::new(model_base, "test-key", "verdex-eval-1")).unwrap(),
    );
    let engine = Arc::new(CheckEngine::new(
        Arc::clone(&catalog),
        Arc::clone(&feedback),
        client,
    ));
    let state = AppState::new(
        ApiConfig {
            laws_path: dir.join("laws.csv"),
            features_path: dir.join("features.csv"),
            delimiter: ',',
            feedback_path: dir.join("feedback.json"),
            bind_addr: "127.0.0.1:0".into(),
        },
        catalog,
        feedback,
        engine,
    );
    (verdex_api::app(state.clone()), state)
}

/// Helper: a chat-completions body whose assistant content is `content`.
fn completion_json(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

/// Helper: assistant content carrying a well-formed verdict.
fn verdict_content(status: &str) -> String {
    serde_json::json!({
        "compliance_status": status,
        "reasoning": "scripted reasoning",
        "recommendations": ["scripted recommendation"],
    })
    .to_string()
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn patch_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_liveness_probe() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    let server = MockServer::start().await;
    let (app, _) = test_app(dir.path(), &server.uri());

    let response = app.oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_readiness_probe_ready() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    let server = MockServer::start().await;
    let (app, _) = test_app(dir.path(), &server.uri());

    let response = app.oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_readiness_probe_loading_without_tables() {
    let dir = TempDir::new().unwrap();
    // No catalog files written.
    let server = MockServer::start().await;
    let (app, _) = test_app(dir.path(), &server.uri());

    let response = app.oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_string(response).await, "loading");
}

// -- Metrics ------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_metrics_exposition_carries_http_and_domain_series() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    let server = MockServer::start().await;
    let (app, _) = test_app(dir.path(), &server.uri());

    // One API request so the HTTP counters have a sample.
    let response = app.clone().oneshot(get("/v1/laws")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/plain"), "{content_type}");

    let body = body_string(response).await;
    assert!(body.contains("verdex_http_requests_total"), "{body}");
    assert!(body.contains("verdex_catalog_laws 2"), "{body}");
    assert!(body.contains("verdex_catalog_features 2"), "{body}");
    assert!(body.contains("verdex_catalog_ready 1"), "{body}");
    assert!(body.contains("verdex_feedback_entries 0"), "{body}");
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_openapi_spec_is_served() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    let server = MockServer::start().await;
    let (app, _) = test_app(dir.path(), &server.uri());

    let response = app.oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let spec = body_json(response).await;
    assert!(spec["paths"]["/v1/checks"].is_object());
    assert!(spec["paths"]["/v1/feedback/{id}"].is_object());
}

// -- Catalog ------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_catalog_listings_are_enveloped() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    let server = MockServer::start().await;
    let (app, _) = test_app(dir.path(), &server.uri());

    let body = body_json(app.clone().oneshot(get("/v1/laws")).await.unwrap()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let body = body_json(app.oneshot(get("/v1/features")).await.unwrap()).await;
    assert_eq!(body["data"][1]["name"], "Analytics Export");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_append_feature_then_duplicate() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    let server = MockServer::start().await;
    let (app, state) = test_app(dir.path(), &server.uri());

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/features",
            r#"{"name":"Live Captions","description":"Real-time subtitles"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.catalog.feature_count(), 3);

    let response = app
        .oneshot(post_json(
            "/v1/features",
            r#"{"name":"live captions","description":"again"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_refresh_picks_up_edited_tables() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    let server = MockServer::start().await;
    let (app, _) = test_app(dir.path(), &server.uri());

    fs::write(
        dir.path().join("laws.csv"),
        "id,title,description,jurisdiction\nEU-2016-679,GDPR,EU data protection regulation,EU\n",
    )
    .unwrap();

    let response = app.oneshot(post_json("/v1/refresh", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["laws"], 1);
    assert_eq!(body["data"]["features"], 2);
}

// -- Checks -------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_batch_check_runs_the_full_grid() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_json(&verdict_content("compliant"))),
        )
        .expect(4)
        .mount(&server)
        .await;
    let (app, _) = test_app(dir.path(), &server.uri());

    let response = app.oneshot(post_json("/v1/checks", "{}")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["summary"]["total"], 4);
    assert_eq!(body["data"]["summary"]["compliant"], 4);
    assert_eq!(body["data"]["summary"]["risk_score"], 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_model_outage_degrades_to_fallback_verdicts() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;
    let (app, _) = test_app(dir.path(), &server.uri());

    let response = app
        .oneshot(post_json(
            "/v1/checks",
            r#"{"features":["Dark Mode"],"laws":["GDPR"]}"#,
        ))
        .await
        .unwrap();
    // Model failures stay inside the report.
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["verdicts"][0]["status"], "requires_review");
    assert_eq!(body["data"]["summary"]["risk_score"], 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_feature_check_screens_then_evaluates() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    let server = MockServer::start().await;
    // First call answers the screening, every later call the evaluation.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_json(r#"["CCPA"]"#)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_json(&verdict_content("non_compliant"))),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (app, _) = test_app(dir.path(), &server.uri());

    let response = app
        .oneshot(post_json(
            "/v1/checks/feature",
            r#"{"name":"Email Digest","description":"Weekly activity summary emails"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["feature_name"], "Email Digest");
    assert_eq!(body["data"]["relevant_law_titles"], serde_json::json!(["CCPA"]));
    assert_eq!(body["data"]["verdicts"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["verdicts"][0]["law_title"], "CCPA");
    assert_eq!(body["data"]["summary"]["risk_score"], 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_checks_return_503_before_catalog_ready() {
    let dir = TempDir::new().unwrap();
    // No tables.
    let server = MockServer::start().await;
    let (app, _) = test_app(dir.path(), &server.uri());

    let response = app
        .clone()
        .oneshot(post_json("/v1/checks", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app
        .oneshot(post_json(
            "/v1/checks/feature",
            r#"{"name":"Fresh","description":"new"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// -- Feedback -----------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_feedback_lifecycle_submit_list_patch_delete() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    let server = MockServer::start().await;
    let (app, _) = test_app(dir.path(), &server.uri());

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/feedback",
            r#"{"feature_name":"Dark Mode","law_title":"GDPR","kind":"correction","message":"verdict ignores the consent banner"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let submitted = body_json(response).await;
    assert_eq!(submitted["data"]["status"], "pending");
    let id = submitted["data"]["id"].as_str().unwrap().to_string();

    let listed = body_json(
        app.clone()
            .oneshot(get("/v1/feedback?feature=Dark%20Mode&law=GDPR"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(listed["data"]["entries"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(patch_json(
            &format!("/v1/feedback/{id}"),
            r#"{"status":"implemented"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["updated"], true);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/feedback/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["deleted"], true);

    let listed = body_json(app.oneshot(get("/v1/feedback")).await.unwrap()).await;
    assert_eq!(listed["data"]["entries"].as_array().unwrap().len(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_implemented_correction_reaches_the_evaluation_prompt() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    let server = MockServer::start().await;
    // The mock only matches when the prompt carries the correction text.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("verdict ignores the consent banner"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_json(&verdict_content("compliant"))),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (app, _) = test_app(dir.path(), &server.uri());

    let submitted = body_json(
        app.clone()
            .oneshot(post_json(
                "/v1/feedback",
                r#"{"feature_name":"Dark Mode","law_title":"GDPR","kind":"correction","message":"verdict ignores the consent banner"}"#,
            ))
            .await
            .unwrap(),
    )
    .await;
    let id = submitted["data"]["id"].as_str().unwrap();
    app.clone()
        .oneshot(patch_json(
            &format!("/v1/feedback/{id}"),
            r#"{"status":"implemented"}"#,
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json(
            "/v1/checks",
            r#"{"features":["Dark Mode"],"laws":["GDPR"]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    // An unmatched mock would have failed the call into a fallback.
    assert_eq!(body["data"]["verdicts"][0]["status"], "compliant");
}

// -- Error Envelope -----------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_malformed_json_body_gets_the_error_envelope() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    let server = MockServer::start().await;
    let (app, _) = test_app(dir.path(), &server.uri());

    let response = app
        .oneshot(post_json("/v1/feedback", "{not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_route_is_404() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    let server = MockServer::start().await;
    let (app, _) = test_app(dir.path(), &server.uri());

    let response = app.oneshot(get("/v1/nothing-here")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_oversized_body_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path());
    let server = MockServer::start().await;
    let (app, _) = test_app(dir.path(), &server.uri());

    let huge = format!(
        r#"{{"name":"big","description":"{}"}}"#,
        "x".repeat(3 * 1024 * 1024)
    );
    let response = app.oneshot(post_json("/v1/features", &huge)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

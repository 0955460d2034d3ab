//! API endpoint integration tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use polyglot_gateway::api::{ApiState, ModelInfo};
use polyglot_gateway::pipeline::Pipeline;
use polyglot_gateway::{Error, Language};

mod common;
use common::{MockGenerator, MockSynthesizer, MockTranslator};

/// Build a test router over a mock-backed pipeline
fn build_test_router(
    generator: Arc<MockGenerator>,
    translator: Option<Arc<MockTranslator>>,
    synthesizer: Option<Arc<MockSynthesizer>>,
    fallback_key: Option<&str>,
) -> axum::Router {
    let pipeline = Pipeline::new(
        translator.map(|t| t as _),
        generator as _,
        synthesizer.clone().map(|s| s as _),
    );

    let state = Arc::new(ApiState {
        pipeline,
        transcriber: None,
        synthesizer: synthesizer.map(|s| s as _),
        default_language: Language::English,
        fallback_key: fallback_key.map(ToString::to_string),
        model_info: ModelInfo {
            model_id: "mock-model".to_string(),
            provider: "mock".to_string(),
        },
    });

    polyglot_gateway::api::router(state)
}

fn default_router() -> axum::Router {
    build_test_router(
        Arc::new(MockGenerator::replying("Hi!")),
        Some(Arc::new(MockTranslator::detecting(Language::English))),
        None,
        Some("server-key"),
    )
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = default_router();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn ready_endpoint_reports_stage_availability() {
    let app = default_router();

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["checks"]["generation"]["status"], "ok");
    assert_eq!(json["checks"]["translation"]["status"], "ok");
    assert_eq!(json["checks"]["voice"]["status"], "unavailable");
}

#[tokio::test]
async fn index_serves_the_form() {
    let app = default_router();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Polyglot Chat"));
    assert!(html.contains("api-key"));
}

#[tokio::test]
async fn languages_endpoint_lists_the_selector() {
    let app = default_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/languages")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let languages = json["languages"].as_array().unwrap();
    assert_eq!(languages.len(), 7);
    assert_eq!(json["default"], "en");

    let names: Vec<&str> = languages
        .iter()
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Sanskrit"));
}

#[tokio::test]
async fn status_endpoint_reports_the_model() {
    let app = default_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["model"]["model_id"], "mock-model");
    assert_eq!(json["model"]["provider"], "mock");
    assert_eq!(json["voice_available"], false);
}

#[tokio::test]
async fn chat_returns_the_reply() {
    let app = default_router();

    let body = serde_json::json!({
        "api_key": "user-key",
        "query": "Hello",
        "language": "en",
    });
    let response = app.oneshot(post_json("/api/chat", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["reply"], "Hi!");
    assert_eq!(json["detected_language"], "en");
    assert_eq!(json["warnings"].as_array().unwrap().len(), 0);
    assert!(json.get("audio_b64").is_none());
}

#[tokio::test]
async fn chat_falls_back_to_the_server_key() {
    let app = default_router();

    let body = serde_json::json!({ "query": "Hello" });
    let response = app.oneshot(post_json("/api/chat", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_without_any_key_is_unauthorized() {
    let app = build_test_router(
        Arc::new(MockGenerator::replying("unused")),
        None,
        None,
        None,
    );

    let body = serde_json::json!({ "query": "Hello" });
    let response = app.oneshot(post_json("/api/chat", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "missing_api_key");
}

#[tokio::test]
async fn chat_rejects_unknown_languages() {
    let app = default_router();

    let body = serde_json::json!({ "query": "Hello", "language": "tlh" });
    let response = app.oneshot(post_json("/api/chat", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_rejects_empty_queries() {
    let app = default_router();

    let body = serde_json::json!({ "query": "   " });
    let response = app.oneshot(post_json("/api/chat", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "empty_query");
}

#[tokio::test]
async fn chat_surfaces_credential_errors() {
    let app = build_test_router(
        Arc::new(MockGenerator::failing(|| {
            Error::Auth("key rejected".to_string())
        })),
        Some(Arc::new(MockTranslator::detecting(Language::English))),
        None,
        Some("server-key"),
    );

    let body = serde_json::json!({ "query": "Hello" });
    let response = app.oneshot(post_json("/api/chat", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "invalid_api_key");
}

#[tokio::test]
async fn chat_surfaces_generation_failures_as_bad_gateway() {
    let app = build_test_router(
        Arc::new(MockGenerator::failing(|| {
            Error::Generation("quota exceeded".to_string())
        })),
        Some(Arc::new(MockTranslator::detecting(Language::English))),
        None,
        Some("server-key"),
    );

    let body = serde_json::json!({ "query": "Hello" });
    let response = app.oneshot(post_json("/api/chat", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "generation_failed");
}

#[tokio::test]
async fn chat_returns_base64_audio_when_speaking() {
    let app = build_test_router(
        Arc::new(MockGenerator::replying("Spoken")),
        Some(Arc::new(MockTranslator::detecting(Language::English))),
        Some(Arc::new(MockSynthesizer::working())),
        Some("server-key"),
    );

    let body = serde_json::json!({ "query": "Hello", "speak": true });
    let response = app.oneshot(post_json("/api/chat", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["reply"], "Spoken");
    assert!(json["audio_b64"].is_string());
}

#[tokio::test]
async fn voice_capabilities_reflect_configuration() {
    let app = build_test_router(
        Arc::new(MockGenerator::replying("unused")),
        None,
        Some(Arc::new(MockSynthesizer::working())),
        None,
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/voice/capabilities")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["stt_available"], false);
    assert_eq!(json["tts_available"], true);
}

#[tokio::test]
async fn transcribe_without_stt_is_unavailable() {
    let app = default_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/voice/transcribe")
                .body(Body::from(vec![0u8; 16]))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "not_configured");
}

#[tokio::test]
async fn synthesize_returns_mpeg_audio() {
    let app = build_test_router(
        Arc::new(MockGenerator::replying("unused")),
        None,
        Some(Arc::new(MockSynthesizer::working())),
        None,
    );

    let body = serde_json::json!({ "text": "Hello", "language": "en" });
    let response = app
        .oneshot(post_json("/api/voice/synthesize", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "audio/mpeg"
    );
}

#[tokio::test]
async fn synthesize_failure_is_reported() {
    let app = build_test_router(
        Arc::new(MockGenerator::replying("unused")),
        None,
        Some(Arc::new(MockSynthesizer::failing())),
        None,
    );

    let body = serde_json::json!({ "text": "Hello" });
    let response = app
        .oneshot(post_json("/api/voice/synthesize", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "synthesis_failed");
}

//! Health check and status endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Serialize;

use super::ApiState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Detailed readiness response
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: ReadinessChecks,
}

/// Individual readiness checks
#[derive(Serialize)]
pub struct ReadinessChecks {
    pub generation: CheckResult,
    pub translation: CheckResult,
    pub voice: CheckResult,
}

/// Result of a single health check
#[derive(Serialize)]
pub struct CheckResult {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    const fn ok() -> Self {
        Self {
            status: "ok",
            message: None,
        }
    }

    fn unavailable(message: impl Into<String>) -> Self {
        Self {
            status: "unavailable",
            message: Some(message.into()),
        }
    }
}

/// Liveness probe - is the service running?
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness probe - which pipeline stages can this instance serve?
///
/// Generation is the only required stage; translation and voice degrade
/// per request, so their absence reports as degraded rather than failing.
async fn ready(State(state): State<Arc<ApiState>>) -> (StatusCode, Json<ReadinessResponse>) {
    let generation = CheckResult::ok();
    let translation = if state.pipeline.can_translate() {
        CheckResult::ok()
    } else {
        CheckResult::unavailable("no translation backend configured")
    };
    let voice = if state.transcriber.is_some() || state.synthesizer.is_some() {
        CheckResult::ok()
    } else {
        CheckResult::unavailable("voice disabled or keyless")
    };

    (
        StatusCode::OK,
        Json(ReadinessResponse {
            status: "ok",
            checks: ReadinessChecks {
                generation,
                translation,
                voice,
            },
        }),
    )
}

/// System status response including model info
#[derive(Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub model: super::ModelInfo,
    pub default_language: &'static str,
    pub voice_available: bool,
}

/// Get system status including current model
async fn status(State(state): State<Arc<ApiState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        model: state.model_info.clone(),
        default_language: state.default_language.code(),
        voice_available: state.transcriber.is_some() && state.synthesizer.is_some(),
    })
}

/// Build health router (liveness only, no state needed)
pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

/// Build readiness router (needs state for checks)
pub fn ready_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .route("/api/status", get(status))
        .with_state(state)
}

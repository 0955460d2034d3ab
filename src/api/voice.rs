//! Voice API endpoints for speech-to-text and text-to-speech

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::{Error, Language};

/// Build voice router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/transcribe", post(transcribe))
        .route("/synthesize", post(synthesize))
        .route("/capabilities", axum::routing::get(capabilities))
        .with_state(state)
}

/// Voice capabilities response
#[derive(Debug, Serialize)]
pub struct VoiceCapabilities {
    pub stt_available: bool,
    pub tts_available: bool,
}

/// Get voice capabilities
async fn capabilities(State(state): State<Arc<ApiState>>) -> Json<VoiceCapabilities> {
    Json(VoiceCapabilities {
        stt_available: state.transcriber.is_some(),
        tts_available: state.synthesizer.is_some(),
    })
}

/// Transcription query parameters
#[derive(Debug, Deserialize)]
pub struct TranscribeParams {
    /// Expected language hint (code or name)
    #[serde(default)]
    pub language: Option<String>,
}

/// Transcription response
#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

/// Transcribe audio to text
///
/// Accepts audio in WAV format (audio/wav)
async fn transcribe(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<TranscribeParams>,
    body: Bytes,
) -> Result<Json<TranscribeResponse>, VoiceError> {
    let transcriber = state
        .transcriber
        .as_ref()
        .ok_or(VoiceError::NotConfigured("STT not configured"))?;

    if body.is_empty() {
        return Err(VoiceError::BadRequest("Empty audio data"));
    }

    let hint = params.language.as_deref().and_then(Language::parse);

    let text = transcriber.transcribe(&body, hint).await.map_err(|e| {
        if matches!(e, Error::Unintelligible(_)) {
            VoiceError::Unintelligible(e.to_string())
        } else {
            VoiceError::TranscriptionFailed(e.to_string())
        }
    })?;

    Ok(Json(TranscribeResponse { text }))
}

/// Synthesis request
#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    /// Language the text is in (code or name); defaults to the server's
    #[serde(default)]
    pub language: Option<String>,
}

/// Synthesize text to speech
///
/// Returns audio in MP3 format
async fn synthesize(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SynthesizeRequest>,
) -> Result<Response, VoiceError> {
    let synthesizer = state
        .synthesizer
        .as_ref()
        .ok_or(VoiceError::NotConfigured("TTS not configured"))?;

    if request.text.is_empty() {
        return Err(VoiceError::BadRequest("Empty text"));
    }

    let language = request
        .language
        .as_deref()
        .and_then(Language::parse)
        .unwrap_or(state.default_language);

    let audio = synthesizer
        .synthesize(&request.text, language)
        .await
        .map_err(|e| VoiceError::SynthesisFailed(e.to_string()))?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}

/// Voice API errors
#[derive(Debug)]
pub enum VoiceError {
    NotConfigured(&'static str),
    BadRequest(&'static str),
    Unintelligible(String),
    TranscriptionFailed(String),
    SynthesisFailed(String),
}

impl IntoResponse for VoiceError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: ErrorBody,
        }

        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: String,
        }

        let (status, code, message) = match self {
            Self::NotConfigured(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "not_configured",
                msg.to_string(),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.to_string()),
            Self::Unintelligible(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unintelligible", msg)
            }
            Self::TranscriptionFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "transcription_failed",
                msg,
            ),
            Self::SynthesisFailed(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "synthesis_failed", msg)
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: ErrorBody { code, message },
            }),
        )
            .into_response()
    }
}

//! Chat endpoints: the form page and the pipeline API

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use base64::Engine as _;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::pipeline::{ChatRequest, StageWarning};
use crate::{Error, Language};

/// The single-page form served at the root
const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Build chat router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/chat", post(chat))
        .route("/api/languages", get(languages))
        .with_state(state)
}

/// Serve the chat form
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// One selectable language
#[derive(Debug, Serialize)]
pub struct LanguageEntry {
    pub code: &'static str,
    pub name: &'static str,
}

/// Languages offered by the form selector
#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageEntry>,
    pub default: &'static str,
}

/// List the selectable languages
async fn languages(State(state): State<Arc<ApiState>>) -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: Language::all()
            .iter()
            .map(|lang| LanguageEntry {
                code: lang.code(),
                name: lang.display_name(),
            })
            .collect(),
        default: state.default_language.code(),
    })
}

/// Chat submission body
#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    /// Generation API key; falls back to the server-side key when absent
    #[serde(default)]
    pub api_key: Option<String>,

    /// The query, typed or transcribed
    pub query: String,

    /// Display language (code or name); defaults to the server's
    #[serde(default)]
    pub language: Option<String>,

    /// Synthesize the reply as audio
    #[serde(default)]
    pub speak: bool,
}

/// Chat response body
#[derive(Debug, Serialize)]
pub struct ChatResponseBody {
    pub request_id: String,
    pub reply: String,
    pub detected_language: &'static str,
    pub warnings: Vec<StageWarning>,
    /// Base64-encoded MP3 of the reply, when synthesis was requested and succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_b64: Option<String>,
}

/// Run the pipeline for one form submission
async fn chat(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<ChatRequestBody>,
) -> Result<Json<ChatResponseBody>, ChatError> {
    let language = match body.language.as_deref() {
        None | Some("") => state.default_language,
        Some(value) => {
            Language::parse(value).ok_or(ChatError::BadRequest("unknown language"))?
        }
    };

    let api_key = body
        .api_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| state.fallback_key.clone())
        .ok_or(ChatError::MissingKey)?;

    let mut request = ChatRequest::new(body.query, language, SecretString::from(api_key));
    if body.speak {
        request = request.with_speech();
    }

    let outcome = state.pipeline.run(&request).await?;

    let audio_b64 = outcome
        .audio
        .map(|bytes| base64::engine::general_purpose::STANDARD.encode(bytes));

    Ok(Json(ChatResponseBody {
        request_id: outcome.request_id.to_string(),
        reply: outcome.reply,
        detected_language: outcome.detected.code(),
        warnings: outcome.warnings,
        audio_b64,
    }))
}

/// Chat API errors
#[derive(Debug)]
pub enum ChatError {
    BadRequest(&'static str),
    MissingKey,
    Pipeline(Error),
}

impl From<Error> for ChatError {
    fn from(err: Error) -> Self {
        Self::Pipeline(err)
    }
}

impl IntoResponse for ChatError {
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
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.to_string()),
            Self::MissingKey => (
                StatusCode::UNAUTHORIZED,
                "missing_api_key",
                "no API key supplied and none configured".to_string(),
            ),
            Self::Pipeline(err) => match &err {
                Error::EmptyQuery => (StatusCode::BAD_REQUEST, "empty_query", err.to_string()),
                Error::Auth(_) | Error::Config(_) => {
                    (StatusCode::UNAUTHORIZED, "invalid_api_key", err.to_string())
                }
                Error::Unintelligible(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "unintelligible",
                    err.to_string(),
                ),
                _ => (
                    StatusCode::BAD_GATEWAY,
                    "generation_failed",
                    err.to_string(),
                ),
            },
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

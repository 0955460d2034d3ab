//! HTTP API server for the polyglot gateway

pub mod chat;
pub mod health;
pub mod voice;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::generate::Generator;
use crate::pipeline::Pipeline;
use crate::voice::{SpeechToText, Synthesizer};
use crate::{Language, Result};

/// Information about the current LLM model
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelInfo {
    pub model_id: String,
    pub provider: String,
}

/// Shared state for API handlers
pub struct ApiState {
    /// The request pipeline (translation, generation, synthesis)
    pub pipeline: Pipeline,

    /// Speech-to-text client; absent when voice is disabled or keyless
    pub transcriber: Option<Arc<SpeechToText>>,

    /// Direct synthesis client for `/api/voice/synthesize`
    pub synthesizer: Option<Arc<dyn Synthesizer>>,

    /// Display language for requests that don't pick one
    pub default_language: Language,

    /// Server-side generation key used when a request carries none
    pub fallback_key: Option<String>,

    pub model_info: ModelInfo,
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Assemble the server and its adapters from configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let generator = config.generator();
        let model_info = ModelInfo {
            model_id: config.generation.model.clone(),
            provider: generator.provider_name().to_string(),
        };

        let synthesizer = config.synthesizer();
        let pipeline = Pipeline::new(
            config.translator(),
            Arc::new(generator),
            synthesizer.clone(),
        );

        let state = Arc::new(ApiState {
            pipeline,
            transcriber: config.transcriber(),
            synthesizer,
            default_language: config.default_language,
            fallback_key: config.generation_key().map(ToString::to_string),
            model_info,
        });

        Self {
            state,
            port: config.server.port,
        }
    }

    /// Build the router with all routes
    fn router(&self) -> Router {
        // CORS layer for cross-origin requests from frontend
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}

/// Assemble all routes over a prepared state (shared with router tests)
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(chat::router(state.clone()))
        .nest("/api/voice", voice::router(state.clone()))
        .merge(health::router())
        .merge(health::ready_router(state))
}

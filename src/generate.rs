//! Text generation adapter
//!
//! Forwards the normalized prompt to a generative-language API. Credentials
//! are request-scoped and passed per call rather than baked into the client.

use async_trait::async_trait;

use crate::{Error, Result};

/// Default Gemini model for chat completions
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default OpenAI model for chat completions
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Boundary to the external text-completion service
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt` using the caller's credentials
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String>;

    /// Model identifier for status reporting
    fn model_id(&self) -> &str;

    /// Provider name for status reporting and logs
    fn provider_name(&self) -> &'static str;
}

/// Response from the Gemini `generateContent` endpoint
#[derive(serde::Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(serde::Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(serde::Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(serde::Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

/// Response from the OpenAI chat completions endpoint
#[derive(serde::Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(serde::Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(serde::Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: String,
}

/// Generation provider backend
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationProvider {
    Gemini,
    OpenAi,
}

impl GenerationProvider {
    /// Parse a provider name (case-insensitive)
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "openai" => Some(Self::OpenAi),
            _ => None,
        }
    }
}

/// Generates text completions
pub struct GenerationClient {
    client: reqwest::Client,
    model: String,
    max_tokens: u32,
    provider: GenerationProvider,
}

impl GenerationClient {
    /// Create a generation client for the given provider and model
    #[must_use]
    pub fn new(provider: GenerationProvider, model: String, max_tokens: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            model,
            max_tokens,
            provider,
        }
    }

    /// Create a Gemini client with the default model
    #[must_use]
    pub fn new_gemini() -> Self {
        Self::new(
            GenerationProvider::Gemini,
            DEFAULT_GEMINI_MODEL.to_string(),
            1024,
        )
    }

    async fn generate_gemini(&self, prompt: &str, api_key: &str) -> Result<String> {
        #[derive(serde::Serialize)]
        struct GenerateRequest<'a> {
            contents: Vec<Content<'a>>,
            #[serde(rename = "generationConfig")]
            generation_config: GenerationConfig,
        }

        #[derive(serde::Serialize)]
        struct Content<'a> {
            parts: Vec<Part<'a>>,
        }

        #[derive(serde::Serialize)]
        struct Part<'a> {
            text: &'a str,
        }

        #[derive(serde::Serialize)]
        struct GenerationConfig {
            #[serde(rename = "maxOutputTokens")]
            max_output_tokens: u32,
        }

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model,
            urlencoding::encode(api_key)
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.max_tokens,
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Gemini API error");
            return Err(classify_failure(status, &body, "Gemini"));
        }

        let result: GeminiResponse = response.json().await?;
        let text = result
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::Generation(
                "Gemini returned no candidates".to_string(),
            ));
        }

        tracing::info!(chars = text.len(), "generation complete");
        Ok(text)
    }

    async fn generate_openai(&self, prompt: &str, api_key: &str) -> Result<String> {
        #[derive(serde::Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage<'a>>,
            max_tokens: u32,
        }

        #[derive(serde::Serialize)]
        struct ChatMessage<'a> {
            role: &'a str,
            content: &'a str,
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "OpenAI API error");
            return Err(classify_failure(status, &body, "OpenAI"));
        }

        let result: OpenAiResponse = response.json().await?;
        let text = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::Generation("OpenAI returned no choices".to_string()));
        }

        tracing::info!(chars = text.len(), "generation complete");
        Ok(text)
    }
}

#[async_trait]
impl Generator for GenerationClient {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String> {
        if api_key.is_empty() {
            return Err(Error::Auth("API key required for generation".to_string()));
        }

        tracing::debug!(
            provider = self.provider_name(),
            model = %self.model,
            prompt_chars = prompt.len(),
            "starting generation"
        );

        match self.provider {
            GenerationProvider::Gemini => self.generate_gemini(prompt, api_key).await,
            GenerationProvider::OpenAi => self.generate_openai(prompt, api_key).await,
        }
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &'static str {
        match self.provider {
            GenerationProvider::Gemini => "gemini",
            GenerationProvider::OpenAi => "openai",
        }
    }
}

/// Split credential failures from transient service failures
fn classify_failure(status: reqwest::StatusCode, body: &str, provider: &str) -> Error {
    use reqwest::StatusCode;

    // Gemini reports a bad key as 400 API_KEY_INVALID rather than 401
    let invalid_key = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || body.contains("API_KEY_INVALID");

    if invalid_key {
        Error::Auth(format!("{provider} rejected the API key ({status})"))
    } else {
        Error::Generation(format!("{provider} API error {status}: {body}"))
    }
}

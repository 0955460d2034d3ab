//! Error types for the polyglot gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the polyglot gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Credential error (invalid or missing API key)
    #[error("auth error: {0}")]
    Auth(String),

    /// Text generation error
    #[error("generation error: {0}")]
    Generation(String),

    /// Language detection or translation error
    #[error("translation error: {0}")]
    Translation(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Audio was received but no speech could be recognized in it
    #[error("unintelligible audio: {0}")]
    Unintelligible(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Audio device or codec error
    #[error("audio error: {0}")]
    Audio(String),

    /// Empty or unusable query
    #[error("empty query")]
    EmptyQuery,

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Whether this error blocks further generation for the session
    /// (credential and configuration errors do; transient ones do not)
    #[must_use]
    pub const fn is_credential(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::Config(_))
    }
}

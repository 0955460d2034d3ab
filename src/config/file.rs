//! TOML configuration file loading
//!
//! Supports `~/.config/polyglot/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct PolyglotConfigFile {
    /// Default display language (code or name, e.g. "en" or "French")
    #[serde(default)]
    pub language: Option<String>,

    /// Generation configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Translation configuration
    #[serde(default)]
    pub translation: TranslationFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Server/runtime configuration
    #[serde(default)]
    pub server: ServerFileConfig,
}

/// Generation-related configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// Provider ("gemini" or "openai")
    pub provider: Option<String>,

    /// Model identifier (e.g. "gemini-1.5-flash")
    pub model: Option<String>,

    /// Max tokens for completions
    pub max_tokens: Option<u32>,
}

/// Translation service configuration
#[derive(Debug, Default, Deserialize)]
pub struct TranslationFileConfig {
    /// Provider ("google" or "libre")
    pub provider: Option<String>,

    /// LibreTranslate base URL (e.g. "http://localhost:5000")
    pub libre_url: Option<String>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Enable voice input/output
    pub enabled: Option<bool>,

    /// STT provider ("whisper" or "deepgram")
    pub stt_provider: Option<String>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS provider ("openai" or "elevenlabs")
    pub tts_provider: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy" or an ElevenLabs voice id)
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f64>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub gemini: Option<String>,
    pub openai: Option<String>,
    pub google_translate: Option<String>,
    pub libretranslate: Option<String>,
    pub deepgram: Option<String>,
    pub elevenlabs: Option<String>,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// API server port
    pub port: Option<u16>,
}

/// Load the TOML config file from the standard path
///
/// Returns `PolyglotConfigFile::default()` if the file doesn't exist or
/// can't be parsed.
pub fn load_config_file() -> PolyglotConfigFile {
    let Some(path) = config_file_path() else {
        return PolyglotConfigFile::default();
    };

    if !path.exists() {
        return PolyglotConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                PolyglotConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            PolyglotConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/polyglot/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("polyglot").join("config.toml"))
}

//! Configuration management for the polyglot gateway
//!
//! Precedence for every setting: environment variable, then the TOML
//! overlay, then the built-in default.

pub mod file;

use std::sync::Arc;

use crate::generate::{
    DEFAULT_GEMINI_MODEL, DEFAULT_OPENAI_MODEL, GenerationClient, GenerationProvider,
};
use crate::language::Language;
use crate::translate::{TranslationClient, Translator};
use crate::voice::{SpeechToText, Synthesizer, TextToSpeech};
use crate::{Error, Result};

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Generation configuration
    pub generation: GenerationConfig,

    /// Translation configuration
    pub translation: TranslationConfig,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,

    /// Default display language for sessions that don't pick one
    pub default_language: Language,
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
}

/// Generation configuration
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Provider backend
    pub provider: GenerationProvider,

    /// Model identifier
    pub model: String,

    /// Max tokens for completions
    pub max_tokens: u32,
}

/// Translation provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationBackend {
    Google,
    Libre,
}

/// Translation configuration
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    /// Provider backend
    pub backend: TranslationBackend,

    /// LibreTranslate base URL (used by the libre backend)
    pub libre_url: Option<String>,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Enable voice input/output
    pub enabled: bool,

    /// STT provider ("whisper" or "deepgram")
    pub stt_provider: String,

    /// STT model (e.g. "whisper-1", "nova-2")
    pub stt_model: String,

    /// TTS provider ("openai" or "elevenlabs")
    pub tts_provider: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f64,
}

/// API keys for external services
///
/// The generation key is the one credential the user supplies per request
/// through the form; these are the server-side keys for the supporting
/// services.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Gemini API key (fallback when a request carries no key)
    pub gemini: Option<String>,

    /// `OpenAI` API key (Whisper STT, TTS, or generation fallback)
    pub openai: Option<String>,

    /// Google Cloud Translation API key
    pub google_translate: Option<String>,

    /// LibreTranslate API key (optional even when that backend is selected)
    pub libretranslate: Option<String>,

    /// Deepgram API key (optional STT)
    pub deepgram: Option<String>,

    /// ElevenLabs API key (optional TTS)
    pub elevenlabs: Option<String>,
}

impl Config {
    /// Load configuration (env > toml > default)
    ///
    /// # Errors
    ///
    /// Returns error if a provider name in env or file is unrecognized
    pub fn load() -> Result<Self> {
        Self::load_with_options(false)
    }

    /// Load configuration with explicit voice disable option
    ///
    /// # Errors
    ///
    /// Returns error if a provider name in env or file is unrecognized
    pub fn load_with_options(disable_voice: bool) -> Result<Self> {
        let fc = file::load_config_file();

        let api_keys = ApiKeys {
            gemini: std::env::var("GEMINI_API_KEY").ok().or(fc.api_keys.gemini),
            openai: std::env::var("OPENAI_API_KEY").ok().or(fc.api_keys.openai),
            google_translate: std::env::var("GOOGLE_TRANSLATE_API_KEY")
                .ok()
                .or(fc.api_keys.google_translate),
            libretranslate: std::env::var("LIBRETRANSLATE_API_KEY")
                .ok()
                .or(fc.api_keys.libretranslate),
            deepgram: std::env::var("DEEPGRAM_API_KEY")
                .ok()
                .or(fc.api_keys.deepgram),
            elevenlabs: std::env::var("ELEVENLABS_API_KEY")
                .ok()
                .or(fc.api_keys.elevenlabs),
        };

        let server = ServerConfig {
            port: std::env::var("POLYGLOT_PORT")
                .or_else(|_| std::env::var("PORT"))
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.server.port)
                .unwrap_or(8990),
        };

        let provider_name = std::env::var("POLYGLOT_LLM_PROVIDER")
            .ok()
            .or(fc.llm.provider)
            .unwrap_or_else(|| "gemini".to_string());
        let provider = GenerationProvider::parse(&provider_name)
            .ok_or_else(|| Error::Config(format!("unknown LLM provider: {provider_name}")))?;

        let default_model = match provider {
            GenerationProvider::Gemini => DEFAULT_GEMINI_MODEL,
            GenerationProvider::OpenAi => DEFAULT_OPENAI_MODEL,
        };
        let generation = GenerationConfig {
            provider,
            model: std::env::var("POLYGLOT_LLM_MODEL")
                .ok()
                .or(fc.llm.model)
                .unwrap_or_else(|| default_model.to_string()),
            max_tokens: std::env::var("POLYGLOT_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.llm.max_tokens)
                .unwrap_or(1024),
        };

        let libre_url = std::env::var("LIBRETRANSLATE_URL")
            .ok()
            .or(fc.translation.libre_url);
        let backend_name = std::env::var("POLYGLOT_TRANSLATE_PROVIDER")
            .ok()
            .or(fc.translation.provider)
            .unwrap_or_else(|| {
                // Pick whichever backend has credentials configured
                if libre_url.is_some() { "libre" } else { "google" }.to_string()
            });
        let backend = match backend_name.to_lowercase().as_str() {
            "google" => TranslationBackend::Google,
            "libre" | "libretranslate" => TranslationBackend::Libre,
            other => {
                return Err(Error::Config(format!(
                    "unknown translation provider: {other}"
                )));
            }
        };
        let translation = TranslationConfig { backend, libre_url };

        let voice_enabled = if disable_voice {
            tracing::info!("voice explicitly disabled");
            false
        } else {
            fc.voice.enabled.unwrap_or(true)
        };
        let voice = VoiceConfig {
            enabled: voice_enabled,
            stt_provider: std::env::var("POLYGLOT_STT_PROVIDER")
                .ok()
                .or(fc.voice.stt_provider)
                .unwrap_or_else(|| "whisper".to_string()),
            stt_model: std::env::var("POLYGLOT_STT_MODEL")
                .ok()
                .or(fc.voice.stt_model)
                .unwrap_or_else(|| "whisper-1".to_string()),
            tts_provider: std::env::var("POLYGLOT_TTS_PROVIDER")
                .ok()
                .or(fc.voice.tts_provider)
                .unwrap_or_else(|| "openai".to_string()),
            tts_model: std::env::var("POLYGLOT_TTS_MODEL")
                .ok()
                .or(fc.voice.tts_model)
                .unwrap_or_else(|| "tts-1".to_string()),
            tts_voice: std::env::var("POLYGLOT_TTS_VOICE")
                .ok()
                .or(fc.voice.tts_voice)
                .unwrap_or_else(|| "alloy".to_string()),
            tts_speed: std::env::var("POLYGLOT_TTS_SPEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.voice.tts_speed)
                .unwrap_or(1.0),
        };

        let default_language = std::env::var("POLYGLOT_LANGUAGE")
            .ok()
            .or(fc.language)
            .and_then(|s| Language::parse(&s))
            .unwrap_or(Language::English);

        Ok(Self {
            server,
            generation,
            translation,
            voice,
            api_keys,
            default_language,
        })
    }

    /// Build the generation client
    #[must_use]
    pub fn generator(&self) -> GenerationClient {
        GenerationClient::new(
            self.generation.provider,
            self.generation.model.clone(),
            self.generation.max_tokens,
        )
    }

    /// Server-side fallback key for generation, matching the provider
    #[must_use]
    pub fn generation_key(&self) -> Option<&str> {
        match self.generation.provider {
            GenerationProvider::Gemini => self.api_keys.gemini.as_deref(),
            GenerationProvider::OpenAi => self.api_keys.openai.as_deref(),
        }
    }

    /// Build the translation client, if credentials are configured
    #[must_use]
    pub fn translator(&self) -> Option<Arc<dyn Translator>> {
        let client = match self.translation.backend {
            TranslationBackend::Google => {
                let key = self.api_keys.google_translate.clone()?;
                TranslationClient::new_google(key).ok()?
            }
            TranslationBackend::Libre => {
                let url = self.translation.libre_url.clone()?;
                TranslationClient::new_libre(url, self.api_keys.libretranslate.clone()).ok()?
            }
        };
        Some(Arc::new(client))
    }

    /// Build the speech-to-text client, if voice is on and keys allow
    #[must_use]
    pub fn transcriber(&self) -> Option<Arc<SpeechToText>> {
        if !self.voice.enabled {
            return None;
        }

        let stt = match self.voice.stt_provider.as_str() {
            "deepgram" => SpeechToText::new_deepgram(
                self.api_keys.deepgram.clone()?,
                self.voice.stt_model.clone(),
            ),
            _ => SpeechToText::new_whisper(
                self.api_keys.openai.clone()?,
                self.voice.stt_model.clone(),
            ),
        };
        stt.ok().map(Arc::new)
    }

    /// Build the speech-synthesis client, if voice is on and keys allow
    #[must_use]
    pub fn synthesizer(&self) -> Option<Arc<dyn Synthesizer>> {
        if !self.voice.enabled {
            return None;
        }

        let tts = match self.voice.tts_provider.as_str() {
            "elevenlabs" => TextToSpeech::new_elevenlabs(
                self.api_keys.elevenlabs.clone()?,
                self.voice.tts_voice.clone(),
            ),
            _ => TextToSpeech::new_openai(
                self.api_keys.openai.clone()?,
                self.voice.tts_voice.clone(),
                self.voice.tts_speed,
                self.voice.tts_model.clone(),
            ),
        };
        tts.ok()
            .map(|client| Arc::new(client) as Arc<dyn Synthesizer>)
    }
}

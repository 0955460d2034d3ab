//! Polyglot Gateway - Multilingual voice and text chatbot gateway
//!
//! This library provides the core functionality for the gateway:
//! - Language detection and translation adapters
//! - Text generation via external generative-language APIs
//! - Voice processing (capture, STT, TTS, playback)
//! - The per-request pipeline sequencing the above
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Interfaces                        │
//! │       Web form  │  JSON API  │  CLI (one-shot)      │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                    Pipeline                          │
//! │  Detect │ Normalize │ Generate │ Localize │ Speak   │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │               External services                      │
//! │  Translate  │  Gemini/OpenAI  │  Whisper  │  TTS    │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod generate;
pub mod language;
pub mod pipeline;
pub mod translate;
pub mod voice;

pub use config::Config;
pub use error::{Error, Result};
pub use generate::{GenerationClient, GenerationProvider, Generator};
pub use language::{Detection, Language, WORKING_LANGUAGE, detect_script};
pub use pipeline::{ChatOutcome, ChatRequest, Pipeline, Stage, StageWarning};
pub use translate::{Translation, TranslationClient, Translator};

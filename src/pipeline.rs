//! Request pipeline: detect, normalize, generate, localize, speak
//!
//! Each submission runs the stages linearly. Stage failures are isolated:
//! translation failures degrade to pass-through text, synthesis failures
//! degrade to text-only output, and a generation failure aborts the request.
//! Nothing is retried.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use uuid::Uuid;

use crate::generate::Generator;
use crate::language::{Detection, Language, WORKING_LANGUAGE, detect_script};
use crate::translate::Translator;
use crate::voice::Synthesizer;
use crate::{Error, Result};

/// Immutable per-submission configuration
///
/// Built once from the session's form state and passed through every stage;
/// no stage mutates it or reads ambient state.
pub struct ChatRequest {
    pub id: Uuid,
    pub query: String,
    pub language: Language,
    pub api_key: SecretString,
    pub speak: bool,
}

impl ChatRequest {
    /// Create a request for a typed or transcribed query
    #[must_use]
    pub fn new(query: impl Into<String>, language: Language, api_key: SecretString) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.into(),
            language,
            api_key,
            speak: false,
        }
    }

    /// Request speech synthesis of the reply
    #[must_use]
    pub const fn with_speech(mut self) -> Self {
        self.speak = true;
        self
    }
}

/// Pipeline stage that produced a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Normalization,
    Localization,
    Synthesis,
}

/// Non-fatal degradation recorded during a run
#[derive(Debug, Clone, Serialize)]
pub struct StageWarning {
    pub stage: Stage,
    pub message: String,
}

/// What a submission produced
#[derive(Debug)]
pub struct ChatOutcome {
    pub request_id: Uuid,
    /// Reply text in the display language (or pass-through on degradation)
    pub reply: String,
    /// Language detected for the input query
    pub detected: Detection,
    /// Degradations encountered; empty on a clean run
    pub warnings: Vec<StageWarning>,
    /// Synthesized reply audio (MP3), present only when requested and successful
    pub audio: Option<Vec<u8>>,
}

/// Sequences the adapters for one submission at a time
///
/// Translation and synthesis are optional: without a translator the
/// pipeline falls back to script-based detection and pass-through text,
/// and without a synthesizer voice output degrades to text-only.
pub struct Pipeline {
    translator: Option<Arc<dyn Translator>>,
    generator: Arc<dyn Generator>,
    synthesizer: Option<Arc<dyn Synthesizer>>,
}

impl Pipeline {
    /// Create a pipeline over the given adapters
    #[must_use]
    pub fn new(
        translator: Option<Arc<dyn Translator>>,
        generator: Arc<dyn Generator>,
        synthesizer: Option<Arc<dyn Synthesizer>>,
    ) -> Self {
        Self {
            translator,
            generator,
            synthesizer,
        }
    }

    /// Whether speech synthesis is available
    #[must_use]
    pub const fn can_speak(&self) -> bool {
        self.synthesizer.is_some()
    }

    /// Whether a translation backend is configured
    #[must_use]
    pub const fn can_translate(&self) -> bool {
        self.translator.is_some()
    }

    /// Run the full pipeline for one request
    ///
    /// # Errors
    ///
    /// Returns error when the query is empty or generation fails; every
    /// other stage degrades into a warning on the outcome.
    pub async fn run(&self, request: &ChatRequest) -> Result<ChatOutcome> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }

        let mut warnings = Vec::new();

        // Detect, then normalize to the working language
        let (detected, normalized) = self.normalize(query, request, &mut warnings).await;

        // Generate; failure aborts the remaining stages for this request
        let generated = self
            .generator
            .generate(&normalized, request.api_key.expose_secret())
            .await?;

        // Localize back to the display language
        let reply = self
            .localize(generated, request.language, &mut warnings)
            .await;

        // Synthesize if asked; failure degrades to text-only
        let audio = if request.speak {
            self.synthesize(&reply, request.language, &mut warnings).await
        } else {
            None
        };

        tracing::info!(
            request_id = %request.id,
            detected = detected.code(),
            language = request.language.code(),
            warnings = warnings.len(),
            audio = audio.is_some(),
            "pipeline complete"
        );

        Ok(ChatOutcome {
            request_id: request.id,
            reply,
            detected,
            warnings,
            audio,
        })
    }

    /// Detect the query language and translate it to the working language.
    ///
    /// Never fails: on any translator error the original text passes through
    /// with an unknown detection marker and a recorded warning.
    async fn normalize(
        &self,
        query: &str,
        request: &ChatRequest,
        warnings: &mut Vec<StageWarning>,
    ) -> (Detection, String) {
        let Some(translator) = &self.translator else {
            // No translation service: script detection, pass-through text
            let detected = detect_script(query, request.language);
            if detected != Detection::Known(WORKING_LANGUAGE) {
                warnings.push(StageWarning {
                    stage: Stage::Normalization,
                    message: "translation not configured, query passed through".to_string(),
                });
            }
            return (detected, query.to_string());
        };

        let detected = match translator.detect(query).await {
            Ok(detection) => detection,
            Err(e) => {
                tracing::warn!(request_id = %request.id, error = %e, "language detection failed");
                warnings.push(StageWarning {
                    stage: Stage::Normalization,
                    message: format!("language detection unavailable: {e}"),
                });
                return (Detection::Unknown, query.to_string());
            }
        };

        // Already in the working language (or undetermined): no translation
        let Detection::Known(source) = detected else {
            return (detected, query.to_string());
        };
        if source == WORKING_LANGUAGE {
            return (detected, query.to_string());
        }

        match translator.translate(query, WORKING_LANGUAGE).await {
            Ok(translation) => (detected, translation.text),
            Err(e) => {
                tracing::warn!(request_id = %request.id, error = %e, "normalization failed");
                warnings.push(StageWarning {
                    stage: Stage::Normalization,
                    message: format!("query passed through untranslated: {e}"),
                });
                (detected, query.to_string())
            }
        }
    }

    /// Translate the generated reply into the display language.
    ///
    /// A no-op when the display language is the working language; degrades
    /// to the untranslated reply on failure.
    async fn localize(
        &self,
        generated: String,
        language: Language,
        warnings: &mut Vec<StageWarning>,
    ) -> String {
        if language == WORKING_LANGUAGE {
            return generated;
        }

        let Some(translator) = &self.translator else {
            warnings.push(StageWarning {
                stage: Stage::Localization,
                message: format!(
                    "translation not configured, reply shown in {}",
                    WORKING_LANGUAGE.display_name()
                ),
            });
            return generated;
        };

        match translator.translate(&generated, language).await {
            Ok(translation) => translation.text,
            Err(e) => {
                tracing::warn!(error = %e, language = language.code(), "localization failed");
                warnings.push(StageWarning {
                    stage: Stage::Localization,
                    message: format!("reply shown in {}: {e}", WORKING_LANGUAGE.display_name()),
                });
                generated
            }
        }
    }

    /// Synthesize the reply; degrades to text-only on failure
    async fn synthesize(
        &self,
        reply: &str,
        language: Language,
        warnings: &mut Vec<StageWarning>,
    ) -> Option<Vec<u8>> {
        let Some(synthesizer) = &self.synthesizer else {
            warnings.push(StageWarning {
                stage: Stage::Synthesis,
                message: "speech synthesis is not configured".to_string(),
            });
            return None;
        };

        match synthesizer.synthesize(reply, language).await {
            Ok(audio) => Some(audio),
            Err(e) => {
                tracing::warn!(error = %e, "synthesis failed, returning text only");
                warnings.push(StageWarning {
                    stage: Stage::Synthesis,
                    message: format!("no audio for this reply: {e}"),
                });
                None
            }
        }
    }
}

//! Language detection and translation adapter
//!
//! Speaks the Google Translate v2 REST surface or a self-hosted
//! LibreTranslate instance. Failure policy (pass-through with an unknown
//! language marker) is applied by the pipeline, not here.

use async_trait::async_trait;

use crate::language::{Detection, Language};
use crate::{Error, Result};

/// Detected source language paired with translated text
#[derive(Debug, Clone)]
pub struct Translation {
    pub detected: Detection,
    pub text: String,
}

/// Boundary to the external translation service
#[async_trait]
pub trait Translator: Send + Sync {
    /// Detect the language of `text`
    async fn detect(&self, text: &str) -> Result<Detection>;

    /// Translate `text` into `target`, reporting the detected source language
    async fn translate(&self, text: &str, target: Language) -> Result<Translation>;
}

/// Response envelope from Google Translate v2
#[derive(serde::Deserialize)]
struct GoogleEnvelope<T> {
    data: T,
}

#[derive(serde::Deserialize)]
struct GoogleTranslations {
    translations: Vec<GoogleTranslation>,
}

#[derive(serde::Deserialize)]
struct GoogleTranslation {
    #[serde(rename = "translatedText")]
    translated_text: String,
    #[serde(rename = "detectedSourceLanguage")]
    detected_source_language: Option<String>,
}

#[derive(serde::Deserialize)]
struct GoogleDetections {
    detections: Vec<Vec<GoogleDetection>>,
}

#[derive(serde::Deserialize)]
struct GoogleDetection {
    language: String,
}

/// Response from LibreTranslate /translate
#[derive(serde::Deserialize)]
struct LibreTranslation {
    #[serde(rename = "translatedText")]
    translated_text: String,
    #[serde(rename = "detectedLanguage")]
    detected_language: Option<LibreDetection>,
}

/// Response element from LibreTranslate /detect
#[derive(serde::Deserialize)]
struct LibreDetection {
    language: String,
}

/// Translation provider backend
#[derive(Clone, Copy, Debug)]
enum TranslateProvider {
    GoogleV2,
    Libre,
}

/// Translates text between the supported languages
pub struct TranslationClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    provider: TranslateProvider,
}

impl TranslationClient {
    /// Create a client for the Google Translate v2 API
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new_google(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "Google API key required for translation".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key: Some(api_key),
            base_url: "https://translation.googleapis.com/language/translate/v2".to_string(),
            provider: TranslateProvider::GoogleV2,
        })
    }

    /// Create a client for a LibreTranslate instance
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is empty
    pub fn new_libre(base_url: String, api_key: Option<String>) -> Result<Self> {
        if base_url.is_empty() {
            return Err(Error::Config(
                "LibreTranslate URL required for translation".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            provider: TranslateProvider::Libre,
        })
    }

    async fn detect_google(&self, text: &str) -> Result<Detection> {
        #[derive(serde::Serialize)]
        struct DetectRequest<'a> {
            q: &'a str,
        }

        let key = self.api_key.as_deref().unwrap_or_default();
        let url = format!("{}/detect?key={}", self.base_url, urlencoding::encode(key));

        let response = self
            .client
            .post(&url)
            .json(&DetectRequest { q: text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Translation(format!(
                "detect API error {status}: {body}"
            )));
        }

        let result: GoogleEnvelope<GoogleDetections> = response.json().await?;
        let code = result
            .data
            .detections
            .first()
            .and_then(|group| group.first())
            .map(|d| d.language.clone())
            .unwrap_or_default();

        Ok(code_to_detection(&code))
    }

    async fn translate_google(&self, text: &str, target: Language) -> Result<Translation> {
        #[derive(serde::Serialize)]
        struct TranslateRequest<'a> {
            q: &'a str,
            target: &'a str,
            format: &'a str,
        }

        let key = self.api_key.as_deref().unwrap_or_default();
        let url = format!("{}?key={}", self.base_url, urlencoding::encode(key));

        let response = self
            .client
            .post(&url)
            .json(&TranslateRequest {
                q: text,
                target: target.code(),
                format: "text",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Translation(format!(
                "translate API error {status}: {body}"
            )));
        }

        let result: GoogleEnvelope<GoogleTranslations> = response.json().await?;
        let translation = result
            .data
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| Error::Translation("empty translation response".to_string()))?;

        let detected = translation
            .detected_source_language
            .as_deref()
            .map_or(Detection::Unknown, code_to_detection);

        tracing::debug!(
            detected = detected.code(),
            target = target.code(),
            "translation complete"
        );

        Ok(Translation {
            detected,
            text: translation.translated_text,
        })
    }

    async fn detect_libre(&self, text: &str) -> Result<Detection> {
        #[derive(serde::Serialize)]
        struct DetectRequest<'a> {
            q: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            api_key: Option<&'a str>,
        }

        let url = format!("{}/detect", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&DetectRequest {
                q: text,
                api_key: self.api_key.as_deref(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Translation(format!(
                "detect API error {status}: {body}"
            )));
        }

        let detections: Vec<LibreDetection> = response.json().await?;
        let code = detections
            .first()
            .map(|d| d.language.clone())
            .unwrap_or_default();

        Ok(code_to_detection(&code))
    }

    async fn translate_libre(&self, text: &str, target: Language) -> Result<Translation> {
        #[derive(serde::Serialize)]
        struct TranslateRequest<'a> {
            q: &'a str,
            source: &'a str,
            target: &'a str,
            format: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            api_key: Option<&'a str>,
        }

        let url = format!("{}/translate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&TranslateRequest {
                q: text,
                source: "auto",
                target: target.code(),
                format: "text",
                api_key: self.api_key.as_deref(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Translation(format!(
                "translate API error {status}: {body}"
            )));
        }

        let result: LibreTranslation = response.json().await?;
        let detected = result
            .detected_language
            .as_ref()
            .map_or(Detection::Unknown, |d| code_to_detection(&d.language));

        Ok(Translation {
            detected,
            text: result.translated_text,
        })
    }
}

#[async_trait]
impl Translator for TranslationClient {
    async fn detect(&self, text: &str) -> Result<Detection> {
        match self.provider {
            TranslateProvider::GoogleV2 => self.detect_google(text).await,
            TranslateProvider::Libre => self.detect_libre(text).await,
        }
    }

    async fn translate(&self, text: &str, target: Language) -> Result<Translation> {
        match self.provider {
            TranslateProvider::GoogleV2 => self.translate_google(text, target).await,
            TranslateProvider::Libre => self.translate_libre(text, target).await,
        }
    }
}

/// Map a wire language code to a supported detection
fn code_to_detection(code: &str) -> Detection {
    Language::parse(code).map_or(Detection::Unknown, Detection::Known)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_codes_map_to_unknown() {
        assert_eq!(code_to_detection("ja"), Detection::Unknown);
        assert_eq!(code_to_detection(""), Detection::Unknown);
        assert_eq!(code_to_detection("fr"), Detection::Known(Language::French));
    }

    #[test]
    fn google_client_requires_key() {
        assert!(TranslationClient::new_google(String::new()).is_err());
        assert!(TranslationClient::new_google("k".to_string()).is_ok());
    }

    #[test]
    fn libre_client_trims_trailing_slash() {
        let client =
            TranslationClient::new_libre("http://localhost:5000/".to_string(), None).unwrap();
        assert_eq!(client.base_url, "http://localhost:5000");
    }
}

//! Shared test utilities: mock pipeline adapters
#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use polyglot_gateway::{
    Detection, Error, Language, Result, Translation, Translator, WORKING_LANGUAGE,
};
use polyglot_gateway::generate::Generator;
use polyglot_gateway::voice::Synthesizer;

/// Translator that reports a fixed detection and tags translated text
/// with the target language code, so tests can see what was translated
pub struct MockTranslator {
    pub detection: Detection,
    /// Fail every call
    pub fail: bool,
    /// Fail only localization (targets other than the working language)
    pub fail_localization: bool,
    pub translate_calls: AtomicUsize,
}

impl MockTranslator {
    pub fn detecting(language: Language) -> Self {
        Self {
            detection: Detection::Known(language),
            fail: false,
            fail_localization: false,
            translate_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            detection: Detection::Unknown,
            fail: true,
            fail_localization: false,
            translate_calls: AtomicUsize::new(0),
        }
    }

    pub fn translate_count(&self) -> usize {
        self.translate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn detect(&self, _text: &str) -> Result<Detection> {
        if self.fail {
            return Err(Error::Translation("detect unavailable".to_string()));
        }
        Ok(self.detection)
    }

    async fn translate(&self, text: &str, target: Language) -> Result<Translation> {
        self.translate_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail || (self.fail_localization && target != WORKING_LANGUAGE) {
            return Err(Error::Translation("translate unavailable".to_string()));
        }
        Ok(Translation {
            detected: self.detection,
            text: format!("{text} [{}]", target.code()),
        })
    }
}

/// Generator returning a canned reply and recording its prompts
pub struct MockGenerator {
    pub reply: String,
    pub error: Option<fn() -> Error>,
    pub calls: AtomicUsize,
    pub last_prompt: Mutex<Option<String>>,
}

impl MockGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            error: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing(error: fn() -> Error) -> Self {
        Self {
            reply: String::new(),
            error: Some(error),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, prompt: &str, _api_key: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        match self.error {
            Some(make) => Err(make()),
            None => Ok(self.reply.clone()),
        }
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Synthesizer returning fixed bytes, or failing
pub struct MockSynthesizer {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl MockSynthesizer {
    pub fn working() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(&self, _text: &str, _language: Language) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Tts("synthesis unavailable".to_string()));
        }
        Ok(vec![0xff, 0xfb, 0x90, 0x00])
    }
}

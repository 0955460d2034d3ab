//! Voice input and output
//!
//! Microphone capture and speaker playback use the platform audio API;
//! transcription and synthesis are delegated to external services.

mod artifact;
mod capture;
mod playback;
mod stt;
mod tts;

pub use artifact::AudioArtifact;
pub use capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
pub use playback::AudioPlayback;
pub use stt::SpeechToText;
pub use tts::{Synthesizer, TextToSpeech};

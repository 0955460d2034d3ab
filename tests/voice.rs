//! Voice component tests
//!
//! Tests audio encoding without requiring audio hardware

use std::io::Cursor;

use polyglot_gateway::voice::{AudioArtifact, SAMPLE_RATE, samples_to_wav};

mod common;

/// Generate sine wave audio samples
fn generate_sine_samples(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

#[test]
fn test_samples_to_wav() {
    let samples = generate_sine_samples(440.0, 0.1, 0.5);
    let wav_data = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    // Check WAV header magic
    assert_eq!(&wav_data[0..4], b"RIFF");
    assert_eq!(&wav_data[8..12], b"WAVE");

    // WAV should have reasonable size
    assert!(wav_data.len() > 44); // WAV header is 44 bytes
}

#[test]
fn test_wav_roundtrip() {
    let original_samples: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav_data = samples_to_wav(&original_samples, SAMPLE_RATE).unwrap();

    // Read WAV back
    let cursor = Cursor::new(wav_data);
    let mut reader = hound::WavReader::new(cursor).unwrap();

    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);

    // Read samples back
    let read_samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read_samples.len(), original_samples.len());
}

#[test]
fn test_wav_clamps_out_of_range_samples() {
    let samples = vec![2.0_f32, -2.0];
    let wav_data = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    let cursor = Cursor::new(wav_data);
    let mut reader = hound::WavReader::new(cursor).unwrap();
    let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();

    assert_eq!(read[0], 32767);
    assert_eq!(read[1], -32768);
}

#[test]
fn test_artifact_lifecycle() {
    let samples = generate_sine_samples(440.0, 0.05, 0.5);
    let wav_data = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    // Any byte payload stages fine; the artifact doesn't parse it
    let artifact = AudioArtifact::from_mp3(&wav_data).unwrap();
    let path = artifact.path().to_path_buf();

    assert!(path.exists());
    assert_eq!(artifact.len(), wav_data.len());
    assert_eq!(std::fs::read(&path).unwrap(), wav_data);

    drop(artifact);
    assert!(!path.exists());
}

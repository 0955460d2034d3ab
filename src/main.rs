use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use polyglot_gateway::api::ApiServer;
use polyglot_gateway::pipeline::{ChatRequest, Pipeline};
use polyglot_gateway::voice::{AudioArtifact, AudioCapture, AudioPlayback, samples_to_wav};
use polyglot_gateway::{Config, Language};

/// Polyglot - Multilingual voice and text chatbot gateway
#[derive(Parser)]
#[command(name = "polyglot", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "POLYGLOT_PORT", default_value = "8990")]
    port: u16,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable voice features (for headless servers without audio hardware)
    #[arg(long, env = "POLYGLOT_DISABLE_VOICE")]
    disable_voice: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the gateway HTTP server (the default)
    Serve,
    /// Ask a single question from the command line
    Ask {
        /// The query; omit with --voice to record it from the microphone
        query: Option<String>,

        /// Display language (code or name, e.g. "fr" or "French")
        #[arg(short, long)]
        language: Option<String>,

        /// Generation API key (falls back to the configured one)
        #[arg(long, env = "POLYGLOT_API_KEY")]
        api_key: Option<String>,

        /// Record the query from the microphone instead of typing it
        #[arg(long)]
        voice: bool,

        /// Recording window in seconds when using --voice
        #[arg(long, default_value = "5")]
        record_secs: u64,

        /// Speak the reply through the speakers
        #[arg(short, long)]
        speak: bool,
    },
    /// List the supported display languages
    Languages,
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,polyglot_gateway=info",
        1 => "info,polyglot_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Serve => serve(cli.port, cli.disable_voice).await,
            Command::Ask {
                query,
                language,
                api_key,
                voice,
                record_secs,
                speak,
            } => {
                ask(
                    query,
                    language.as_deref(),
                    api_key,
                    voice,
                    record_secs,
                    speak,
                    cli.disable_voice,
                )
                .await
            }
            Command::Languages => list_languages(),
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker().await,
            Command::TestTts { text } => test_tts(&text).await,
        };
    }

    serve(cli.port, cli.disable_voice).await
}

/// Run the HTTP server
async fn serve(port: u16, disable_voice: bool) -> anyhow::Result<()> {
    tracing::info!(port, disable_voice, "starting polyglot gateway");

    let mut config = Config::load_with_options(disable_voice)?;
    config.server.port = port;

    let server = ApiServer::from_config(&config);

    tracing::info!(
        model = %config.generation.model,
        language = config.default_language.code(),
        "polyglot gateway ready"
    );

    server.run().await?;
    Ok(())
}

/// One-shot query through the full pipeline
async fn ask(
    query: Option<String>,
    language: Option<&str>,
    api_key: Option<String>,
    voice: bool,
    record_secs: u64,
    speak: bool,
    disable_voice: bool,
) -> anyhow::Result<()> {
    let config = Config::load_with_options(disable_voice)?;

    let language = match language {
        Some(value) => Language::parse(value)
            .ok_or_else(|| anyhow::anyhow!("unknown language: {value}"))?,
        None => config.default_language,
    };

    let query = match query {
        Some(q) => q,
        None if voice => record_query(&config, language, record_secs).await?,
        None => anyhow::bail!("pass a query, or --voice to record one"),
    };

    let api_key = api_key
        .or_else(|| config.generation_key().map(ToString::to_string))
        .ok_or_else(|| anyhow::anyhow!("no generation API key configured"))?;

    let pipeline = Pipeline::new(
        config.translator(),
        Arc::new(config.generator()),
        config.synthesizer(),
    );

    let mut request = ChatRequest::new(query, language, SecretString::from(api_key));
    if speak {
        request = request.with_speech();
    }

    let outcome = pipeline.run(&request).await?;

    for warning in &outcome.warnings {
        eprintln!("warning: {}", warning.message);
    }
    println!("{}", outcome.reply);

    if let Some(audio) = outcome.audio {
        let artifact = AudioArtifact::from_mp3(&audio)?;
        let mut playback = AudioPlayback::new()?;
        playback.play_file(artifact.path()).await?;
    }

    Ok(())
}

/// Record a spoken query and transcribe it
async fn record_query(
    config: &Config,
    language: Language,
    record_secs: u64,
) -> anyhow::Result<String> {
    let transcriber = config
        .transcriber()
        .ok_or_else(|| anyhow::anyhow!("voice input needs an STT key (OpenAI or Deepgram)"))?;

    println!("Recording for {record_secs} seconds... speak now.");

    let mut capture = AudioCapture::new()?;
    let samples = capture.record(Duration::from_secs(record_secs)).await?;
    let wav = samples_to_wav(&samples, capture.sample_rate())?;

    let transcript = transcriber.transcribe(&wav, Some(language)).await?;
    println!("> {transcript}");

    Ok(transcript)
}

/// Print the supported display languages
fn list_languages() -> anyhow::Result<()> {
    for lang in Language::all() {
        println!("{:4} {}", lang.code(), lang.display_name());
    }
    Ok(())
}

/// Test microphone input
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    capture.start()?;

    let sample_rate = capture.sample_rate();
    println!("Sample rate: {sample_rate} Hz");
    println!("---");

    for i in 0..duration {
        let samples = capture.record(Duration::from_secs(1)).await?;
        let energy = calculate_rms(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "#".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );
    }

    capture.stop();

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("If RMS stayed near 0, check:");
    println!("  1. Is your mic plugged in?");
    println!("  2. Run: pactl info | grep 'Default Source'");
    println!("  3. Run: arecord -l (to list devices)");

    Ok(())
}

/// Calculate RMS energy
#[allow(clippy::cast_precision_loss)]
fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Test speaker output with a sine wave
async fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let mut playback = AudioPlayback::new()?;

    // Generate 2 seconds of 440Hz sine wave at 24kHz sample rate
    let sample_rate = 24000_i32;
    let frequency = 440.0_f32;
    let duration_secs = 2.0_f32;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let num_samples = (sample_rate as f32 * duration_secs) as usize;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3 // 30% volume
        })
        .collect();

    println!("Playing {} samples at {} Hz...", samples.len(), sample_rate);

    playback.play(samples).await?;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");

    Ok(())
}

/// Test TTS output through the configured synthesizer
async fn test_tts(text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let config = Config::load()?;
    let synthesizer = config
        .synthesizer()
        .ok_or_else(|| anyhow::anyhow!("TTS needs an OpenAI or ElevenLabs key"))?;

    println!("Synthesizing speech...");
    let mp3_data = synthesizer
        .synthesize(text, config.default_language)
        .await?;
    println!("Got {} bytes of audio data", mp3_data.len());

    let artifact = AudioArtifact::from_mp3(&mp3_data)?;

    println!("Playing audio...");
    let mut playback = AudioPlayback::new()?;
    playback.play_file(artifact.path()).await?;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}

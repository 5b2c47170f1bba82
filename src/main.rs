use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use intervox::config::{self, ApiConfig, Config, InterviewSettings, VoiceConfig};
use intervox::repl::InterviewRepl;
use intervox::voice::{AudioCapture, AudioPlayback, SpeechSynthesizer, TextToSpeech};

/// Job description used when none is supplied
const DEFAULT_JOB_DESCRIPTION: &str = "\
• Design, develop, and deliver technical solutions rapidly, end to end, and across the full stack.
• Work collaboratively with other engineers, QA, Product Managers, UX, and other cross-functional teams as needed.
• Uphold and maintain a high bar for code quality and robustness of production systems.";

/// Intervox - voice-driven mock interview practice
#[derive(Parser)]
#[command(name = "intervox", version, about)]
struct Cli {
    /// Company the simulated interviewer represents
    #[arg(long, env = "INTERVOX_COMPANY", default_value = "Google")]
    company: String,

    /// Role being interviewed for
    #[arg(long, env = "INTERVOX_ROLE", default_value = "Software Engineer")]
    role: String,

    /// Job description text
    #[arg(long, env = "INTERVOX_JOB_DESCRIPTION", default_value = DEFAULT_JOB_DESCRIPTION)]
    job_description: String,

    /// Read the job description from a file instead
    #[arg(long, value_name = "PATH")]
    job_description_file: Option<PathBuf>,

    /// Path to the candidate's resume PDF
    #[arg(long, env = "INTERVOX_RESUME", default_value = "resume.pdf")]
    resume: PathBuf,

    /// Chat completion model
    #[arg(long, env = "INTERVOX_CHAT_MODEL", default_value = config::DEFAULT_CHAT_MODEL)]
    chat_model: String,

    /// Transcription model
    #[arg(long, env = "INTERVOX_STT_MODEL", default_value = config::DEFAULT_STT_MODEL)]
    stt_model: String,

    /// Synthesis model
    #[arg(long, env = "INTERVOX_TTS_MODEL", default_value = config::DEFAULT_TTS_MODEL)]
    tts_model: String,

    /// Synthesis voice
    #[arg(long, env = "INTERVOX_TTS_VOICE", default_value = config::DEFAULT_TTS_VOICE)]
    tts_voice: String,

    /// Synthesis speed multiplier (0.25 to 4.0)
    #[arg(long, env = "INTERVOX_TTS_SPEED", default_value = "1.0")]
    tts_speed: f64,

    /// Seconds allowed for each API request
    #[arg(long, env = "INTERVOX_REQUEST_TIMEOUT", default_value = "60")]
    request_timeout: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
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
        0 => "info,intervox=info",
        1 => "info,intervox=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Some(cmd) = &cli.command {
        match cmd {
            Command::TestMic { duration } => test_mic(*duration).await?,
            Command::TestSpeaker => test_speaker()?,
            Command::TestTts { text } => test_tts(&cli, text).await?,
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = build_config(&cli)?;
    tracing::debug!(
        company = %config.interview.company,
        role = %config.interview.role,
        "starting interview session"
    );

    println!(
        "\n# # # # # # # # # # # # # # # # # # # # # # # #\n\
         #  Welcome to your AI-powered interview partner!\n\
         # # # # # # # # # # # # # # # # # # # # # # # #\n"
    );

    let repl = InterviewRepl::new(&config)?;
    Ok(repl.run().await?)
}

/// Assemble runtime configuration from CLI arguments and the environment
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let job_description = match &cli.job_description_file {
        Some(path) => std::fs::read_to_string(path)?.trim().to_string(),
        None => cli.job_description.clone(),
    };

    let api = ApiConfig::from_env(Duration::from_secs(cli.request_timeout))?;

    Ok(Config {
        interview: InterviewSettings {
            company: cli.company.clone(),
            role: cli.role.clone(),
            job_description,
            resume_path: cli.resume.clone(),
        },
        voice: VoiceConfig {
            stt_model: cli.stt_model.clone(),
            tts_model: cli.tts_model.clone(),
            tts_voice: cli.tts_voice.clone(),
            tts_speed: cli.tts_speed,
        },
        chat_model: cli.chat_model.clone(),
        api,
        recordings_dir: config::default_recordings_dir(),
    })
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

/// Test microphone input by recording a short clip and measuring it
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new(config::default_recordings_dir());
    capture.start()?;

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;
        println!("[{:2}s] recording...", i + 1);
    }

    let path = capture.stop()?;

    let mut reader = hound::WavReader::open(&path)?;
    let samples: Vec<f32> = reader
        .samples::<i16>()
        .filter_map(std::result::Result::ok)
        .map(|s| f32::from(s) / 32768.0)
        .collect();

    let rms = calculate_rms(&samples);
    let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

    println!("\n---");
    println!("Captured {} samples to {}", samples.len(), path.display());
    println!("RMS: {rms:.4} | Peak: {peak:.4}");

    if rms < 0.001 {
        println!("\nRMS stayed near 0, check:");
        println!("  1. Is your mic plugged in?");
        println!("  2. Run: pactl info | grep 'Default Source'");
        println!("  3. Run: arecord -l (to list devices)");
    } else {
        println!("\nYour mic is working!");
    }

    Ok(())
}

/// Test speaker output with a sine wave
fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let playback = AudioPlayback::new()?;

    let sample_rate = 44100_f32;
    let frequency = 440.0_f32;
    let duration_secs = 2.0_f32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let num_samples = (sample_rate * duration_secs) as usize;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3
        })
        .collect();

    println!("Playing {} samples...", samples.len());
    playback.play_samples(samples)?;

    println!("\nIf you heard the tone, your speakers are working!");
    Ok(())
}

/// Test TTS output through the real synthesis client
async fn test_tts(cli: &Cli, text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let api = ApiConfig::from_env(Duration::from_secs(cli.request_timeout))?;
    let voice = VoiceConfig {
        stt_model: cli.stt_model.clone(),
        tts_model: cli.tts_model.clone(),
        tts_voice: cli.tts_voice.clone(),
        tts_speed: cli.tts_speed,
    };

    let tts = TextToSpeech::new(&api, &voice)?;

    println!("Synthesizing speech...");
    let mp3_data = tts.synthesize(text).await?;
    println!("Got {} bytes of audio data", mp3_data.len());

    println!("Playing audio...");
    let playback = AudioPlayback::new()?;
    playback.play_mp3(&mp3_data)?;

    println!("\nIf you heard the speech, TTS is working!");
    Ok(())
}

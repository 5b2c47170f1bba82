//! Configuration management for Intervox

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::{Error, Result};

/// Default chat completion model
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// Default transcription model
pub const DEFAULT_STT_MODEL: &str = "whisper-1";

/// Default synthesis model
pub const DEFAULT_TTS_MODEL: &str = "tts-1";

/// Default synthesis voice
pub const DEFAULT_TTS_VOICE: &str = "echo";

/// Intervox runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Interview scenario inputs
    pub interview: InterviewSettings,

    /// Voice model configuration
    pub voice: VoiceConfig,

    /// Chat completion model identifier
    pub chat_model: String,

    /// API endpoint configuration
    pub api: ApiConfig,

    /// Directory where recorded answers are written
    pub recordings_dir: PathBuf,
}

/// Interview scenario inputs
#[derive(Debug, Clone)]
pub struct InterviewSettings {
    /// Company the simulated interviewer represents
    pub company: String,

    /// Role the candidate is interviewing for
    pub role: String,

    /// Job description text
    pub job_description: String,

    /// Path to the candidate's resume PDF
    pub resume_path: PathBuf,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            stt_model: DEFAULT_STT_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            tts_voice: DEFAULT_TTS_VOICE.to_string(),
            tts_speed: 1.0,
        }
    }
}

/// API endpoint configuration shared by all clients
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bearer token for authentication
    pub api_key: SecretString,

    /// Base URL for the OpenAI-compatible API
    pub base_url: String,

    /// Deadline applied to every outbound request
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Build API configuration from the environment
    ///
    /// Reads `OPENAI_API_KEY` (required) and `INTERVOX_API_BASE` (optional,
    /// defaults to the public OpenAI endpoint).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `OPENAI_API_KEY` is not set
    pub fn from_env(request_timeout: Duration) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map(SecretString::from)
            .map_err(|_| Error::Config("OPENAI_API_KEY not set".to_string()))?;

        let base_url = std::env::var("INTERVOX_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        })
    }

    /// Build an HTTP client carrying the configured request deadline
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the client cannot be constructed
    pub fn http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?)
    }
}

/// Default directory for recorded answers
#[must_use]
pub fn default_recordings_dir() -> PathBuf {
    std::env::temp_dir().join("intervox")
}

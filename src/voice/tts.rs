//! Text-to-speech (TTS) client

use async_trait::async_trait;
use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};

use crate::config::{ApiConfig, VoiceConfig};
use crate::{Error, Result};

/// Synthesizes speech audio from text
#[async_trait]
pub trait SpeechSynthesizer {
    /// Synthesize `text` and return the audio bytes (MP3)
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// Synthesis client for an OpenAI-compatible `/audio/speech` endpoint
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    voice: String,
    speed: f64,
}

impl TextToSpeech {
    /// Create a new TTS client from the voice configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed
    pub fn new(api: &ApiConfig, voice: &VoiceConfig) -> Result<Self> {
        Ok(Self {
            client: api.http_client()?,
            api_key: api.api_key.clone(),
            base_url: api.base_url.clone(),
            model: voice.tts_model.clone(),
            voice: voice.tts_voice.clone(),
            speed: voice.tts_speed,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for TextToSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct SpeechRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            response_format: &'a str,
            speed: f64,
        }

        let request = SpeechRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            response_format: "mp3",
            speed: self.speed,
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "synthesis request failed");
                Error::transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "synthesis API error");
            return Err(Error::Tts(format!("synthesis API error {status}: {body}")));
        }

        let mut stream = response.bytes_stream();
        let mut audio = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(Error::transport)?;
            audio.extend_from_slice(&chunk);
        }

        tracing::debug!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio)
    }
}

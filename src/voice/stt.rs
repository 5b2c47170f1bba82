//! Speech-to-text (STT) client

use std::path::Path;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::ApiConfig;
use crate::{Error, Result};

/// Transcribes a recorded audio artifact to text
#[async_trait]
pub trait Transcriber {
    /// Transcribe the recording at `recording` and return the transcript
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or the request fails
    async fn transcribe(&self, recording: &Path) -> Result<String>;
}

/// Transcription client for an OpenAI-compatible `/audio/transcriptions` endpoint
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl SpeechToText {
    /// Create a new STT client
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed
    pub fn new(api: &ApiConfig, model: String) -> Result<Self> {
        Ok(Self {
            client: api.http_client()?,
            api_key: api.api_key.clone(),
            base_url: api.base_url.clone(),
            model,
        })
    }
}

#[async_trait]
impl Transcriber for SpeechToText {
    async fn transcribe(&self, recording: &Path) -> Result<String> {
        let audio = tokio::fs::read(recording).await?;

        // The service rejects uploads over 25 MB; no pre-check or chunking
        // here, oversized files surface as a request failure.
        tracing::debug!(
            audio_bytes = audio.len(),
            path = %recording.display(),
            "starting transcription"
        );

        let file_name = recording
            .file_name()
            .map_or_else(|| "audio.wav".to_string(), |n| n.to_string_lossy().into_owned());

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio)
                    .file_name(file_name)
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone())
            .text("response_format", "text");

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "transcription request failed");
                Error::transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "transcription API error");
            return Err(Error::Stt(format!(
                "transcription API error {status}: {body}"
            )));
        }

        // response_format=text yields the transcript as the plain body
        let text = response.text().await.map_err(Error::transport)?;
        let text = text.trim().to_string();

        tracing::info!(transcript = %text, "transcription complete");
        Ok(text)
    }
}

//! Error types for Intervox

use thiserror::Error;

/// Result type alias for Intervox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Intervox
///
/// Variants distinguish transport failures (`Stt`, `Chat`, `Tts`), local
/// failures (`Audio`, `Io`), validation failures (`Config`), and expired
/// requests (`Timeout`), so callers can tell the classes apart.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio device or encoding error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Chat completion error
    #[error("chat error: {0}")]
    Chat(String),

    /// External request exceeded its deadline
    #[error("request timed out: {0}")]
    Timeout(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is a request timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Classify a transport failure, surfacing deadline expiry as `Timeout`
    pub(crate) fn transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else {
            Self::Http(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_distinguishable_from_other_failures() {
        assert!(Error::Timeout("deadline elapsed".to_string()).is_timeout());
        assert!(!Error::Stt("upstream 500".to_string()).is_timeout());
        assert!(!Error::Chat("upstream 500".to_string()).is_timeout());
        assert!(!Error::Config("missing key".to_string()).is_timeout());
    }
}

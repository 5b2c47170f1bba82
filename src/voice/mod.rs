//! Voice processing module
//!
//! Audio capture into timestamped WAV files, transcription and synthesis
//! clients, and speaker playback.

mod capture;
mod playback;
mod stt;
mod tts;

pub use capture::{AudioCapture, SAMPLE_RATE, WavSink};
pub use playback::{AudioPlayback, spawn_playback};
pub use stt::{SpeechToText, Transcriber};
pub use tts::{SpeechSynthesizer, TextToSpeech};

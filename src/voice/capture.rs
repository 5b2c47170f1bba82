//! Audio capture from microphone

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream, StreamConfig};

use crate::{Error, Result};

/// Sample rate for audio capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// Convert an f32 sample in [-1.0, 1.0] to i16
#[allow(clippy::cast_possible_truncation)]
fn sample_to_i16(sample: f32) -> i16 {
    (sample * 32767.0).clamp(-32768.0, 32767.0) as i16
}

/// An open WAV file receiving captured frames
///
/// Mono, 16 kHz, 16-bit: the format the capture stream produces and the
/// transcription service accepts without resampling.
pub struct WavSink {
    path: PathBuf,
    writer: hound::WavWriter<BufWriter<File>>,
}

impl WavSink {
    /// Open a timestamp-named WAV file under `dir`
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created
    pub fn create(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;

        let timestamp = Utc::now().format("%Y%m%dT%H%M%S%.3f");
        let path = dir.join(format!("recording-{timestamp}.wav"));

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let writer =
            hound::WavWriter::create(&path, spec).map_err(|e| Error::Audio(e.to_string()))?;

        Ok(Self { path, writer })
    }

    /// Path of the file being written
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a block of f32 frames
    ///
    /// # Errors
    ///
    /// Returns error if a sample cannot be written
    pub fn write_frames(&mut self, frames: &[f32]) -> Result<()> {
        for &frame in frames {
            self.writer
                .write_sample(sample_to_i16(frame))
                .map_err(|e| Error::Audio(e.to_string()))?;
        }
        Ok(())
    }

    /// Finalize the WAV header and flush, returning the file path
    ///
    /// # Errors
    ///
    /// Returns error if the header cannot be written
    pub fn finalize(self) -> Result<PathBuf> {
        self.writer
            .finalize()
            .map_err(|e| Error::Audio(e.to_string()))?;
        Ok(self.path)
    }
}

type SharedSink = Arc<Mutex<Option<WavSink>>>;

/// One in-progress recording: the live stream plus the file it feeds
struct RecordingSession {
    path: PathBuf,
    sink: SharedSink,
    stream: Option<Stream>,
}

/// Records microphone audio into timestamped WAV files, one session at a time
pub struct AudioCapture {
    recordings_dir: PathBuf,
    session: Option<RecordingSession>,
}

impl AudioCapture {
    /// Create a capture toggle writing into `recordings_dir`
    #[must_use]
    pub const fn new(recordings_dir: PathBuf) -> Self {
        Self {
            recordings_dir,
            session: None,
        }
    }

    /// Whether a recording session is active
    #[must_use]
    pub const fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Start a new recording session
    ///
    /// Opens a timestamped WAV file and streams incoming frames into it as
    /// they arrive. Exactly one session may be active: a second `start` is
    /// rejected and the active session is left untouched.
    ///
    /// # Errors
    ///
    /// Returns error if a session is already active or the device or file
    /// cannot be opened
    pub fn start(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Err(Error::Audio("recording already in progress".to_string()));
        }

        let sink = WavSink::create(&self.recordings_dir)?;
        let path = sink.path().to_path_buf();
        let sink: SharedSink = Arc::new(Mutex::new(Some(sink)));

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device available".to_string()))?;

        let supported_config = device
            .supported_input_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
            })
            .ok_or_else(|| Error::Audio("no suitable audio config found".to_string()))?;

        let config: StreamConfig = supported_config
            .with_sample_rate(SampleRate(SAMPLE_RATE))
            .config();

        let writer = Arc::clone(&sink);
        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut guard) = writer.lock() {
                        if let Some(sink) = guard.as_mut() {
                            if let Err(e) = sink.write_frames(data) {
                                tracing::error!(error = %e, "failed to write captured frames");
                            }
                        }
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio capture error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            path = %path.display(),
            sample_rate = SAMPLE_RATE,
            "recording started"
        );

        self.session = Some(RecordingSession {
            path,
            sink,
            stream: Some(stream),
        });
        Ok(())
    }

    /// Stop the active recording session
    ///
    /// Ceases capture, finalizes the WAV file, and returns its path for
    /// downstream processing.
    ///
    /// # Errors
    ///
    /// Returns error if no session is active or the file cannot be finalized
    pub fn stop(&mut self) -> Result<PathBuf> {
        let session = self
            .session
            .take()
            .ok_or_else(|| Error::Audio("no recording in progress".to_string()))?;

        if let Some(stream) = session.stream {
            drop(stream);
        }

        let sink = session
            .sink
            .lock()
            .map_err(|_| Error::Audio("capture writer poisoned".to_string()))?
            .take();

        match sink {
            Some(sink) => sink.finalize(),
            None => Ok(session.path),
        }
    }
}

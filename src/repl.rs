//! Keypress-driven interview loop
//!
//! Enter toggles between waiting and recording; stopping a recording runs
//! the full answer pipeline before the next keypress is accepted. Any other
//! key while idle quits.

use std::path::Path;
use std::process::ExitCode;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;

use crate::chat::ChatClient;
use crate::config::Config;
use crate::interview::{Interview, InterviewContext};
use crate::resume;
use crate::voice::{AudioCapture, SpeechToText, TextToSpeech, spawn_playback};
use crate::{Error, Result};

/// Interaction loop state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoopState {
    /// Waiting for the candidate to start an answer
    Idle,
    /// Microphone capture in progress
    Recording,
}

/// What the loop does in response to one keypress
#[derive(Debug, PartialEq, Eq)]
enum Action {
    StartRecording,
    StopAndProcess,
    Quit,
    Interrupt,
    Ignore,
}

/// Map a keypress in a given state to a loop action
fn dispatch(state: LoopState, key: &KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Interrupt;
    }

    match (state, key.code) {
        (LoopState::Idle, KeyCode::Enter) => Action::StartRecording,
        (LoopState::Recording, KeyCode::Enter) => Action::StopAndProcess,
        (LoopState::Idle, _) => Action::Quit,
        // Accidental keystrokes must not destroy an in-progress answer
        (LoopState::Recording, _) => Action::Ignore,
    }
}

/// Restores the terminal's line discipline when dropped
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// Wait for a single keypress, leaving raw mode before returning
///
/// Raw mode is held only while waiting so all prompt output keeps normal
/// line discipline.
async fn read_key() -> Result<KeyEvent> {
    let _guard = RawModeGuard::enable()?;
    let mut events = EventStream::new();

    loop {
        match events.next().await {
            Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => return Ok(key),
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(e.into()),
            None => {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "terminal input stream closed",
                )));
            }
        }
    }
}

/// The interactive interview session
pub struct InterviewRepl {
    interview: Interview,
    capture: AudioCapture,
    stt: SpeechToText,
    chat: ChatClient,
    tts: TextToSpeech,
}

impl InterviewRepl {
    /// Build the loop from configuration, loading the resume once
    ///
    /// # Errors
    ///
    /// Returns error if an API client cannot be constructed
    pub fn new(config: &Config) -> Result<Self> {
        let context = InterviewContext {
            company: config.interview.company.clone(),
            role: config.interview.role.clone(),
            job_description: config.interview.job_description.clone(),
            resume_text: resume::extract_text(&config.interview.resume_path),
        };

        Ok(Self {
            interview: Interview::new(context),
            capture: AudioCapture::new(config.recordings_dir.clone()),
            stt: SpeechToText::new(&config.api, config.voice.stt_model.clone())?,
            chat: ChatClient::new(&config.api, config.chat_model.clone())?,
            tts: TextToSpeech::new(&config.api, &config.voice)?,
        })
    }

    /// Run the loop until the candidate quits or interrupts
    ///
    /// # Errors
    ///
    /// Returns error only if the terminal itself fails; capture and
    /// pipeline failures are logged and the loop continues
    pub async fn run(mut self) -> Result<ExitCode> {
        let mut state = LoopState::Idle;
        println!("Press Enter when you're ready to start speaking.");

        loop {
            let key = read_key().await?;

            match dispatch(state, &key) {
                Action::StartRecording => match self.capture.start() {
                    Ok(()) => {
                        state = LoopState::Recording;
                        println!("Recording... Press Enter to stop");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to start recording");
                        println!("Press Enter to try again, or any other key to quit.");
                    }
                },
                Action::StopAndProcess => {
                    state = LoopState::Idle;
                    match self.capture.stop() {
                        Ok(path) => {
                            println!("Recording stopped, processing audio...");
                            self.process_answer(&path).await;
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to stop recording");
                        }
                    }
                    println!("Press Enter to speak again, or any other key to quit.\n");
                }
                Action::Quit => {
                    println!("Exiting application...");
                    return Ok(ExitCode::SUCCESS);
                }
                Action::Interrupt => {
                    println!();
                    return Ok(ExitCode::from(130));
                }
                Action::Ignore => {}
            }
        }
    }

    /// Run one answer through the pipeline; failures are logged only
    async fn process_answer(&mut self, recording: &Path) {
        match self
            .interview
            .run_turn(recording, &self.stt, &self.chat, &self.tts)
            .await
        {
            Ok(outcome) => {
                // Playback is detached: the prompt returns while audio plays
                if let Some(audio) = outcome.audio {
                    drop(spawn_playback(audio));
                }
                println!(">> Assistant said: {}", outcome.reply);
            }
            Err(e) => {
                tracing::error!(error = %e, "answer pipeline failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_toggles_between_states() {
        assert_eq!(
            dispatch(LoopState::Idle, &key(KeyCode::Enter)),
            Action::StartRecording
        );
        assert_eq!(
            dispatch(LoopState::Recording, &key(KeyCode::Enter)),
            Action::StopAndProcess
        );
    }

    #[test]
    fn other_keys_quit_only_when_idle() {
        assert_eq!(dispatch(LoopState::Idle, &key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(dispatch(LoopState::Idle, &key(KeyCode::Esc)), Action::Quit);
        assert_eq!(
            dispatch(LoopState::Recording, &key(KeyCode::Char('q'))),
            Action::Ignore
        );
    }

    #[test]
    fn ctrl_c_interrupts_in_any_state() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(dispatch(LoopState::Idle, &ctrl_c), Action::Interrupt);
        assert_eq!(dispatch(LoopState::Recording, &ctrl_c), Action::Interrupt);
    }
}

//! Intervox: voice-driven mock interview practice in your terminal
//!
//! Press Enter to record an answer, press Enter again to have it
//! transcribed, scored, and answered by a simulated interviewer whose next
//! question is spoken back through your speakers.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                Interaction Loop                  │
//! │        keypress toggle: Idle ⇄ Recording         │
//! └───────────────────────┬──────────────────────────┘
//!                         │ one answer at a time
//! ┌───────────────────────▼──────────────────────────┐
//! │                    Pipeline                      │
//! │  transcribe → evaluate → converse → synthesize   │
//! └───────────────────────┬──────────────────────────┘
//!                         │
//! ┌───────────────────────▼──────────────────────────┐
//! │          OpenAI-compatible endpoints             │
//! │   /audio/transcriptions │ /chat/completions │    │
//! │                 /audio/speech                    │
//! └──────────────────────────────────────────────────┘
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod interview;
pub mod repl;
pub mod resume;
pub mod voice;

pub use chat::{ChatClient, ChatProvider, ChatTurn, Role};
pub use config::Config;
pub use error::{Error, Result};
pub use evaluator::EvaluationResult;
pub use interview::{Interview, InterviewContext, TurnOutcome};
pub use repl::InterviewRepl;

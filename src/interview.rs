//! Interview session state and the per-answer processing pipeline
//!
//! An [`Interview`] owns the immutable scenario context and the ordered
//! conversation history. One call to [`Interview::run_turn`] drives a full
//! answer through transcription, scoring, the next interviewer question,
//! and speech synthesis.

use std::path::Path;

use crate::chat::{ChatProvider, ChatTurn, Role};
use crate::evaluator;
use crate::voice::{SpeechSynthesizer, Transcriber};
use crate::Result;

/// Immutable per-run interview scenario
#[derive(Debug, Clone)]
pub struct InterviewContext {
    /// Company the interviewer represents
    pub company: String,

    /// Role being interviewed for
    pub role: String,

    /// Job description text
    pub job_description: String,

    /// Extracted resume text (may be empty)
    pub resume_text: String,
}

impl InterviewContext {
    /// Compose the system instruction framing the assistant as interviewer
    ///
    /// Synthesized fresh for every request; never stored in the history.
    #[must_use]
    pub fn system_prompt(&self) -> String {
        format!(
            "You are an interviewer from the company {company}.\n\
             Today there is a candidate interviewing for the position {role}.\n\
             Here is the job description: {job_description}.\n\
             The candidate's resume is as follows: {resume}.\n\
             Please ask relevant interview questions based on the resume and the candidate's responses.\n\
             Ask questions one by one like a real interview. Start with a general question like \"Tell me about yourself\".",
            company = self.company,
            role = self.role,
            job_description = self.job_description,
            resume = self.resume_text,
        )
    }
}

/// Outcome of one completed answer pipeline
#[derive(Debug)]
pub struct TurnOutcome {
    /// What the candidate said, as transcribed
    pub transcript: String,

    /// The interviewer's next utterance
    pub reply: String,

    /// Synthesized speech for the reply; `None` when synthesis failed
    pub audio: Option<Vec<u8>>,
}

/// An in-progress interview: scenario context plus conversation history
pub struct Interview {
    context: InterviewContext,
    history: Vec<ChatTurn>,
}

impl Interview {
    /// Start an interview with an empty history
    #[must_use]
    pub const fn new(context: InterviewContext) -> Self {
        Self {
            context,
            history: Vec::new(),
        }
    }

    /// The conversation transcript so far (user and assistant turns only)
    #[must_use]
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// The scenario context
    #[must_use]
    pub const fn context(&self) -> &InterviewContext {
        &self.context
    }

    /// The most recent interviewer question, if any has been asked
    #[must_use]
    pub fn last_question(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|turn| turn.role == Role::Assistant)
            .map(|turn| turn.content.as_str())
    }

    /// Compose the outbound message list: `[system] + history + [new user]`
    fn outbound(&self, transcript: &str) -> Vec<ChatTurn> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatTurn::system(self.context.system_prompt()));
        messages.extend(self.history.iter().cloned());
        messages.push(ChatTurn::user(transcript));
        messages
    }

    /// Run one full answer pipeline: transcribe, evaluate, converse, synthesize
    ///
    /// The history gains exactly one user turn and one assistant turn on
    /// success and is left untouched on failure. Evaluation runs only when a
    /// prior interviewer question exists; its failure never aborts the turn.
    /// Synthesis failure is logged and reported as `audio: None`.
    ///
    /// # Errors
    ///
    /// Returns error if transcription or the chat completion fails
    pub async fn run_turn<S, C, T>(
        &mut self,
        recording: &Path,
        stt: &S,
        chat: &C,
        tts: &T,
    ) -> Result<TurnOutcome>
    where
        S: Transcriber + Sync,
        C: ChatProvider + Sync,
        T: SpeechSynthesizer + Sync,
    {
        let transcript = stt.transcribe(recording).await?;
        println!(">> You said: {transcript}");

        if let Some(question) = self.last_question() {
            match evaluator::evaluate(chat, question, &transcript).await {
                Ok(result) => {
                    tracing::debug!(score = result.score, "answer evaluated");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "evaluation failed");
                }
            }
        }

        let reply = chat.complete(&self.outbound(&transcript)).await?;

        self.history.push(ChatTurn::user(transcript.clone()));
        self.history.push(ChatTurn::assistant(reply.clone()));

        let audio = match tts.synthesize(&reply).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::error!(error = %e, "speech synthesis failed");
                None
            }
        };

        Ok(TurnOutcome {
            transcript,
            reply,
            audio,
        })
    }
}

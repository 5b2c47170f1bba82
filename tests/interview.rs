//! Interview pipeline integration tests
//!
//! Drives the full answer pipeline with stub providers, requiring neither
//! audio hardware nor network access.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use intervox::chat::{ChatProvider, ChatTurn, Role};
use intervox::interview::{Interview, InterviewContext};
use intervox::voice::{SpeechSynthesizer, Transcriber};
use intervox::{Error, Result};

fn test_context() -> InterviewContext {
    InterviewContext {
        company: "Google".to_string(),
        role: "Software Engineer".to_string(),
        job_description: "Design, develop, and deliver technical solutions.".to_string(),
        resume_text: "Backend engineer, three years of Rust.".to_string(),
    }
}

struct StubStt {
    transcript: Option<String>,
}

impl StubStt {
    fn ok(transcript: &str) -> Self {
        Self {
            transcript: Some(transcript.to_string()),
        }
    }

    const fn failing() -> Self {
        Self { transcript: None }
    }
}

#[async_trait]
impl Transcriber for StubStt {
    async fn transcribe(&self, _recording: &Path) -> Result<String> {
        self.transcript
            .clone()
            .ok_or_else(|| Error::Stt("transcription API error 500: boom".to_string()))
    }
}

#[derive(Default)]
struct StubChat {
    replies: Mutex<Vec<String>>,
    requests: Mutex<Vec<Vec<ChatTurn>>>,
    fail: bool,
}

impl StubChat {
    fn with_replies(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(ToString::to_string).collect()),
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn requests(&self) -> Vec<Vec<ChatTurn>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for StubChat {
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if self.fail {
            return Err(Error::Chat("chat API error 500: boom".to_string()));
        }
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            Ok("Noted.".to_string())
        } else {
            Ok(replies.remove(0))
        }
    }
}

#[derive(Default)]
struct StubTts {
    fail: bool,
    calls: Mutex<usize>,
}

impl StubTts {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl SpeechSynthesizer for StubTts {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(Error::Tts("synthesis API error 500: boom".to_string()));
        }
        Ok(vec![0xff, 0xfb, 0x90])
    }
}

#[tokio::test]
async fn successful_turn_appends_user_then_assistant() {
    let mut interview = Interview::new(test_context());
    let stt = StubStt::ok("I am ready.");
    let chat = StubChat::with_replies(&["Tell me about yourself."]);
    let tts = StubTts::default();

    let outcome = interview
        .run_turn(Path::new("answer.wav"), &stt, &chat, &tts)
        .await
        .unwrap();

    assert_eq!(outcome.transcript, "I am ready.");
    assert_eq!(outcome.reply, "Tell me about yourself.");
    assert!(outcome.audio.is_some());

    let history = interview.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "I am ready.");
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].content, "Tell me about yourself.");
}

#[tokio::test]
async fn first_turn_sends_system_prompt_with_scenario() {
    let mut interview = Interview::new(test_context());
    let stt = StubStt::ok("Hello.");
    let chat = StubChat::with_replies(&["Welcome."]);
    let tts = StubTts::default();

    interview
        .run_turn(Path::new("answer.wav"), &stt, &chat, &tts)
        .await
        .unwrap();

    // Empty history means no evaluation: exactly one completion request
    let requests = chat.requests();
    assert_eq!(requests.len(), 1);

    let messages = &requests[0];
    assert_eq!(messages[0].role, Role::System);
    assert!(messages[0].content.contains("Google"));
    assert!(messages[0].content.contains("Software Engineer"));
    assert_eq!(messages.last().unwrap().role, Role::User);
    assert_eq!(messages.last().unwrap().content, "Hello.");
}

#[tokio::test]
async fn history_grows_by_two_per_turn_without_altering_existing() {
    let mut interview = Interview::new(test_context());
    let chat = StubChat::with_replies(&["Tell me about yourself.", "Why Rust?"]);
    let tts = StubTts::default();

    interview
        .run_turn(Path::new("a.wav"), &StubStt::ok("First answer."), &chat, &tts)
        .await
        .unwrap();
    let after_first: Vec<ChatTurn> = interview.history().to_vec();
    assert_eq!(after_first.len(), 2);

    interview
        .run_turn(Path::new("b.wav"), &StubStt::ok("Second answer."), &chat, &tts)
        .await
        .unwrap();

    let history = interview.history();
    assert_eq!(history.len(), 4);
    assert_eq!(&history[..2], &after_first[..]);
    assert_eq!(history[2].role, Role::User);
    assert_eq!(history[3].role, Role::Assistant);
}

#[tokio::test]
async fn evaluation_runs_only_after_a_question_was_asked() {
    let mut interview = Interview::new(test_context());
    let chat = StubChat::with_replies(&[
        "Tell me about yourself.",
        "Score: 7\nFeedback: Solid.",
        "What are your strengths?",
    ]);
    let tts = StubTts::default();

    // First turn: no prior assistant message, evaluation skipped
    interview
        .run_turn(Path::new("a.wav"), &StubStt::ok("Hi."), &chat, &tts)
        .await
        .unwrap();
    assert_eq!(chat.requests().len(), 1);

    // Second turn: evaluation precedes the conversation request
    interview
        .run_turn(
            Path::new("b.wav"),
            &StubStt::ok("I have three years of experience in backend systems."),
            &chat,
            &tts,
        )
        .await
        .unwrap();

    let requests = chat.requests();
    assert_eq!(requests.len(), 3);

    let evaluation = &requests[1];
    assert_eq!(evaluation.len(), 1);
    assert_eq!(evaluation[0].role, Role::User);
    assert!(evaluation[0]
        .content
        .contains("Question: \"Tell me about yourself.\""));
    assert!(evaluation[0].content.contains(
        "Candidate's Response: \"I have three years of experience in backend systems.\""
    ));
}

#[tokio::test]
async fn failed_transcription_leaves_history_untouched() {
    let mut interview = Interview::new(test_context());
    let chat = StubChat::with_replies(&["Tell me about yourself."]);
    let tts = StubTts::default();

    interview
        .run_turn(Path::new("a.wav"), &StubStt::ok("Hi."), &chat, &tts)
        .await
        .unwrap();
    let before: Vec<ChatTurn> = interview.history().to_vec();
    let requests_before = chat.requests().len();

    let err = interview
        .run_turn(Path::new("b.wav"), &StubStt::failing(), &chat, &tts)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Stt(_)));

    assert_eq!(interview.history(), &before[..]);
    assert_eq!(chat.requests().len(), requests_before);
    assert_eq!(tts.calls(), 1); // only the successful first turn
}

#[tokio::test]
async fn failed_completion_drops_turn_and_skips_synthesis() {
    let mut interview = Interview::new(test_context());
    let chat = StubChat::failing();
    let tts = StubTts::default();

    let err = interview
        .run_turn(Path::new("a.wav"), &StubStt::ok("Hello."), &chat, &tts)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Chat(_)));

    assert!(interview.history().is_empty());
    assert_eq!(tts.calls(), 0);
}

#[tokio::test]
async fn synthesis_failure_still_completes_the_turn() {
    let mut interview = Interview::new(test_context());
    let chat = StubChat::with_replies(&["Tell me about yourself."]);
    let tts = StubTts::failing();

    let outcome = interview
        .run_turn(Path::new("a.wav"), &StubStt::ok("Hi."), &chat, &tts)
        .await
        .unwrap();

    assert!(outcome.audio.is_none());
    assert_eq!(interview.history().len(), 2);
}

#[tokio::test]
async fn evaluation_failure_does_not_abort_the_turn() {
    let mut interview = Interview::new(test_context());

    // Evaluation reply is malformed; the conversation must proceed anyway
    let chat = StubChat::with_replies(&[
        "Tell me about yourself.",
        "no score here",
        "Why this company?",
    ]);
    let tts = StubTts::default();

    interview
        .run_turn(Path::new("a.wav"), &StubStt::ok("Hi."), &chat, &tts)
        .await
        .unwrap();
    interview
        .run_turn(Path::new("b.wav"), &StubStt::ok("Because."), &chat, &tts)
        .await
        .unwrap();

    assert_eq!(interview.history().len(), 4);
    assert_eq!(interview.history()[3].content, "Why this company?");
}

//! Answer scoring
//!
//! Asks the chat model to grade the candidate's latest answer against the
//! question it responded to. Results are printed for the candidate and
//! never fed back into the conversation.

use crate::chat::{ChatProvider, ChatTurn};
use crate::{Error, Result};

/// Score and feedback for one candidate answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    /// 0 (poor) to 10 (excellent)
    pub score: u8,

    /// Free-text feedback on coherence and relevance
    pub feedback: String,
}

/// Build the fixed scoring prompt
fn build_prompt(question: &str, answer: &str) -> String {
    format!(
        "As an expert interviewer, evaluate the candidate's response to the following question.\n\
         \n\
         Question: \"{question}\"\n\
         Candidate's Response: \"{answer}\"\n\
         \n\
         Provide a score from 0 to 10, where 10 is excellent and 0 is poor. \
         Then, give detailed feedback on the coherence and relevance of the response.\n\
         \n\
         Format:\n\
         Score: [score]\n\
         Feedback: [feedback]"
    )
}

/// Score the candidate's answer to the given question
///
/// Prints the raw model output in a console block, then parses it into an
/// [`EvaluationResult`].
///
/// # Errors
///
/// Returns error if the request fails or the reply does not follow the
/// `Score:`/`Feedback:` format
pub async fn evaluate<C>(chat: &C, question: &str, answer: &str) -> Result<EvaluationResult>
where
    C: ChatProvider + Sync,
{
    let prompt = build_prompt(question, answer);
    let text = chat.complete(&[ChatTurn::user(prompt)]).await?;

    println!("\n### Evaluation ###\n{text}\n#################\n");

    parse_evaluation(&text)
}

/// Parse the fixed two-line `Score:`/`Feedback:` format
fn parse_evaluation(text: &str) -> Result<EvaluationResult> {
    let score = text
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("Score:"))
        .and_then(|rest| {
            let rest = rest.trim().trim_start_matches('[');
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u8>().ok()
        })
        .filter(|score| *score <= 10)
        .ok_or_else(|| Error::Chat(format!("malformed evaluation, no score in: {text}")))?;

    let feedback = text
        .split_once("Feedback:")
        .map(|(_, rest)| rest.trim().trim_start_matches('[').trim_end_matches(']').to_string())
        .filter(|feedback| !feedback.is_empty())
        .ok_or_else(|| Error::Chat(format!("malformed evaluation, no feedback in: {text}")))?;

    Ok(EvaluationResult { score, feedback })
}

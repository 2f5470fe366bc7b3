//! Prompt assembly.
//!
//! Pure structural composition: a fixed system instruction, prior history
//! in original order, then the newest user turn. No semantic analysis of
//! the transcript happens here — syllable discipline is the generator's
//! problem, enforced only through the instruction itself.

use crate::types::{ChatMessage, Role};

/// The fixed haiku task instruction prepended to every prompt.
pub const HAIKU_INSTRUCTION: &str = "You are a haiku poet. Respond to the user's words with exactly \
     a three-line haiku of 5, 7, and 5 syllables. Output only the haiku, \
     with no extra commentary.";

/// Build a prompt from a transcript and optional conversation history.
///
/// The result always starts with one system message and ends with a user
/// message whose content is the transcript verbatim (an empty transcript
/// is passed through unchanged).
pub fn build_prompt(transcript: &str, history: &[ChatMessage]) -> Vec<ChatMessage> {
    build_prompt_with_instruction(HAIKU_INSTRUCTION, transcript, history)
}

/// [`build_prompt`] with a caller-supplied system instruction.
pub fn build_prompt_with_instruction(
    instruction: &str,
    transcript: &str,
    history: &[ChatMessage],
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(instruction));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(transcript));
    messages
}

/// Flatten a prompt into role-prefixed plain text for continuation models
/// that are not chat-structured.
pub fn flatten_prompt(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

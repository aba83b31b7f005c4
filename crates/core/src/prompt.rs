//! Prompt assembly.
//!
//! A pure function of the history: the caller appends the new user turn
//! first, then assembles the prompt to send to the agent.

use crate::conversation::{History, Role};

const HISTORY_PREAMBLE: &str = "Here's our conversation so far:\n\n";

const TRAILING_INSTRUCTION: &str = "\nBased on our conversation above, \
please respond to the user's most recent message.";

/// Builds the prompt string for the given history.
///
/// A single-turn history (just the new user message) assembles to that
/// message verbatim, with no framing. A longer history assembles to a
/// preamble line, one line per turn in insertion order, and a trailing
/// instruction directing the model at the most recent user message.
pub fn assemble(history: &History) -> String {
    let mut turns = history.iter();
    if history.len() <= 1 {
        // First contact (or nothing at all), nothing to frame.
        return turns
            .next()
            .map(|turn| turn.content.clone())
            .unwrap_or_default();
    }

    let mut prompt = String::from(HISTORY_PREAMBLE);
    for turn in turns {
        let prefix = match turn.role {
            Role::User => "User: ",
            Role::Assistant => "You: ",
        };
        prompt.push_str(prefix);
        prompt.push_str(&turn.content);
        prompt.push('\n');
    }
    prompt.push_str(TRAILING_INSTRUCTION);
    prompt
}

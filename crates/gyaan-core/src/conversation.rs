//! Request assembly.
//!
//! The sequence sent to the model is always
//! `[persona, prior non-system turns..., new user turn, auxiliary directive]`.
//! Persona and directive are built fresh for every call, so a changed word
//! target or language applies to the very next turn.

use crate::types::Message;

/// Per-turn steering appended after the user's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxDirective {
    pub word_target: u32,
    pub include_practice: bool,
    pub language_hint: String,
}

impl AuxDirective {
    pub fn new(word_target: u32, include_practice: bool, language_hint: impl Into<String>) -> Self {
        Self {
            word_target,
            include_practice,
            language_hint: language_hint.into(),
        }
    }

    pub fn render(&self) -> String {
        let mut parts = vec![format!(
            "Try to keep the answer near {} words.",
            self.word_target
        )];
        if self.include_practice {
            parts.push("Include a micro-practice box.".to_string());
        }
        if !self.language_hint.is_empty() {
            parts.push(self.language_hint.clone());
        }
        parts.join(" ")
    }

    pub fn to_message(&self) -> Message {
        Message::system(self.render())
    }
}

/// Build the ordered message list for one completion call.
///
/// `history` is only read; system messages in it are dropped in favour of the
/// freshly supplied `persona`.
pub fn assemble(
    persona: &str,
    history: &[Message],
    user_text: &str,
    directive: &AuxDirective,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 3);
    messages.push(Message::system(persona));
    messages.extend(history.iter().filter(|m| !m.is_system()).cloned());
    messages.push(Message::user(user_text));
    messages.push(directive.to_message());
    messages
}

//! In-memory chat session.
//!
//! A session owns the ordered message history of one conversation. Index 0 is
//! always the persona instruction and index 1 the assistant's welcome line;
//! both are rewritten in place by [`Session::refresh_preamble`] rather than
//! appended. Sessions are never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Message, Role};

/// Opaque per-process session identifier (12 lowercase hex characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub const LEN: usize = 12;

    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..Self::LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session seeded with the persona instruction and welcome line.
    pub fn new(persona: impl Into<String>, welcome: impl Into<String>) -> Self {
        Self::with_id(SessionId::generate(), persona, welcome)
    }

    pub fn with_id(id: SessionId, persona: impl Into<String>, welcome: impl Into<String>) -> Self {
        Self {
            id,
            messages: vec![Message::system(persona), Message::assistant(welcome)],
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Full history, persona first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// History without system messages, in original order.
    pub fn turns(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.is_system())
    }

    pub fn turn_count(&self) -> usize {
        self.turns().count()
    }

    /// Rewrite the persona and welcome messages from current settings.
    pub fn refresh_preamble(&mut self, persona: &str, welcome: &str) {
        if let Some(first) = self.messages.first_mut() {
            first.role = Role::System;
            first.content = persona.to_string();
        }
        if let Some(second) = self.messages.get_mut(1) {
            if second.role == Role::Assistant {
                second.content = welcome.to_string();
            }
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

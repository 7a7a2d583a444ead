//! # Gyaan Chat
//!
//! Ties moderation, request assembly, the completion client and the event log
//! into one turn handler. The host owns the [`gyaan_core::Session`] and
//! passes it into [`ChatService::handle_turn`].

pub mod client;
pub mod error;
pub mod postprocess;
pub mod prompts;
pub mod service;
pub mod settings;
pub mod transcript;

pub use client::ClientState;
pub use error::{ChatError, Result};
pub use postprocess::finish_reply;
pub use prompts::{practice_box, UiStrings, DEFAULT_PRACTICE, PERSONA};
pub use service::{ChatService, DashboardView, TurnOutcome};
pub use settings::{check_word_target, ChatSettings, MAX_TOKENS, TEMPERATURE};
pub use transcript::transcript_csv;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("config error: {0}")]
    Config(#[from] gyaan_config::ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] gyaan_analytics::StorageError),

    #[error("moderation error: {0}")]
    Moderation(#[from] gyaan_moderation::ModerationError),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("transcript export failed: {0}")]
    Transcript(String),
}

impl From<csv::Error> for ChatError {
    fn from(e: csv::Error) -> Self {
        ChatError::Transcript(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;

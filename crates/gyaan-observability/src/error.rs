/// Logging setup failures
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("Logging error: {message}")]
    Logging { message: String },

    /// A global subscriber was already installed
    #[error("Initialization error: {message}")]
    Init { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ObservabilityError {
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    pub fn init(message: impl Into<String>) -> Self {
        Self::Init {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ObservabilityError>;

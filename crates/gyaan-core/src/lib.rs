pub mod types;
pub mod chat;
pub mod conversation;
pub mod session;

pub use types::{Message, Role};

pub use chat::{
    ChatRequest,
    ChatResponse,
    ChatOptions,
    ChatUsage,
    FinishReason,
};

pub use conversation::{assemble, AuxDirective};
pub use session::{Session, SessionId};

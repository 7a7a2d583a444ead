//! Gyaan observability: logging setup and the spans used across crates.

pub mod error;
pub mod logging;

pub use error::{ObservabilityError, Result};
pub use logging::{build_filter, session_span, turn_span, LogManager};

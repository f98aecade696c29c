//! Observability module
//!
//! Logging and structured event infrastructure.

pub mod events;
pub mod logging;

pub use events::{Event, EventEmitter};
pub use logging::{LogFormat, init_logging};

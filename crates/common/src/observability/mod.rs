//! Observability primitives
//!
//! - [`event_log`]: bounded, session-scoped event buffer read back by
//!   operators and front-ends. Every record is mirrored to `tracing`.

pub mod event_log;

pub use event_log::{Event, EventLevel, EventLog, EventQuery, ParseEventLevelError};

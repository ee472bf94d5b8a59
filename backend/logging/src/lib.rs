//! Structured logging for funcloop.
//!
//! Subscriber setup, secret redaction, and the per-run event log.

pub mod logger;
pub mod redact;
pub mod run_events;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
pub use run_events::{RunEvent, RunEventLogger};

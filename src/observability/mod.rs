//! Observability subsystem.
//!
//! Structured logging only. The manager and the HTTP layer emit through the
//! `tracing` facade; this module owns subscriber construction so the binary
//! decides when logging exists, not a hidden global initializer.

pub mod logging;

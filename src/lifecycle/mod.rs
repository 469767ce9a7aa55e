//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (manager.rs):
//!     Bind listener → Run accept loop + shutdown watcher concurrently
//!
//! Shutdown (manager.rs):
//!     Token cancelled → Stop accepting → Drain connections (bounded) → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger the shutdown coordinator
//! ```
//!
//! # Design Decisions
//! - The manager returns only after BOTH activities finish, never first-to-finish
//! - Ordered shutdown: stop accept, drain, close
//! - The drain wait has a hard deadline: forced termination after the grace period

pub mod manager;
pub mod shutdown;
pub mod signals;

pub use manager::{Lifecycle, RunError};
pub use shutdown::Shutdown;

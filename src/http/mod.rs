//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Accepted connection
//!     → server.rs (router construction, middleware wiring)
//!     → handlers.rs (demo endpoints)
//!     → Response back through the middleware stack
//! ```
//!
//! Routing semantics and endpoint business logic are deliberately thin; the
//! lifecycle manager treats the whole router as an opaque handler.

pub mod handlers;
pub mod server;

pub use server::build_router;

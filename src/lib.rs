//! taskd, a small task service host.
//!
//! Brings up a listening HTTP endpoint, serves requests, and tears the
//! endpoint down cleanly on a shutdown signal without dropping in-flight
//! work or hanging indefinitely.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────┐
//!                  │                    TASKD                      │
//!                  │                                               │
//!   Client ───────▶│  ┌─────────┐    ┌─────────┐    ┌───────────┐  │
//!                  │  │   net   │───▶│  http   │───▶│ handlers  │  │
//!                  │  │listener │    │ router  │    │  (glue)   │  │
//!                  │  └─────────┘    └─────────┘    └───────────┘  │
//!                  │       ▲                                       │
//!                  │       │ stop / drain / force                  │
//!                  │  ┌────┴──────────────────────┐  ┌──────────┐  │
//!                  │  │        lifecycle          │  │  config  │  │
//!                  │  │ accept loop ⇄ shutdown    │  │  + logs  │  │
//!                  │  │ watcher, joined on both   │  └──────────┘  │
//!                  │  └───────────────────────────┘                │
//!                  └───────────────────────────────────────────────┘
//! ```
//!
//! The lifecycle manager is the only part with real concurrency content:
//! it races the accept loop against a shutdown watcher over one shared
//! cancellation token and aggregates both results into a single outcome.

// Core subsystems
pub mod config;
pub mod http;
pub mod net;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use lifecycle::{Lifecycle, RunError, Shutdown};

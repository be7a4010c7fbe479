//! Shared utilities for the realtime search workspace.
//!
//! Currently this is the centralised tracing/logging setup in [`observability`],
//! used by the demo binary and by integration tests across crates.
//!
//! ```no_run
//! use realtime_common::observability::{init_logging, LogConfig};
//!
//! let path = init_logging(LogConfig {
//!     app_name: "realtime-demo",
//!     emit_stderr: true,
//!     ..LogConfig::default()
//! })
//! .expect("logging initialises");
//! println!("logging to {}", path.display());
//! ```
pub mod observability;

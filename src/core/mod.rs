//! Core infrastructure
//!
//! Logging macros, the rotating in-memory log buffer exposed to the web
//! configuration UI, and the cooperative poll-loop scheduler.

pub mod log_buffer;
pub mod logging;
pub mod scheduler;

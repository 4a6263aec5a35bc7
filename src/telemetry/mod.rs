//! Telemetry collection, buffering and push

pub mod buffer;
pub mod clock;
pub mod collector;
pub mod query;

pub use buffer::{TelemetryBuffer, TELEMETRY_BUFFER_SIZE};
pub use clock::RemoteClock;
pub use collector::{Appender, CollectorHooks, TelemetryCollector};
pub use query::QueryClient;

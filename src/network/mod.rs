//! WiFi connection management

pub mod manager;
pub mod retained;

pub use manager::{ConnectionManager, ConnectionState};
pub use retained::ReconnectCache;

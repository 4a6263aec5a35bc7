//! Wired command protocols

pub mod rs485;

pub use rs485::Rs485Server;

//! Mock platform implementation for testing
//!
//! This module provides mock implementations of the platform traits that can
//! be used for unit testing without hardware.
//!
//! # Feature Gate
//!
//! Available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled

#![cfg(any(test, feature = "mock"))]

mod clock;
mod flash;
mod http;
mod radio;
mod retained;
mod serial;

pub use clock::MockClock;
pub use flash::MockFlash;
pub use http::{MockHttp, RecordedRequest};
pub use radio::{ConnectAttempt, MockRadio};
pub use retained::MockRetained;
pub use serial::MockSerial;

//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the node peripherals. All
//! platform-specific code lives behind these traits; the rest of the crate is
//! portable and runs unmodified under the host test suite.

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(feature = "embassy")]
pub mod embassy;

// Re-export commonly used types
pub use error::{FlashError, HttpError, PlatformError, RadioError, Result, SerialError};
pub use traits::{
    ClockInterface, ConnectHint, FlashInterface, HttpInterface, HttpResponse, LinkInfo,
    RadioInterface, RetainedInterface, SerialInterface,
};

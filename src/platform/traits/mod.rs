//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod clock;
pub mod flash;
pub mod http;
pub mod radio;
pub mod retained;
pub mod serial;

// Re-export trait interfaces
pub use clock::ClockInterface;
pub use flash::FlashInterface;
pub use http::{HttpInterface, HttpResponse, HTTP_BODY_LEN, HTTP_DATE_LEN};
pub use radio::{ConnectHint, LinkInfo, RadioInterface};
pub use retained::RetainedInterface;
pub use serial::SerialInterface;

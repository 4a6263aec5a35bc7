//! Platform error types
//!
//! This module defines error types for platform operations.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All platform implementations map their HAL-specific errors to these
/// variants. Nothing in the firmware core treats a platform error as fatal;
/// failures are logged and retried on a later poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformError {
    /// Radio operation failed
    Radio(RadioError),
    /// HTTP transport failed before a status line was received
    Http(HttpError),
    /// Flash operation failed
    Flash(FlashError),
    /// Serial operation failed
    Serial(SerialError),
    /// Invalid configuration provided
    InvalidConfig,
    /// Resource not available
    ResourceUnavailable,
}

/// Radio-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// Radio could not be brought up
    StartFailed,
    /// Association attempt could not be started
    JoinFailed,
    /// Soft-AP could not be started
    AccessPointFailed,
    /// Operation requires the radio to be powered
    NotStarted,
}

/// HTTP transport errors
///
/// These cover transport-level failures only. A response with a non-success
/// status code is not an error at this layer; the caller inspects the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpError {
    /// TCP connection to the server failed
    ConnectFailed,
    /// No (complete) response within the transport timeout
    Timeout,
    /// Response could not be parsed
    Malformed,
}

/// Flash-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashError {
    /// Read operation failed
    ReadFailed,
    /// Write operation failed
    WriteFailed,
    /// Access outside the settings area
    OutOfBounds,
}

/// Serial-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError {
    /// Write operation failed
    WriteFailed,
    /// Receive overrun
    Overrun,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Radio(e) => write!(f, "radio error: {:?}", e),
            PlatformError::Http(e) => write!(f, "HTTP error: {:?}", e),
            PlatformError::Flash(e) => write!(f, "flash error: {:?}", e),
            PlatformError::Serial(e) => write!(f, "serial error: {:?}", e),
            PlatformError::InvalidConfig => write!(f, "invalid configuration"),
            PlatformError::ResourceUnavailable => write!(f, "resource not available"),
        }
    }
}

impl From<RadioError> for PlatformError {
    fn from(e: RadioError) -> Self {
        PlatformError::Radio(e)
    }
}

impl From<HttpError> for PlatformError {
    fn from(e: HttpError) -> Self {
        PlatformError::Http(e)
    }
}

impl From<FlashError> for PlatformError {
    fn from(e: FlashError) -> Self {
        PlatformError::Flash(e)
    }
}

impl From<SerialError> for PlatformError {
    fn from(e: SerialError) -> Self {
        PlatformError::Serial(e)
    }
}

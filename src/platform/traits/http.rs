//! HTTP client interface
//!
//! Synchronous request/response transport to the telemetry backend. Requests
//! block the run loop for their duration; that is an accepted latency source
//! on this single-purpose device, not a bug. A response with a non-success
//! status code is returned as `Ok` - only transport failures are `Err`.

use heapless::String;

use crate::platform::Result;

/// Maximum length of a captured `date` header value
pub const HTTP_DATE_LEN: usize = 32;

/// Maximum response body length the client retains
pub const HTTP_BODY_LEN: usize = 512;

/// HTTP response as seen by the firmware core
///
/// Only the pieces the core consumes are surfaced: the status code, the
/// `date` header (clock synchronization source) and a bounded body prefix
/// (query responses).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code, e.g. 204
    pub status: u16,
    /// Value of the `date` header, if the server sent one
    pub date: Option<String<HTTP_DATE_LEN>>,
    /// Response body, truncated to [`HTTP_BODY_LEN`]
    pub body: String<HTTP_BODY_LEN>,
}

impl HttpResponse {
    /// Build a response with no body and no date header
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            date: None,
            body: String::new(),
        }
    }
}

/// Blocking HTTP client
pub trait HttpInterface {
    /// Issue a GET request
    fn get(&mut self, url: &str) -> Result<HttpResponse>;

    /// Issue a POST request with the given body
    fn post(&mut self, url: &str, body: &[u8]) -> Result<HttpResponse>;
}

//! Mock HTTP client implementation for testing

use heapless::{Deque, String, Vec};

use crate::platform::error::HttpError;
use crate::platform::traits::{HttpInterface, HttpResponse};
use crate::platform::Result;

/// One recorded request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String<256>,
    pub body: Vec<u8, 1024>,
}

/// Mock HTTP client with canned responses
///
/// Responses are consumed in FIFO order; a request with no canned response
/// left fails with [`HttpError::ConnectFailed`], which is how tests simulate
/// an unreachable server.
#[derive(Debug, Default)]
pub struct MockHttp {
    responses: Deque<HttpResponse, 8>,
    pub requests: Vec<RecordedRequest, 8>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a canned response
    pub fn queue_response(&mut self, response: HttpResponse) {
        let _ = self.responses.push_back(response);
    }

    /// Queue a response with a status and a `date` header
    pub fn queue_status_with_date(&mut self, status: u16, date: &str) {
        let mut response = HttpResponse::with_status(status);
        response.date = String::try_from(date).ok();
        self.queue_response(response);
    }

    /// URL of the most recent request
    pub fn last_url(&self) -> Option<&str> {
        self.requests.last().map(|r| r.url.as_str())
    }

    fn record(&mut self, method: &'static str, url: &str, body: &[u8]) {
        let mut recorded = RecordedRequest {
            method,
            url: String::try_from(url).unwrap_or_default(),
            body: Vec::new(),
        };
        let _ = recorded.body.extend_from_slice(body);
        if self.requests.is_full() {
            self.requests.remove(0);
        }
        let _ = self.requests.push(recorded);
    }

    fn next_response(&mut self) -> Result<HttpResponse> {
        self.responses
            .pop_front()
            .ok_or_else(|| HttpError::ConnectFailed.into())
    }
}

impl HttpInterface for MockHttp {
    fn get(&mut self, url: &str) -> Result<HttpResponse> {
        self.record("GET", url, &[]);
        self.next_response()
    }

    fn post(&mut self, url: &str, body: &[u8]) -> Result<HttpResponse> {
        self.record("POST", url, body);
        self.next_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_responses_fifo() {
        let mut http = MockHttp::new();
        http.queue_response(HttpResponse::with_status(204));
        http.queue_response(HttpResponse::with_status(500));

        assert_eq!(http.get("http://x/ping").unwrap().status, 204);
        assert_eq!(http.get("http://x/ping").unwrap().status, 500);
        assert!(http.get("http://x/ping").is_err());
    }

    #[test]
    fn test_records_post_body() {
        let mut http = MockHttp::new();
        http.queue_response(HttpResponse::with_status(204));

        http.post("http://x/write", b"m,src=n value=1").unwrap();

        let request = http.requests.last().unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.body.as_slice(), b"m,src=n value=1");
    }
}

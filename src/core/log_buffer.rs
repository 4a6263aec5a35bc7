//! Rotating operator log
//!
//! Fixed-capacity text buffer of newline-terminated lines, shown by the web
//! configuration UI. When a new line does not fit, the oldest lines are
//! evicted to make room. Consecutive duplicate messages are suppressed -
//! there is no use case for identical adjacent log lines on this device.

use heapless::Vec;

/// Buffer capacity in bytes
pub const LOG_BUFFER_SIZE: usize = 1024;

/// Maximum length of a single message; longer messages are truncated
pub const LOG_LINE_SIZE: usize = 128;

/// Rotating newline-terminated text log
pub struct LogBuffer {
    buffer: Vec<u8, LOG_BUFFER_SIZE>,
    /// Lines dropped to make room for newer ones
    evicted_lines: u32,
}

impl LogBuffer {
    /// Create a new empty log buffer
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            evicted_lines: 0,
        }
    }

    /// Append one message as a line
    ///
    /// A message identical to the previous line is dropped. Messages longer
    /// than [`LOG_LINE_SIZE`] are truncated at a char boundary.
    pub fn log(&mut self, msg: &str) {
        let msg = truncate_at_boundary(msg, LOG_LINE_SIZE);

        if self.last_line() == Some(msg) {
            return;
        }

        let needed = msg.len() + 1;
        while self.buffer.len() + needed > LOG_BUFFER_SIZE {
            self.evict_oldest_line();
        }

        let _ = self.buffer.extend_from_slice(msg.as_bytes());
        let _ = self.buffer.push(b'\n');
    }

    /// The whole log, oldest line first
    pub fn contents(&self) -> &str {
        core::str::from_utf8(&self.buffer).unwrap_or("")
    }

    /// Current size in bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Return true if the log is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of lines lost to rotation
    pub fn evicted_lines(&self) -> u32 {
        self.evicted_lines
    }

    /// Discard all lines
    ///
    /// Does not reset the eviction counter.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    fn last_line(&self) -> Option<&str> {
        if self.buffer.is_empty() {
            return None;
        }
        // Content always ends with '\n'; the last line starts after the
        // newline before it.
        let without_trailing = &self.buffer[..self.buffer.len() - 1];
        let start = without_trailing
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|p| p + 1)
            .unwrap_or(0);
        core::str::from_utf8(&without_trailing[start..]).ok()
    }

    fn evict_oldest_line(&mut self) {
        let cut = self
            .buffer
            .iter()
            .position(|&b| b == b'\n')
            .map(|p| p + 1)
            .unwrap_or(self.buffer.len());
        let remaining = self.buffer.len() - cut;
        self.buffer.copy_within(cut.., 0);
        self.buffer.truncate(remaining);
        self.evicted_lines = self.evicted_lines.saturating_add(1);
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncate to at most `max` bytes without splitting a UTF-8 sequence
fn truncate_at_boundary(msg: &str, max: usize) -> &str {
    if msg.len() <= max {
        return msg;
    }
    let mut end = max;
    while end > 0 && !msg.is_char_boundary(end) {
        end -= 1;
    }
    &msg[..end]
}

//! Line-protocol record buffer
//!
//! Fixed-capacity byte buffer of complete newline-terminated records,
//! accumulated between pushes. A record that does not fit is dropped whole;
//! the buffer never holds a partial record, so its content is always a valid
//! push body.

use heapless::Vec;

/// Default buffer capacity in bytes
pub const TELEMETRY_BUFFER_SIZE: usize = 24 * 1024;

/// Buffer of newline-terminated line-protocol records
pub struct TelemetryBuffer<const N: usize = TELEMETRY_BUFFER_SIZE> {
    data: Vec<u8, N>,
    overflow_count: u32,
}

impl<const N: usize> TelemetryBuffer<N> {
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            overflow_count: 0,
        }
    }

    /// Append one newline-terminated record
    ///
    /// Returns false when the record does not fit; the existing content is
    /// left intact, trimmed back to the last record boundary in case a
    /// previous writer left a partial line behind.
    pub fn append_record(&mut self, record: &str) -> bool {
        if self.data.len() + record.len() > N {
            self.overflow_count = self.overflow_count.saturating_add(1);
            self.truncate_to_record_boundary();
            return false;
        }
        let _ = self.data.extend_from_slice(record.as_bytes());
        true
    }

    /// Exact buffer content
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Content without the trailing newline, as the push body expects
    pub fn payload(&self) -> &[u8] {
        match self.data.last() {
            Some(b'\n') => &self.data[..self.data.len() - 1],
            _ => &self.data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fill level as integer percent of capacity
    pub fn occupancy_percent(&self) -> usize {
        self.data.len() * 100 / N
    }

    /// Records rejected for lack of space
    pub fn overflow_count(&self) -> u32 {
        self.overflow_count
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    fn truncate_to_record_boundary(&mut self) {
        let end = self
            .data
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|p| p + 1)
            .unwrap_or(0);
        self.data.truncate(end);
    }
}

impl<const N: usize> Default for TelemetryBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_payload() {
        let mut buffer: TelemetryBuffer<64> = TelemetryBuffer::new();
        assert!(buffer.append_record("temperature,src=node value=21.5\n"));
        assert!(buffer.append_record("humidity,src=node value=40\n"));

        assert_eq!(buffer.len(), 59);
        assert_eq!(
            buffer.payload(),
            b"temperature,src=node value=21.5\nhumidity,src=node value=40" as &[u8]
        );
    }

    #[test]
    fn test_oversize_record_rejected_whole() {
        let mut buffer: TelemetryBuffer<32> = TelemetryBuffer::new();
        assert!(buffer.append_record("short,src=n value=1\n"));

        let before = buffer.len();
        assert!(!buffer.append_record("much_too_long,src=n value=123456\n"));

        assert_eq!(buffer.len(), before);
        assert_eq!(buffer.overflow_count(), 1);
        // Still ends on a record boundary
        assert_eq!(buffer.as_bytes().last(), Some(&b'\n'));
    }

    #[test]
    fn test_occupancy_percent() {
        let mut buffer: TelemetryBuffer<100> = TelemetryBuffer::new();
        assert_eq!(buffer.occupancy_percent(), 0);

        // 80 bytes in a 100-byte buffer
        for _ in 0..8 {
            assert!(buffer.append_record("aaaaaaaaa\n"));
        }
        assert_eq!(buffer.occupancy_percent(), 80);
    }

    #[test]
    fn test_clear_keeps_overflow_count() {
        let mut buffer: TelemetryBuffer<16> = TelemetryBuffer::new();
        assert!(!buffer.append_record("way_too_long_for_this_buffer\n"));
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.overflow_count(), 1);
    }

    #[test]
    fn test_payload_of_empty_buffer() {
        let buffer: TelemetryBuffer<16> = TelemetryBuffer::new();
        assert!(buffer.payload().is_empty());
    }
}

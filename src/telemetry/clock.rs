//! Remote-synchronized wall clock
//!
//! The device has no RTC; wall-clock time comes from the `date` header of
//! telemetry server responses. A successful sync pins an epoch timestamp to
//! the local millisecond counter, and [`RemoteClock::timestamp`] extrapolates
//! from there. The extrapolation stays correct across counter wraparound as
//! long as syncs happen more often than the ~49.7-day wrap period, which
//! every push cycle guarantees by orders of magnitude.

/// Expected length of an RFC 1123 date, e.g. `"Sat, 08 Dec 2018 07:38:17 GMT"`
const DATE_LEN: usize = 29;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Cumulative days before each month, normal and leap years
const DAYS_BEFORE_MONTH: [[u32; 12]; 2] = [
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334],
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335],
];

const DAYS_IN_MONTH: [[u32; 12]; 2] = [
    [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31],
    [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31],
];

/// Epoch clock synchronized from HTTP `date` headers
#[derive(Debug, Default)]
pub struct RemoteClock {
    /// Epoch seconds at the moment of the last sync; 0 = never synced
    remote_timestamp: u32,
    /// Local millisecond counter at the moment of the last sync
    synced_at_ms: u32,
}

impl RemoteClock {
    pub const fn new() -> Self {
        Self {
            remote_timestamp: 0,
            synced_at_ms: 0,
        }
    }

    /// Whether a sync has succeeded since the last [`RemoteClock::clear`]
    pub fn is_synced(&self) -> bool {
        self.remote_timestamp != 0
    }

    /// Forget the sync, forcing a fresh handshake
    pub fn clear(&mut self) {
        self.remote_timestamp = 0;
        self.synced_at_ms = 0;
    }

    /// Sync from an RFC 1123 date string
    ///
    /// Returns false and leaves the clock untouched when the string cannot
    /// be parsed or names an invalid calendar day.
    pub fn sync(&mut self, date: &str, now_ms: u32) -> bool {
        match parse_epoch(date) {
            Some(epoch) => {
                self.remote_timestamp = epoch;
                self.synced_at_ms = now_ms;
                true
            }
            None => false,
        }
    }

    /// Current epoch seconds, extrapolated from the last sync
    pub fn timestamp(&self, now_ms: u32) -> u32 {
        self.remote_timestamp + now_ms.wrapping_sub(self.synced_at_ms) / 1000
    }
}

/// Parse an RFC 1123 date into epoch seconds
///
/// Uses the "Seconds Since the Epoch" formula from POSIX.1-2008 section
/// 4.15, with the field positions fixed by the 29-char format.
fn parse_epoch(date: &str) -> Option<u32> {
    if date.len() != DATE_LEN {
        return None;
    }

    let day = parse_num(date, 5, 2)?;
    let year = parse_num(date, 12, 4)?;
    let hour = parse_num(date, 17, 2)?;
    let minute = parse_num(date, 20, 2)?;
    let second = parse_num(date, 23, 2)?;

    // Compared as bytes: a header with multibyte junk must parse as "no",
    // not trip a char-boundary check
    let month_name = date.as_bytes().get(8..11)?;
    let month = MONTHS.iter().position(|m| m.as_bytes() == month_name)?;

    if year < 1970 || hour > 23 || minute > 59 || second > 59 {
        return None;
    }

    let leap = (year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)) as usize;
    if day < 1 || day > DAYS_IN_MONTH[leap][month] {
        return None;
    }

    let tm_year = year - 1900;
    let tm_yday = DAYS_BEFORE_MONTH[leap][month] + day - 1;

    Some(
        second
            + minute * 60
            + hour * 3600
            + tm_yday * 86_400
            + (tm_year - 70) * 31_536_000
            + ((tm_year - 69) / 4) * 86_400
            - ((tm_year - 1) / 100) * 86_400
            + ((tm_year + 299) / 400) * 86_400,
    )
}

/// Parse `len` ASCII digits at `offset`
fn parse_num(date: &str, offset: usize, len: usize) -> Option<u32> {
    let mut value: u32 = 0;
    for byte in date.as_bytes().get(offset..offset + len)? {
        if !byte.is_ascii_digit() {
            return None;
        }
        value = value * 10 + (byte - b'0') as u32;
    }
    Some(value)
}

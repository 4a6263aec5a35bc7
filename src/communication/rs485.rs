//! RS-485 command server
//!
//! Text frames on a shared half-duplex bus. A frame is
//! `{address}:{command}[:{params}]`, terminated by any control byte; the
//! address must match this node's hostname exactly for the frame to be
//! dispatched. Bytes outside printable ASCII are discarded on intake, which
//! tolerates line noise between frames.

use heapless::{String, Vec};

use crate::platform::traits::clock::elapsed_ms;
use crate::platform::traits::{ClockInterface, SerialInterface};
use crate::platform::Result;

/// Maximum number of registered command handlers
pub const MAX_HANDLERS: usize = 16;

/// Maximum frame length in bytes
pub const MAX_FRAME_LEN: usize = 255;

/// A partial frame older than this is dropped as bus garbage
pub const FRAME_TIMEOUT_MS: u32 = 10_000;

const SEPARATOR: u8 = b':';

/// Command handler; receives the parameter remainder of the frame
pub type HandlerFn = fn(params: &str);

struct CommandHandler {
    command: &'static str,
    handler: HandlerFn,
}

impl CommandHandler {
    /// A handler matches when the frame starts with its command name,
    /// followed by end-of-frame or the parameter separator
    fn matches(&self, frame: &str) -> bool {
        match frame.as_bytes().get(self.command.len()) {
            None => frame == self.command,
            Some(&SEPARATOR) => frame.starts_with(self.command),
            Some(_) => false,
        }
    }

    fn params<'a>(&self, frame: &'a str) -> &'a str {
        match frame.as_bytes().get(self.command.len()) {
            Some(&SEPARATOR) => &frame[self.command.len() + 1..],
            _ => "",
        }
    }
}

/// Frame assembly and command dispatch over a [`SerialInterface`]
pub struct Rs485Server<S: SerialInterface> {
    serial: S,
    /// Bus address of this node, the hostname
    address: String<63>,
    frame: Vec<u8, MAX_FRAME_LEN>,
    handlers: Vec<CommandHandler, MAX_HANDLERS>,
    last_byte_at: u32,
}

impl<S: SerialInterface> Rs485Server<S> {
    pub fn new(serial: S, address: &str) -> Self {
        Self {
            serial,
            address: String::try_from(address).unwrap_or_default(),
            frame: Vec::new(),
            handlers: Vec::new(),
            last_byte_at: 0,
        }
    }

    /// Register a command handler; first registered match wins
    pub fn register_handler(&mut self, command: &'static str, handler: HandlerFn) {
        if self
            .handlers
            .push(CommandHandler { command, handler })
            .is_err()
        {
            crate::log_warn!("No more handlers can be registered");
        }
    }

    /// Drain received bytes, dispatching every completed frame
    pub fn poll<C: ClockInterface>(&mut self, clock: &C) {
        while let Some(byte) = self.serial.read_byte() {
            self.last_byte_at = clock.now_ms();

            // Control bytes terminate the frame; high bytes are line noise
            if byte <= 31 {
                self.dispatch();
                self.frame.clear();
                continue;
            }
            if byte >= 127 {
                continue;
            }

            let _ = self.frame.push(byte);
            if self.frame.is_full() {
                crate::log_warn!("RS485 buffer overflow detected");
                self.dispatch();
                self.frame.clear();
            }
        }

        if !self.frame.is_empty()
            && elapsed_ms(clock.now_ms(), self.last_byte_at) > FRAME_TIMEOUT_MS
        {
            self.frame.clear();
        }
    }

    /// Transmit `{destination}:{command}` on the bus
    ///
    /// Pending receive data is drained first so a frame in progress is not
    /// lost when we claim the bus.
    pub fn send_command<C: ClockInterface>(
        &mut self,
        clock: &C,
        destination: &str,
        command: &str,
    ) -> Result<()> {
        self.poll(clock);

        self.serial.begin_transmission();
        let result = self
            .serial
            .write(destination.as_bytes())
            .and_then(|_| self.serial.write(&[SEPARATOR]))
            .and_then(|_| self.serial.write(command.as_bytes()));
        self.serial.end_transmission();
        result
    }

    pub fn serial(&self) -> &S {
        &self.serial
    }

    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    fn dispatch(&mut self) {
        // Minimum frame is address, separator, one command char
        if self.frame.len() < 3 {
            return;
        }
        let frame = match core::str::from_utf8(&self.frame) {
            Ok(frame) => frame,
            Err(_) => return,
        };

        let rest = match frame.strip_prefix(self.address.as_str()) {
            Some(rest) => rest,
            None => return,
        };
        let command = match rest.strip_prefix(SEPARATOR as char) {
            Some(command) => command,
            None => return,
        };

        if let Some(handler) = self.handlers.iter().find(|h| h.matches(command)) {
            (handler.handler)(handler.params(command));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockClock, MockSerial};
    use core::cell::RefCell;
    use std::string::String as StdString;

    type CallLog = std::vec::Vec<(&'static str, StdString)>;

    thread_local! {
        static CALLS: RefCell<CallLog> = RefCell::new(CallLog::new());
    }

    fn record(name: &'static str, params: &str) {
        CALLS.with(|calls| calls.borrow_mut().push((name, params.to_string())));
    }

    fn take_calls() -> CallLog {
        CALLS.with(|calls| calls.borrow_mut().drain(..).collect())
    }

    fn on_restart(params: &str) {
        record("restart", params);
    }

    fn on_rst(params: &str) {
        record("rst", params);
    }

    fn on_set(params: &str) {
        record("set", params);
    }

    fn server() -> Rs485Server<MockSerial> {
        take_calls();
        let mut server = Rs485Server::new(MockSerial::new(), "node-01");
        server.register_handler("restart", on_restart);
        server.register_handler("rst", on_rst);
        server.register_handler("set", on_set);
        server
    }

    #[test]
    fn test_dispatches_matching_frame() {
        let clock = MockClock::new();
        let mut server = server();
        server.serial_mut().feed(b"node-01:restart\n");

        server.poll(&clock);

        assert_eq!(take_calls(), vec![("restart", StdString::new())]);
    }

    #[test]
    fn test_params_passed_after_separator() {
        let clock = MockClock::new();
        let mut server = server();
        server.serial_mut().feed(b"node-01:set:interval=30\r");

        server.poll(&clock);

        assert_eq!(take_calls(), vec![("set", "interval=30".to_string())]);
    }

    #[test]
    fn test_first_registered_match_wins() {
        let clock = MockClock::new();
        let mut server = server();
        server.serial_mut().feed(b"node-01:rst\n");

        server.poll(&clock);

        assert_eq!(take_calls(), vec![("rst", StdString::new())]);
    }

    #[test]
    fn test_command_prefix_needs_boundary() {
        let clock = MockClock::new();
        let mut server = server();
        server.serial_mut().feed(b"node-01:restartnow\n");

        server.poll(&clock);

        assert!(take_calls().is_empty());
    }

    #[test]
    fn test_address_mismatch_ignored() {
        let clock = MockClock::new();
        let mut server = server();
        server.serial_mut().feed(b"node-02:restart\n");
        server.serial_mut().feed(b"node-010:restart\n");

        server.poll(&clock);

        assert!(take_calls().is_empty());
    }

    #[test]
    fn test_high_bytes_discarded() {
        let clock = MockClock::new();
        let mut server = server();
        server.serial_mut().feed(b"node\xFF-01:re\x80start\n");

        server.poll(&clock);

        assert_eq!(take_calls(), vec![("restart", StdString::new())]);
    }

    #[test]
    fn test_multiple_frames_in_one_poll() {
        let clock = MockClock::new();
        let mut server = server();
        server.serial_mut().feed(b"node-01:rst\nnode-01:set:5\n");

        server.poll(&clock);

        assert_eq!(
            take_calls(),
            vec![("rst", StdString::new()), ("set", "5".to_string())]
        );
    }

    #[test]
    fn test_stale_partial_frame_dropped() {
        let clock = MockClock::new();
        let mut server = server();
        server.serial_mut().feed(b"node-01:res");
        server.poll(&clock);

        clock.advance(FRAME_TIMEOUT_MS + 1);
        server.poll(&clock);

        // The late remainder no longer completes the old frame
        server.serial_mut().feed(b"tart\n");
        server.poll(&clock);

        assert!(take_calls().is_empty());
    }

    #[test]
    fn test_slow_frame_within_timeout_survives() {
        let clock = MockClock::new();
        let mut server = server();
        server.serial_mut().feed(b"node-01:res");
        server.poll(&clock);

        clock.advance(FRAME_TIMEOUT_MS - 1000);
        server.serial_mut().feed(b"tart\n");
        server.poll(&clock);

        assert_eq!(take_calls(), vec![("restart", StdString::new())]);
    }

    #[test]
    fn test_overflow_forces_termination() {
        let clock = MockClock::new();
        let mut server = server();

        let mut oversized = std::vec::Vec::new();
        oversized.extend_from_slice(b"node-01:set:");
        oversized.resize(MAX_FRAME_LEN + 20, b'x');
        server.serial_mut().feed(&oversized);
        server.serial_mut().feed(b"\n");

        server.poll(&clock);

        // The force-terminated frame still dispatches; the tail bytes form
        // a new frame that matches nothing
        let calls = take_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "set");
        assert!(calls[0].1.starts_with("xxx"));
    }

    #[test]
    fn test_send_command_brackets_transmission() {
        let clock = MockClock::new();
        let mut server = server();

        server.send_command(&clock, "node-02", "rst").unwrap();

        assert_eq!(server.serial().transmitted(), b"node-02:rst");
        assert_eq!(server.serial().transmissions, 1);
        assert!(!server.serial().transmitting);
    }

    #[test]
    fn test_send_command_drains_pending_frame_first() {
        let clock = MockClock::new();
        let mut server = server();
        server.serial_mut().feed(b"node-01:restart\n");

        server.send_command(&clock, "node-02", "rst").unwrap();

        assert_eq!(take_calls(), vec![("restart", StdString::new())]);
        assert_eq!(server.serial().transmitted(), b"node-02:rst");
    }
}

//! Telemetry collector and push engine
//!
//! Periodically collects samples through [`CollectorHooks`], batches them as
//! line-protocol records and pushes the batch over HTTP. The remote clock is
//! bootstrapped from the server's `ping` endpoint once per enable cycle;
//! every successful push re-syncs it for free from the response `date`
//! header.
//!
//! Power discipline: the radio is brought up on demand and released after a
//! successful push, but only once the device has been up for half an hour.
//! The grace period keeps the link available for configuration and debugging
//! right after deployment.

use core::fmt::Write as _;

use heapless::String;

use crate::network::ConnectionManager;
use crate::parameters::CollectorSettings;
use crate::platform::traits::clock::elapsed_ms;
use crate::platform::traits::{ClockInterface, HttpInterface, RadioInterface};
use crate::telemetry::buffer::{TelemetryBuffer, TELEMETRY_BUFFER_SIZE};
use crate::telemetry::clock::RemoteClock;

/// Maximum length of one formatted record
pub const MAX_RECORD_LEN: usize = 128;

/// Buffer occupancy that forces a push ahead of schedule
const PUSH_OCCUPANCY_PERCENT: usize = 80;

/// Uptime before the radio may be released after a push
const DISCONNECT_GRACE_MS: u32 = 30 * 60 * 1000;

/// Record sink handed to [`CollectorHooks::collect_sample`]
pub trait Appender {
    /// Append one sample, formatted with the given decimal precision
    fn append(&mut self, metric: &str, value: f32, precision: usize);
}

/// Board-specific collection behavior
///
/// Only `collect_sample` is mandatory; the other methods tune when samples
/// are taken and when the batch goes out.
pub trait CollectorHooks {
    /// Gate sample collection, e.g. while a sensor is warming up
    fn should_collect(&mut self) -> bool {
        true
    }

    /// Produce the samples for one collection cycle
    fn collect_sample(&mut self, out: &mut dyn Appender);

    /// Request a push ahead of schedule
    fn should_push_now(&mut self) -> bool {
        false
    }

    /// Called after every successful push
    fn on_pushed(&mut self) {}
}

/// Telemetry batching and push engine over an [`HttpInterface`]
pub struct TelemetryCollector<H: HttpInterface, const N: usize = TELEMETRY_BUFFER_SIZE> {
    http: H,
    pub settings: CollectorSettings,
    /// Value of the `src` tag on every record
    source: String<63>,
    buffer: TelemetryBuffer<N>,
    remote_clock: RemoteClock,
    enabled: bool,
    last_push: u32,
    last_collect: u32,
    /// Millisecond counter appended records are timestamped against;
    /// refreshed at the top of every poll and by [`TelemetryCollector::record`]
    stamp_ms: u32,
}

impl<H: HttpInterface, const N: usize> TelemetryCollector<H, N> {
    pub fn new(http: H, settings: CollectorSettings, source: &str) -> Self {
        Self {
            http,
            settings,
            source: String::try_from(source).unwrap_or_default(),
            buffer: TelemetryBuffer::new(),
            remote_clock: RemoteClock::new(),
            enabled: false,
            last_push: 0,
            last_collect: 0,
            stamp_ms: 0,
        }
    }

    /// Append one record outside a collection cycle, stamped at call time
    pub fn record<C: ClockInterface>(
        &mut self,
        clock: &C,
        metric: &str,
        value: f32,
        precision: usize,
    ) {
        self.stamp_ms = clock.now_ms();
        self.append(metric, value, precision);
    }

    /// Enable collection; idempotent
    ///
    /// The first collection fires on the next poll, the first push a full
    /// interval later. The remote clock is cleared so the next poll starts
    /// with a fresh handshake.
    pub fn start<C: ClockInterface>(&mut self, clock: &C) {
        if self.enabled {
            return;
        }
        self.enabled = true;

        let now = clock.now_ms();
        self.last_collect = now.wrapping_sub(self.settings.collect_interval as u32 * 1000);
        self.last_push = now;
        self.remote_clock.clear();
        crate::log_info!("Telemetry collector started");
    }

    /// Disable collection; idempotent
    ///
    /// Buffered records get one best-effort push so a settings change does
    /// not silently drop them.
    pub fn stop<R, C, K>(&mut self, wifi: &mut ConnectionManager<R>, clock: &C, hooks: &mut K)
    where
        R: RadioInterface,
        C: ClockInterface,
        K: CollectorHooks,
    {
        if !self.enabled {
            return;
        }
        self.enabled = false;

        if !self.buffer.is_empty() {
            self.push(wifi, clock, hooks);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_clock_synced(&self) -> bool {
        self.remote_clock.is_synced()
    }

    pub fn buffer(&self) -> &TelemetryBuffer<N> {
        &self.buffer
    }

    pub fn http_mut(&mut self) -> &mut H {
        &mut self.http
    }

    /// One collector step: clock bootstrap, push decision, collect decision
    pub fn poll<R, C, K>(&mut self, wifi: &mut ConnectionManager<R>, clock: &C, hooks: &mut K)
    where
        R: RadioInterface,
        C: ClockInterface,
        K: CollectorHooks,
    {
        if !self.enabled {
            return;
        }
        let now = clock.now_ms();
        self.stamp_ms = now;

        // Runs once per enable cycle. The radio stays up afterwards; the
        // first push decides whether to release it.
        if !self.remote_clock.is_synced() {
            if !wifi.is_connected() {
                if wifi.connect(clock).is_err() {
                    crate::log_error!("Radio failure while starting a connection");
                }
            } else {
                self.ping(now);
            }
        }

        let push_due = elapsed_ms(now, self.last_push) > self.settings.push_interval as u32 * 1000
            || self.buffer.occupancy_percent() >= PUSH_OCCUPANCY_PERCENT
            || hooks.should_push_now();
        if push_due {
            if self.buffer.is_empty() {
                self.last_push = now;
            } else if !wifi.is_connected() {
                if wifi.connect(clock).is_err() {
                    crate::log_error!("Radio failure while starting a connection");
                }
            } else if self.push(wifi, clock, hooks) {
                self.last_push = now;
                if now > DISCONNECT_GRACE_MS {
                    let _ = wifi.disconnect(clock);
                }
            }
        }

        let collect_interval_ms = self.settings.collect_interval as u32 * 1000;
        if elapsed_ms(now, self.last_collect) > collect_interval_ms && hooks.should_collect() {
            hooks.collect_sample(self);
            // Advance by the interval rather than to `now` so poll jitter
            // does not drift the collection cadence.
            self.last_collect = self.last_collect.wrapping_add(collect_interval_ms);
        }
    }

    /// Sync the remote clock from the server's ping endpoint
    fn ping(&mut self, now_ms: u32) {
        let mut url: String<96> = String::new();
        let _ = write!(url, "{}/ping", self.settings.address);

        match self.http.get(&url) {
            Ok(response) if response.status == 204 => {
                if let Some(date) = response.date {
                    if !self.remote_clock.sync(&date, now_ms) {
                        crate::log_warn!("Failed to parse the server date/time");
                    }
                }
            }
            Ok(response) => {
                crate::log_warn!("Ping failed with HTTP {}", response.status);
            }
            Err(_) => {
                crate::log_warn!("Ping failed, server unreachable");
            }
        }
    }

    /// Push the buffered batch; true on success
    fn push<R, C, K>(
        &mut self,
        wifi: &mut ConnectionManager<R>,
        clock: &C,
        hooks: &mut K,
    ) -> bool
    where
        R: RadioInterface,
        C: ClockInterface,
        K: CollectorHooks,
    {
        let mut url: String<96> = String::new();
        let _ = write!(
            url,
            "{}/write?precision=s&db={}",
            self.settings.address, self.settings.database
        );

        match self.http.post(&url, self.buffer.payload()) {
            Ok(response) if response.status == 204 => {
                self.buffer.clear();
                if let Some(date) = response.date {
                    let _ = self.remote_clock.sync(&date, clock.now_ms());
                }
                hooks.on_pushed();
                return true;
            }
            Ok(response) => {
                crate::log_warn!("Push failed with HTTP {}", response.status);
            }
            Err(_) => {
                crate::log_warn!("Push failed, server unreachable");
            }
        }

        // Cycling the connection clears most transient radio and DHCP
        // states; the batch stays buffered for the next attempt.
        let _ = wifi.disconnect(clock);
        let _ = wifi.connect(clock);
        false
    }
}

impl<H: HttpInterface, const N: usize> Appender for TelemetryCollector<H, N> {
    fn append(&mut self, metric: &str, value: f32, precision: usize) {
        let mut record: String<MAX_RECORD_LEN> = String::new();
        let formatted = if self.remote_clock.is_synced() {
            writeln!(
                record,
                "{},src={} value={:.*} {}",
                metric,
                self.source,
                precision,
                value,
                self.remote_clock.timestamp(self.stamp_ms)
            )
        } else {
            // Without a timestamp the server assigns receive time, which is
            // close enough until the first sync lands.
            writeln!(
                record,
                "{},src={} value={:.*}",
                metric, self.source, precision, value
            )
        };

        if formatted.is_err() {
            crate::log_warn!("Telemetry record too long, dropped");
            return;
        }
        if !self.buffer.append_record(&record) {
            crate::log_warn!("Telemetry buffer overflow!");
        }
    }
}

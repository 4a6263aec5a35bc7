//! Last-value query client
//!
//! Pull counterpart of the collector: periodically asks the time-series
//! server for the most recent value of one metric, filtered by source tag
//! and a look-back window. Used by boards whose control loop follows a
//! measurement produced elsewhere, e.g. a boiler controller following a room
//! thermostat's reading.

use core::fmt::Write as _;

use heapless::String;

use crate::network::ConnectionManager;
use crate::parameters::QuerySettings;
use crate::platform::traits::clock::elapsed_ms;
use crate::platform::traits::{ClockInterface, HttpInterface, RadioInterface};

/// Uptime before the radio may be released after a query
const RADIO_RELEASE_GRACE_MS: u32 = 10 * 60 * 1000;

/// Periodic last-value poller over an [`HttpInterface`]
pub struct QueryClient<H: HttpInterface> {
    http: H,
    pub settings: QuerySettings,
    last_query: u32,
    last_value: f32,
    data_available: bool,
}

impl<H: HttpInterface> QueryClient<H> {
    pub fn new(http: H, settings: QuerySettings) -> Self {
        Self {
            http,
            settings,
            last_query: 0,
            last_value: -1.0,
            data_available: false,
        }
    }

    /// Schedule the first query for the next poll
    pub fn begin<C: ClockInterface>(&mut self, clock: &C) {
        self.last_query = clock
            .now_ms()
            .wrapping_sub(self.settings.query_interval as u32 * 1000);
    }

    /// One client step: query when due, bringing the link up as needed
    pub fn poll<R, C>(&mut self, wifi: &mut ConnectionManager<R>, clock: &C)
    where
        R: RadioInterface,
        C: ClockInterface,
    {
        let now = clock.now_ms();
        if elapsed_ms(now, self.last_query) <= self.settings.query_interval as u32 * 1000 {
            return;
        }

        if !self.settings.is_configured() {
            crate::log_warn!("Query client is not configured");
            // Wait a full interval before complaining again
            self.last_query = now;
            return;
        }

        if !wifi.is_connected() {
            if wifi.connect(clock).is_err() {
                crate::log_error!("Radio failure while starting a connection");
            }
        } else if self.query(wifi, clock) {
            self.last_query = now;
            if now > RADIO_RELEASE_GRACE_MS {
                let _ = wifi.disconnect(clock);
            }
        }
    }

    /// The most recent retrieved value; -1.0 before the first datapoint
    pub fn last_value(&self) -> f32 {
        self.last_value
    }

    /// Whether a datapoint has arrived since the last [`QueryClient::purge_data`]
    pub fn is_data_available(&self) -> bool {
        self.data_available
    }

    /// Mark the current datapoint as consumed
    pub fn purge_data(&mut self) {
        self.data_available = false;
    }

    pub fn http_mut(&mut self) -> &mut H {
        &mut self.http
    }

    fn query<R, C>(&mut self, wifi: &mut ConnectionManager<R>, clock: &C) -> bool
    where
        R: RadioInterface,
        C: ClockInterface,
    {
        // SELECT last("value") FROM "{metric}"
        //   WHERE time >= now() - {look_back}m AND "src"='{src_tag}'
        // pre-encoded the way the server expects it
        let mut url: String<256> = String::new();
        let _ = write!(
            url,
            "{}/query?db={}&q=SELECT+last%28%22value%22%29+FROM+%22{}%22\
             +WHERE+time+%3E%3D+now%28%29+-+{}m+AND+%22src%22%3D%27{}%27",
            self.settings.address,
            self.settings.database,
            self.settings.metric,
            self.settings.look_back,
            self.settings.src_tag
        );

        match self.http.get(&url) {
            Ok(response) if response.status == 200 => {
                match extract_last_value(&response.body) {
                    Some(value) => {
                        self.last_value = value;
                        self.data_available = true;
                    }
                    // An empty look-back window is a normal outcome
                    None => crate::log_info!("Query response with no data"),
                }
                return true;
            }
            Ok(response) => {
                crate::log_warn!("Query failed with HTTP {}", response.status);
            }
            Err(_) => {
                crate::log_warn!("Query failed, server unreachable");
            }
        }

        let _ = wifi.disconnect(clock);
        let _ = wifi.connect(clock);
        false
    }
}

/// Pull `results[0].series[0].values[0][1]` out of a query response
///
/// The response shape is fixed for a `SELECT last(...)` query, so a
/// fixed-path scan is enough; a body without a `series` key means the
/// look-back window held no datapoints.
fn extract_last_value(body: &str) -> Option<f32> {
    let series = body.find("\"series\"")?;
    let values = series + body[series..].find("\"values\"")?;
    let row = values + body[values..].find("[[")? + 2;

    // First column is the timestamp string; the value follows the comma
    let rest = &body[row..];
    let value_start = rest.find(',')? + 1;
    let after = &rest[value_start..];
    let value_end = after.find([']', ','])?;

    after[..value_end].trim().parse::<f32>().ok()
}

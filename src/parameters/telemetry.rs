//! Telemetry settings
//!
//! Configuration for the collector (push side) and the query client (pull
//! side). Both talk to the same kind of time-series HTTP endpoint but are
//! configured independently, so each gets its own struct and flash region.

use heapless::String;

use super::{read_str_field, write_str_field, SettingField, SettingFlags};

/// Maximum server address length (scheme, host and port)
pub const MAX_ADDRESS_LEN: usize = 63;

/// Maximum database name length
pub const MAX_DATABASE_LEN: usize = 15;

/// Maximum metric name length
pub const MAX_METRIC_LEN: usize = 15;

/// Maximum source tag length
pub const MAX_SRC_TAG_LEN: usize = 31;

/// Serialized image size: enable 1 + address 64 + database 16 + push 2 + collect 2
pub const COLLECTOR_SETTINGS_SIZE: usize = 85;

/// Serialized image size: address 64 + database 16 + src 32 + metric 16 + interval 2 + look back 2
pub const QUERY_SETTINGS_SIZE: usize = 132;

pub const COLLECTOR_SETTING_FIELDS: &[SettingField] = &[
    SettingField {
        name: "ifx_enabled",
        flags: SettingFlags::empty(),
    },
    SettingField {
        name: "ifx_address",
        flags: SettingFlags::empty(),
    },
    SettingField {
        name: "ifx_db",
        flags: SettingFlags::empty(),
    },
    SettingField {
        name: "ifx_collect",
        flags: SettingFlags::empty(),
    },
    SettingField {
        name: "ifx_push",
        flags: SettingFlags::empty(),
    },
];

pub const QUERY_SETTING_FIELDS: &[SettingField] = &[
    SettingField {
        name: "ifxc_address",
        flags: SettingFlags::empty(),
    },
    SettingField {
        name: "ifxc_db",
        flags: SettingFlags::empty(),
    },
    SettingField {
        name: "ifxc_metric",
        flags: SettingFlags::empty(),
    },
    SettingField {
        name: "ifxc_src",
        flags: SettingFlags::empty(),
    },
    SettingField {
        name: "ifxc_qi",
        flags: SettingFlags::empty(),
    },
    SettingField {
        name: "ifxc_lb",
        flags: SettingFlags::empty(),
    },
];

/// Collector (push) configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorSettings {
    /// Master enable for the whole collector
    pub enable: bool,
    /// Server base address, e.g. `http://192.168.0.10:8086`
    pub address: String<MAX_ADDRESS_LEN>,
    /// Target database name
    pub database: String<MAX_DATABASE_LEN>,
    /// Seconds between pushes
    pub push_interval: u16,
    /// Seconds between sample collections
    pub collect_interval: u16,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            enable: false,
            address: String::new(),
            database: String::new(),
            push_interval: 300,
            collect_interval: 60,
        }
    }
}

impl CollectorSettings {
    pub fn apply_setting(&mut self, name: &str, value: &str) -> bool {
        match name {
            "ifx_enabled" => {
                let enable = value == "true" || value == "1" || value == "on";
                let changed = self.enable != enable;
                self.enable = enable;
                changed
            }
            "ifx_address" => replace(&mut self.address, value),
            "ifx_db" => replace(&mut self.database, value),
            "ifx_collect" => apply_u16(&mut self.collect_interval, value, 1),
            "ifx_push" => apply_u16(&mut self.push_interval, value, 1),
            _ => false,
        }
    }

    pub fn to_bytes(&self) -> [u8; COLLECTOR_SETTINGS_SIZE] {
        let mut image = [0u8; COLLECTOR_SETTINGS_SIZE];
        image[0] = self.enable as u8;
        write_str_field(&mut image[1..65], &self.address);
        write_str_field(&mut image[65..81], &self.database);
        image[81..83].copy_from_slice(&self.push_interval.to_le_bytes());
        image[83..85].copy_from_slice(&self.collect_interval.to_le_bytes());
        image
    }

    pub fn from_bytes(image: &[u8; COLLECTOR_SETTINGS_SIZE]) -> Self {
        Self {
            enable: image[0] != 0,
            address: read_str_field(&image[1..65]),
            database: read_str_field(&image[65..81]),
            push_interval: u16::from_le_bytes([image[81], image[82]]),
            collect_interval: u16::from_le_bytes([image[83], image[84]]),
        }
    }
}

/// Query client (pull) configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySettings {
    /// Server base address
    pub address: String<MAX_ADDRESS_LEN>,
    /// Database to query
    pub database: String<MAX_DATABASE_LEN>,
    /// Source tag to filter on
    pub src_tag: String<MAX_SRC_TAG_LEN>,
    /// Metric to query the last value of
    pub metric: String<MAX_METRIC_LEN>,
    /// Seconds between queries
    pub query_interval: u16,
    /// Look-back window in minutes
    pub look_back: u16,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            address: String::new(),
            database: String::new(),
            src_tag: String::new(),
            metric: String::new(),
            query_interval: 60,
            look_back: 60,
        }
    }
}

impl QuerySettings {
    /// All of address, database, metric and source tag must be set
    pub fn is_configured(&self) -> bool {
        !self.address.is_empty()
            && !self.database.is_empty()
            && !self.metric.is_empty()
            && !self.src_tag.is_empty()
    }

    pub fn apply_setting(&mut self, name: &str, value: &str) -> bool {
        match name {
            "ifxc_address" => replace(&mut self.address, value),
            "ifxc_db" => replace(&mut self.database, value),
            "ifxc_metric" => replace(&mut self.metric, value),
            "ifxc_src" => replace(&mut self.src_tag, value),
            "ifxc_qi" => apply_u16(&mut self.query_interval, value, 1),
            "ifxc_lb" => apply_u16(&mut self.look_back, value, 1),
            _ => false,
        }
    }

    pub fn to_bytes(&self) -> [u8; QUERY_SETTINGS_SIZE] {
        let mut image = [0u8; QUERY_SETTINGS_SIZE];
        write_str_field(&mut image[0..64], &self.address);
        write_str_field(&mut image[64..80], &self.database);
        write_str_field(&mut image[80..112], &self.src_tag);
        write_str_field(&mut image[112..128], &self.metric);
        image[128..130].copy_from_slice(&self.query_interval.to_le_bytes());
        image[130..132].copy_from_slice(&self.look_back.to_le_bytes());
        image
    }

    pub fn from_bytes(image: &[u8; QUERY_SETTINGS_SIZE]) -> Self {
        Self {
            address: read_str_field(&image[0..64]),
            database: read_str_field(&image[64..80]),
            src_tag: read_str_field(&image[80..112]),
            metric: read_str_field(&image[112..128]),
            query_interval: u16::from_le_bytes([image[128], image[129]]),
            look_back: u16::from_le_bytes([image[130], image[131]]),
        }
    }
}

fn replace<const N: usize>(dest: &mut String<N>, value: &str) -> bool {
    if dest.as_str() == value {
        return false;
    }
    if let Ok(new) = String::try_from(value) {
        *dest = new;
        true
    } else {
        false
    }
}

/// Parse and store a numeric field, rejecting values below `min`
fn apply_u16(dest: &mut u16, value: &str, min: u16) -> bool {
    match value.parse::<u16>() {
        Ok(parsed) if parsed >= min && parsed != *dest => {
            *dest = parsed;
            true
        }
        _ => false,
    }
}

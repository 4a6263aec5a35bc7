//! Retained quick-reconnect cache
//!
//! Channel and BSSID of the last access point, kept in retained memory so a
//! deep-sleep duty cycle can skip the network scan on wake. Power loss wipes
//! the block; the CRC catches partial writes and garbage after brownouts.

use crate::platform::traits::{ConnectHint, RetainedInterface};

/// Block layout: magic, channel, bssid, crc32 over the first 8 bytes
const BLOCK_SIZE: usize = 12;

const MAGIC: u8 = 0xB7;

/// Quick-reconnect cache in retained memory
pub struct ReconnectCache;

impl ReconnectCache {
    /// Load the cached hint, if a valid block is present
    pub fn load<R: RetainedInterface>(retained: &mut R) -> Option<ConnectHint> {
        let mut block = [0u8; BLOCK_SIZE];
        if !retained.load(&mut block) {
            return None;
        }
        if block[0] != MAGIC {
            return None;
        }

        let stored_crc = u32::from_le_bytes([block[8], block[9], block[10], block[11]]);
        let calculated_crc = crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC).checksum(&block[..8]);
        if stored_crc != calculated_crc {
            crate::log_warn!("Retained reconnect cache failed CRC check");
            return None;
        }

        let mut bssid = [0u8; 6];
        bssid.copy_from_slice(&block[2..8]);
        Some(ConnectHint {
            channel: block[1],
            bssid,
        })
    }

    /// Store a hint, recomputing the CRC
    pub fn store<R: RetainedInterface>(retained: &mut R, hint: &ConnectHint) {
        let mut block = [0u8; BLOCK_SIZE];
        block[0] = MAGIC;
        block[1] = hint.channel;
        block[2..8].copy_from_slice(&hint.bssid);

        let crc = crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC).checksum(&block[..8]);
        block[8..12].copy_from_slice(&crc.to_le_bytes());

        retained.store(&block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockRetained;

    fn hint() -> ConnectHint {
        ConnectHint {
            channel: 11,
            bssid: [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC],
        }
    }

    #[test]
    fn test_store_load_roundtrip() {
        let mut retained = MockRetained::new();
        ReconnectCache::store(&mut retained, &hint());

        assert_eq!(ReconnectCache::load(&mut retained), Some(hint()));
    }

    #[test]
    fn test_cold_boot_has_no_cache() {
        let mut retained = MockRetained::new();
        ReconnectCache::store(&mut retained, &hint());
        retained.reset_cold();

        assert_eq!(ReconnectCache::load(&mut retained), None);
    }

    #[test]
    fn test_corruption_rejected_by_crc() {
        let mut retained = MockRetained::new();
        ReconnectCache::store(&mut retained, &hint());
        retained.corrupt(3); // inside the bssid

        assert_eq!(ReconnectCache::load(&mut retained), None);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut retained = MockRetained::new();
        // A block that never held a cache, e.g. used by older firmware
        retained.store(&[0u8; BLOCK_SIZE]);

        assert_eq!(ReconnectCache::load(&mut retained), None);
    }
}

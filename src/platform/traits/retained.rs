//! Retained memory interface
//!
//! Small volatile storage that survives warm resets and deep-sleep cycles but
//! not power loss (RTC memory on most boards). The quick-reconnect cache
//! lives here so a deep-sleep duty cycle can skip the network scan.

/// Warm-reset-surviving storage block
pub trait RetainedInterface {
    /// Read the retained block into `buf`
    ///
    /// Returns false if the block has never been written since power-up (the
    /// content of `buf` is then undefined).
    fn load(&mut self, buf: &mut [u8]) -> bool;

    /// Store `data` into the retained block
    fn store(&mut self, data: &[u8]);
}

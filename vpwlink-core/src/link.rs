//! Link context
//!
//! [`VpwLink`] owns everything the communication core touches: the
//! line-controller port, the watchdog handle, the staging buffer, the trace
//! buffer, and the configuration. There is exactly one logical thread of
//! control, so single ownership stands in for the mutual exclusion a
//! concurrent design would need.

use crate::buffer::StagingBuffer;
use crate::checksum;
use crate::config::LinkConfig;
use crate::trace::TraceBuffer;
use crate::traits::{LineControllerPort, Watchdog};

/// The VPW bus communication core
///
/// The receive decoder, transmit engine, and message helpers are implemented
/// as methods in their own modules; this module carries construction, staging
/// buffer access, and the checksum forwarding used by the block-read protocol.
pub struct VpwLink<P, W> {
    pub(crate) port: P,
    pub(crate) watchdog: W,
    pub(crate) staging: StagingBuffer,
    pub(crate) trace: TraceBuffer,
    pub(crate) config: LinkConfig,
}

impl<P, W> VpwLink<P, W>
where
    P: LineControllerPort,
    W: Watchdog,
{
    /// Create a link over the given port and watchdog
    pub fn new(port: P, watchdog: W, config: LinkConfig) -> Self {
        Self {
            port,
            watchdog,
            staging: StagingBuffer::new(),
            trace: TraceBuffer::new(),
            config,
        }
    }

    /// Staged message bytes
    pub fn staging(&self) -> &[u8] {
        self.staging.as_slice()
    }

    /// Staged message bytes, mutable
    ///
    /// The higher-level command interpreter composes outbound messages
    /// directly in the staging buffer before calling
    /// [`write_staged`](Self::write_staged).
    pub fn staging_mut(&mut self) -> &mut [u8] {
        self.staging.as_mut_slice()
    }

    /// Zero-fill the staging buffer
    pub fn clear_staging(&mut self) {
        self.staging.clear(&mut self.watchdog);
    }

    /// Copy `src` into the staging buffer at `offset`
    pub fn stage(&mut self, src: &[u8], offset: usize) {
        self.staging.copy_from(&mut self.watchdog, src, offset);
    }

    /// Move the first `len` staged bytes to `offset` (overlap-safe)
    pub fn shift_staged(&mut self, len: usize, offset: usize) {
        self.staging.move_to_offset(&mut self.watchdog, len, offset);
    }

    /// Checksum of the staged block-message header
    pub fn header_checksum(&self) -> u16 {
        checksum::header_checksum(&self.staging)
    }

    /// Checksum of an external payload, keeping the watchdog alive
    pub fn payload_checksum(&mut self, payload: &[u8]) -> u16 {
        checksum::payload_checksum(&mut self.watchdog, payload)
    }

    /// Store a block checksum after the staged payload region
    pub fn set_block_checksum(&mut self, payload_len: usize, value: u16) {
        checksum::set_block_checksum(&mut self.staging, payload_len, value);
    }

    /// Recorded trace values, oldest first
    pub fn trace(&self) -> &[u8] {
        self.trace.values()
    }

    /// Active configuration
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Tear down the link, returning the port and watchdog
    pub fn release(self) -> (P, W) {
        (self.port, self.watchdog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimPort, SimWatchdog};

    fn make_link() -> VpwLink<SimPort, SimWatchdog> {
        VpwLink::new(SimPort::new(), SimWatchdog::new(), LinkConfig::default())
    }

    #[test]
    fn test_stage_then_shift_makes_header_room() {
        let mut link = make_link();
        link.stage(&[1, 2, 3, 4, 5, 6], 0);

        // Shift the staged payload deeper to make room for a 4-byte header
        link.shift_staged(6, 4);

        assert_eq!(&link.staging()[4..10], &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_block_checksum_round_trip_layout() {
        let mut link = make_link();
        // Header bytes 4..10, payload of 4 bytes at offset 10
        link.stage(&[0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 0x10, 0x20, 0x30, 0x40], 0);

        let header = link.header_checksum();
        let payload = {
            let bytes = [0x10, 0x20, 0x30, 0x40];
            link.payload_checksum(&bytes)
        };
        link.set_block_checksum(4, header.wrapping_add(payload));

        assert_eq!(header, 21);
        assert_eq!(payload, 0xA0);
        assert_eq!(link.staging()[14], 0x00);
        assert_eq!(link.staging()[15], 21 + 0xA0);
    }

    #[test]
    fn test_release_returns_hardware_handles() {
        let link = make_link();
        let (port, wd) = link.release();
        assert_eq!(port.status_reads(), 0);
        assert_eq!(wd.services(), 0);
    }
}

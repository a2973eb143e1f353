//! Message staging buffer
//!
//! All message content, outbound and inbound, passes through one
//! fixed-capacity byte store. The buffer is owned by the link context and
//! reused sequentially; contents persist between calls so a message can be
//! staged over several calls before being sent. It is cleared explicitly
//! after every completed transmission.

use crate::traits::Watchdog;

/// Staging buffer capacity in bytes
pub const STAGING_CAPACITY: usize = 1024;

/// How many bytes a fill or copy may touch between watchdog services
const SERVICE_STRIDE: usize = 100;

/// Fixed-capacity staging buffer for message content
pub struct StagingBuffer {
    bytes: [u8; STAGING_CAPACITY],
}

impl Default for StagingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl StagingBuffer {
    /// Create a zeroed staging buffer
    pub const fn new() -> Self {
        Self {
            bytes: [0; STAGING_CAPACITY],
        }
    }

    /// Buffer contents as a slice
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Buffer contents as a mutable slice
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Zero-fill the whole capacity
    ///
    /// Not required for correctness, but stale bytes from a previous message
    /// make debugging miserable; a clean buffer makes them visible. The fill
    /// is itself a bounded loop, so it services the watchdog periodically.
    pub fn clear<W: Watchdog>(&mut self, wd: &mut W) {
        for (index, byte) in self.bytes.iter_mut().enumerate() {
            *byte = 0;
            if index % SERVICE_STRIDE == 0 {
                wd.service();
            }
        }
    }

    /// Copy an external slice into the buffer at `offset`
    ///
    /// Copies from the highest index down to the lowest. The order matters for
    /// [`StagingBuffer::move_to_offset`], which shares this loop shape; keeping
    /// both back-to-front means an overlapping forward move can never clobber
    /// unread source bytes.
    pub fn copy_from<W: Watchdog>(&mut self, wd: &mut W, src: &[u8], offset: usize) {
        debug_assert!(offset + src.len() <= STAGING_CAPACITY);
        if offset + src.len() > STAGING_CAPACITY {
            return;
        }

        for index in (0..src.len()).rev() {
            self.bytes[offset + index] = src[index];
            if index % SERVICE_STRIDE == 0 {
                wd.service();
            }
        }
    }

    /// Move the first `len` bytes of the buffer to `offset`
    ///
    /// The destination range may overlap the source range (a message being
    /// shifted deeper into the buffer to make room for a header). The copy
    /// runs from the highest index down to the lowest so the overlapping
    /// bytes are read before they are overwritten.
    pub fn move_to_offset<W: Watchdog>(&mut self, wd: &mut W, len: usize, offset: usize) {
        debug_assert!(offset + len <= STAGING_CAPACITY);
        if offset + len > STAGING_CAPACITY {
            return;
        }

        for index in (0..len).rev() {
            self.bytes[offset + index] = self.bytes[index];
            if index % SERVICE_STRIDE == 0 {
                wd.service();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimWatchdog;
    use proptest::prelude::*;

    #[test]
    fn test_clear_zeroes_everything() {
        let mut wd = SimWatchdog::new();
        let mut buf = StagingBuffer::new();
        buf.as_mut_slice().fill(0xA5);

        buf.clear(&mut wd);

        assert!(buf.as_slice().iter().all(|&b| b == 0));
        // Serviced every 100 bytes across the 1024-byte fill
        assert!(wd.services() >= 10);
    }

    #[test]
    fn test_copy_from_places_bytes_at_offset() {
        let mut wd = SimWatchdog::new();
        let mut buf = StagingBuffer::new();

        buf.copy_from(&mut wd, &[1, 2, 3, 4], 10);

        assert_eq!(&buf.as_slice()[10..14], &[1, 2, 3, 4]);
        assert_eq!(buf.as_slice()[9], 0);
        assert_eq!(buf.as_slice()[14], 0);
    }

    #[test]
    fn test_copy_from_fills_up_to_capacity() {
        let mut wd = SimWatchdog::new();
        let mut buf = StagingBuffer::new();
        let src = [0xFF; 8];

        // A copy ending exactly at capacity is legal
        buf.copy_from(&mut wd, &src, STAGING_CAPACITY - 8);

        assert_eq!(&buf.as_slice()[STAGING_CAPACITY - 8..], &src);
    }

    #[test]
    fn test_overlapping_forward_move() {
        let mut wd = SimWatchdog::new();
        let mut buf = StagingBuffer::new();
        let payload: [u8; 8] = [10, 20, 30, 40, 50, 60, 70, 80];
        buf.copy_from(&mut wd, &payload, 0);

        // Destination [3, 11) overlaps source [0, 8)
        buf.move_to_offset(&mut wd, payload.len(), 3);

        assert_eq!(&buf.as_slice()[3..11], &payload);
    }

    proptest! {
        #[test]
        fn prop_overlapping_moves_preserve_data(
            payload in proptest::collection::vec(any::<u8>(), 1..64),
            offset in 1usize..64,
        ) {
            let mut wd = SimWatchdog::new();
            let mut buf = StagingBuffer::new();
            buf.copy_from(&mut wd, &payload, 0);

            buf.move_to_offset(&mut wd, payload.len(), offset);

            prop_assert_eq!(&buf.as_slice()[offset..offset + payload.len()], &payload[..]);
        }
    }
}

//! Additive checksum engine for block transfers
//!
//! The block-read protocol carries a 16-bit additive checksum over the staged
//! message: a fixed header region plus the payload. The sum wraps on overflow.
//! This is separate from the per-frame bus checksum, which the line controller
//! computes and appends itself.

use crate::buffer::StagingBuffer;
use crate::traits::Watchdog;

/// Header region of a staged block message covered by the checksum
pub const HEADER_RANGE: core::ops::Range<usize> = 4..10;

/// Offset of the payload within a staged block message
pub const BLOCK_PAYLOAD_OFFSET: usize = 10;

/// How many payload bytes a checksum pass may touch between watchdog services
const SERVICE_STRIDE: usize = 100;

/// Wrapping 16-bit additive sum over a byte range
///
/// An empty range sums to 0; sums past 65535 wrap, they do not saturate.
pub fn sum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |acc, &byte| acc.wrapping_add(byte as u16))
}

/// Checksum of the staged message header (staging bytes 4 through 9)
pub fn header_checksum(staging: &StagingBuffer) -> u16 {
    sum(&staging.as_slice()[HEADER_RANGE])
}

/// Checksum of a block payload, keeping the watchdog alive
///
/// Payloads can be kilobytes of flash content, long enough that the pass
/// itself must service the watchdog periodically.
pub fn payload_checksum<W: Watchdog>(wd: &mut W, payload: &[u8]) -> u16 {
    wd.service();

    let mut checksum = 0u16;
    for (index, &byte) in payload.iter().enumerate() {
        checksum = checksum.wrapping_add(byte as u16);
        if index % SERVICE_STRIDE == 0 {
            wd.service();
        }
    }

    wd.service();
    checksum
}

/// Store a block checksum as two big-endian bytes after the payload region
pub fn set_block_checksum(staging: &mut StagingBuffer, payload_len: usize, checksum: u16) {
    let [high, low] = checksum.to_be_bytes();
    staging.as_mut_slice()[BLOCK_PAYLOAD_OFFSET + payload_len] = high;
    staging.as_mut_slice()[BLOCK_PAYLOAD_OFFSET + payload_len + 1] = low;
}

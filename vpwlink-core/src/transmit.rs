//! Transmit engine
//!
//! Drains a byte range into the line controller in framed segments. The
//! controller appends the frame checksum itself; this engine only sequences
//! the frame-start/frame-end commands, paces writes against the transmit FIFO
//! fullness field, and confirms the frame has left the device.

use crate::liveness::{bounded_retry, spin};
use crate::trace::TraceMode;
use crate::traits::{
    LineControllerPort, Watchdog, CMD_FRAME_END, CMD_FRAME_START, CMD_SEND_CHECKSUM,
};
use crate::{TraceBuffer, VpwLink};

/// Back-off retries while the transmit FIFO reads almost-full or full
pub const TX_BACKOFF_BUDGET: u32 = 250;

/// Drain-confirmation retries after the end of a frame
pub const TX_DRAIN_BUDGET: u32 = 250;

/// Pacing spin per back-off retry
const BACKOFF_SPIN: u32 = 50;

/// Pacing spin per drain-confirmation retry
const DRAIN_SPIN: u32 = 25;

/// Which part of a logical message a single write call carries
///
/// A message larger than one call's argument range is streamed across
/// multiple calls: Start, then Middle as many times as needed, then End.
/// Only Start emits the frame-start command and only End closes the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segment(u8);

impl Segment {
    /// First part of a message
    pub const START: Segment = Segment(0b001);
    /// Interior part of a message
    pub const MIDDLE: Segment = Segment(0b010);
    /// Final part of a message
    pub const END: Segment = Segment(0b100);
    /// An entire message in one call
    pub const COMPLETE: Segment = Segment(Self::START.0 | Self::END.0);

    /// True when this call opens the frame
    pub fn has_start(self) -> bool {
        self.0 & Self::START.0 != 0
    }

    /// True when this call closes the frame
    pub fn has_end(self) -> bool {
        self.0 & Self::END.0 != 0
    }
}

impl core::ops::BitOr for Segment {
    type Output = Segment;

    fn bitor(self, rhs: Segment) -> Segment {
        Segment(self.0 | rhs.0)
    }
}

/// Outcome of a transmit call
///
/// The engine is best-effort past a stall: bytes keep flowing even when the
/// fullness back-off or the drain confirmation exhausts its budget, but the
/// condition is reported so the caller can decide what to do about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum WriteOutcome {
    /// All bytes handed to the controller without incident
    Sent,
    /// Sent, but a fullness back-off or drain wait ran out of budget
    SentAfterStall,
}

impl WriteOutcome {
    /// True when a stall condition was observed
    pub fn stalled(self) -> bool {
        self == WriteOutcome::SentAfterStall
    }
}

impl<P, W> VpwLink<P, W>
where
    P: LineControllerPort,
    W: Watchdog,
{
    /// Send a byte range onto the bus
    ///
    /// On an End segment the staging buffer is cleared once the frame has
    /// left the device; segments without End leave the frame open for a
    /// subsequent Middle or End call.
    pub fn write_message(&mut self, data: &[u8], segment: Segment) -> WriteOutcome {
        let Self {
            port,
            watchdog,
            staging,
            trace,
            config,
        } = self;

        let tracing = config.trace_mode == TraceMode::Transmit;
        let stalled = send(port, watchdog, trace, tracing, data, segment);

        if segment.has_end() {
            staging.clear(watchdog);
        }

        if stalled {
            WriteOutcome::SentAfterStall
        } else {
            WriteOutcome::Sent
        }
    }

    /// Send the first `len` staged bytes onto the bus
    ///
    /// Same engine as [`write_message`](Self::write_message), reading from
    /// the staging buffer, for messages composed in place.
    pub fn write_staged(&mut self, len: usize, segment: Segment) -> WriteOutcome {
        let Self {
            port,
            watchdog,
            staging,
            trace,
            config,
        } = self;

        let tracing = config.trace_mode == TraceMode::Transmit;
        let stalled = send(
            port,
            watchdog,
            trace,
            tracing,
            &staging.as_slice()[..len],
            segment,
        );

        if segment.has_end() {
            staging.clear(watchdog);
        }

        if stalled {
            WriteOutcome::SentAfterStall
        } else {
            WriteOutcome::Sent
        }
    }
}

/// Core send loop; returns true when a stall was observed
fn send<P, W>(
    port: &mut P,
    watchdog: &mut W,
    trace: &mut TraceBuffer,
    tracing: bool,
    data: &[u8],
    segment: Segment,
) -> bool
where
    P: LineControllerPort,
    W: Watchdog,
{
    watchdog.service();

    let mut stalled = false;

    if segment.has_start() {
        port.write_command(CMD_FRAME_START);
    }

    // The last byte of an End segment goes through the frame-end path below
    let body_len = if segment.has_end() {
        data.len().saturating_sub(1)
    } else {
        data.len()
    };

    for &byte in &data[..body_len] {
        port.write_data(byte);
        watchdog.service();

        // Pause while the transmit FIFO reports almost-full or full
        if port.read_status().fullness().needs_backoff() {
            let wait = bounded_retry(watchdog, TX_BACKOFF_BUDGET, || {
                spin(BACKOFF_SPIN);
                !port.read_status().fullness().needs_backoff()
            });
            if wait.exhausted() {
                stalled = true;
            }
        }
    }

    if segment.has_end() {
        if let Some(&last) = data.last() {
            port.write_command(CMD_FRAME_END);
            port.write_data(last);
        }

        spin(DRAIN_SPIN);
        port.write_command(CMD_SEND_CHECKSUM);
        // Placeholder byte; the controller substitutes the real checksum
        port.write_data(0x00);

        // Wait for the frame to actually leave the device. The fullness
        // field reads full for a while and then drops straight to ready.
        let wait = bounded_retry(watchdog, TX_DRAIN_BUDGET, || {
            let fullness = port.read_status().fullness();
            if tracing {
                let _ = trace.record(fullness as u8);
            }
            if fullness.is_drained() {
                true
            } else {
                spin(DRAIN_SPIN);
                false
            }
        });
        if wait.exhausted() {
            stalled = true;
        }
    }

    stalled
}

//! Fixed message helpers
//!
//! The payload conventions here belong to the higher-level protocol; the
//! core only knows how to compose the two frames it must be able to send on
//! its own: the reboot notification and the tool-presence heartbeat.

use crate::liveness::{self, long_sleep};
use crate::traits::{LineControllerPort, Watchdog};
use crate::transmit::Segment;
use crate::{VpwLink, WriteOutcome};

/// Header of the reboot notification frame
pub const REBOOT_HEADER: [u8; 4] = [0x6C, 0xF0, 0x10, 0x60];

/// Header of the tool-presence heartbeat frame
pub const TOOL_PRESENT_HEADER: [u8; 4] = [0x8C, 0xFE, 0xF0, 0x3F];

/// Compose the 8-byte reboot notification for a reason code
pub fn reboot_frame(reason: u32) -> [u8; 8] {
    let [b3, b2, b1, b0] = reason.to_be_bytes();
    [
        REBOOT_HEADER[0],
        REBOOT_HEADER[1],
        REBOOT_HEADER[2],
        REBOOT_HEADER[3],
        b3,
        b2,
        b1,
        b0,
    ]
}

/// Compose the 8-byte tool-presence heartbeat with caller-supplied bytes
pub fn tool_present_frame(extra: [u8; 4]) -> [u8; 8] {
    [
        TOOL_PRESENT_HEADER[0],
        TOOL_PRESENT_HEADER[1],
        TOOL_PRESENT_HEADER[2],
        TOOL_PRESENT_HEADER[3],
        extra[0],
        extra[1],
        extra[2],
        extra[3],
    ]
}

impl<P, W> VpwLink<P, W>
where
    P: LineControllerPort,
    W: Watchdog,
{
    /// Send a tool-presence heartbeat with four caller-supplied bytes
    pub fn send_tool_present(&mut self, extra: [u8; 4]) -> WriteOutcome {
        let frame = tool_present_frame(extra);
        self.write_message(&frame, Segment::COMPLETE)
    }

    /// Announce why we are rebooting, then halt
    ///
    /// Stages and sends the reboot notification, then stops servicing the
    /// watchdog and spins. The kernel never resets itself; the watchdog
    /// performs the reset once servicing stops.
    pub fn reboot(&mut self, reason: u32) -> ! {
        long_sleep(&mut self.watchdog);

        let frame = reboot_frame(reason);
        self.stage(&frame, 0);
        let _ = self.write_staged(frame.len(), Segment::COMPLETE);

        long_sleep(&mut self.watchdog);

        loop {
            liveness::spin(1);
        }
    }
}

//! Receive decoder
//!
//! Polls the line-controller status register, classifies each poll, assembles
//! incoming data bytes into the staging buffer, and decides when a message is
//! complete or has failed. The decoder never blocks: the poll loop is bounded
//! and services the watchdog on every iteration.

use crate::buffer::STAGING_CAPACITY;
use crate::liveness::{self, bounded_retry};
use crate::status::RxKind;
use crate::trace::TraceMode;
use crate::traits::{LineControllerPort, Watchdog, CMD_ACK_COMPLETION};
use crate::VpwLink;

/// Poll iterations before a whole-message read reports [`ReadOutcome::Timeout`]
pub const RX_POLL_BUDGET: u32 = 30_000;

/// Poll iterations before [`VpwLink::poll_next_byte`] reports silence
pub const POLL_BYTE_BUDGET: u32 = 1_000;

/// Completion-code bits that mark a recognized but content-less outcome
pub const SUPPRESSED_MASK: u8 = 0x30;

/// Pacing spin between idle polls
const IDLE_SPIN: u32 = 4;

/// Drain attempts after the controller reports a receive overflow
const OVERFLOW_DRAIN_BUDGET: u32 = STAGING_CAPACITY as u32;

/// Outcome of a whole-message read
///
/// Failure outcomes preserve the partial length so callers can inspect what
/// did arrive; the bytes stay in the staging buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum ReadOutcome {
    /// A complete message of `len` bytes is in the staging buffer
    Success { len: usize },
    /// The completion code marked a recognized, content-less terminal
    /// condition; no usable payload
    Suppressed,
    /// The controller reported a receive overflow; the FIFO was drained and
    /// the message discarded
    Overflow,
    /// The poll budget ran out before a terminal status arrived
    Timeout { len: usize },
    /// The configured receive byte cap was hit (development aid)
    ByteLimit { len: usize },
    /// The receive trace buffer filled up (development aid)
    TraceLimit { len: usize },
}

impl ReadOutcome {
    /// Bytes accumulated in the staging buffer when the outcome was produced
    pub fn len(&self) -> usize {
        match *self {
            ReadOutcome::Success { len }
            | ReadOutcome::Timeout { len }
            | ReadOutcome::ByteLimit { len }
            | ReadOutcome::TraceLimit { len } => len,
            ReadOutcome::Suppressed | ReadOutcome::Overflow => 0,
        }
    }
}

/// Result of [`VpwLink::read_message`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadResult {
    /// How the read ended
    pub outcome: ReadOutcome,
    /// Last completion code read from the controller, if any
    pub completion: Option<u8>,
}

/// Classification of a single [`VpwLink::poll_next_byte`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollClass {
    /// Nothing arrived within the poll budget
    Silence,
    /// One data byte was read from the receive FIFO
    Data(u8),
    /// A completion code was read and acknowledged
    Completion(u8),
    /// The controller reported a receive overflow; the FIFO was drained
    Overflow,
}

impl<P, W> VpwLink<P, W>
where
    P: LineControllerPort,
    W: Watchdog,
{
    /// Read one message from the bus into the staging buffer
    ///
    /// Termination requires both a completion code and at least one buffered
    /// data byte; a completion code arriving while the buffer is empty is a
    /// bare signal and polling continues. On timeout the partial length is
    /// reported, not discarded.
    pub fn read_message(&mut self) -> ReadResult {
        self.watchdog.service();

        if self.config.trace_mode == TraceMode::Receive {
            self.trace.clear();
        }

        let mut len = 0usize;
        let mut completion = None;

        for _ in 0..RX_POLL_BUDGET {
            self.watchdog.service();

            if let Some(limit) = self.config.rx_byte_limit {
                if len == limit {
                    return ReadResult {
                        outcome: ReadOutcome::ByteLimit { len },
                        completion,
                    };
                }
            }

            match self.port.read_status().receive().kind() {
                RxKind::Idle => {
                    liveness::spin(IDLE_SPIN);
                }
                RxKind::Data => {
                    if len == STAGING_CAPACITY {
                        // The tool sent more than the staging buffer holds;
                        // abort and report rather than write past capacity.
                        return ReadResult {
                            outcome: ReadOutcome::ByteLimit { len },
                            completion,
                        };
                    }
                    self.staging.as_mut_slice()[len] = self.port.read_data();
                    len += 1;
                }
                RxKind::Completion => {
                    let code = self.port.read_data();
                    // Acknowledge per the DLC handshake
                    self.port.write_command(CMD_ACK_COMPLETION);
                    completion = Some(code);

                    if len == 0 {
                        // Bare completion code with no payload yet; never a
                        // terminal condition. Record it when tracing.
                        if self.config.trace_mode == TraceMode::Receive
                            && !self.trace.record(code)
                        {
                            return ReadResult {
                                outcome: ReadOutcome::TraceLimit { len },
                                completion,
                            };
                        }
                        continue;
                    }

                    if code & SUPPRESSED_MASK == SUPPRESSED_MASK {
                        return ReadResult {
                            outcome: ReadOutcome::Suppressed,
                            completion,
                        };
                    }

                    return ReadResult {
                        outcome: ReadOutcome::Success { len },
                        completion,
                    };
                }
                RxKind::Overflow => {
                    self.drain_overflow();
                    return ReadResult {
                        outcome: ReadOutcome::Overflow,
                        completion,
                    };
                }
            }
        }

        ReadResult {
            outcome: ReadOutcome::Timeout { len },
            completion,
        }
    }

    /// Poll for the next byte or completion code
    ///
    /// Lower-level sibling of [`read_message`](Self::read_message) for callers
    /// that frame their own reads. One call classifies at most one FIFO entry.
    pub fn poll_next_byte(&mut self) -> PollClass {
        let Self {
            port, watchdog, ..
        } = self;

        let mut class = PollClass::Silence;
        let _ = bounded_retry(watchdog, POLL_BYTE_BUDGET, || {
            match port.read_status().receive().kind() {
                RxKind::Idle => {
                    liveness::spin(IDLE_SPIN);
                    false
                }
                RxKind::Data => {
                    class = PollClass::Data(port.read_data());
                    true
                }
                RxKind::Completion => {
                    let code = port.read_data();
                    port.write_command(CMD_ACK_COMPLETION);
                    class = PollClass::Completion(code);
                    true
                }
                RxKind::Overflow => {
                    class = PollClass::Overflow;
                    true
                }
            }
        });

        if class == PollClass::Overflow {
            self.drain_overflow();
        }

        class
    }

    /// Drain and discard the receive FIFO while the overflow condition holds
    fn drain_overflow(&mut self) {
        let Self {
            port, watchdog, ..
        } = self;

        let _ = bounded_retry(watchdog, OVERFLOW_DRAIN_BUDGET, || {
            if port.read_status().receive().kind() == RxKind::Overflow {
                let _ = port.read_data();
                false
            } else {
                true
            }
        });
    }
}

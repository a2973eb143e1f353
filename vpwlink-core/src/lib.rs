//! Board-agnostic VPW bus communication core for the flash kernel
//!
//! This crate contains the framing/decoding engine that moves bytes between
//! the kernel and the diagnostic tool over the single-wire VPW bus, via a
//! dedicated line-controller device:
//!
//! - Hardware abstraction traits (line controller port, watchdog)
//! - Watchdog-safe bounded polling primitives
//! - Staging buffer with overlap-safe copies
//! - Additive 16-bit checksum engine for block transfers
//! - Status-driven receive decoder
//! - Segmented transmit engine with flow-control back-off
//!
//! Everything here runs as a single sequential flow of control. Every wait is
//! a bounded busy-loop that services the watchdog each iteration; an unbounded
//! loop anywhere in this crate is a correctness bug (the supervising timer
//! resets the processor if it is not serviced on a tight cadence).

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod buffer;
pub mod checksum;
pub mod config;
pub mod link;
pub mod liveness;
pub mod message;
pub mod receive;
pub mod status;
pub mod trace;
pub mod traits;
pub mod transmit;

#[cfg(test)]
pub(crate) mod sim;

pub use buffer::{StagingBuffer, STAGING_CAPACITY};
pub use config::LinkConfig;
pub use link::VpwLink;
pub use receive::{PollClass, ReadOutcome, ReadResult};
pub use status::{LineStatus, RxKind, RxStatus, TxFullness};
pub use trace::{TraceBuffer, TraceMode};
pub use transmit::{Segment, WriteOutcome};

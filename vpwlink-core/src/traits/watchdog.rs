//! Watchdog service abstraction
//!
//! The supervising timer resets the processor unless it is serviced on a
//! tight cadence. Servicing is write-only: each of the two watchdog registers
//! takes a fixed two-write toggle sequence, with no read feedback.

/// Supervising timer service handle
///
/// Every polling or delay loop in this crate must call [`Watchdog::service`]
/// at least once per iteration. Failing to do so causes an uncommanded
/// hardware reset, not an error return.
pub trait Watchdog {
    /// Perform the two-register toggle sequence that resets the timer
    fn service(&mut self);
}

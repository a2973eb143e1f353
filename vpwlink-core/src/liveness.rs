//! Watchdog-safe bounded waiting primitives
//!
//! Every delay in this crate is a busy-wait, never a true block, and every
//! busy-wait services the watchdog on each iteration. These helpers give the
//! polling loops a single shape so a timeout path cannot be written without
//! the service call.

use crate::traits::Watchdog;

/// Outer iteration count for [`long_sleep`]; a bit under half a second
pub const LONG_SLEEP_ITERATIONS: u32 = 10_000;

/// Short calibrated busy spin
///
/// One unit is a handful of cycles; used to pace retry loops between
/// status reads.
#[inline]
pub fn spin(iterations: u32) {
    for _ in 0..iterations {
        core::hint::spin_loop();
    }
}

/// Long paced delay that keeps the watchdog alive throughout
pub fn long_sleep<W: Watchdog>(wd: &mut W) {
    for _ in 0..LONG_SLEEP_ITERATIONS {
        wd.service();
        spin(10);
    }
}

/// Result of a bounded retry loop
///
/// Exhaustion is a distinct, reportable outcome; callers must inspect it
/// rather than assume the predicate was eventually satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum RetryOutcome {
    /// The step reported completion within the budget
    Satisfied,
    /// The budget ran out before the step reported completion
    Exhausted,
}

impl RetryOutcome {
    /// True when the budget ran out
    pub fn exhausted(self) -> bool {
        self == RetryOutcome::Exhausted
    }
}

/// Run `step` up to `budget` times, servicing the watchdog before each call
///
/// `step` performs one unit of work or one status check and returns true once
/// its condition is satisfied. The watchdog service is structural: there is no
/// way through this loop, including the exhaustion path, that skips it.
pub fn bounded_retry<W, F>(wd: &mut W, budget: u32, mut step: F) -> RetryOutcome
where
    W: Watchdog,
    F: FnMut() -> bool,
{
    for _ in 0..budget {
        wd.service();
        if step() {
            return RetryOutcome::Satisfied;
        }
    }
    RetryOutcome::Exhausted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimWatchdog;

    #[test]
    fn test_retry_satisfied_stops_early() {
        let mut wd = SimWatchdog::new();
        let mut calls = 0;
        let outcome = bounded_retry(&mut wd, 100, || {
            calls += 1;
            calls == 3
        });
        assert_eq!(outcome, RetryOutcome::Satisfied);
        assert_eq!(calls, 3);
        assert_eq!(wd.services(), 3);
    }

    #[test]
    fn test_retry_exhaustion_is_reported() {
        let mut wd = SimWatchdog::new();
        let outcome = bounded_retry(&mut wd, 25, || false);
        assert!(outcome.exhausted());
        // Watchdog serviced on every iteration including the last
        assert_eq!(wd.services(), 25);
    }

    #[test]
    fn test_zero_budget_exhausts_immediately() {
        let mut wd = SimWatchdog::new();
        let outcome = bounded_retry(&mut wd, 0, || true);
        assert!(outcome.exhausted());
        assert_eq!(wd.services(), 0);
    }

    #[test]
    fn test_long_sleep_services_every_outer_iteration() {
        let mut wd = SimWatchdog::new();
        long_sleep(&mut wd);
        assert_eq!(wd.services(), LONG_SLEEP_ITERATIONS);
    }
}

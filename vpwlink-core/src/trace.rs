//! Diagnostic trace buffer
//!
//! A tiny capture buffer for post-mortem inspection of the bus engine. When
//! something misbehaves on real hardware, the kernel can dump these few bytes
//! back to the tool to show what the line controller was reporting.
//!
//! Only one trace mode is active at a time, selected once at initialization.

use heapless::Vec;

/// Trace buffer capacity in bytes
pub const TRACE_CAPACITY: usize = 6;

/// What the trace buffer records, selected once in [`crate::LinkConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraceMode {
    /// Tracing disabled
    #[default]
    Off,
    /// Record bare completion codes seen by the receive decoder
    Receive,
    /// Record fullness values seen during the transmit drain wait
    Transmit,
}

/// Fixed-capacity capture buffer for recent status/completion values
#[derive(Debug, Default)]
pub struct TraceBuffer {
    values: Vec<u8, TRACE_CAPACITY>,
}

impl TraceBuffer {
    /// Create an empty trace buffer
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Discard all recorded values
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Record one value; returns false when the buffer is already full
    pub fn record(&mut self, value: u8) -> bool {
        self.values.push(value).is_ok()
    }

    /// True when no further values can be recorded
    pub fn is_full(&self) -> bool {
        self.values.is_full()
    }

    /// Recorded values, oldest first
    pub fn values(&self) -> &[u8] {
        &self.values
    }
}

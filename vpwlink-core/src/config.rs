//! Link configuration
//!
//! Selected once when the link context is created; there is no runtime
//! reconfiguration path.

use crate::trace::TraceMode;

/// Configuration for a [`crate::VpwLink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkConfig {
    /// Diagnostic trace mode (off in production)
    pub trace_mode: TraceMode,
    /// Optional cap on received message length, in bytes
    ///
    /// A development aid for walking through short exchanges; when hit, the
    /// read aborts with [`crate::ReadOutcome::ByteLimit`] rather than
    /// silently truncating. `None` (the default) disables the cap.
    pub rx_byte_limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_production_shape() {
        let config = LinkConfig::default();
        assert_eq!(config.trace_mode, TraceMode::Off);
        assert_eq!(config.rx_byte_limit, None);
    }
}

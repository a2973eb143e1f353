//! Line-controller status decoding
//!
//! The status register packs two independent fields into one byte:
//! - bits [7:5]: receive status (0-7, see [`RxStatus`])
//! - bits [1:0]: transmit FIFO fullness (see [`TxFullness`])
//!
//! Decoding is a pure function of the byte; nothing here touches hardware.

/// Raw status register value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineStatus(pub u8);

impl LineStatus {
    /// Extract the 3-bit receive status field (bits [7:5])
    pub fn receive(self) -> RxStatus {
        RxStatus::from_field((self.0 & 0xE0) >> 5)
    }

    /// Extract the 2-bit transmit fullness field (bits [1:0])
    pub fn fullness(self) -> TxFullness {
        TxFullness::from_field(self.0 & 0x03)
    }
}

/// Receive status field values
///
/// The overloaded encodings (data with or without a trailing completion code,
/// completion code with or without trailing data) all collapse to the same
/// per-poll action; [`RxStatus::kind`] performs that collapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxStatus {
    /// 0: no data to process
    Idle,
    /// 1: FIFO contains data bytes
    Data,
    /// 2: FIFO contains data followed by a completion code
    DataThenCompletion,
    /// 3: receive FIFO overflow
    Overflow,
    /// 4: FIFO contains a single data byte
    SingleByte,
    /// 5: FIFO contains a completion code, followed by more data
    CompletionThenData,
    /// 6: FIFO contains a completion code, followed by a full frame
    CompletionThenFrame,
    /// 7: FIFO contains a completion code only
    CompletionOnly,
}

impl RxStatus {
    fn from_field(field: u8) -> Self {
        match field & 0x07 {
            0 => RxStatus::Idle,
            1 => RxStatus::Data,
            2 => RxStatus::DataThenCompletion,
            3 => RxStatus::Overflow,
            4 => RxStatus::SingleByte,
            5 => RxStatus::CompletionThenData,
            6 => RxStatus::CompletionThenFrame,
            _ => RxStatus::CompletionOnly,
        }
    }

    /// Collapse the eight field values into the four per-poll actions
    pub fn kind(self) -> RxKind {
        match self {
            RxStatus::Idle => RxKind::Idle,
            RxStatus::Data | RxStatus::DataThenCompletion | RxStatus::SingleByte => RxKind::Data,
            RxStatus::CompletionThenData
            | RxStatus::CompletionThenFrame
            | RxStatus::CompletionOnly => RxKind::Completion,
            RxStatus::Overflow => RxKind::Overflow,
        }
    }
}

/// Per-poll receive action, derived from [`RxStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxKind {
    /// Nothing to read; delay briefly and poll again
    Idle,
    /// One data byte is available in the receive FIFO
    Data,
    /// A completion code is available in the receive FIFO
    Completion,
    /// The receive FIFO overflowed; drain and discard
    Overflow,
}

/// Transmit FIFO fullness field values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxFullness {
    /// 0: FIFO empty, ready for data
    Ready,
    /// 1: FIFO partially filled
    Filling,
    /// 2: FIFO almost full
    AlmostFull,
    /// 3: FIFO full
    Full,
}

impl TxFullness {
    fn from_field(field: u8) -> Self {
        match field & 0x03 {
            0 => TxFullness::Ready,
            1 => TxFullness::Filling,
            2 => TxFullness::AlmostFull,
            _ => TxFullness::Full,
        }
    }

    /// True when per-byte transmission must back off before writing more
    pub fn needs_backoff(self) -> bool {
        matches!(self, TxFullness::AlmostFull | TxFullness::Full)
    }

    /// True when the FIFO has fully drained onto the wire
    pub fn is_drained(self) -> bool {
        self == TxFullness::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receive_field_extraction() {
        // Receive status lives in bits [7:5]
        assert_eq!(LineStatus(0b0010_0000).receive(), RxStatus::Data);
        assert_eq!(LineStatus(0b0110_0000).receive(), RxStatus::Overflow);
        assert_eq!(LineStatus(0b1110_0000).receive(), RxStatus::CompletionOnly);
        // Low bits do not leak into the receive field
        assert_eq!(LineStatus(0b0000_0011).receive(), RxStatus::Idle);
    }

    #[test]
    fn test_fullness_field_extraction() {
        assert_eq!(LineStatus(0x00).fullness(), TxFullness::Ready);
        assert_eq!(LineStatus(0x02).fullness(), TxFullness::AlmostFull);
        assert_eq!(LineStatus(0x03).fullness(), TxFullness::Full);
        // High bits do not leak into the fullness field
        assert_eq!(LineStatus(0xE0).fullness(), TxFullness::Ready);
    }

    #[test]
    fn test_kind_classification_is_pure() {
        let expect = [
            RxKind::Idle,       // 0
            RxKind::Data,       // 1
            RxKind::Data,       // 2
            RxKind::Overflow,   // 3
            RxKind::Data,       // 4
            RxKind::Completion, // 5
            RxKind::Completion, // 6
            RxKind::Completion, // 7
        ];
        for (field, kind) in expect.iter().enumerate() {
            let status = LineStatus((field as u8) << 5);
            assert_eq!(status.receive().kind(), *kind, "field {}", field);
        }
    }

    #[test]
    fn test_backoff_thresholds() {
        assert!(!TxFullness::Ready.needs_backoff());
        assert!(!TxFullness::Filling.needs_backoff());
        assert!(TxFullness::AlmostFull.needs_backoff());
        assert!(TxFullness::Full.needs_backoff());

        assert!(TxFullness::Ready.is_drained());
        assert!(!TxFullness::Filling.is_drained());
    }
}

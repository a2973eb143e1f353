//! Hardware abstraction traits
//!
//! These traits define the interface between the communication core
//! and hardware-specific implementations.

pub mod port;
pub mod watchdog;

pub use port::{
    LineControllerPort, CMD_ACK_COMPLETION, CMD_FRAME_END, CMD_FRAME_START, CMD_SEND_CHECKSUM,
};
pub use watchdog::Watchdog;

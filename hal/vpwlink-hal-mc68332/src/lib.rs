//! Memory-mapped register bindings for the MC68332-class engine controller
//!
//! Implements the core's hardware traits over the fixed register map of the
//! production controller: the DLC (data link controller) occupies four byte
//! registers near the top of the address space, and the supervising timer is
//! serviced through two unrelated watchdog registers.
//!
//! This crate is the only place the workspace touches raw addresses; all
//! protocol sequencing lives in `vpwlink-core`.

#![no_std]

use core::ptr::{read_volatile, write_volatile};

use vpwlink_core::status::LineStatus;
use vpwlink_core::traits::{LineControllerPort, Watchdog};

/// DLC transmit command register
pub const DLC_TRANSMIT_COMMAND: *mut u8 = 0x00FF_F60C as *mut u8;
/// DLC transmit data FIFO
pub const DLC_TRANSMIT_FIFO: *mut u8 = 0x00FF_F60D as *mut u8;
/// DLC status register
pub const DLC_STATUS: *mut u8 = 0x00FF_F60E as *mut u8;
/// DLC receive data FIFO
pub const DLC_RECEIVE_FIFO: *mut u8 = 0x00FF_F60F as *mut u8;

/// First watchdog register (0x55/0xAA toggle)
pub const WATCHDOG1: *mut u8 = 0x00FF_FA27 as *mut u8;
/// Second watchdog register (bit-7 clear/set toggle)
pub const WATCHDOG2: *mut u8 = 0x00FF_D006 as *mut u8;

/// The DLC's four byte registers
///
/// Zero-sized handle; constructing it asserts exclusive use of the DLC
/// registers, which holds because the kernel is the only code running.
pub struct DlcPort {
    _private: (),
}

impl DlcPort {
    /// Take the DLC register block
    ///
    /// # Safety
    ///
    /// The caller must ensure this is the only live `DlcPort` and that the
    /// code is executing on the production controller, where these addresses
    /// decode to the DLC.
    pub unsafe fn take() -> Self {
        Self { _private: () }
    }
}

impl LineControllerPort for DlcPort {
    fn write_command(&mut self, command: u8) {
        unsafe { write_volatile(DLC_TRANSMIT_COMMAND, command) }
    }

    fn write_data(&mut self, byte: u8) {
        unsafe { write_volatile(DLC_TRANSMIT_FIFO, byte) }
    }

    fn read_status(&mut self) -> LineStatus {
        LineStatus(unsafe { read_volatile(DLC_STATUS) })
    }

    fn read_data(&mut self) -> u8 {
        unsafe { read_volatile(DLC_RECEIVE_FIFO) }
    }
}

/// The supervising timer's two service registers
pub struct HardwareWatchdog {
    _private: (),
}

impl HardwareWatchdog {
    /// Take the watchdog registers
    ///
    /// # Safety
    ///
    /// Same conditions as [`DlcPort::take`]: exclusive use, production
    /// address map.
    pub unsafe fn take() -> Self {
        Self { _private: () }
    }
}

impl Watchdog for HardwareWatchdog {
    fn service(&mut self) {
        unsafe {
            // First register wants the fixed 0x55/0xAA pattern
            write_volatile(WATCHDOG1, 0x55);
            write_volatile(WATCHDOG1, 0xAA);
            // Second register wants bit 7 toggled low then high
            let value = read_volatile(WATCHDOG2);
            write_volatile(WATCHDOG2, value & 0x7F);
            write_volatile(WATCHDOG2, value | 0x80);
        }
    }
}

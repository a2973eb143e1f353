//! Scripted in-memory doubles for the hardware traits
//!
//! `SimPort` plays back a scripted sequence of status register values and
//! receive FIFO bytes, and records every command and data byte the core
//! writes, so the decoder and transmit engine can be exercised
//! deterministically on the host.

use heapless::Vec;

use crate::status::LineStatus;
use crate::traits::{LineControllerPort, Watchdog};

/// Build a status byte whose receive field (bits [7:5]) is `field`
pub fn rx_status(field: u8) -> u8 {
    (field & 0x07) << 5
}

/// Watchdog double that counts service calls
#[derive(Debug, Default)]
pub struct SimWatchdog {
    services: u32,
}

impl SimWatchdog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the watchdog has been serviced
    pub fn services(&self) -> u32 {
        self.services
    }
}

impl Watchdog for SimWatchdog {
    fn service(&mut self) {
        self.services = self.services.saturating_add(1);
    }
}

/// Line-controller double driven by a status script
///
/// Each `read_status` consumes the next scripted value; once the script is
/// exhausted the final value repeats forever (so "idle forever" and "full
/// forever" scenarios need only one trailing entry). `read_data` consumes
/// from a separate FIFO script, returning 0 when it runs dry.
#[derive(Debug, Default)]
pub struct SimPort {
    status_script: Vec<u8, 64>,
    status_cursor: usize,
    rx_fifo: Vec<u8, 64>,
    rx_cursor: usize,
    /// Command bytes written by the core, in order
    pub commands: Vec<u8, 32>,
    /// Transmit FIFO bytes written by the core, in order
    pub tx_data: Vec<u8, 64>,
}

impl SimPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw status byte values to the script
    pub fn script_status(&mut self, values: &[u8]) {
        for &value in values {
            self.status_script.push(value).unwrap();
        }
    }

    /// Append receive FIFO bytes
    pub fn script_rx(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.rx_fifo.push(byte).unwrap();
        }
    }

    /// Number of scripted status values consumed so far
    pub fn status_reads(&self) -> usize {
        self.status_cursor
    }
}

impl LineControllerPort for SimPort {
    fn write_command(&mut self, command: u8) {
        self.commands.push(command).unwrap();
    }

    fn write_data(&mut self, byte: u8) {
        self.tx_data.push(byte).unwrap();
    }

    fn read_status(&mut self) -> LineStatus {
        let value = match self.status_script.get(self.status_cursor) {
            Some(&value) => {
                self.status_cursor += 1;
                value
            }
            None => self.status_script.last().copied().unwrap_or(0),
        };
        LineStatus(value)
    }

    fn read_data(&mut self) -> u8 {
        let byte = self.rx_fifo.get(self.rx_cursor).copied().unwrap_or(0);
        self.rx_cursor += 1;
        byte
    }
}

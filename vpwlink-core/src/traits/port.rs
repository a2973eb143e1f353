//! Line-controller port abstraction
//!
//! The line controller (DLC) performs the bit-level VPW bus encoding and
//! decoding. Firmware sees it as four byte-wide registers: a transmit command
//! port, a transmit data FIFO, a status register, and a receive data FIFO.

use crate::status::LineStatus;

/// Transmit command: begin a new frame
pub const CMD_FRAME_START: u8 = 0x14;
/// Transmit command: the next data byte closes the frame
pub const CMD_FRAME_END: u8 = 0x0C;
/// Transmit command: send the frame checksum (device-computed)
pub const CMD_SEND_CHECKSUM: u8 = 0x03;
/// Transmit command: acknowledge a received completion code
pub const CMD_ACK_COMPLETION: u8 = 0x02;

/// Register-level interface to the line controller
///
/// Implementations are expected to be thin wrappers over memory-mapped
/// registers; all protocol sequencing lives in this crate.
pub trait LineControllerPort {
    /// Write a byte to the transmit command port
    fn write_command(&mut self, command: u8);

    /// Write a byte to the transmit data FIFO
    fn write_data(&mut self, byte: u8);

    /// Read the status register
    fn read_status(&mut self) -> LineStatus;

    /// Read a byte from the receive data FIFO
    fn read_data(&mut self) -> u8;
}

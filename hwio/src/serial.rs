//! Serial debug output (COM1 @ 0x3F8)
//!
//! Minimal pre-memory serial for bring-up logging.
//! No buffering, no interrupts, pure polling.

use crate::pio::{IoPortAccess, PortIo};

/// COM1 base port.
pub const COM1: u16 = 0x3F8;

const LSR_OFFSET: u16 = 5;
const LSR_TX_EMPTY: u8 = 0x20;

/// Maximum LSR polls before a byte is dropped.
const TX_SPINS: u32 = 100;

/// A polling 16550-style transmitter.
pub struct SerialPort {
    base: u16,
}

impl SerialPort {
    /// Create a transmitter for the given base port.
    pub const fn new(base: u16) -> Self {
        Self { base }
    }

    /// Write one byte. Bounded wait, gives up after [`TX_SPINS`] polls.
    pub fn write_byte(&mut self, b: u8) {
        let mut io = PortIo;
        for _ in 0..TX_SPINS {
            if io.read8(self.base + LSR_OFFSET) & LSR_TX_EMPTY != 0 {
                io.write8(self.base, b);
                return;
            }
            core::hint::spin_loop();
        }
    }
}

impl core::fmt::Write for SerialPort {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for b in s.bytes() {
            if b == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(b);
        }
        Ok(())
    }
}

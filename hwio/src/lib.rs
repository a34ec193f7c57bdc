//! Register and Bus Access Layer
//!
//! Access contracts and minimal x86 primitives for the Ember boot stage.
//! Everything the board bring-up code touches in hardware goes through the
//! traits in this crate, so the bring-up logic itself stays host-testable.
//!
//! # What This Crate Does
//!
//! - Port I/O access trait + x86 `in`/`out` implementation
//! - MMIO access trait + volatile pointer implementation
//! - PCI configuration space access trait + legacy 0xCF8/0xCFC implementation
//! - COM1 polling serial transmitter
//! - `log` facade backend writing to the serial port
//!
//! # What This Crate Does NOT Do
//!
//! - Device-specific register programming (board layer's job)
//! - Config data handling (see `ember-cfgdata`)
//! - Any policy decisions

#![no_std]
#![allow(dead_code)]

pub mod logger;
pub mod mmio;
pub mod pci;
pub mod pio;
pub mod serial;

// ═══════════════════════════════════════════════════════════════════════════
// RE-EXPORTS
// ═══════════════════════════════════════════════════════════════════════════

pub use logger::init as logger_init;
pub use mmio::{MmioAccess, PhysMmio};
pub use pci::{LegacyPciAccess, PciAddr, PciConfigAccess};
pub use pio::{IoPortAccess, PortIo};
pub use serial::SerialPort;

//! Board Bring-Up for the Ember Pre-Memory Stage
//!
//! Board-specific initialization running from cache-as-RAM, before DRAM
//! exists. The surrounding boot core drives [`phases::Board::init`] once per
//! phase; between the config and memory phases it hands us the
//! memory-init parameter block to fill in from the board's config records.
//!
//! ```text
//! boot core calls:
//!   PreConfig        board id from the I/O expander, boot mode, SPI bring-up
//!   PostConfig       RTC sanity, platform feature state
//!   (update_mem_params: config records -> memory-init parameter block)
//!   PreMemory        DRAM-init scratch bit, pre-memory pad programming
//!   PostMemory       tuning data leaves cache-as-RAM, scratch bit cleared
//!   PreTempRamExit   -
//!   PostTempRamExit  TPM measurement starts (the only fatal path)
//! ```
//!
//! # What This Crate Does
//!
//! - Board identity from the side-band I/O expander (fail-safe defaults)
//! - Config record projection onto the memory-init parameter block
//! - Power/reset state classification from the ACPI PM registers
//! - RTC power-loss recovery
//! - Platform feature state (build switches, config overrides, boot-guard)
//! - TPM measurement kick-off at temp-RAM exit
//!
//! # What This Crate Does NOT Do
//!
//! - Memory training itself (vendor silicon-init binary)
//! - GPIO pad programming, SPI flash, TPM commands (service contracts in
//!   [`services`]; drivers live with the boot core)
//! - Anything OS-visible

#![no_std]
#![allow(dead_code)]

extern crate alloc;

pub mod boardid;
pub mod devices;
pub mod error;
pub mod features;
pub mod gpio;
pub mod nvsdata;
pub mod params;
pub mod phases;
pub mod power;
pub mod projection;
pub mod rtc;
pub mod services;
pub mod tpm;

#[cfg(test)]
pub(crate) mod testhw;

// ═══════════════════════════════════════════════════════════════════════════
// RE-EXPORTS
// ═══════════════════════════════════════════════════════════════════════════

pub use boardid::{resolve_board_identity, BoardIdentity};
pub use error::{BoardError, BusError, LoadError, SpiError, TpmError};
pub use features::{BuildFeatures, FeatureFlags, PlatformFeatures, TuningData};
pub use params::{ArchParams, MemInitConfig, MemInitParams};
pub use phases::{Board, BoardServices, BoardState, InitPhase, PlatformCaps};
pub use power::BootMode;
pub use services::{BootGuardInfo, Signature, TpmType};

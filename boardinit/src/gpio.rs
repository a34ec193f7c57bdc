//! Pre-memory GPIO pad configuration.
//!
//! Only the pads that must be correct before DRAM training live here; the
//! full pad sweep happens in the next stage. Programming itself is the
//! [`crate::services::GpioPads`] micro-driver's job.

/// GPIO pad group identifiers.
pub mod group {
    pub const GPP_B: u8 = 1;
    pub const GPP_E: u8 = 4;
    pub const GPP_F: u8 = 5;
    pub const GPP_V: u8 = 10;
}

/// Encode a pad id from its group and pin number.
pub const fn pad(group: u8, pin: u8) -> u32 {
    ((group as u32) << 16) | pin as u32
}

/// Pad operating mode.
pub mod pad_mode {
    pub const GPIO: u8 = 0;
    pub const NATIVE1: u8 = 1;
    pub const NATIVE2: u8 = 2;
}

/// Pad direction.
pub mod direction {
    pub const NONE: u8 = 0;
    pub const OUT: u8 = 1;
    pub const IN: u8 = 2;
}

/// Output level for output pads.
pub mod level {
    pub const LOW: u8 = 0;
    pub const HIGH: u8 = 1;
}

/// Reset domain that restores the pad to its default.
pub mod reset {
    pub const POWER_GOOD: u8 = 0;
    pub const HOST_RESET: u8 = 1;
}

/// Pad termination.
pub mod term {
    pub const NONE: u8 = 0;
    pub const PU_20K: u8 = 1;
}

/// One pad's static configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioPadConfig {
    pub pad: u32,
    pub pad_mode: u8,
    pub direction: u8,
    pub output_state: u8,
    pub reset_config: u8,
    pub termination: u8,
}

const fn out_high(pad: u32) -> GpioPadConfig {
    GpioPadConfig {
        pad,
        pad_mode: pad_mode::GPIO,
        direction: direction::OUT,
        output_state: level::HIGH,
        reset_config: reset::HOST_RESET,
        termination: term::NONE,
    }
}

const fn native(pad: u32, mode: u8) -> GpioPadConfig {
    GpioPadConfig {
        pad,
        pad_mode: mode,
        direction: direction::NONE,
        output_state: level::LOW,
        reset_config: reset::HOST_RESET,
        termination: term::NONE,
    }
}

/// Pads programmed before DRAM training starts.
pub static GPIO_TABLE_PRE_MEM: &[GpioPadConfig] = &[
    // Memory down straps buffer enable
    out_high(pad(group::GPP_V, 2)),
    // SPD SMBus clock/data
    native(pad(group::GPP_B, 5), pad_mode::NATIVE1),
    native(pad(group::GPP_B, 6), pad_mode::NATIVE1),
    // WWAN power sequencing, asserted before training for settle time
    out_high(pad(group::GPP_E, 8)),
    out_high(pad(group::GPP_F, 21)),
    // Touch panel reset held high to keep the panel off the I2C bus
    out_high(pad(group::GPP_E, 6)),
];

//! Error types for board bring-up.
//!
//! Almost everything here is recoverable by design: a failed bus read or a
//! missing record degrades to documented defaults and boot continues. The
//! one exception is [`BoardError::TpmInit`], which the boot core must treat
//! as fatal.

use core::fmt;

/// Side-band bus read failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// No acknowledge from the slave address.
    NoAck,
    /// Transaction did not complete in time.
    Timeout,
    /// Host controller busy or in an error state.
    Controller,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAck => write!(f, "no acknowledge from slave"),
            Self::Timeout => write!(f, "bus transaction timed out"),
            Self::Controller => write!(f, "host controller error"),
        }
    }
}

/// Component lookup failure in the firmware container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// Container or component signature not present.
    NotFound,
    /// Component present but failed its header checks.
    Corrupt,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "component not found"),
            Self::Corrupt => write!(f, "component header invalid"),
        }
    }
}

/// SPI flash service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiError {
    /// Flash part not detected behind the controller.
    NotDetected,
    /// Transfer error.
    Io,
}

impl fmt::Display for SpiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotDetected => write!(f, "flash part not detected"),
            Self::Io => write!(f, "flash transfer error"),
        }
    }
}

/// TPM initialization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TpmError {
    /// Device not present or not responding.
    NotDetected,
    /// Startup command rejected.
    StartupFailed,
    /// Self test reported failure.
    SelfTestFailed,
}

impl fmt::Display for TpmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotDetected => write!(f, "TPM not detected"),
            Self::StartupFailed => write!(f, "TPM startup rejected"),
            Self::SelfTestFailed => write!(f, "TPM self test failed"),
        }
    }
}

/// Fatal board initialization failure.
///
/// Returned from the phase dispatcher only when boot cannot safely continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Measured boot is required and the TPM could not be initialized.
    TpmInit(TpmError),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TpmInit(e) => write!(f, "TPM initialization failed: {}", e),
        }
    }
}

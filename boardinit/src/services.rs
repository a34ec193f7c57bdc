//! Service contracts for the boot-core collaborators.
//!
//! The board layer orchestrates these; the drivers themselves ship with the
//! boot core. Tests substitute recording fakes.

use ember_hwio::pci::PciAddr;

use crate::error::{BusError, LoadError, SpiError, TpmError};
use crate::gpio::GpioPadConfig;
use crate::power::BootMode;

/// Four-character component/container signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub u32);

impl Signature {
    /// Build a signature from its ASCII spelling.
    pub const fn from_ascii(s: &[u8; 4]) -> Self {
        Signature(u32::from_le_bytes(*s))
    }
}

/// Platform firmware container.
pub const CONTAINER_PLATFORM_FW: Signature = Signature::from_ascii(b"IPFW");
/// TCC tuning component inside the platform firmware container.
pub const COMPONENT_TCC_TUNING: Signature = Signature::from_ascii(b"TCCT");
/// Saved memory-training parameters in the flash map.
pub const COMPONENT_MRC_DATA: Signature = Signature::from_ascii(b"MRCD");

/// Byte reads over the side-band bus (board identity expander).
pub trait SidebandBus {
    /// Read one byte register from a slave device.
    fn read_byte(&mut self, slave: u8, command: u8) -> Result<u8, BusError>;
}

/// Named binary component lookup in the firmware container.
pub trait ComponentLoader {
    /// Locate and verify a component; returns its loaded bytes.
    fn load(
        &mut self,
        container: Signature,
        component: Signature,
    ) -> Result<&'static [u8], LoadError>;

    /// Flash-map lookup without container verification.
    fn component_info(&mut self, component: Signature) -> Result<&'static [u8], LoadError>;
}

/// SPI flash controller service.
pub trait SpiFlash {
    /// Probe the controller and flash part; must run before any flash use.
    fn constructor(&mut self) -> Result<(), SpiError>;

    /// Copy an external config region out of flash.
    fn load_external_config(&mut self, dst: u32, src: u32, len: u32) -> Result<(), SpiError>;
}

/// GPIO pad-table programming micro-driver.
pub trait GpioPads {
    /// Program a static pad configuration table.
    fn configure(&mut self, pads: &[GpioPadConfig]);
}

/// Discrete or firmware TPM type reported by boot-guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TpmType {
    /// No TPM available.
    #[default]
    None,
    /// Discrete TPM 2.0.
    Dtpm20,
    /// Platform trust technology (firmware TPM).
    Ptt,
}

/// Capability and policy report from the boot-guard root of trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BootGuardInfo {
    /// Hardware measured-boot capability present and active.
    pub measured_boot: bool,
    /// Hardware verified-boot capability present and active.
    pub verified_boot: bool,
    /// The ACM ordered all TPMs disconnected.
    pub disconnect_all_tpms: bool,
    /// TPM startup was already performed by the ACM.
    pub bypass_tpm_init: bool,
    /// Which TPM the ACM selected.
    pub tpm_type: TpmType,
}

/// Boot-guard information provider (reads through the HECI device).
pub trait BootGuard {
    /// Query the boot-guard report.
    fn info(&mut self, heci: PciAddr) -> BootGuardInfo;
}

/// TPM measurement subsystem.
pub trait TpmService {
    /// Initialize the TPM. `bypass_init` skips startup already done by the
    /// ACM.
    fn init(&mut self, bypass_init: bool, boot_mode: BootMode) -> Result<(), TpmError>;

    /// Record boot-guard events into the TCG event log.
    fn create_event_log(&mut self, tpm_type: TpmType);

    /// Disable the TPM for the rest of the boot.
    fn disable(&mut self);
}

/// Firmware-update capsule state machine.
pub trait FlashStateMachine {
    /// True when a staged capsule is waiting to be processed.
    fn in_update_mode(&mut self) -> bool;
}

//! Power/reset state classification from the ACPI PM registers.
//!
//! Decides what kind of boot this is and, as a side effect, quiets the wake
//! sources that would otherwise raise SMIs later in boot.

use ember_hwio::{IoPortAccess, MmioAccess};
use log::info;

use crate::services::FlashStateMachine;

// ═══════════════════════════════════════════════════════════════════════════
// REGISTER MAP
// ═══════════════════════════════════════════════════════════════════════════

/// ACPI I/O block base.
pub const ACPI_BASE: u16 = 0x1800;
/// PM1 status (low word) / enable (high word) window.
pub const R_PM1_STS: u16 = 0x00;
/// PM1 control.
pub const R_PM1_CNT: u16 = 0x04;
/// Over-clocking watchdog control.
pub const R_OC_WDT_CTL: u16 = 0x54;

pub const B_PM1_STS_WAK: u16 = 1 << 15;
pub const B_PM1_STS_PRBTNOR: u16 = 1 << 11;
/// Power-button wake enable, as seen through the 32-bit PM1 window.
pub const B_PM1_EN_PWRBTN: u32 = 1 << 24;
/// RTC wake enable, as seen through the 32-bit PM1 window.
pub const B_PM1_EN_RTC: u32 = 1 << 26;

pub const B_PM1_CNT_SLP_TYP: u16 = 0x7 << 10;
pub const V_SLP_TYP_S0: u16 = 0;
pub const V_SLP_TYP_S3: u16 = 5 << 10;
pub const V_SLP_TYP_S4: u16 = 6 << 10;
pub const V_SLP_TYP_S5: u16 = 7 << 10;

/// Firmware-update trigger latch in the watchdog control register.
pub const B_OC_WDT_CTL_FW_UPDATE: u32 = 1 << 16;

/// PMC power-management MMIO base.
pub const PWRM_BASE: usize = 0xFE00_0000;
pub const R_GEN_PMCON_A: usize = 0x1020;
pub const R_GEN_PMCON_B: usize = 0x1024;

pub const B_GEN_PMCON_A_GBL_RST_STS: u32 = 1 << 24;
/// DRAM-initialization scratch bit.
pub const B_GEN_PMCON_A_DISB: u32 = 1 << 23;
pub const B_GEN_PMCON_A_PWR_FLR: u32 = 1 << 16;
pub const B_GEN_PMCON_A_HOST_RST_STS: u32 = 1 << 9;
pub const B_GEN_PMCON_B_RTC_PWR_STS: u8 = 1 << 2;

// ═══════════════════════════════════════════════════════════════════════════
// CLASSIFICATION
// ═══════════════════════════════════════════════════════════════════════════

/// What kind of boot this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootMode {
    /// Cold boot with full configuration.
    #[default]
    FullConfig,
    /// Resuming from suspend-to-RAM.
    S3Resume,
    /// Resuming from hibernate.
    S4Resume,
    /// Waking from soft-off.
    S5Resume,
    /// A staged firmware update must be processed.
    FlashUpdate,
}

/// Classify the current boot from the PM status registers.
///
/// Side effects: acknowledges a pending power-button-override, disables the
/// power-button and RTC wake enables, and on RTC power loss resets the wake
/// status and sleep type (a dead RTC means no prior sleep state can be
/// trusted).
pub fn platform_power_state(io: &mut dyn IoPortAccess, mmio: &mut dyn MmioAccess) -> BootMode {
    let pmcon_a = mmio.read32(PWRM_BASE + R_GEN_PMCON_A);

    if io.read16(ACPI_BASE + R_PM1_STS) & B_PM1_STS_PRBTNOR != 0 {
        io.write16(ACPI_BASE + R_PM1_STS, B_PM1_STS_PRBTNOR);
    }

    // Any reset-class status overrides a pending wake.
    if pmcon_a & (B_GEN_PMCON_A_GBL_RST_STS | B_GEN_PMCON_A_PWR_FLR | B_GEN_PMCON_A_HOST_RST_STS)
        != 0
    {
        info!("reset status 0x{:08x}, full config boot", pmcon_a);
        return BootMode::FullConfig;
    }

    let mut mode = BootMode::FullConfig;
    if io.read16(ACPI_BASE + R_PM1_STS) & B_PM1_STS_WAK != 0 {
        mode = match io.read16(ACPI_BASE + R_PM1_CNT) & B_PM1_CNT_SLP_TYP {
            V_SLP_TYP_S3 => BootMode::S3Resume,
            V_SLP_TYP_S4 => BootMode::S4Resume,
            V_SLP_TYP_S5 => BootMode::S5Resume,
            _ => BootMode::FullConfig,
        };
    }

    // PWRBTN_EN raises SMIs while SCI_EN is still 0; ack wake status too.
    let pm1 = io.read32(ACPI_BASE + R_PM1_STS);
    io.write32(
        ACPI_BASE + R_PM1_STS,
        (pm1 & !B_PM1_EN_PWRBTN) | B_PM1_STS_WAK as u32,
    );

    // RTC_EN causes an SMI storm if left armed.
    let pm1 = io.read32(ACPI_BASE + R_PM1_STS);
    io.write32(ACPI_BASE + R_PM1_STS, pm1 & !B_PM1_EN_RTC);

    if mmio.read8(PWRM_BASE + R_GEN_PMCON_B) & B_GEN_PMCON_B_RTC_PWR_STS != 0 {
        info!("RTC power loss, forcing full config boot");
        mode = BootMode::FullConfig;

        io.write16(ACPI_BASE + R_PM1_STS, B_PM1_STS_WAK);
        let cnt = io.read16(ACPI_BASE + R_PM1_CNT);
        io.write16(
            ACPI_BASE + R_PM1_CNT,
            (cnt & !B_PM1_CNT_SLP_TYP) | V_SLP_TYP_S0,
        );
    }

    mode
}

/// True when a firmware update must be processed this boot.
pub fn is_firmware_update(io: &mut dyn IoPortAccess, fsm: &mut dyn FlashStateMachine) -> bool {
    if fsm.in_update_mode() {
        return true;
    }
    io.read32(ACPI_BASE + R_OC_WDT_CTL) & B_OC_WDT_CTL_FW_UPDATE != 0
}

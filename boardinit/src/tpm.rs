//! TPM measurement kick-off.
//!
//! Runs once at temp-RAM exit when measured boot survived feature
//! resolution. This is the single place in board init where a failure is
//! allowed to stop the boot: promising measurements to later stages and
//! then booting without a TPM would be worse than halting.

use log::{error, info, warn};

use crate::error::BoardError;
use crate::power::BootMode;
use crate::services::{BootGuardInfo, TpmService, TpmType};

/// Initialize the TPM, or disable it when boot-guard rules it out.
///
/// Failure is fatal unless boot-guard requested init bypass (the ACM
/// already did the startup, so a rejected re-init carries no trust loss).
pub fn tpm_initialize(
    tpm: &mut dyn TpmService,
    boot_guard: &BootGuardInfo,
    boot_mode: BootMode,
) -> Result<(), BoardError> {
    let usable = boot_guard.measured_boot
        && !boot_guard.disconnect_all_tpms
        && matches!(boot_guard.tpm_type, TpmType::Dtpm20 | TpmType::Ptt);

    if !usable {
        info!("no usable TPM ({:?}), disabling", boot_guard.tpm_type);
        tpm.disable();
        return Ok(());
    }

    match tpm.init(boot_guard.bypass_tpm_init, boot_mode) {
        Ok(()) => {
            // S3 resume restores PCRs from saved state; no new log entries.
            if boot_mode != BootMode::S3Resume {
                tpm.create_event_log(boot_guard.tpm_type);
            }
            Ok(())
        }
        Err(e) if boot_guard.bypass_tpm_init => {
            warn!("TPM re-init failed under ACM bypass: {}", e);
            Ok(())
        }
        Err(e) => {
            error!("TPM initialization failed: {}", e);
            Err(BoardError::TpmInit(e))
        }
    }
}

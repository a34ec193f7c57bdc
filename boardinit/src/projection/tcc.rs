//! TCC tuning sub-projection.
//!
//! Time-coordinated-compute tuning ships as a named component in the
//! platform firmware container. The component may legitimately be absent
//! or a placeholder; both leave the TCC-safe defaults in place. Real
//! tuning data overrides SA-GV, RAPL and the memory power-management pair,
//! and its location is recorded for the next stage.

use log::{error, info};

use crate::features::{PlatformFeatures, TuningData};
use crate::params::MemInitParams;
use crate::services::{ComponentLoader, COMPONENT_TCC_TUNING, CONTAINER_PLATFORM_FW};

/// Placeholder contents marking a container slot with no real tuning data.
pub const TCC_PLACEHOLDER: &[u8] = b"dummy\0";

/// Settings block offset inside the tuning sub-region (past the header).
const SETTINGS_OFFSET: usize = 8;
/// Byte offsets inside the settings block.
const O_MEMORY_RAPL: usize = 3;
const O_SA_GV: usize = 5;
const O_MEM_PM: usize = 6;
/// Bytes of the settings block we consume.
const SETTINGS_LEN: usize = 8;

/// The settings the pre-memory stage consumes out of the tuning sub-region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TccBiosSettings {
    sa_gv: u8,
    memory_rapl: u8,
    mem_pm: u8,
}

fn decode_settings(data: &[u8]) -> Option<TccBiosSettings> {
    let block = data.get(SETTINGS_OFFSET..SETTINGS_OFFSET + SETTINGS_LEN)?;
    Some(TccBiosSettings {
        sa_gv: block[O_SA_GV],
        memory_rapl: block[O_MEMORY_RAPL],
        mem_pm: block[O_MEM_PM],
    })
}

/// Apply TCC-safe defaults, then tuning data if any exists.
pub(crate) fn project(
    params: &mut MemInitParams,
    loader: &mut dyn ComponentLoader,
    features: &mut PlatformFeatures,
) {
    let cfg = &mut params.cfg;

    // TCC-safe defaults: no SA-GV switching, no RAPL limits, memory power
    // management off.
    cfg.sa_gv = 0;
    cfg.dis_pg_close_idle_timeout = 1;
    cfg.rapl_lim1_ena = 0;
    cfg.rapl_lim2_ena = 0;
    cfg.power_down_mode = 0;

    let data = match loader.load(CONTAINER_PLATFORM_FW, COMPONENT_TCC_TUNING) {
        Ok(data) => data,
        Err(e) => {
            error!("TCC tuning data not found: {}", e);
            return;
        }
    };

    if data.starts_with(TCC_PLACEHOLDER) {
        info!("TCC tuning data is placeholder, skipping");
        return;
    }

    let Some(settings) = decode_settings(data) else {
        error!("TCC tuning data too short ({} bytes)", data.len());
        return;
    };

    features.tuning = Some(TuningData::Borrowed(data));

    cfg.sa_gv = settings.sa_gv;
    cfg.rapl_lim1_ena = settings.memory_rapl;
    cfg.rapl_lim2_ena = settings.memory_rapl;

    // The pair is complementary by construction: the idle timeout is
    // disabled exactly when power-down is off.
    if settings.mem_pm == 0 {
        cfg.dis_pg_close_idle_timeout = 1;
        cfg.power_down_mode = 0;
    } else {
        cfg.dis_pg_close_idle_timeout = 0;
        cfg.power_down_mode = 1;
    }

    cfg.tcc_tuning_enable_pre_mem = 1;
    cfg.tcc_stream_cfg_base_pre_mem = data.as_ptr() as usize as u32;
    cfg.tcc_stream_cfg_size_pre_mem = data.len() as u32;

    info!(
        "TCC tuning applied: sa_gv {} rapl {} mem_pm {} ({} bytes)",
        settings.sa_gv,
        settings.memory_rapl,
        settings.mem_pm,
        data.len()
    );
}

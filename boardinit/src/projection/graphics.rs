//! Graphics domain projection: IGD carve-outs and the HD-Audio link policy.
//!
//! The audio link selector is the one place where domains fight over pins:
//! the HDA link shares pads with SoundWire link 0, and the SSP0 and DMIC
//! links collide with HDA as well. Every selector variant therefore forces
//! a conflict-free combination; only Advanced trusts the record author.

use ember_cfgdata::{ConfigStore, GraphicsCfg};
use log::info;

use crate::features::BuildFeatures;
use crate::params::MemInitParams;
use crate::phases::PlatformCaps;

/// HD-Audio link mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioLinkMode {
    /// HDA link plus digital mics.
    Hda,
    /// I2S/SSP link to an external codec.
    I2sSsp,
    /// SoundWire links.
    Sndw,
    /// All link enables come raw from the record.
    Advanced,
}

impl AudioLinkMode {
    /// Decode the selector; unknown values behave like HDA.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::I2sSsp,
            2 => Self::Sndw,
            3 => Self::Advanced,
            _ => Self::Hda,
        }
    }
}

/// DMIC pad mux selections for this board's pin list.
pub mod pin_mux {
    pub const DMIC0_CLKA_GPP_R6: u32 = 0x4946_6406;
    pub const DMIC0_CLKB_GPP_G13: u32 = 0x4747_640D;
    pub const DMIC0_DATA_GPP_R7: u32 = 0x4946_6207;
    pub const DMIC1_CLKA_GPP_R4: u32 = 0x4946_6404;
    pub const DMIC1_CLKB_GPP_G14: u32 = 0x4747_640E;
    pub const DMIC1_DATA_GPP_R5: u32 = 0x4946_6205;
}

/// Project the graphics domain, if its record is present.
pub(crate) fn project(
    params: &mut MemInitParams,
    store: &ConfigStore,
    build: &BuildFeatures,
    caps: &PlatformCaps,
) {
    let Some(gfx) = store.find::<GraphicsCfg>() else {
        info!("no graphics cfg record");
        return;
    };
    info!("loading graphics cfg");

    let cfg = &mut params.cfg;

    cfg.igd_dvmt50_pre_alloc = gfx.igd_dvmt50_pre_alloc;
    cfg.aperture_size = gfx.aperture_size;
    cfg.gtt_size = gfx.gtt_size;
    cfg.internal_gfx = gfx.internal_gfx;
    cfg.primary_display = gfx.primary_display;
    cfg.gtt_mm_adr = gfx.gtt_mm_adr;
    cfg.gm_adr = gfx.gm_adr;
    cfg.psmi_region_size = gfx.psmi_region_size;
    cfg.dism_size = gfx.dism_size;
    cfg.gt_psmi_support = gfx.gt_psmi_support;

    cfg.pch_hda_enable = gfx.pch_hda_enable;
    cfg.pch_hda_dsp_enable = gfx.pch_hda_dsp_enable;
    cfg.pch_hda_idisp_link_frequency = gfx.pch_hda_idisp_link_frequency;
    cfg.pch_hda_idisp_link_tmode = gfx.pch_hda_idisp_link_tmode;
    cfg.pch_hda_idisp_codec_disconnect = gfx.pch_hda_idisp_codec_disconnect;

    match AudioLinkMode::from_raw(gfx.pch_hd_audio_link_mode) {
        AudioLinkMode::Hda => {
            info!("audio policy: HDA link");
            cfg.pch_hda_audio_link_hda_enable = 1;
            for dmic in cfg.pch_hda_audio_link_dmic_enable.iter_mut() {
                *dmic = 1;
            }
            // HDA pads collide with SoundWire link 0
            cfg.pch_hda_audio_link_sndw_enable[0] = 0;
        }
        AudioLinkMode::I2sSsp => {
            info!("audio policy: SSP/I2S link");
            for ssp in cfg.pch_hda_audio_link_ssp_enable.iter_mut() {
                *ssp = 0;
            }
            if !build.pre_os_checker && !caps.sci_supported {
                cfg.pch_hda_audio_link_ssp_enable[0] = 1;
            }
            if build.pre_os_checker && caps.sci_supported {
                for dmic in cfg.pch_hda_audio_link_dmic_enable.iter_mut() {
                    *dmic = 0;
                }
            }
            // SSP0 pads collide with the HDA link
            cfg.pch_hda_audio_link_hda_enable = 0;
        }
        AudioLinkMode::Sndw => {
            info!("audio policy: SoundWire links");
            cfg.pch_hda_audio_link_hda_enable = 0;
            for sndw in cfg.pch_hda_audio_link_sndw_enable.iter_mut() {
                *sndw = 1;
            }
            // SoundWire 3/4 pads collide with the digital mics
            for dmic in cfg.pch_hda_audio_link_dmic_enable.iter_mut() {
                *dmic = 0;
            }
        }
        AudioLinkMode::Advanced => {
            info!("audio policy: advanced (record-defined)");
            cfg.pch_hda_audio_link_hda_enable = gfx.pch_hda_audio_link_hda_enable;
            cfg.pch_hda_audio_link_dmic_enable = gfx.pch_hda_audio_link_dmic_enable;
            cfg.pch_hda_audio_link_ssp_enable = gfx.pch_hda_audio_link_ssp_enable;
            cfg.pch_hda_audio_link_sndw_enable = gfx.pch_hda_audio_link_sndw_enable;
        }
    }

    cfg.pch_hda_audio_link_dmic_clk_a_pin_mux =
        [pin_mux::DMIC0_CLKA_GPP_R6, pin_mux::DMIC1_CLKA_GPP_R4];
    cfg.pch_hda_audio_link_dmic_clk_b_pin_mux =
        [pin_mux::DMIC0_CLKB_GPP_G13, pin_mux::DMIC1_CLKB_GPP_G14];
    cfg.pch_hda_audio_link_dmic_data_pin_mux =
        [pin_mux::DMIC0_DATA_GPP_R7, pin_mux::DMIC1_DATA_GPP_R5];

    cfg.disable_te_igd = 0x01;
    cfg.heci_communication2 = 0x01;
}

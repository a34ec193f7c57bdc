//! Per-domain configuration records.
//!
//! Field names and types are the wire contract with the config image
//! tooling and the memory-init stage; do not rename them. Grouped tuning
//! banks (HSIO) are shared with the memory-init parameter block so a domain
//! projects as a single struct copy.

/// PCIe root ports with per-lane HSIO tuning.
pub const PCIE_ROOT_PORTS: usize = 8;
/// SATA ports with per-lane HSIO tuning.
pub const SATA_PORTS: usize = 2;
/// DMI Gen3 lanes.
pub const DMI_LANES: usize = 8;
/// DMI Gen3 RX CTLE peaking entries.
pub const DMI_RX_CTLE: usize = 4;
/// DQ byte-map entries per channel.
pub const DQ_MAP_BYTES: usize = 12;
/// DQS map entries per channel.
pub const DQS_MAP_BYTES: usize = 8;
/// SPD slave addresses (one per DIMM slot).
pub const SPD_SLOTS: usize = 4;
/// Reserved SMBus slave addresses.
pub const RSVD_SMBUS_ADDRESSES: usize = 4;
/// PCIe clock sources.
pub const PCIE_CLK_SOURCES: usize = 16;
/// IBECC protected regions.
pub const IBECC_REGIONS: usize = 8;
/// VT-d remapping engines.
pub const VTD_ENGINES: usize = 3;
/// HD-Audio digital-mic links.
pub const HDA_DMIC_LINKS: usize = 2;
/// HD-Audio SSP/I2S links.
pub const HDA_SSP_LINKS: usize = 3;
/// HD-Audio SoundWire links.
pub const HDA_SNDW_LINKS: usize = 4;

/// Per-lane PCIe HSIO electrical tuning bank.
///
/// Each `*_enable` entry gates the matching value entry for that lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PcieHsioTuning {
    pub rx_set_ctle_enable: [u8; PCIE_ROOT_PORTS],
    pub rx_set_ctle: [u8; PCIE_ROOT_PORTS],
    pub tx_gen1_downscale_amp_enable: [u8; PCIE_ROOT_PORTS],
    pub tx_gen1_downscale_amp: [u8; PCIE_ROOT_PORTS],
    pub tx_gen2_downscale_amp_enable: [u8; PCIE_ROOT_PORTS],
    pub tx_gen2_downscale_amp: [u8; PCIE_ROOT_PORTS],
    pub tx_gen3_downscale_amp_enable: [u8; PCIE_ROOT_PORTS],
    pub tx_gen3_downscale_amp: [u8; PCIE_ROOT_PORTS],
    pub tx_gen1_de_emph_enable: [u8; PCIE_ROOT_PORTS],
    pub tx_gen1_de_emph: [u8; PCIE_ROOT_PORTS],
    pub tx_gen2_de_emph_3p5_enable: [u8; PCIE_ROOT_PORTS],
    pub tx_gen2_de_emph_3p5: [u8; PCIE_ROOT_PORTS],
    pub tx_gen2_de_emph_6p0_enable: [u8; PCIE_ROOT_PORTS],
    pub tx_gen2_de_emph_6p0: [u8; PCIE_ROOT_PORTS],
}

/// Per-port SATA HSIO electrical tuning bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SataHsioTuning {
    pub rx_gen1_eq_boost_mag_enable: [u8; SATA_PORTS],
    pub rx_gen1_eq_boost_mag: [u8; SATA_PORTS],
    pub rx_gen2_eq_boost_mag_enable: [u8; SATA_PORTS],
    pub rx_gen2_eq_boost_mag: [u8; SATA_PORTS],
    pub rx_gen3_eq_boost_mag_enable: [u8; SATA_PORTS],
    pub rx_gen3_eq_boost_mag: [u8; SATA_PORTS],
    pub tx_gen1_downscale_amp_enable: [u8; SATA_PORTS],
    pub tx_gen1_downscale_amp: [u8; SATA_PORTS],
    pub tx_gen2_downscale_amp_enable: [u8; SATA_PORTS],
    pub tx_gen2_downscale_amp: [u8; SATA_PORTS],
    pub tx_gen3_downscale_amp_enable: [u8; SATA_PORTS],
    pub tx_gen3_downscale_amp: [u8; SATA_PORTS],
    pub tx_gen1_de_emph_enable: [u8; SATA_PORTS],
    pub tx_gen1_de_emph: [u8; SATA_PORTS],
    pub tx_gen2_de_emph_enable: [u8; SATA_PORTS],
    pub tx_gen2_de_emph: [u8; SATA_PORTS],
    pub tx_gen3_de_emph_enable: [u8; SATA_PORTS],
    pub tx_gen3_de_emph: [u8; SATA_PORTS],
}

/// Memory domain: board wiring, DRAM timings, electrical tuning, security
/// sizing and the pre-memory debug policy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemoryCfg {
    // Board config
    pub user_bd: u8,
    pub crid_enable: u8,

    // SPD / system-agent pre-mem
    pub spd_address_table: [u8; SPD_SLOTS],
    pub memory_spd_ptr00: u32,
    pub memory_spd_ptr10: u32,
    pub mmio_size_adjustment: u16,
    pub mmio_size: u16,
    pub tseg_size: u32,
    pub smbus_address_table: [u8; RSVD_SMBUS_ADDRESSES],

    // DMI Gen3 electrical
    pub txt_implemented: u8,
    pub dmi_gen3_program_static_eq: u8,
    pub init_pcie_aspm_after_oprom: u8,
    pub dmi_de_emphasis: u8,
    pub dmi_gen3_root_port_preset: [u8; DMI_LANES],
    pub dmi_gen3_end_point_preset: [u8; DMI_LANES],
    pub dmi_gen3_end_point_hint: [u8; DMI_LANES],
    pub dmi_gen3_rx_ctle_peaking: [u8; DMI_RX_CTLE],

    // Type-C subsystem
    pub usb_tc_port_en_pre_mem: u8,
    pub pcie_multiple_segment_enabled: u8,
    pub tcss_itbt_pcie0_en: u8,
    pub tcss_itbt_pcie1_en: u8,
    pub tcss_itbt_pcie2_en: u8,
    pub tcss_itbt_pcie3_en: u8,
    pub tcss_xhci_en: u8,
    pub tcss_xdci_en: u8,
    pub tcss_dma0_en: u8,
    pub tcss_dma1_en: u8,

    // Overclocking
    pub sa_oc_support: u8,
    pub gt_voltage_mode: u8,
    pub gt_max_oc_ratio: u8,
    pub gt_voltage_offset: u16,
    pub gt_voltage_override: u16,
    pub gt_extra_turbo_voltage: u16,
    pub sa_voltage_offset: u16,
    pub realtime_memory_timing: u8,

    // DQ/DQS routing
    pub dq_byte_map_ch0: [u8; DQ_MAP_BYTES],
    pub dq_byte_map_ch1: [u8; DQ_MAP_BYTES],
    pub dqs_map_cpu2dram_ch0: [u8; DQS_MAP_BYTES],
    pub dqs_map_cpu2dram_ch1: [u8; DQS_MAP_BYTES],
    pub dq_pins_interleaved: u8,
    pub ca_vref_config: u8,

    // RComp
    pub rcomp_resistor: [u16; 3],
    pub rcomp_target: [u16; 5],

    // MRC knobs
    pub mrc_fast_boot: u8,
    pub rmt_per_task: u8,
    pub ied_size: u32,
    pub smbus_enable: u8,
    pub cpu_ratio: u8,
    pub hyper_threading: u8,
    pub f_clk_frequency: u8,
    pub sa_gv: u8,
    pub ddr_speed_control: u8,
    pub freq_sa_gv_low: u16,
    pub freq_sa_gv_mid: u16,
    pub ddr_freq_limit: u16,
    pub sa_gv_low_gear2: u8,
    pub sa_gv_mid_gear2: u8,
    pub sa_gv_high_gear2: u8,
    pub pch_smb_alert_enable: u8,

    pub enhanced_interleave: u8,
    pub rank_interleave: u8,
    pub rh_prevention: u8,
    pub rh_solution: u8,
    pub rh_act_probability: u8,
    pub exit_on_failure: u8,
    pub ch_hash_enable: u8,
    pub ch_hash_interleave_bit: u8,
    pub ch_hash_mask: u16,
    pub cke_rank_mapping: u8,
    pub remap_enable: u8,
    pub disable_dimm_channel0: u8,
    pub disable_dimm_channel1: u8,
    pub scrambler_support: u8,
    pub pch_pse_enable: u8,

    // DRAM timings
    pub t_cl: u8,
    pub t_cwl: u8,
    pub t_faw: u16,
    pub t_ras: u16,
    pub t_rcd_t_rp: u8,
    pub t_refi: u16,
    pub t_rfc: u16,
    pub t_rrd: u8,
    pub t_rtp: u8,
    pub t_wr: u8,
    pub t_wtr: u8,
    pub n_mode_support: u8,
    pub dll_bw_en0: u8,
    pub dll_bw_en1: u8,
    pub dll_bw_en2: u8,
    pub dll_bw_en3: u8,

    // Training algorithms
    pub rmt: u8,
    pub bdat_enable: u8,
    pub bdat_test_type: u8,
    pub rmc: u8,
    pub memtst: u8,
    pub ect: u8,
    pub mrc_safe_config: u8,
    pub rapl_lim1_wind_x: u8,
    pub rapl_lim1_wind_y: u8,
    pub rapl_lim1_pwr: u16,

    // CPU security sizing
    pub prmrr_size: u32,
    pub txt: u8,
    pub skip_stop_pbet: u8,

    // CPU pre-mem
    pub boot_frequency: u8,
    pub active_core_count: u8,
    pub jtag_c10_power_gate_disable: u8,
    pub bist_on_reset: u8,
    pub vmx_enable: u8,

    // TXT sizing
    pub sinit_memory_size: u32,
    pub txt_heap_memory_size: u32,
    pub tga_size: u32,
    pub txt_lcp_pd_base: u64,
    pub txt_lcp_pd_size: u64,
    pub txt_dpr_memory_base: u64,
    pub txt_dpr_memory_size: u32,
    pub bios_acm_base: u64,
    pub bios_acm_size: u32,
    pub ap_startup_base: u32,

    // PCIe clock sources
    pub pcie_clk_src_usage: [u8; PCIE_CLK_SOURCES],
    pub pcie_clk_src_clk_req: [u8; PCIE_CLK_SOURCES],

    // PCH gating
    pub pch_master_clock_gating: u8,
    pub pch_master_power_gating: u8,

    // HSIO electrical tuning banks
    pub pcie_hsio: PcieHsioTuning,
    pub sata_hsio: SataHsioTuning,

    // VT-d (consumed only when the virtualization feature is built in)
    pub dma_control_guarantee: u8,
    pub x2apic_opt_out: u8,
    pub vtd_base_address: [u32; VTD_ENGINES],

    // Misc block config
    pub skip_ext_gfx_scan: u8,
    pub wdt_disable_and_lock: u8,

    // IBECC
    pub ibecc: u8,
    pub ibecc_parity: u8,
    pub ibecc_operation_mode: u8,
    pub ibecc_error_inj: u8,
    pub ibecc_protected_region_enable: [u8; IBECC_REGIONS],
    pub ibecc_protected_region_base: [u16; IBECC_REGIONS],
    pub ibecc_protected_region_mask: [u16; IBECC_REGIONS],

    // Debug / trace
    pub platform_debug_consent: u8,
    pub dci_en: u8,
    pub dci_modphy_pg: u8,
    pub dci_usb3_typec_ufp_dbg: u8,
    pub dci_dbc_mode: u8,
    pub cpu_trace_hub_mode: u8,
    pub pch_trace_hub_mode: u8,
    pub cpu_trace_hub_mem_reg0_size: u8,
    pub cpu_trace_hub_mem_reg1_size: u8,
    pub pch_trace_hub_mem_reg0_size: u8,
    pub pch_trace_hub_mem_reg1_size: u8,
}

/// Graphics domain: IGD memory carve-outs and the HD-Audio link policy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphicsCfg {
    pub igd_dvmt50_pre_alloc: u8,
    pub aperture_size: u8,
    pub gtt_size: u8,
    pub internal_gfx: u8,
    pub primary_display: u8,
    pub gtt_mm_adr: u32,
    pub gm_adr: u32,
    pub psmi_region_size: u8,
    pub dism_size: u8,
    pub gt_psmi_support: u8,

    pub pch_hda_enable: u8,
    pub pch_hda_dsp_enable: u8,
    pub pch_hda_idisp_link_frequency: u8,
    pub pch_hda_idisp_link_tmode: u8,
    pub pch_hda_idisp_codec_disconnect: u8,

    /// Audio link mode selector; see `AudioLinkMode` in the board layer.
    pub pch_hd_audio_link_mode: u8,
    pub pch_hda_audio_link_hda_enable: u8,
    pub pch_hda_audio_link_dmic_enable: [u8; HDA_DMIC_LINKS],
    pub pch_hda_audio_link_ssp_enable: [u8; HDA_SSP_LINKS],
    pub pch_hda_audio_link_sndw_enable: [u8; HDA_SNDW_LINKS],
}

/// Security domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecurityCfg {
    pub enable_sgx: u8,
}

/// Feature switches. Nonzero = enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeaturesCfg {
    pub acpi: u8,
    pub measured_boot: u8,
    pub tcc: u8,
    pub low_power_idle: u8,
}

/// Dynamic (per-boot) switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DynamicCfg {
    /// When nonzero, memory training runs even if saved parameters exist.
    pub mrc_training_enforcement: u8,
}

//! Memory-init parameter block.
//!
//! The fixed-layout aggregate handed to the vendor silicon-init binary for
//! DRAM training. Field names and types are a stable contract with that
//! stage; do not rename or retype them. [`Default`] supplies the firmware
//! defaults that stand for any domain whose config record is absent.

use ember_cfgdata::records::{
    PcieHsioTuning, SataHsioTuning, DMI_LANES, DMI_RX_CTLE, DQS_MAP_BYTES, DQ_MAP_BYTES,
    HDA_DMIC_LINKS, HDA_SNDW_LINKS, HDA_SSP_LINKS, IBECC_REGIONS, PCIE_CLK_SOURCES, SPD_SLOTS,
    VTD_ENGINES,
};

/// Debug interface selection bits for `debug_interface_flags`.
pub mod debug_flags {
    /// Route debug output through a serial-IO UART controller.
    pub const SERIAL_IO_UART: u8 = 1 << 4;
    /// Route debug output through the legacy ISA UART.
    pub const LEGACY_UART: u8 = 1 << 1;
}

/// DCI out-of-band debug transport modes (`dci_dbc_mode`).
pub mod dci {
    pub const DBC_DISABLED: u8 = 0;
    pub const DBC_USB2: u8 = 1;
    pub const DBC_USB3: u8 = 2;
    pub const DBC_BOTH: u8 = 3;
    pub const DBC_NO_CHANGE: u8 = 4;
}

/// Trace hub operating modes (`cpu_trace_hub_mode` / `pch_trace_hub_mode`).
pub mod trace_hub {
    pub const DISABLED: u8 = 0;
    pub const TARGET_DEBUGGER: u8 = 1;
    pub const HOST_DEBUGGER: u8 = 2;
}

/// Stage-architecture parameters consumed before the config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchParams {
    /// Temporary stack for the silicon-init binary.
    pub stack_base: u32,
    pub stack_size: u32,
}

/// Memory-init configuration section.
///
/// Grouping mirrors the silicon-init policy blocks; the projection engine in
/// [`crate::projection`] is the only writer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemInitConfig {
    // ── Debug output routing ────────────────────────────────────────────
    pub debug_interface_flags: u8,
    pub serial_io_uart_debug_controller_number: u8,
    pub isa_serial_uart_base: u8,
    pub serial_debug_level: u8,

    // ── Security ────────────────────────────────────────────────────────
    pub enable_sgx: u8,

    // ── Board config ────────────────────────────────────────────────────
    pub user_bd: u8,
    pub crid_enable: u8,

    // ── SPD / system-agent pre-mem ──────────────────────────────────────
    pub spd_address_table: [u8; SPD_SLOTS],
    pub memory_spd_ptr00: u32,
    pub memory_spd_ptr10: u32,
    pub mmio_size_adjustment: u16,
    pub mmio_size: u16,
    pub tseg_size: u32,
    pub pch_num_rsvd_smbus_addresses: u8,
    pub rsvd_smbus_address_table_ptr: u32,

    // ── DMI Gen3 electrical ─────────────────────────────────────────────
    pub txt_implemented: u8,
    pub dmi_gen3_program_static_eq: u8,
    pub init_pcie_aspm_after_oprom: u8,
    pub dmi_de_emphasis: u8,
    pub dmi_gen3_root_port_preset: [u8; DMI_LANES],
    pub dmi_gen3_end_point_preset: [u8; DMI_LANES],
    pub dmi_gen3_end_point_hint: [u8; DMI_LANES],
    pub dmi_gen3_rx_ctle_peaking: [u8; DMI_RX_CTLE],

    // ── Type-C subsystem ────────────────────────────────────────────────
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

    // ── Overclocking ────────────────────────────────────────────────────
    pub sa_oc_support: u8,
    pub gt_voltage_mode: u8,
    pub gt_max_oc_ratio: u8,
    pub gt_voltage_offset: u16,
    pub gt_voltage_override: u16,
    pub gt_extra_turbo_voltage: u16,
    pub sa_voltage_offset: u16,
    pub realtime_memory_timing: u8,

    // ── DQ/DQS routing ──────────────────────────────────────────────────
    pub dq_byte_map_ch0: [u8; DQ_MAP_BYTES],
    pub dq_byte_map_ch1: [u8; DQ_MAP_BYTES],
    pub dqs_map_cpu2dram_ch0: [u8; DQS_MAP_BYTES],
    pub dqs_map_cpu2dram_ch1: [u8; DQS_MAP_BYTES],
    pub dq_pins_interleaved: u8,
    pub ca_vref_config: u8,

    // ── RComp ───────────────────────────────────────────────────────────
    pub rcomp_resistor: [u16; 3],
    pub rcomp_target: [u16; 5],

    // ── MRC knobs ───────────────────────────────────────────────────────
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

    // ── DRAM timings ────────────────────────────────────────────────────
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

    // ── Training algorithms ─────────────────────────────────────────────
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

    // ── CPU security sizing ─────────────────────────────────────────────
    pub prmrr_size: u32,
    pub txt: u8,
    pub skip_stop_pbet: u8,

    // ── CPU pre-mem ─────────────────────────────────────────────────────
    pub boot_frequency: u8,
    pub active_core_count: u8,
    pub jtag_c10_power_gate_disable: u8,
    pub bist_on_reset: u8,
    pub vmx_enable: u8,

    // ── TXT sizing ──────────────────────────────────────────────────────
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

    // ── PCIe clock sources ──────────────────────────────────────────────
    pub pcie_clk_src_usage: [u8; PCIE_CLK_SOURCES],
    pub pcie_clk_src_clk_req: [u8; PCIE_CLK_SOURCES],

    // ── PCH gating ──────────────────────────────────────────────────────
    pub pch_master_clock_gating: u8,
    pub pch_master_power_gating: u8,

    // ── HSIO electrical tuning banks ────────────────────────────────────
    pub pcie_hsio: PcieHsioTuning,
    pub sata_hsio: SataHsioTuning,

    // ── VT-d ────────────────────────────────────────────────────────────
    pub vtd_disable: u8,
    pub vtd_igd_enable: u8,
    pub vtd_iop_enable: u8,
    pub dma_control_guarantee: u8,
    pub x2apic_opt_out: u8,
    pub vtd_base_address: [u32; VTD_ENGINES],

    // ── Misc block config ───────────────────────────────────────────────
    pub skip_ext_gfx_scan: u8,
    pub wdt_disable_and_lock: u8,

    // ── IBECC ───────────────────────────────────────────────────────────
    pub ibecc: u8,
    pub ibecc_parity: u8,
    pub ibecc_operation_mode: u8,
    pub ibecc_error_inj: u8,
    pub ibecc_protected_region_enable: [u8; IBECC_REGIONS],
    pub ibecc_protected_region_base: [u16; IBECC_REGIONS],
    pub ibecc_protected_region_mask: [u16; IBECC_REGIONS],

    // ── Debug / trace ───────────────────────────────────────────────────
    pub platform_debug_consent: u8,
    pub dci_en: u8,
    pub dci_modphy_pg: u8,
    pub dci_usb3_typec_ufp_dbg: u8,
    pub dci_dbc_mode: u8,
    pub debug_interface_enable: u8,
    pub debug_interface_lock_enable: u8,
    pub cpu_trace_hub_mode: u8,
    pub pch_trace_hub_mode: u8,
    pub cpu_trace_hub_mem_reg0_size: u8,
    pub cpu_trace_hub_mem_reg1_size: u8,
    pub pch_trace_hub_mem_reg0_size: u8,
    pub pch_trace_hub_mem_reg1_size: u8,

    // ── Graphics / IGD ──────────────────────────────────────────────────
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
    pub disable_te_igd: u8,
    pub heci_communication2: u8,

    // ── HD-Audio ────────────────────────────────────────────────────────
    pub pch_hda_enable: u8,
    pub pch_hda_dsp_enable: u8,
    pub pch_hda_idisp_link_frequency: u8,
    pub pch_hda_idisp_link_tmode: u8,
    pub pch_hda_idisp_codec_disconnect: u8,
    pub pch_hda_audio_link_hda_enable: u8,
    pub pch_hda_audio_link_dmic_enable: [u8; HDA_DMIC_LINKS],
    pub pch_hda_audio_link_ssp_enable: [u8; HDA_SSP_LINKS],
    pub pch_hda_audio_link_sndw_enable: [u8; HDA_SNDW_LINKS],
    pub pch_hda_audio_link_dmic_clk_a_pin_mux: [u32; HDA_DMIC_LINKS],
    pub pch_hda_audio_link_dmic_clk_b_pin_mux: [u32; HDA_DMIC_LINKS],
    pub pch_hda_audio_link_dmic_data_pin_mux: [u32; HDA_DMIC_LINKS],

    // ── TCC / RAPL / SA-GV ──────────────────────────────────────────────
    pub dis_pg_close_idle_timeout: u8,
    pub rapl_lim1_ena: u8,
    pub rapl_lim2_ena: u8,
    pub power_down_mode: u8,
    pub tcc_tuning_enable_pre_mem: u8,
    pub tcc_stream_cfg_base_pre_mem: u32,
    pub tcc_stream_cfg_size_pre_mem: u32,
}

/// The complete parameter block for the memory-init stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemInitParams {
    pub arch: ArchParams,
    pub cfg: MemInitConfig,
}

impl Default for MemInitParams {
    /// The firmware defaults that stand when a config domain is absent.
    fn default() -> Self {
        let mut cfg = MemInitConfig::default();
        // Page-close idle timeout stays disabled until tuning data turns
        // memory power management on.
        cfg.dis_pg_close_idle_timeout = 1;
        Self {
            arch: ArchParams::default(),
            cfg,
        }
    }
}

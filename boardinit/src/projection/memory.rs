//! Memory domain projection.
//!
//! The widest domain: board wiring, DRAM timings, electrical tuning,
//! security sizing, virtualization and the debug/trace policy all ride in
//! the memory config record.

use ember_cfgdata::{ConfigStore, FeaturesCfg, MemoryCfg};
use log::info;

use crate::features::BuildFeatures;
use crate::params::{dci, trace_hub, MemInitParams};

/// Platform debug consent selector carried in the memory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugConsent {
    /// All debug interfaces off.
    Disabled,
    /// USB2 debug-class cable.
    Usb2Dbc,
    /// USB3 debug-class cable.
    Usb3Dbc,
    /// Two-wire out-of-band probe.
    TwoWireDciOob,
    /// Out-of-band probe only.
    DciOob,
    /// Every debug field comes raw from the record.
    Manual,
}

impl DebugConsent {
    /// Decode the selector; unknown values mean "leave the defaults".
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Disabled),
            1 => Some(Self::Usb2Dbc),
            2 => Some(Self::Usb3Dbc),
            3 => Some(Self::TwoWireDciOob),
            4 => Some(Self::DciOob),
            5 => Some(Self::Manual),
            _ => None,
        }
    }
}

/// Project the memory domain, if its record is present.
pub(crate) fn project(params: &mut MemInitParams, store: &ConfigStore, build: &BuildFeatures) {
    let Some(mem) = store.find::<MemoryCfg>() else {
        info!("no memory cfg record");
        return;
    };
    info!("loading memory cfg");

    let features_cfg = store.find::<FeaturesCfg>();
    let cfg = &mut params.cfg;

    // Board config
    cfg.user_bd = mem.user_bd;
    cfg.crid_enable = mem.crid_enable;

    // SPD / system-agent pre-mem
    cfg.spd_address_table = mem.spd_address_table;
    cfg.memory_spd_ptr00 = mem.memory_spd_ptr00;
    cfg.memory_spd_ptr10 = mem.memory_spd_ptr10;
    cfg.mmio_size_adjustment = mem.mmio_size_adjustment;
    cfg.mmio_size = mem.mmio_size;
    cfg.tseg_size = mem.tseg_size;
    cfg.pch_num_rsvd_smbus_addresses = mem.smbus_address_table.len() as u8;
    // Address of the record's table; the record outlives this boot stage.
    cfg.rsvd_smbus_address_table_ptr = mem.smbus_address_table.as_ptr() as usize as u32;

    // DMI Gen3 electrical
    cfg.txt_implemented = mem.txt_implemented;
    cfg.dmi_gen3_program_static_eq = mem.dmi_gen3_program_static_eq;
    cfg.init_pcie_aspm_after_oprom = mem.init_pcie_aspm_after_oprom;
    cfg.dmi_de_emphasis = mem.dmi_de_emphasis;
    cfg.dmi_gen3_root_port_preset = mem.dmi_gen3_root_port_preset;
    cfg.dmi_gen3_end_point_preset = mem.dmi_gen3_end_point_preset;
    cfg.dmi_gen3_end_point_hint = mem.dmi_gen3_end_point_hint;
    cfg.dmi_gen3_rx_ctle_peaking = mem.dmi_gen3_rx_ctle_peaking;

    // Type-C subsystem
    cfg.usb_tc_port_en_pre_mem = mem.usb_tc_port_en_pre_mem;
    cfg.pcie_multiple_segment_enabled = mem.pcie_multiple_segment_enabled;
    cfg.tcss_itbt_pcie0_en = mem.tcss_itbt_pcie0_en;
    cfg.tcss_itbt_pcie1_en = mem.tcss_itbt_pcie1_en;
    cfg.tcss_itbt_pcie2_en = mem.tcss_itbt_pcie2_en;
    cfg.tcss_itbt_pcie3_en = mem.tcss_itbt_pcie3_en;
    cfg.tcss_xhci_en = mem.tcss_xhci_en;
    cfg.tcss_xdci_en = mem.tcss_xdci_en;
    if let Some(features) = features_cfg {
        // Low-power idle keeps the device controller out of the package
        // wake path.
        if features.low_power_idle != 0 {
            info!("low power idle set, xDCI forced off");
            cfg.tcss_xdci_en = 0;
        }
    }
    cfg.tcss_dma0_en = mem.tcss_dma0_en;
    cfg.tcss_dma1_en = mem.tcss_dma1_en;

    // Overclocking
    cfg.sa_oc_support = mem.sa_oc_support;
    cfg.gt_voltage_mode = mem.gt_voltage_mode;
    cfg.gt_max_oc_ratio = mem.gt_max_oc_ratio;
    cfg.gt_voltage_offset = mem.gt_voltage_offset;
    cfg.gt_voltage_override = mem.gt_voltage_override;
    cfg.gt_extra_turbo_voltage = mem.gt_extra_turbo_voltage;
    cfg.sa_voltage_offset = mem.sa_voltage_offset;
    cfg.realtime_memory_timing = mem.realtime_memory_timing;

    // DQ/DQS routing
    cfg.dq_byte_map_ch0 = mem.dq_byte_map_ch0;
    cfg.dq_byte_map_ch1 = mem.dq_byte_map_ch1;
    cfg.dqs_map_cpu2dram_ch0 = mem.dqs_map_cpu2dram_ch0;
    cfg.dqs_map_cpu2dram_ch1 = mem.dqs_map_cpu2dram_ch1;
    cfg.dq_pins_interleaved = mem.dq_pins_interleaved;
    cfg.ca_vref_config = mem.ca_vref_config;

    // RComp
    cfg.rcomp_resistor = mem.rcomp_resistor;
    cfg.rcomp_target = mem.rcomp_target;

    // MRC knobs
    cfg.mrc_fast_boot = mem.mrc_fast_boot;
    cfg.rmt_per_task = mem.rmt_per_task;
    cfg.ied_size = mem.ied_size;
    cfg.smbus_enable = mem.smbus_enable;
    cfg.cpu_ratio = mem.cpu_ratio;
    cfg.hyper_threading = mem.hyper_threading;
    cfg.f_clk_frequency = mem.f_clk_frequency;
    cfg.sa_gv = mem.sa_gv;
    cfg.ddr_speed_control = mem.ddr_speed_control;
    cfg.freq_sa_gv_low = mem.freq_sa_gv_low;
    cfg.freq_sa_gv_mid = mem.freq_sa_gv_mid;
    cfg.ddr_freq_limit = mem.ddr_freq_limit;
    cfg.sa_gv_low_gear2 = mem.sa_gv_low_gear2;
    cfg.sa_gv_mid_gear2 = mem.sa_gv_mid_gear2;
    cfg.sa_gv_high_gear2 = mem.sa_gv_high_gear2;
    cfg.pch_smb_alert_enable = mem.pch_smb_alert_enable;

    cfg.enhanced_interleave = mem.enhanced_interleave;
    cfg.rank_interleave = mem.rank_interleave;

    // Row-hammer mitigation. The probability gate is intentionally two
    // independent conditions; solution 0 is the probability-based scheme.
    cfg.rh_prevention = mem.rh_prevention;
    if mem.rh_prevention == 1 {
        cfg.rh_solution = mem.rh_solution;
    }
    if mem.rh_prevention == 1 || mem.rh_solution == 0 {
        cfg.rh_act_probability = mem.rh_act_probability;
    }

    cfg.exit_on_failure = mem.exit_on_failure;
    cfg.ch_hash_enable = mem.ch_hash_enable;
    cfg.ch_hash_interleave_bit = mem.ch_hash_interleave_bit;
    cfg.ch_hash_mask = mem.ch_hash_mask;
    cfg.cke_rank_mapping = mem.cke_rank_mapping;
    cfg.remap_enable = mem.remap_enable;
    cfg.disable_dimm_channel0 = mem.disable_dimm_channel0;
    cfg.disable_dimm_channel1 = mem.disable_dimm_channel1;
    cfg.scrambler_support = mem.scrambler_support;
    cfg.pch_pse_enable = mem.pch_pse_enable;

    // DRAM timings
    cfg.t_cl = mem.t_cl;
    cfg.t_cwl = mem.t_cwl;
    cfg.t_faw = mem.t_faw;
    cfg.t_ras = mem.t_ras;
    cfg.t_rcd_t_rp = mem.t_rcd_t_rp;
    cfg.t_refi = mem.t_refi;
    cfg.t_rfc = mem.t_rfc;
    cfg.t_rrd = mem.t_rrd;
    cfg.t_rtp = mem.t_rtp;
    cfg.t_wr = mem.t_wr;
    cfg.t_wtr = mem.t_wtr;
    cfg.n_mode_support = mem.n_mode_support;
    cfg.dll_bw_en0 = mem.dll_bw_en0;
    cfg.dll_bw_en1 = mem.dll_bw_en1;
    cfg.dll_bw_en2 = mem.dll_bw_en2;
    cfg.dll_bw_en3 = mem.dll_bw_en3;

    // Training algorithms
    cfg.rmt = mem.rmt;
    cfg.bdat_enable = mem.bdat_enable;
    cfg.bdat_test_type = mem.bdat_test_type;
    cfg.rmc = mem.rmc;
    cfg.memtst = mem.memtst;
    cfg.ect = mem.ect;
    cfg.mrc_safe_config = mem.mrc_safe_config;
    cfg.rapl_lim1_wind_x = mem.rapl_lim1_wind_x;
    cfg.rapl_lim1_wind_y = mem.rapl_lim1_wind_y;
    cfg.rapl_lim1_pwr = mem.rapl_lim1_pwr;

    // CPU security sizing
    cfg.prmrr_size = mem.prmrr_size;
    cfg.txt = mem.txt;
    cfg.skip_stop_pbet = mem.skip_stop_pbet;

    // CPU pre-mem
    cfg.boot_frequency = mem.boot_frequency;
    cfg.active_core_count = mem.active_core_count;
    cfg.jtag_c10_power_gate_disable = mem.jtag_c10_power_gate_disable;
    cfg.bist_on_reset = mem.bist_on_reset;
    cfg.vmx_enable = mem.vmx_enable;
    cfg.cpu_ratio = mem.cpu_ratio;

    // TXT sizing
    cfg.sinit_memory_size = mem.sinit_memory_size;
    cfg.txt_heap_memory_size = mem.txt_heap_memory_size;
    cfg.tga_size = mem.tga_size;
    cfg.txt_lcp_pd_base = mem.txt_lcp_pd_base;
    cfg.txt_lcp_pd_size = mem.txt_lcp_pd_size;
    cfg.txt_dpr_memory_base = mem.txt_dpr_memory_base;
    cfg.txt_dpr_memory_size = mem.txt_dpr_memory_size;
    cfg.bios_acm_base = mem.bios_acm_base;
    cfg.bios_acm_size = mem.bios_acm_size;
    cfg.ap_startup_base = mem.ap_startup_base;

    // PCIe clock sources
    cfg.pcie_clk_src_usage = mem.pcie_clk_src_usage;
    cfg.pcie_clk_src_clk_req = mem.pcie_clk_src_clk_req;

    // PCH gating
    cfg.pch_master_clock_gating = mem.pch_master_clock_gating;
    cfg.pch_master_power_gating = mem.pch_master_power_gating;

    // HSIO electrical tuning banks
    cfg.pcie_hsio = mem.pcie_hsio;
    cfg.sata_hsio = mem.sata_hsio;

    // VT-d. When the build carries no remapping support the domain is
    // forced off and nothing further is read from the record.
    cfg.vtd_disable = u8::from(!build.vtd);
    if cfg.vtd_disable == 0 {
        cfg.vtd_igd_enable = 1;
        cfg.vtd_iop_enable = 1;
        cfg.dma_control_guarantee = mem.dma_control_guarantee;
        cfg.x2apic_opt_out = mem.x2apic_opt_out;
        cfg.vtd_base_address = mem.vtd_base_address;
    }

    // Misc block config
    cfg.skip_ext_gfx_scan = mem.skip_ext_gfx_scan;
    cfg.wdt_disable_and_lock = mem.wdt_disable_and_lock;

    // IBECC
    cfg.ibecc = mem.ibecc;
    cfg.ibecc_parity = mem.ibecc_parity;
    cfg.ibecc_operation_mode = mem.ibecc_operation_mode;
    cfg.ibecc_error_inj = mem.ibecc_error_inj;
    cfg.ibecc_protected_region_enable = mem.ibecc_protected_region_enable;
    cfg.ibecc_protected_region_base = mem.ibecc_protected_region_base;
    cfg.ibecc_protected_region_mask = mem.ibecc_protected_region_mask;

    // Debug/trace defaults; the consent selector refines them below.
    cfg.dci_en = 1;
    cfg.dci_modphy_pg = 0;
    cfg.dci_dbc_mode = dci::DBC_NO_CHANGE;
    cfg.cpu_trace_hub_mode = trace_hub::HOST_DEBUGGER;
    cfg.pch_trace_hub_mode = trace_hub::HOST_DEBUGGER;
    cfg.dci_usb3_typec_ufp_dbg = 2;
    cfg.debug_interface_lock_enable = 1;
    cfg.platform_debug_consent = mem.platform_debug_consent;
    cfg.cpu_trace_hub_mem_reg0_size = mem.cpu_trace_hub_mem_reg0_size;
    cfg.cpu_trace_hub_mem_reg1_size = mem.cpu_trace_hub_mem_reg1_size;
    cfg.pch_trace_hub_mem_reg0_size = mem.pch_trace_hub_mem_reg0_size;
    cfg.pch_trace_hub_mem_reg1_size = mem.pch_trace_hub_mem_reg1_size;

    match DebugConsent::from_raw(mem.platform_debug_consent) {
        Some(DebugConsent::Disabled) => {
            cfg.dci_en = 0;
            cfg.cpu_trace_hub_mode = trace_hub::DISABLED;
            cfg.pch_trace_hub_mode = trace_hub::DISABLED;
        }
        Some(DebugConsent::Usb2Dbc) => {
            cfg.dci_dbc_mode = dci::DBC_BOTH;
        }
        Some(DebugConsent::Usb3Dbc) => {
            cfg.dci_dbc_mode = dci::DBC_USB3;
        }
        Some(DebugConsent::TwoWireDciOob) => {
            cfg.cpu_trace_hub_mode = trace_hub::DISABLED;
            cfg.pch_trace_hub_mode = trace_hub::DISABLED;
        }
        Some(DebugConsent::DciOob) => {
            cfg.dci_modphy_pg = 0;
        }
        Some(DebugConsent::Manual) => {
            cfg.dci_en = mem.dci_en;
            cfg.dci_modphy_pg = mem.dci_modphy_pg;
            cfg.dci_usb3_typec_ufp_dbg = mem.dci_usb3_typec_ufp_dbg;
            cfg.dci_dbc_mode = mem.dci_dbc_mode;
            cfg.cpu_trace_hub_mode = mem.cpu_trace_hub_mode;
            cfg.pch_trace_hub_mode = mem.pch_trace_hub_mode;
            cfg.debug_interface_enable = 0;
        }
        None => {}
    }

    info!(
        "debug consent {} dci {} dbc {} hubs {}/{}",
        cfg.platform_debug_consent,
        cfg.dci_en,
        cfg.dci_dbc_mode,
        cfg.cpu_trace_hub_mode,
        cfg.pch_trace_hub_mode
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testhw::build_all;

    fn store_with(mem: MemoryCfg) -> ConfigStore {
        let mut store = ConfigStore::new();
        store.insert(mem.into());
        store
    }

    fn project_one(mem: MemoryCfg, build: &BuildFeatures) -> MemInitParams {
        let mut params = MemInitParams::default();
        project(&mut params, &store_with(mem), build);
        params
    }

    #[test]
    fn test_absent_record_leaves_defaults() {
        let mut params = MemInitParams::default();
        let before = params.clone();
        project(&mut params, &ConfigStore::new(), &build_all());
        assert_eq!(params, before);
    }

    #[test]
    fn test_scalar_and_array_copies() {
        let mut mem = MemoryCfg::default();
        mem.t_cl = 16;
        mem.t_refi = 0x1E48;
        mem.rcomp_resistor = [121, 81, 100];
        mem.dq_byte_map_ch0 = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        mem.pcie_hsio.rx_set_ctle_enable = [1; 8];
        mem.sata_hsio.tx_gen3_de_emph = [0x20, 0x24];
        mem.smbus_address_table = [0xA0, 0xA2, 0xA4, 0xA6];

        let params = project_one(mem, &build_all());
        assert_eq!(params.cfg.t_cl, 16);
        assert_eq!(params.cfg.t_refi, 0x1E48);
        assert_eq!(params.cfg.rcomp_resistor, [121, 81, 100]);
        assert_eq!(params.cfg.dq_byte_map_ch0[11], 12);
        assert_eq!(params.cfg.pcie_hsio.rx_set_ctle_enable, [1; 8]);
        assert_eq!(params.cfg.sata_hsio.tx_gen3_de_emph, [0x20, 0x24]);
        assert_eq!(params.cfg.pch_num_rsvd_smbus_addresses, 4);
        assert_ne!(params.cfg.rsvd_smbus_address_table_ptr, 0);
    }

    #[test]
    fn test_row_hammer_solution_gated_on_prevention() {
        let mut mem = MemoryCfg::default();
        mem.rh_prevention = 0;
        mem.rh_solution = 1;
        mem.rh_act_probability = 7;

        // prevention off, solution nonzero: neither solution nor
        // probability may be projected
        let params = project_one(mem.clone(), &build_all());
        assert_eq!(params.cfg.rh_solution, 0);
        assert_eq!(params.cfg.rh_act_probability, 0);

        // prevention on: both project
        mem.rh_prevention = 1;
        let params = project_one(mem, &build_all());
        assert_eq!(params.cfg.rh_prevention, 1);
        assert_eq!(params.cfg.rh_solution, 1);
        assert_eq!(params.cfg.rh_act_probability, 7);
    }

    #[test]
    fn test_row_hammer_probability_unlocked_by_solution_zero() {
        // prevention off but solution is the probability-based sentinel:
        // the probability field alone is projected
        let mut mem = MemoryCfg::default();
        mem.rh_prevention = 0;
        mem.rh_solution = 0;
        mem.rh_act_probability = 9;

        let params = project_one(mem, &build_all());
        assert_eq!(params.cfg.rh_prevention, 0);
        assert_eq!(params.cfg.rh_solution, 0);
        assert_eq!(params.cfg.rh_act_probability, 9);
    }

    #[test]
    fn test_vtd_enabled_forces_capability_flags() {
        let mut mem = MemoryCfg::default();
        mem.dma_control_guarantee = 1;
        mem.x2apic_opt_out = 1;
        mem.vtd_base_address = [0xFED9_0000, 0xFED9_1000, 0xFED9_2000];

        let params = project_one(mem, &build_all());
        assert_eq!(params.cfg.vtd_disable, 0);
        assert_eq!(params.cfg.vtd_igd_enable, 1);
        assert_eq!(params.cfg.vtd_iop_enable, 1);
        assert_eq!(params.cfg.dma_control_guarantee, 1);
        assert_eq!(params.cfg.x2apic_opt_out, 1);
        assert_eq!(params.cfg.vtd_base_address[2], 0xFED9_2000);
    }

    #[test]
    fn test_vtd_disabled_reads_nothing() {
        let mut mem = MemoryCfg::default();
        mem.dma_control_guarantee = 1;
        mem.x2apic_opt_out = 1;
        mem.vtd_base_address = [1, 2, 3];

        let build = BuildFeatures {
            vtd: false,
            ..build_all()
        };
        let params = project_one(mem, &build);
        assert_eq!(params.cfg.vtd_disable, 1);
        assert_eq!(params.cfg.vtd_igd_enable, 0);
        assert_eq!(params.cfg.vtd_iop_enable, 0);
        assert_eq!(params.cfg.dma_control_guarantee, 0);
        assert_eq!(params.cfg.x2apic_opt_out, 0);
        assert_eq!(params.cfg.vtd_base_address, [0, 0, 0]);
    }

    #[test]
    fn test_low_power_idle_forces_xdci_off() {
        let mut mem = MemoryCfg::default();
        mem.tcss_xdci_en = 1;

        let mut store = store_with(mem);
        store.insert(
            FeaturesCfg {
                acpi: 1,
                measured_boot: 1,
                tcc: 0,
                low_power_idle: 1,
            }
            .into(),
        );
        let mut params = MemInitParams::default();
        project(&mut params, &store, &build_all());
        assert_eq!(params.cfg.tcss_xdci_en, 0);
    }

    fn consent_fixture(consent: u8) -> MemoryCfg {
        let mut mem = MemoryCfg::default();
        mem.platform_debug_consent = consent;
        // Raw record values that only Manual may surface
        mem.dci_en = 0x55;
        mem.dci_modphy_pg = 0x56;
        mem.dci_usb3_typec_ufp_dbg = 0x57;
        mem.dci_dbc_mode = 0x58;
        mem.cpu_trace_hub_mode = 0x59;
        mem.pch_trace_hub_mode = 0x5A;
        mem
    }

    #[test]
    fn test_consent_disabled_turns_everything_off() {
        let params = project_one(consent_fixture(0), &build_all());
        assert_eq!(params.cfg.dci_en, 0);
        assert_eq!(params.cfg.cpu_trace_hub_mode, trace_hub::DISABLED);
        assert_eq!(params.cfg.pch_trace_hub_mode, trace_hub::DISABLED);
        assert_eq!(params.cfg.dci_dbc_mode, dci::DBC_NO_CHANGE);
    }

    #[test]
    fn test_consent_usb_variants_select_dbc_mode() {
        let params = project_one(consent_fixture(1), &build_all());
        assert_eq!(params.cfg.dci_dbc_mode, dci::DBC_BOTH);
        assert_eq!(params.cfg.dci_en, 1);

        let params = project_one(consent_fixture(2), &build_all());
        assert_eq!(params.cfg.dci_dbc_mode, dci::DBC_USB3);
    }

    #[test]
    fn test_consent_two_wire_disables_trace_hubs_only() {
        let params = project_one(consent_fixture(3), &build_all());
        assert_eq!(params.cfg.dci_en, 1);
        assert_eq!(params.cfg.cpu_trace_hub_mode, trace_hub::DISABLED);
        assert_eq!(params.cfg.pch_trace_hub_mode, trace_hub::DISABLED);
    }

    #[test]
    fn test_consent_oob_keeps_modphy_powered() {
        let params = project_one(consent_fixture(4), &build_all());
        assert_eq!(params.cfg.dci_modphy_pg, 0);
        assert_eq!(params.cfg.dci_en, 1);
        assert_eq!(params.cfg.cpu_trace_hub_mode, trace_hub::HOST_DEBUGGER);
    }

    #[test]
    fn test_consent_manual_copies_record_verbatim() {
        let params = project_one(consent_fixture(5), &build_all());
        assert_eq!(params.cfg.dci_en, 0x55);
        assert_eq!(params.cfg.dci_modphy_pg, 0x56);
        assert_eq!(params.cfg.dci_usb3_typec_ufp_dbg, 0x57);
        assert_eq!(params.cfg.dci_dbc_mode, 0x58);
        assert_eq!(params.cfg.cpu_trace_hub_mode, 0x59);
        assert_eq!(params.cfg.pch_trace_hub_mode, 0x5A);
        assert_eq!(params.cfg.debug_interface_enable, 0);
    }

    #[test]
    fn test_consent_unknown_keeps_defaults() {
        let params = project_one(consent_fixture(0x7F), &build_all());
        assert_eq!(params.cfg.dci_en, 1);
        assert_eq!(params.cfg.dci_dbc_mode, dci::DBC_NO_CHANGE);
        assert_eq!(params.cfg.cpu_trace_hub_mode, trace_hub::HOST_DEBUGGER);
        assert_eq!(params.cfg.pch_trace_hub_mode, trace_hub::HOST_DEBUGGER);
        // selector itself still recorded
        assert_eq!(params.cfg.platform_debug_consent, 0x7F);
    }
}

//! Phase dispatcher.
//!
//! The boot core drives [`Board::init`] once per phase, in order. All
//! board state is threaded through [`BoardState`] rather than globals so
//! the whole stage can run against fake hardware.

use ember_cfgdata::ConfigStore;
use ember_hwio::pci::{PciAddr, PciConfigAccess};
use ember_hwio::{IoPortAccess, MmioAccess};
use log::{error, info};

use crate::boardid::{platform_name, resolve_board_identity, BoardIdentity};
use crate::devices::{PlatformDevice, PLATFORM_DEVICES};
use crate::error::BoardError;
use crate::features::{platform_features_init, BuildFeatures, FeatureFlags, PlatformFeatures, TuningData};
use crate::gpio::GPIO_TABLE_PRE_MEM;
use crate::nvsdata;
use crate::params::MemInitParams;
use crate::power::{
    is_firmware_update, platform_power_state, BootMode, B_GEN_PMCON_A_DISB, PWRM_BASE,
    R_GEN_PMCON_A,
};
use crate::projection;
use crate::rtc::rtc_init;
use crate::services::{
    BootGuard, BootGuardInfo, ComponentLoader, FlashStateMachine, GpioPads, SidebandBus, SpiFlash,
    TpmService,
};
use crate::tpm::tpm_initialize;

// ═══════════════════════════════════════════════════════════════════════════
// FIXED ADDRESSES
// ═══════════════════════════════════════════════════════════════════════════

/// Boot-guard ACM status latch.
const BOOT_GUARD_ACM_STATUS: usize = 0xFED3_0328;
/// Boot-guard boot status latch.
const BOOT_GUARD_BOOT_STATUS: usize = 0xFED3_00A4;
const B_BOOT_STATUS_SUCCESS: u32 = 1 << 31;
const B_BOOT_STATUS_FAILURE: u32 = 1 << 30;

/// SPI flash controller device.
const SPI_DEVICE: PciAddr = PciAddr::new(0, 0x1F, 5);
const R_SPI_BAR0: u8 = 0x10;
const R_PCI_COMMAND: u8 = 0x04;
/// Memory space + bus master enable.
const PCI_CMD_MSE_BME: u8 = 0x6;
/// Temporary MMIO window for the SPI controller before resource assignment.
const SPI_TEMP_MEM_BASE: u32 = 0xFE01_0000;

/// HECI device the boot-guard report is read through.
const HECI_DEVICE: PciAddr = PciAddr::new(0, 0x16, 0);

// ═══════════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// Board initialization phases, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPhase {
    PreConfig,
    PostConfig,
    PreMemory,
    PostMemory,
    PreTempRamExit,
    PostTempRamExit,
}

/// Runtime platform capabilities the boot core hands us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformCaps {
    /// The safety-island controller owns SSP0/DMIC when present.
    pub sci_supported: bool,
    /// Serial-IO UART index used for debug output, if any.
    pub debug_port: Option<u8>,
}

/// Collaborator services supplied by the boot core.
pub struct BoardServices<'a> {
    pub io: &'a mut dyn IoPortAccess,
    pub mmio: &'a mut dyn MmioAccess,
    pub pci: &'a mut dyn PciConfigAccess,
    pub sideband: &'a mut dyn SidebandBus,
    pub loader: &'a mut dyn ComponentLoader,
    pub spi: &'a mut dyn SpiFlash,
    pub gpio: &'a mut dyn GpioPads,
    pub tpm: &'a mut dyn TpmService,
    pub boot_guard: &'a mut dyn BootGuard,
    pub flash_sm: &'a mut dyn FlashStateMachine,
}

/// Board state accumulated across phases.
#[derive(Debug)]
pub struct BoardState {
    pub identity: BoardIdentity,
    pub platform_id: u16,
    pub platform_name: &'static str,
    pub boot_mode: BootMode,
    pub boot_guard: BootGuardInfo,
    pub features: PlatformFeatures,
    pub device_table: Option<&'static [PlatformDevice]>,
}

impl BoardState {
    const fn new() -> Self {
        Self {
            identity: BoardIdentity::DEFAULT,
            platform_id: 0,
            platform_name: "",
            boot_mode: BootMode::FullConfig,
            boot_guard: BootGuardInfo {
                measured_boot: false,
                verified_boot: false,
                disconnect_all_tpms: false,
                bypass_tpm_init: false,
                tpm_type: crate::services::TpmType::None,
            },
            features: PlatformFeatures::empty(),
            device_table: None,
        }
    }
}

/// The board, wired to its collaborators for one boot.
pub struct Board<'a> {
    svc: BoardServices<'a>,
    store: &'a ConfigStore,
    build: BuildFeatures,
    caps: PlatformCaps,
    pub state: BoardState,
}

impl<'a> Board<'a> {
    /// Wire up the board for this boot.
    pub fn new(
        svc: BoardServices<'a>,
        store: &'a ConfigStore,
        build: BuildFeatures,
        caps: PlatformCaps,
    ) -> Self {
        Self {
            svc,
            store,
            build,
            caps,
            state: BoardState::new(),
        }
    }

    /// Run one initialization phase.
    ///
    /// Only a required-but-failed TPM initialization returns an error;
    /// the boot core halts on it.
    pub fn init(&mut self, phase: InitPhase) -> Result<(), BoardError> {
        match phase {
            InitPhase::PreConfig => {
                self.pre_config();
                Ok(())
            }
            InitPhase::PostConfig => {
                self.post_config();
                Ok(())
            }
            InitPhase::PreMemory => {
                self.pre_memory();
                Ok(())
            }
            InitPhase::PostMemory => {
                self.post_memory();
                Ok(())
            }
            InitPhase::PreTempRamExit => Ok(()),
            InitPhase::PostTempRamExit => self.post_temp_ram_exit(),
        }
    }

    /// Fill the memory-init parameter block from the config records.
    ///
    /// Called by the boot core between post-config and pre-memory.
    pub fn update_mem_params(&mut self, params: &mut MemInitParams) {
        projection::update_mem_params(
            params,
            self.store,
            &self.build,
            &self.caps,
            &mut self.state.features,
            &mut *self.svc.loader,
        );
    }

    /// Saved memory-training parameters for fast boot, if usable.
    pub fn find_nvs_data(&mut self) -> Option<&'static [u8]> {
        nvsdata::find_nvs_data(self.store, &mut *self.svc.loader)
    }

    /// Copy an external config region out of flash (boot core callback).
    pub fn load_external_config_data(
        &mut self,
        dst: u32,
        src: u32,
        len: u32,
    ) -> Result<(), crate::error::SpiError> {
        self.svc.spi.load_external_config(dst, src, len)
    }

    // ───────────────────────────────────────────────────────────────────
    // Phase bodies
    // ───────────────────────────────────────────────────────────────────

    fn pre_config(&mut self) {
        // Boot-guard latches are log-only here: measurement is enforced
        // later, at temp-RAM exit.
        let acm = self.svc.mmio.read32(BOOT_GUARD_ACM_STATUS);
        let status = self.svc.mmio.read32(BOOT_GUARD_BOOT_STATUS);
        info!("boot guard acm 0x{:08x} status 0x{:08x}", acm, status);
        if status & (B_BOOT_STATUS_SUCCESS | B_BOOT_STATUS_FAILURE) != B_BOOT_STATUS_SUCCESS {
            error!("boot guard failed or is disabled");
        } else {
            info!("boot guard enabled");
        }

        self.state.device_table = Some(PLATFORM_DEVICES);

        self.spi_controller_init();

        let identity = resolve_board_identity(&mut *self.svc.sideband);
        self.state.platform_id = identity.board_id as u16;
        self.state.identity = identity;

        self.state.boot_mode =
            if is_firmware_update(&mut *self.svc.io, &mut *self.svc.flash_sm) {
                BootMode::FlashUpdate
            } else {
                platform_power_state(&mut *self.svc.io, &mut *self.svc.mmio)
            };
        info!("boot mode {:?}", self.state.boot_mode);
    }

    fn post_config(&mut self) {
        self.state.platform_name = platform_name(self.state.identity.board_id);
        info!("platform {}", self.state.platform_name);

        rtc_init(&mut *self.svc.io, &mut *self.svc.mmio);

        self.state.boot_guard = self.svc.boot_guard.info(HECI_DEVICE);
        self.state.features =
            platform_features_init(&self.build, self.store, &self.state.boot_guard);
    }

    fn pre_memory(&mut self) {
        // DRAM-init scratch bit stays set across the training sequence so
        // a reset mid-training is detectable.
        self.svc
            .mmio
            .set32(PWRM_BASE + R_GEN_PMCON_A, B_GEN_PMCON_A_DISB);

        self.svc.gpio.configure(GPIO_TABLE_PRE_MEM);
    }

    fn post_memory(&mut self) {
        // Tuning data still points into cache-as-RAM, which is about to be
        // torn down; move it to the heap exactly once.
        if self.build.tcc {
            if let Some(TuningData::Borrowed(data)) = self.state.features.tuning {
                let mut buf = alloc::vec::Vec::new();
                if buf.try_reserve_exact(data.len()).is_ok() {
                    buf.extend_from_slice(data);
                    self.state.features.tuning =
                        Some(TuningData::Owned(buf.into_boxed_slice()));
                    info!("tuning data moved to heap ({} bytes)", data.len());
                } else {
                    error!("cannot allocate {} bytes for tuning data", data.len());
                }
            }
        }

        self.svc
            .mmio
            .clear32(PWRM_BASE + R_GEN_PMCON_A, B_GEN_PMCON_A_DISB);
    }

    fn post_temp_ram_exit(&mut self) -> Result<(), BoardError> {
        if !self.state.features.flags.contains(FeatureFlags::MEASURED_BOOT) {
            return Ok(());
        }
        tpm_initialize(
            &mut *self.svc.tpm,
            &self.state.boot_guard,
            self.state.boot_mode,
        )
    }

    fn spi_controller_init(&mut self) {
        self.svc.pci.write32(SPI_DEVICE, R_SPI_BAR0, SPI_TEMP_MEM_BASE);
        self.svc.pci.write8(SPI_DEVICE, R_PCI_COMMAND, PCI_CMD_MSE_BME);
        if let Err(e) = self.svc.spi.constructor() {
            error!("SPI flash init failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TpmError;
    use crate::power::{ACPI_BASE, B_PM1_STS_WAK, B_PM1_CNT_SLP_TYP, R_PM1_CNT, R_PM1_STS, V_SLP_TYP_S3};
    use crate::services::TpmType;
    use crate::testhw::{
        build_all, MockBootGuard, MockFsm, MockGpio, MockIo, MockLoader, MockMmio, MockPci,
        MockSideband, MockSpi, MockTpm,
    };

    struct Rig {
        io: MockIo,
        mmio: MockMmio,
        pci: MockPci,
        sideband: MockSideband,
        loader: MockLoader,
        spi: MockSpi,
        gpio: MockGpio,
        tpm: MockTpm,
        boot_guard: MockBootGuard,
        flash_sm: MockFsm,
        store: ConfigStore,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                io: MockIo::new(),
                mmio: MockMmio::new(),
                pci: MockPci::new(),
                sideband: MockSideband::new(0x00, 0x23),
                loader: MockLoader::new(),
                spi: MockSpi::default(),
                gpio: MockGpio::default(),
                tpm: MockTpm::default(),
                boot_guard: MockBootGuard::default(),
                flash_sm: MockFsm::default(),
                store: ConfigStore::new(),
            }
        }

        fn board(&mut self) -> Board<'_> {
            Board::new(
                BoardServices {
                    io: &mut self.io,
                    mmio: &mut self.mmio,
                    pci: &mut self.pci,
                    sideband: &mut self.sideband,
                    loader: &mut self.loader,
                    spi: &mut self.spi,
                    gpio: &mut self.gpio,
                    tpm: &mut self.tpm,
                    boot_guard: &mut self.boot_guard,
                    flash_sm: &mut self.flash_sm,
                },
                &self.store,
                build_all(),
                PlatformCaps::default(),
            )
        }
    }

    #[test]
    fn test_pre_config_resolves_identity_and_devices() {
        let mut rig = Rig::new();
        {
            let mut board = rig.board();
            board.init(InitPhase::PreConfig).unwrap();
            assert_eq!(board.state.platform_id, 3);
            assert_eq!(board.state.identity.bom_id, 2);
            assert_eq!(board.state.boot_mode, BootMode::FullConfig);
            assert!(board.state.device_table.is_some());
        }
        assert_eq!(rig.spi.constructed, 1);
        // SPI BAR0 and command programmed before the constructor ran
        assert_eq!(rig.pci.get32(SPI_DEVICE, R_SPI_BAR0), SPI_TEMP_MEM_BASE);
        assert_eq!(rig.pci.get32(SPI_DEVICE, R_PCI_COMMAND) & 0xFF, 0x6);
    }

    #[test]
    fn test_flash_update_overrides_power_state() {
        let mut rig = Rig::new();
        rig.flash_sm.update = true;
        // A pending S3 wake must not matter
        rig.io.seed16(ACPI_BASE + R_PM1_STS, B_PM1_STS_WAK);
        rig.io.seed16(ACPI_BASE + R_PM1_CNT, V_SLP_TYP_S3);

        let mut board = rig.board();
        board.init(InitPhase::PreConfig).unwrap();
        assert_eq!(board.state.boot_mode, BootMode::FlashUpdate);
    }

    #[test]
    fn test_s3_wake_classified_when_no_update() {
        let mut rig = Rig::new();
        rig.io.seed16(ACPI_BASE + R_PM1_STS, B_PM1_STS_WAK);
        rig.io.seed16(ACPI_BASE + R_PM1_CNT, V_SLP_TYP_S3);

        let mut board = rig.board();
        board.init(InitPhase::PreConfig).unwrap();
        assert_eq!(board.state.boot_mode, BootMode::S3Resume);
    }

    #[test]
    fn test_post_config_builds_feature_state() {
        let mut rig = Rig::new();
        rig.boot_guard.report = BootGuardInfo {
            measured_boot: true,
            verified_boot: false,
            ..BootGuardInfo::default()
        };

        let mut board = rig.board();
        board.init(InitPhase::PreConfig).unwrap();
        board.init(InitPhase::PostConfig).unwrap();

        assert_eq!(board.state.platform_name, "CRB-T3");
        let flags = board.state.features.flags;
        assert!(flags.contains(FeatureFlags::MEASURED_BOOT));
        assert!(!flags.contains(FeatureFlags::VERIFIED_BOOT));
    }

    #[test]
    fn test_pre_memory_sets_scratch_bit_and_pads() {
        let mut rig = Rig::new();
        rig.mmio.seed32(PWRM_BASE + R_GEN_PMCON_A, 0x0000_0200);
        {
            let mut board = rig.board();
            board.init(InitPhase::PreMemory).unwrap();
        }
        let pmcon_a = rig.mmio.get32(PWRM_BASE + R_GEN_PMCON_A);
        assert_ne!(pmcon_a & B_GEN_PMCON_A_DISB, 0);
        // Pre-existing bits untouched
        assert_ne!(pmcon_a & 0x0000_0200, 0);
        assert_eq!(rig.gpio.applied.len(), GPIO_TABLE_PRE_MEM.len());
    }

    #[test]
    fn test_post_memory_migrates_tuning_exactly_once() {
        static TUNING: [u8; 32] = [0xA5; 32];
        let mut rig = Rig::new();
        rig.mmio
            .seed32(PWRM_BASE + R_GEN_PMCON_A, B_GEN_PMCON_A_DISB | 0x0000_0200);

        let mut board = rig.board();
        board.state.features.tuning = Some(TuningData::Borrowed(&TUNING));

        board.init(InitPhase::PostMemory).unwrap();
        match &board.state.features.tuning {
            Some(TuningData::Owned(bytes)) => assert_eq!(&bytes[..], &TUNING[..]),
            other => panic!("tuning not migrated: {other:?}"),
        }

        // Second pass must not migrate again (already owned)
        board.init(InitPhase::PostMemory).unwrap();
        assert!(matches!(
            board.state.features.tuning,
            Some(TuningData::Owned(_))
        ));
    }

    #[test]
    fn test_post_memory_clears_only_scratch_bit() {
        let mut rig = Rig::new();
        rig.mmio
            .seed32(PWRM_BASE + R_GEN_PMCON_A, B_GEN_PMCON_A_DISB | 0x0000_0200);
        {
            let mut board = rig.board();
            board.init(InitPhase::PostMemory).unwrap();
        }
        let pmcon_a = rig.mmio.get32(PWRM_BASE + R_GEN_PMCON_A);
        assert_eq!(pmcon_a & B_GEN_PMCON_A_DISB, 0);
        assert_ne!(pmcon_a & 0x0000_0200, 0, "other bits must survive");
    }

    #[test]
    fn test_post_temp_ram_exit_skips_without_measured_boot() {
        let mut rig = Rig::new();
        {
            let mut board = rig.board();
            // features empty: measured boot never enabled
            board.init(InitPhase::PostTempRamExit).unwrap();
        }
        assert!(rig.tpm.init_calls.is_empty());
        assert!(!rig.tpm.disabled);
    }

    #[test]
    fn test_post_temp_ram_exit_fatal_on_tpm_failure() {
        let mut rig = Rig::new();
        rig.tpm.init_result = Err(TpmError::StartupFailed);
        rig.boot_guard.report = BootGuardInfo {
            measured_boot: true,
            verified_boot: true,
            disconnect_all_tpms: false,
            bypass_tpm_init: false,
            tpm_type: TpmType::Dtpm20,
        };

        let mut board = rig.board();
        board.init(InitPhase::PreConfig).unwrap();
        board.init(InitPhase::PostConfig).unwrap();
        assert_eq!(
            board.init(InitPhase::PostTempRamExit),
            Err(BoardError::TpmInit(TpmError::StartupFailed))
        );
    }

    #[test]
    fn test_pre_temp_ram_exit_is_noop() {
        let mut rig = Rig::new();
        {
            let mut board = rig.board();
            board.init(InitPhase::PreTempRamExit).unwrap();
        }
        assert!(rig.io.writes.is_empty());
        assert!(rig.mmio.writes.is_empty());
    }

    #[test]
    fn test_rtc_power_loss_reinitializes_rtc_in_post_config() {
        use crate::power::{B_GEN_PMCON_B_RTC_PWR_STS, R_GEN_PMCON_B};
        use crate::rtc::RTC_YEAR;

        let mut rig = Rig::new();
        rig.mmio
            .seed8(PWRM_BASE + R_GEN_PMCON_B, B_GEN_PMCON_B_RTC_PWR_STS);
        {
            let mut board = rig.board();
            board.init(InitPhase::PreConfig).unwrap();
            board.init(InitPhase::PostConfig).unwrap();
        }
        assert_eq!(rig.io.rtc_shadow(RTC_YEAR), Some(0x11));
    }

    #[test]
    fn test_sleep_type_values_fit_mask() {
        use crate::power::{V_SLP_TYP_S4, V_SLP_TYP_S5};
        for v in [V_SLP_TYP_S3, V_SLP_TYP_S4, V_SLP_TYP_S5] {
            assert_eq!(v & !B_PM1_CNT_SLP_TYP, 0);
        }
    }
}

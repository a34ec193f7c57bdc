//! Platform feature state.
//!
//! Built once at post-config from three inputs, in priority order: build
//! switches seed the mask, the features config record may clear entries,
//! and the boot-guard capability report clears whatever the hardware cannot
//! actually deliver.

use alloc::boxed::Box;

use bitflags::bitflags;
use ember_cfgdata::{ConfigStore, FeaturesCfg};
use log::info;

use crate::services::BootGuardInfo;

bitflags! {
    /// Loader-visible feature mask handed to later stages.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FeatureFlags: u32 {
        const ACPI = 1 << 0;
        const VERIFIED_BOOT = 1 << 1;
        const MEASURED_BOOT = 1 << 2;
    }
}

/// Switches fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildFeatures {
    pub acpi: bool,
    pub verified_boot: bool,
    pub measured_boot: bool,
    pub vtd: bool,
    pub tcc: bool,
    pub pre_os_checker: bool,
}

impl BuildFeatures {
    /// The switch set this image was built with.
    pub fn from_build() -> Self {
        Self {
            acpi: cfg!(feature = "acpi"),
            verified_boot: cfg!(feature = "verified-boot"),
            measured_boot: cfg!(feature = "measured-boot"),
            vtd: cfg!(feature = "vtd"),
            tcc: cfg!(feature = "tcc"),
            pre_os_checker: cfg!(feature = "pre-os-checker"),
        }
    }
}

/// TCC tuning bytes, before and after the move out of cache-as-RAM.
#[derive(Debug, PartialEq, Eq)]
pub enum TuningData {
    /// Still in temporary execution memory; dies at temp-RAM exit.
    Borrowed(&'static [u8]),
    /// Copied to the post-DRAM heap.
    Owned(Box<[u8]>),
}

impl TuningData {
    /// The tuning bytes, wherever they currently live.
    pub fn bytes(&self) -> &[u8] {
        match self {
            TuningData::Borrowed(b) => b,
            TuningData::Owned(b) => b,
        }
    }
}

/// Per-boot platform feature state.
#[derive(Debug, PartialEq, Eq)]
pub struct PlatformFeatures {
    /// Loader feature mask.
    pub flags: FeatureFlags,
    /// TCC tuning requested by config.
    pub tcc_mode: bool,
    /// TCC tuning data recorded by the projection engine.
    pub tuning: Option<TuningData>,
}

impl PlatformFeatures {
    /// State before feature initialization has run.
    pub const fn empty() -> Self {
        Self {
            flags: FeatureFlags::empty(),
            tcc_mode: false,
            tuning: None,
        }
    }
}

/// Merge build switches, config overrides and the boot-guard report.
pub fn platform_features_init(
    build: &BuildFeatures,
    store: &ConfigStore,
    boot_guard: &BootGuardInfo,
) -> PlatformFeatures {
    let mut flags = FeatureFlags::empty();
    flags.set(FeatureFlags::ACPI, build.acpi);
    flags.set(FeatureFlags::VERIFIED_BOOT, build.verified_boot);
    flags.set(FeatureFlags::MEASURED_BOOT, build.measured_boot);

    let mut tcc_mode = false;

    // Config may only take features away, never add ones the build lacks.
    if let Some(features) = store.find::<FeaturesCfg>() {
        if features.acpi == 0 {
            flags.remove(FeatureFlags::ACPI);
        }
        if features.measured_boot == 0 {
            flags.remove(FeatureFlags::MEASURED_BOOT);
        }
        tcc_mode = features.tcc != 0;
    } else {
        info!("no features cfg record");
    }

    // Without the hardware capability the promise cannot be kept.
    if !boot_guard.measured_boot {
        flags.remove(FeatureFlags::MEASURED_BOOT);
    }
    if !boot_guard.verified_boot {
        flags.remove(FeatureFlags::VERIFIED_BOOT);
    }

    info!("loader features {:?}, tcc {}", flags, tcc_mode);

    PlatformFeatures {
        flags,
        tcc_mode,
        tuning: None,
    }
}

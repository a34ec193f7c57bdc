//! Board Configuration Data
//!
//! Tag-addressed configuration records for the Ember boot stage. A config
//! image is unpacked into a [`ConfigStore`] early in boot; later stages look
//! records up by domain tag and read them through borrowed references.
//!
//! A record is either fully absent (tag never loaded, consumers keep their
//! defaults) or fully present and structurally valid for its tag. Partial or
//! corrupt records are not modeled; the config image is verified before it
//! is unpacked.
//!
//! # Usage
//!
//! ```ignore
//! use ember_cfgdata::{ConfigStore, MemoryCfg};
//!
//! let mut store = ConfigStore::new();
//! store.insert(MemoryCfg::default().into());
//!
//! if let Some(mem) = store.find::<MemoryCfg>() {
//!     // project fields
//! }
//! ```

#![no_std]

pub mod records;
pub mod store;

pub use records::{
    DynamicCfg, FeaturesCfg, GraphicsCfg, MemoryCfg, PcieHsioTuning, SataHsioTuning, SecurityCfg,
    HDA_DMIC_LINKS, HDA_SNDW_LINKS, HDA_SSP_LINKS, IBECC_REGIONS, PCIE_ROOT_PORTS, SATA_PORTS,
    VTD_ENGINES,
};
pub use store::{ConfigBlob, ConfigRecord, ConfigStore, Tag};

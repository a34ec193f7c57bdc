//! Saved memory-training parameter lookup.
//!
//! A previous boot may have stashed trained parameters in the flash map;
//! handing them to the silicon-init binary skips full training. Training
//! enforcement and erased flash both fall back to `None` (full training).

use ember_cfgdata::{ConfigStore, DynamicCfg};
use log::info;

use crate::services::{ComponentLoader, COMPONENT_MRC_DATA};

/// Erased-flash marker at the start of the saved region.
const ERASED: [u8; 4] = [0xFF; 4];

/// Find saved training parameters, if they exist and may be used.
pub fn find_nvs_data(
    store: &ConfigStore,
    loader: &mut dyn ComponentLoader,
) -> Option<&'static [u8]> {
    if let Some(dynamic) = store.find::<DynamicCfg>() {
        if dynamic.mrc_training_enforcement != 0 {
            info!("training enforcement set, ignoring saved parameters");
            return None;
        }
    } else {
        info!("no dynamic cfg record");
    }

    let data = loader.component_info(COMPONENT_MRC_DATA).ok()?;
    if data.len() < 4 || data[..4] == ERASED {
        return None;
    }
    Some(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testhw::MockLoader;

    static SAVED: [u8; 8] = [0x4D, 0x52, 0x43, 0x30, 1, 2, 3, 4];
    static BLANK: [u8; 8] = [0xFF; 8];

    fn loader_with(data: &'static [u8]) -> MockLoader {
        let mut loader = MockLoader::new();
        loader.infos.push((COMPONENT_MRC_DATA, data));
        loader
    }

    #[test]
    fn test_saved_parameters_found() {
        let store = ConfigStore::new();
        let mut loader = loader_with(&SAVED);
        assert_eq!(find_nvs_data(&store, &mut loader), Some(&SAVED[..]));
    }

    #[test]
    fn test_enforcement_ignores_saved_parameters() {
        let mut store = ConfigStore::new();
        store.insert(
            DynamicCfg {
                mrc_training_enforcement: 1,
            }
            .into(),
        );
        let mut loader = loader_with(&SAVED);
        assert_eq!(find_nvs_data(&store, &mut loader), None);
    }

    #[test]
    fn test_erased_flash_is_no_data() {
        let store = ConfigStore::new();
        let mut loader = loader_with(&BLANK);
        assert_eq!(find_nvs_data(&store, &mut loader), None);
    }

    #[test]
    fn test_missing_component_is_no_data() {
        let store = ConfigStore::new();
        let mut loader = MockLoader::new();
        assert_eq!(find_nvs_data(&store, &mut loader), None);
    }
}

//! Tag-addressed blob store.

use core::fmt;

use crate::records::{DynamicCfg, FeaturesCfg, GraphicsCfg, MemoryCfg, SecurityCfg};

/// Domain tag of a configuration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag(pub u32);

impl Tag {
    /// Memory domain.
    pub const MEMORY: Tag = Tag(0x080);
    /// Graphics / audio-link domain.
    pub const GRAPHICS: Tag = Tag(0x300);
    /// Security domain.
    pub const SECURITY: Tag = Tag(0x500);
    /// Feature switches.
    pub const FEATURES: Tag = Tag(0x310);
    /// Dynamic per-boot switches.
    pub const DYNAMIC: Tag = Tag(0x0A0);
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03X}", self.0)
    }
}

/// One loaded configuration record, keyed by its domain tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigBlob {
    Memory(MemoryCfg),
    Graphics(GraphicsCfg),
    Security(SecurityCfg),
    Features(FeaturesCfg),
    Dynamic(DynamicCfg),
}

impl ConfigBlob {
    /// The domain tag of this record.
    pub fn tag(&self) -> Tag {
        match self {
            ConfigBlob::Memory(_) => Tag::MEMORY,
            ConfigBlob::Graphics(_) => Tag::GRAPHICS,
            ConfigBlob::Security(_) => Tag::SECURITY,
            ConfigBlob::Features(_) => Tag::FEATURES,
            ConfigBlob::Dynamic(_) => Tag::DYNAMIC,
        }
    }
}

/// Typed lookup into a [`ConfigStore`].
pub trait ConfigRecord: Sized {
    /// The tag this record type is stored under.
    const TAG: Tag;

    /// Borrow the record out of a blob, if the variant matches.
    fn match_blob(blob: &ConfigBlob) -> Option<&Self>;
}

macro_rules! impl_config_record {
    ($ty:ty, $variant:ident, $tag:expr) => {
        impl ConfigRecord for $ty {
            const TAG: Tag = $tag;

            fn match_blob(blob: &ConfigBlob) -> Option<&Self> {
                match blob {
                    ConfigBlob::$variant(rec) => Some(rec),
                    _ => None,
                }
            }
        }

        impl From<$ty> for ConfigBlob {
            fn from(rec: $ty) -> ConfigBlob {
                ConfigBlob::$variant(rec)
            }
        }
    };
}

impl_config_record!(MemoryCfg, Memory, Tag::MEMORY);
impl_config_record!(GraphicsCfg, Graphics, Tag::GRAPHICS);
impl_config_record!(SecurityCfg, Security, Tag::SECURITY);
impl_config_record!(FeaturesCfg, Features, Tag::FEATURES);
impl_config_record!(DynamicCfg, Dynamic, Tag::DYNAMIC);

/// Maximum records a store can hold.
pub const MAX_BLOBS: usize = 8;

/// The per-boot configuration record store.
///
/// Populated once while the config image is unpacked; read-only afterwards.
/// Fixed capacity, no allocation: this exists before DRAM does.
#[derive(Debug, Default)]
pub struct ConfigStore {
    blobs: [Option<ConfigBlob>; MAX_BLOBS],
}

impl ConfigStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        const NONE: Option<ConfigBlob> = None;
        Self {
            blobs: [NONE; MAX_BLOBS],
        }
    }

    /// Insert a record, replacing any record with the same tag.
    ///
    /// Returns `false` (and drops the record) if the store is full.
    pub fn insert(&mut self, blob: ConfigBlob) -> bool {
        let tag = blob.tag();
        if let Some(slot) = self
            .blobs
            .iter_mut()
            .find(|slot| matches!(slot, Some(b) if b.tag() == tag))
        {
            *slot = Some(blob);
            return true;
        }
        if let Some(slot) = self.blobs.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some(blob);
            return true;
        }
        false
    }

    /// Look a record up by domain tag.
    pub fn find_by_tag(&self, tag: Tag) -> Option<&ConfigBlob> {
        self.blobs
            .iter()
            .flatten()
            .find(|blob| blob.tag() == tag)
    }

    /// Look a record up by type.
    pub fn find<T: ConfigRecord>(&self) -> Option<&T> {
        self.find_by_tag(T::TAG).and_then(T::match_blob)
    }
}

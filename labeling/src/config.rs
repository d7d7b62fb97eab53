//! Configuration of a label dictionary.

use serde::{Deserialize, Serialize};

use common::{FileFormat, SerdeFormatResult};

/// Width of the integer stored per grid point.
///
/// Bounds the number of distinct label sets a dictionary may intern:
/// a width of `b` bits addresses indices `0 ..= 2^b - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndexWidth {
    U8,
    U16,
    #[default]
    U32,
}

impl IndexWidth {
    pub fn bits(self) -> u32 {
        match self {
            IndexWidth::U8 => 8,
            IndexWidth::U16 => 16,
            IndexWidth::U32 => 32,
        }
    }

    /// Number of distinct label sets addressable with this width.
    pub fn max_sets(self) -> u64 {
        1u64 << self.bits()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelingConfig {
    pub index_width: IndexWidth,
    /// Slots per direction (add / remove) in every transition cache.
    pub cache_slots: usize,
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            index_width: IndexWidth::default(),
            cache_slots: 256,
        }
    }
}

impl LabelingConfig {
    pub fn validate(&self) {
        assert!(
            self.cache_slots > 0,
            "cache_slots must be positive, got {}",
            self.cache_slots
        );
    }

    pub fn parse(serialized: &str, format: FileFormat) -> SerdeFormatResult<Self> {
        let config: Self = common::deserialize(serialized, format)?;
        config.validate();
        Ok(config)
    }

    /// Loads a `.yaml`/`.yml` or `.json` config file.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let format = FileFormat::from_file_name(path)?;
        let serialized = std::fs::read_to_string(path)?;
        Ok(Self::parse(&serialized, format)?)
    }
}

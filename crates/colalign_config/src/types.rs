//! Type layout configuration
//!
//! Different storage engines align the same type differently, so both the
//! unknown-type fallback and individual layouts are tunable.

use colalign_layout::{Alignment, TypeCatalog, TypeLayout};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::EnvLookup;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeConfig {
    /// Layout for data types missing from the built-in table
    pub fallback: TypeLayout,

    /// Per-type layouts that replace the built-in ones
    pub overrides: BTreeMap<String, TypeLayout>,
}

impl TypeConfig {
    /// Catalog with this fallback and every override applied.
    pub fn catalog(&self) -> TypeCatalog {
        self.overrides
            .iter()
            .fold(TypeCatalog::new(self.fallback), |catalog, (name, layout)| {
                catalog.with_override(name, *layout)
            })
    }

    pub(crate) fn apply_env(&mut self, lookup: EnvLookup<'_>) {
        if let Some(val) = lookup("COLALIGN_FALLBACK_SIZE")
            && let Ok(size) = val.parse::<u32>()
        {
            self.fallback.size = size;
        }

        if let Some(val) = lookup("COLALIGN_FALLBACK_ALIGNMENT")
            && let Ok(alignment) = val.parse::<Alignment>()
        {
            self.fallback.alignment = alignment;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_applies_overrides() {
        let mut config = TypeConfig {
            fallback: TypeLayout::fixed(4),
            ..Default::default()
        };
        config
            .overrides
            .insert("bigint".to_string(), TypeLayout::aligned(8, 4));

        let catalog = config.catalog();
        assert_eq!(catalog.fallback(), TypeLayout::fixed(4));
        assert_eq!(catalog.resolve("bigint"), TypeLayout::aligned(8, 4));
        assert_eq!(catalog.resolve("integer"), TypeLayout::fixed(4));
        assert_eq!(catalog.resolve("geography"), TypeLayout::fixed(4));
    }
}

use serde::{Deserialize, Serialize};

use crate::catalog::{Alignment, TypeCatalog, TypeLayout};

/// One column of a table, as read from the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// 1-based position in the table's current declared order.
    pub ordinal_position: usize,
    pub name: String,
    pub data_type: String,
    /// Informational only, nullability never changes padding.
    pub nullable: bool,
    pub type_size: u32,
    pub type_alignment: Alignment,
    /// Rows stored in the table. Scales per-row waste into total waste.
    pub row_count: u64,
}

impl ColumnDescriptor {
    pub fn new(
        ordinal_position: usize,
        name: impl Into<String>,
        data_type: impl Into<String>,
        layout: TypeLayout,
    ) -> Self {
        Self {
            ordinal_position,
            name: name.into(),
            data_type: data_type.into(),
            nullable: false,
            type_size: layout.size,
            type_alignment: layout.alignment,
            row_count: 0,
        }
    }

    /// Builds a descriptor whose size and alignment come from `catalog`.
    pub fn from_catalog(
        ordinal_position: usize,
        name: impl Into<String>,
        data_type: impl Into<String>,
        catalog: &TypeCatalog,
    ) -> Self {
        let data_type = data_type.into();
        let layout = catalog.resolve(&data_type);
        Self::new(ordinal_position, name, data_type, layout)
    }

    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[must_use]
    pub fn with_row_count(mut self, row_count: u64) -> Self {
        self.row_count = row_count;
        self
    }

    #[inline]
    pub fn layout(&self) -> TypeLayout {
        TypeLayout::new(self.type_size, self.type_alignment)
    }
}

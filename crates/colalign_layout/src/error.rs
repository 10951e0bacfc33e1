/// Caller contract violations detected while analyzing a table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("duplicate column name `{name}`")]
    DuplicateColumn { name: String },

    #[error("column `{column}` has ordinal position {found}, expected {expected}")]
    OrdinalOutOfSequence {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("layout strategy `{strategy}` did not return a permutation of {columns} columns")]
    InvalidPermutation {
        strategy: &'static str,
        columns: usize,
    },

    #[error("no recommended rank for column `{name}`")]
    UnrankedColumn { name: String },
}

//! Column layout analysis for relational tables.
//!
//! Given the columns of one table in their declared order, this crate
//! computes the padding each column wastes in front of its successor,
//! recommends an order that packs the row more tightly and joins both views
//! into a per-column report.

pub mod catalog;
pub mod column;
pub mod error;
pub mod optimizer;
pub mod padding;
pub mod report;

pub use catalog::{Alignment, CATALOG_REVISION, TypeCatalog, TypeLayout, VARIABLE_NOMINAL_SIZE};
pub use column::ColumnDescriptor;
pub use error::LayoutError;
pub use optimizer::{
    DescendingAlignment, LayoutStrategy, RankMap, Recommendation, recommend, recommend_with,
};
pub use padding::{
    padding_after, padding_sequence, total_padding, total_wasted_space, wasted_padding,
};
pub use report::{ReportRow, TableReport, TableSummary, assemble, assemble_with};

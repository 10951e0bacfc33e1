//! Schema introspection
//!
//! Reads table and column metadata through a [`SchemaSource`] and turns it
//! into [`ColumnDescriptor`]s ready for layout analysis.

pub mod error;
pub mod pg;
pub mod query;

pub use crate::error::IntrospectError;
pub use crate::pg::PostgresSource;

use colalign_layout::{ColumnDescriptor, TypeCatalog};
use tracing::{debug, warn};

/// How the number of stored rows is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowCountMode {
    /// `count(*)` over the whole table
    #[default]
    Exact,
    /// Planner estimate from the last `ANALYZE`
    Estimate,
}

/// One column as reported by the catalog, before layouts are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRecord {
    pub ordinal_position: i32,
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
}

/// Source of schema metadata.
pub trait SchemaSource {
    /// Base tables of `schema`, sorted by name.
    fn list_tables(&mut self, schema: &str) -> Result<Vec<String>, IntrospectError>;

    /// Columns of one table in declared order.
    fn list_columns(
        &mut self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnRecord>, IntrospectError>;

    fn row_count(
        &mut self,
        schema: &str,
        table: &str,
        mode: RowCountMode,
    ) -> Result<u64, IntrospectError>;
}

/// Everything the analyzer needs about one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMetadata {
    pub schema: String,
    pub table: String,
    pub row_count: u64,
    pub columns: Vec<ColumnDescriptor>,
    /// Distinct data types missing from the catalog, in declared order.
    /// Their columns carry the catalog fallback layout.
    pub unknown_types: Vec<String>,
}

/// Restricts `available` to the tables named in `filter`, keeping the
/// source order. An empty filter keeps everything.
pub fn select_tables(
    schema: &str,
    available: Vec<String>,
    filter: &[String],
) -> Result<Vec<String>, IntrospectError> {
    if filter.is_empty() {
        return Ok(available);
    }

    if let Some(missing) = filter.iter().find(|name| !available.contains(name)) {
        return Err(IntrospectError::TableNotFound {
            schema: schema.to_string(),
            table: missing.clone(),
        });
    }

    Ok(available
        .into_iter()
        .filter(|name| filter.contains(name))
        .collect())
}

/// Reads one table and resolves column layouts through `catalog`.
///
/// Ordinals are renumbered 1..n in declared order: PostgreSQL leaves gaps
/// behind dropped columns.
pub fn load_table<S>(
    source: &mut S,
    schema: &str,
    table: &str,
    mode: RowCountMode,
    catalog: &TypeCatalog,
) -> Result<TableMetadata, IntrospectError>
where
    S: SchemaSource + ?Sized,
{
    let mut records = source.list_columns(schema, table)?;
    records.sort_by_key(|record| record.ordinal_position);
    let row_count = source.row_count(schema, table, mode)?;

    let mut unknown_types: Vec<String> = Vec::new();
    for record in &records {
        if !catalog.is_known(&record.data_type) && !unknown_types.contains(&record.data_type) {
            unknown_types.push(record.data_type.clone());
        }
    }
    if !unknown_types.is_empty() {
        warn!(
            schema,
            table,
            types = ?unknown_types,
            fallback = ?catalog.fallback(),
            "unknown data types, using fallback layout"
        );
    }

    let columns: Vec<ColumnDescriptor> = records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            ColumnDescriptor::from_catalog(idx + 1, record.name, record.data_type, catalog)
                .with_nullable(record.nullable)
                .with_row_count(row_count)
        })
        .collect();

    debug!(
        schema,
        table,
        columns = columns.len(),
        row_count,
        "loaded table metadata"
    );

    Ok(TableMetadata {
        schema: schema.to_string(),
        table: table.to_string(),
        row_count,
        columns,
        unknown_types,
    })
}

//! SQL used against PostgreSQL
//!
//! Schema and table names are bound as parameters wherever PostgreSQL allows
//! it. The row count query needs identifiers, which are quoted instead.

/// Base tables of one schema.
pub const TABLES_QUERY: &str = "\
SELECT table_name::text
FROM information_schema.tables
WHERE table_schema = $1 AND table_type = 'BASE TABLE'
ORDER BY table_name";

/// Columns of one table in declared order.
pub const COLUMNS_QUERY: &str = "\
SELECT ordinal_position::int4, column_name::text, data_type::text, is_nullable::text
FROM information_schema.columns
WHERE table_schema = $1 AND table_name = $2
ORDER BY ordinal_position";

/// Planner row estimate. `reltuples` is -1 for tables never analyzed.
pub const ESTIMATED_ROWS_QUERY: &str = "\
SELECT c.reltuples::float8
FROM pg_catalog.pg_class c
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
WHERE n.nspname = $1 AND c.relname = $2";

/// Quotes an identifier so it can be spliced into SQL text.
pub fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

pub fn exact_row_count_query(schema: &str, table: &str) -> String {
    format!(
        "SELECT count(*) FROM {}.{}",
        quote_identifier(schema),
        quote_identifier(table)
    )
}

/// `information_schema` spells nullability as `YES` / `NO`.
#[inline]
pub fn parse_nullable(is_nullable: &str) -> bool {
    is_nullable.trim().eq_ignore_ascii_case("yes")
}

/// Clamps a planner estimate to a row count.
pub fn estimate_to_rows(estimate: f64) -> u64 {
    if estimate.is_finite() && estimate > 0.0 {
        estimate.round() as u64
    } else {
        0
    }
}

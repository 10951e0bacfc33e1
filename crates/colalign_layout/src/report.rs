//! Report assembly
//!
//! Joins the current-order padding of each column with its recommended rank.
//! Rows keep the declared column order; the rank is only a field.

use serde::Serialize;

use crate::catalog::Alignment;
use crate::column::ColumnDescriptor;
use crate::error::LayoutError;
use crate::optimizer::{DescendingAlignment, LayoutStrategy, recommend_with};
use crate::padding::{padding_sequence, total_wasted_space};

/// Analysis of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub ordinal_position: usize,
    pub column_name: String,
    pub data_type: String,
    pub nullable: bool,
    pub type_size: u32,
    pub type_alignment: Alignment,
    /// Padding after this column in the current order, per row.
    pub wasted_padding: u32,
    pub recommended_position: usize,
    /// `wasted_padding` over every stored row.
    pub total_wasted_space: u64,
}

/// Table-wide totals for the current and the recommended order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub column_count: usize,
    pub row_count: u64,
    pub current_padding_per_row: u64,
    pub recommended_padding_per_row: u64,
    pub current_wasted_bytes: u64,
    pub recommended_wasted_bytes: u64,
}

impl TableSummary {
    /// Bytes that reordering would give back.
    pub fn reclaimable_bytes(&self) -> u64 {
        self.current_wasted_bytes
            .saturating_sub(self.recommended_wasted_bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReport {
    pub table: String,
    pub strategy: &'static str,
    pub summary: TableSummary,
    pub rows: Vec<ReportRow>,
}

/// Assembles the report with the default [`DescendingAlignment`] strategy.
pub fn assemble(
    table: impl Into<String>,
    columns: &[ColumnDescriptor],
) -> Result<TableReport, LayoutError> {
    assemble_with(table, columns, &DescendingAlignment)
}

pub fn assemble_with(
    table: impl Into<String>,
    columns: &[ColumnDescriptor],
    strategy: &dyn LayoutStrategy,
) -> Result<TableReport, LayoutError> {
    validate_ordinals(columns)?;
    let recommendation = recommend_with(columns, strategy)?;

    let current = padding_sequence(columns);
    let rows = columns
        .iter()
        .zip(&current)
        .map(|(column, &padding)| -> Result<ReportRow, LayoutError> {
            let recommended_position = recommendation.rank_of(&column.name).ok_or_else(|| {
                LayoutError::UnrankedColumn {
                    name: column.name.clone(),
                }
            })?;
            Ok(ReportRow {
                ordinal_position: column.ordinal_position,
                column_name: column.name.clone(),
                data_type: column.data_type.clone(),
                nullable: column.nullable,
                type_size: column.type_size,
                type_alignment: column.type_alignment,
                wasted_padding: padding,
                recommended_position,
                total_wasted_space: total_wasted_space(padding, column.row_count),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let ordered = recommendation.ordered(columns);
    let recommended = padding_sequence(ordered.iter().copied());
    let summary = TableSummary {
        column_count: columns.len(),
        row_count: columns.first().map_or(0, |column| column.row_count),
        current_padding_per_row: current.iter().map(|&p| u64::from(p)).sum(),
        recommended_padding_per_row: recommended.iter().map(|&p| u64::from(p)).sum(),
        current_wasted_bytes: wasted_bytes(columns.iter(), &current),
        recommended_wasted_bytes: wasted_bytes(ordered.iter().copied(), &recommended),
    };

    Ok(TableReport {
        table: table.into(),
        strategy: recommendation.strategy(),
        summary,
        rows,
    })
}

fn wasted_bytes<'a>(columns: impl Iterator<Item = &'a ColumnDescriptor>, padding: &[u32]) -> u64 {
    columns
        .zip(padding)
        .map(|(column, &p)| total_wasted_space(p, column.row_count))
        .fold(0u64, u64::saturating_add)
}

fn validate_ordinals(columns: &[ColumnDescriptor]) -> Result<(), LayoutError> {
    for (idx, column) in columns.iter().enumerate() {
        let expected = idx + 1;
        if column.ordinal_position != expected {
            return Err(LayoutError::OrdinalOutOfSequence {
                column: column.name.clone(),
                expected,
                found: column.ordinal_position,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeCatalog;

    fn table(columns: &[(&str, &str)], row_count: u64) -> Vec<ColumnDescriptor> {
        let catalog = TypeCatalog::postgres();
        columns
            .iter()
            .enumerate()
            .map(|(idx, (name, ty))| {
                ColumnDescriptor::from_catalog(idx + 1, *name, *ty, &catalog)
                    .with_row_count(row_count)
            })
            .collect()
    }

    fn paddings(report: &TableReport) -> Vec<u32> {
        report.rows.iter().map(|row| row.wasted_padding).collect()
    }

    fn ranks(report: &TableReport) -> Vec<usize> {
        report
            .rows
            .iter()
            .map(|row| row.recommended_position)
            .collect()
    }

    #[test]
    fn test_ascending_integer_widths() {
        let columns = table(
            &[
                ("enabled", "boolean"),
                ("age", "smallint"),
                ("count", "integer"),
                ("id", "bigint"),
            ],
            10,
        );
        let report = assemble("accounts", &columns).unwrap();

        assert_eq!(paddings(&report), vec![1, 2, 4, 0]);
        assert_eq!(ranks(&report), vec![4, 3, 2, 1]);
        let totals: Vec<_> = report.rows.iter().map(|r| r.total_wasted_space).collect();
        assert_eq!(totals, vec![10, 20, 40, 0]);

        assert_eq!(report.summary.current_padding_per_row, 7);
        assert_eq!(report.summary.recommended_padding_per_row, 0);
        assert_eq!(report.summary.current_wasted_bytes, 70);
        assert_eq!(report.summary.reclaimable_bytes(), 70);
    }

    #[test]
    fn test_alternating_smallint_bigint() {
        let owned: Vec<(String, &str)> = (0..8)
            .map(|idx| {
                let ty = if idx % 2 == 0 { "smallint" } else { "bigint" };
                (format!("c{}", idx + 1), ty)
            })
            .collect();
        let named: Vec<(&str, &str)> = owned.iter().map(|(n, t)| (n.as_str(), *t)).collect();
        let columns = table(&named, 3);
        let report = assemble("alternating", &columns).unwrap();

        assert_eq!(paddings(&report), vec![6, 0, 6, 0, 6, 0, 6, 0]);
        assert_eq!(ranks(&report), vec![5, 1, 6, 2, 7, 3, 8, 4]);
        assert_eq!(report.summary.current_wasted_bytes, 72);
        assert_eq!(report.summary.recommended_padding_per_row, 0);
    }

    #[test]
    fn test_all_variable_columns() {
        let columns = table(&[("a", "varchar"), ("b", "varchar"), ("c", "varchar")], 100);
        let report = assemble("notes", &columns).unwrap();
        assert_eq!(paddings(&report), vec![0, 0, 0]);
        assert_eq!(ranks(&report), vec![1, 2, 3]);
        assert_eq!(report.summary.reclaimable_bytes(), 0);
    }

    #[test]
    fn test_single_column() {
        let columns = table(&[("id", "bigint")], 5);
        let report = assemble("single", &columns).unwrap();
        assert_eq!(paddings(&report), vec![0]);
        assert_eq!(ranks(&report), vec![1]);
    }

    #[test]
    fn test_fixed_then_variable() {
        let columns = table(&[("id", "integer"), ("body", "text")], 7);
        let report = assemble("posts", &columns).unwrap();
        assert_eq!(paddings(&report), vec![0, 0]);
        assert_eq!(ranks(&report), vec![1, 2]);
    }

    #[test]
    fn test_variable_then_fixed_wastes_nothing() {
        let columns = table(&[("body", "text"), ("id", "integer")], 1000);
        let report = assemble("posts", &columns).unwrap();
        assert_eq!(paddings(&report), vec![0, 0]);
        assert_eq!(ranks(&report), vec![2, 1]);
        let totals: Vec<_> = report.rows.iter().map(|r| r.total_wasted_space).collect();
        assert_eq!(totals, vec![0, 0]);
        assert_eq!(report.summary.current_wasted_bytes, 0);
        assert_eq!(report.summary.reclaimable_bytes(), 0);
    }

    #[test]
    fn test_rows_keep_declared_order() {
        let columns = table(&[("flag", "boolean"), ("id", "bigint")], 1);
        let report = assemble("t", &columns).unwrap();
        let names: Vec<_> = report.rows.iter().map(|r| r.column_name.as_str()).collect();
        assert_eq!(names, ["flag", "id"]);
        assert_eq!(report.rows[1].ordinal_position, 2);
        assert_eq!(report.rows[1].type_alignment, Alignment::Bytes(8));
        assert_eq!(report.strategy, "descending-alignment");
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let columns = table(
            &[("a", "boolean"), ("b", "uuid"), ("c", "text"), ("d", "interval")],
            12,
        );
        let first = assemble("t", &columns).unwrap();
        let second = assemble("t", &columns).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_table() {
        let report = assemble("empty", &[]).unwrap();
        assert!(report.rows.is_empty());
        assert_eq!(report.summary, TableSummary::default());
    }

    #[test]
    fn test_duplicate_columns_reported() {
        let columns = table(&[("id", "bigint"), ("id", "integer")], 1);
        assert_eq!(
            assemble("dup", &columns),
            Err(LayoutError::DuplicateColumn {
                name: "id".to_string()
            })
        );
    }

    #[test]
    fn test_ordinal_gap_reported() {
        let mut columns = table(&[("a", "bigint"), ("b", "integer")], 1);
        columns[1].ordinal_position = 3;
        assert_eq!(
            assemble("gap", &columns),
            Err(LayoutError::OrdinalOutOfSequence {
                column: "b".to_string(),
                expected: 2,
                found: 3,
            })
        );
    }
}

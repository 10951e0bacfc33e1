use std::io::Write;

use colalign_layout::{ReportRow, TableReport};

use crate::error::ExportError;

/// Header line of the CSV report, in field order.
pub const CSV_HEADER: [&str; 9] = [
    "Ordinal Position",
    "Column Name",
    "Data Type",
    "Nullable",
    "Data Type Size (B)",
    "Wasted Padding",
    "Recommended Position",
    "Total Wasted Space (B)",
    "Type Alignment",
];

fn nullable_label(nullable: bool) -> &'static str {
    if nullable { "YES" } else { "NO" }
}

fn record(row: &ReportRow) -> [String; 9] {
    [
        row.ordinal_position.to_string(),
        row.column_name.clone(),
        row.data_type.clone(),
        nullable_label(row.nullable).to_string(),
        row.type_size.to_string(),
        row.wasted_padding.to_string(),
        row.recommended_position.to_string(),
        row.total_wasted_space.to_string(),
        row.type_alignment.to_string(),
    ]
}

/// Writes the header and one record per column in declared order.
pub fn write_csv<W: Write>(writer: W, report: &TableReport) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(CSV_HEADER)?;
    for row in &report.rows {
        out.write_record(record(row))?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

use std::io::Write;

use chrono::{DateTime, Utc};
use colalign_layout::{CATALOG_REVISION, ReportRow, TableReport, TableSummary};
use serde::Serialize;

use crate::error::ExportError;

/// JSON document written for one table.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub schema: &'a str,
    pub table: &'a str,
    pub generated_at: DateTime<Utc>,
    pub catalog_revision: u32,
    pub strategy: &'static str,
    pub summary: &'a TableSummary,
    pub rows: &'a [ReportRow],
}

impl<'a> JsonReport<'a> {
    pub fn new(schema: &'a str, report: &'a TableReport, generated_at: DateTime<Utc>) -> Self {
        Self {
            schema,
            table: &report.table,
            generated_at,
            catalog_revision: CATALOG_REVISION,
            strategy: report.strategy,
            summary: &report.summary,
            rows: &report.rows,
        }
    }
}

pub fn write_json<W: Write>(
    writer: W,
    schema: &str,
    report: &TableReport,
    generated_at: DateTime<Utc>,
) -> Result<(), ExportError> {
    let document = JsonReport::new(schema, report, generated_at);
    serde_json::to_writer_pretty(writer, &document)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use colalign_layout::{ColumnDescriptor, TypeCatalog, assemble};
    use serde_json::Value;

    #[test]
    fn test_write_json_document() {
        let catalog = TypeCatalog::postgres();
        let columns = vec![
            ColumnDescriptor::from_catalog(1, "flag", "boolean", &catalog).with_row_count(4),
            ColumnDescriptor::from_catalog(2, "amount", "bigint", &catalog).with_row_count(4),
            ColumnDescriptor::from_catalog(3, "label", "varchar(20)", &catalog).with_row_count(4),
        ];
        let report = assemble("ledger", &columns).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let mut buf = Vec::new();
        write_json(&mut buf, "finance", &report, at).unwrap();
        let value: Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["schema"], "finance");
        assert_eq!(value["table"], "ledger");
        assert_eq!(value["generated_at"], "2024-05-01T12:00:00Z");
        assert_eq!(value["catalog_revision"], CATALOG_REVISION);
        assert_eq!(value["strategy"], "descending-alignment");
        assert_eq!(value["summary"]["current_padding_per_row"], 7);
        assert_eq!(value["summary"]["current_wasted_bytes"], 28);
        assert_eq!(value["rows"].as_array().unwrap().len(), 3);
        assert_eq!(value["rows"][0]["wasted_padding"], 7);
        assert_eq!(value["rows"][2]["type_alignment"], -1);
        assert_eq!(value["rows"][2]["recommended_position"], 3);
    }
}

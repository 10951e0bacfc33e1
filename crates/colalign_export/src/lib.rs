//! Report export
//!
//! One file per table, named `<table>_report.<ext>` inside the output
//! directory.

pub mod csv_report;
pub mod error;
pub mod json_report;

pub use crate::csv_report::{CSV_HEADER, write_csv};
pub use crate::error::ExportError;
pub use crate::json_report::{JsonReport, write_json};

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use colalign_config::ReportFormat;
use colalign_layout::TableReport;
use tracing::debug;

/// Replaces characters that cannot appear in a file name.
pub fn sanitize_file_stem(table: &str) -> String {
    let stem: String = table
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match stem.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => stem,
    }
}

/// File stems for `tables`, one per table and pairwise distinct even on
/// case-insensitive file systems.
///
/// Names that are already valid stems keep them. Sanitized names that clash
/// with a taken stem get a `_2`, `_3`, ... suffix in input order.
pub fn unique_file_stems<S: AsRef<str>>(tables: &[S]) -> Vec<String> {
    let mut taken = HashSet::with_capacity(tables.len());
    let reserved: Vec<Option<String>> = tables
        .iter()
        .map(|table| {
            let table = table.as_ref();
            let stem = sanitize_file_stem(table);
            (stem == table && taken.insert(stem.to_lowercase())).then_some(stem)
        })
        .collect();

    tables
        .iter()
        .zip(reserved)
        .map(|(table, stem)| {
            stem.unwrap_or_else(|| {
                let base = sanitize_file_stem(table.as_ref());
                let mut candidate = base.clone();
                let mut suffix = 2u32;
                while !taken.insert(candidate.to_lowercase()) {
                    candidate = format!("{base}_{suffix}");
                    suffix += 1;
                }
                candidate
            })
        })
        .collect()
}

/// Path of the report for `file_stem`, which must already be a valid stem.
pub fn report_path(dir: &Path, file_stem: &str, format: ReportFormat) -> PathBuf {
    dir.join(format!("{file_stem}_report.{}", format.extension()))
}

/// Writes `report` into `dir` under `file_stem`, creating the directory when
/// missing.
pub fn write_report(
    dir: &Path,
    file_stem: &str,
    schema: &str,
    report: &TableReport,
    format: ReportFormat,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir).map_err(|err| ExportError::io(dir, err))?;

    let path = report_path(dir, file_stem, format);
    let file = File::create(&path).map_err(|err| ExportError::io(&path, err))?;
    let mut writer = BufWriter::new(file);

    match format {
        ReportFormat::Csv => write_csv(&mut writer, report)?,
        ReportFormat::Json => write_json(&mut writer, schema, report, chrono::Utc::now())?,
    }
    writer.flush().map_err(|err| ExportError::io(&path, err))?;

    debug!(table = %report.table, path = %path.display(), %format, "report written");
    Ok(path)
}

//! One analysis run over a schema
//!
//! Metadata is read through the single database connection one table at a
//! time; assembly and export then run in parallel.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use colalign_config::ReportFormat;
use colalign_export::{unique_file_stems, write_report};
use colalign_introspect::{
    IntrospectError, RowCountMode, SchemaSource, TableMetadata, load_table, select_tables,
};
use colalign_layout::{TableReport, TypeCatalog, assemble};
use colalign_utils::Profiler;
use rayon::prelude::*;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub schema: String,
    /// Tables to analyze; empty means every base table of the schema
    pub tables: Vec<String>,
    pub row_count_mode: RowCountMode,
    pub output_dir: PathBuf,
    pub format: ReportFormat,
    pub catalog: TypeCatalog,
}

#[derive(Debug)]
pub struct TableAnalysis {
    pub report: TableReport,
    pub path: PathBuf,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct TableOutcome {
    pub table: String,
    pub outcome: anyhow::Result<TableAnalysis>,
}

impl TableOutcome {
    pub fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Analyzes the selected tables of `options.schema`.
///
/// Failing to list the schema aborts the run. Every other failure is
/// confined to its table's [`TableOutcome`].
pub fn run<S>(source: &mut S, options: &RunOptions) -> anyhow::Result<Vec<TableOutcome>>
where
    S: SchemaSource + ?Sized,
{
    let available = source
        .list_tables(&options.schema)
        .with_context(|| format!("failed to list tables of schema `{}`", options.schema))?;
    let tables = select_tables(&options.schema, available, &options.tables)?;
    info!(schema = %options.schema, tables = tables.len(), "analyzing schema");

    let stems = unique_file_stems(tables.as_slice());
    let mut loaded = Vec::with_capacity(tables.len());
    for (table, stem) in tables.into_iter().zip(stems) {
        let mut profiler = Profiler::new();
        let metadata = profiler.record_phase("introspect", || {
            load_table(
                source,
                &options.schema,
                &table,
                options.row_count_mode,
                &options.catalog,
            )
        });
        loaded.push((table, stem, profiler, metadata));
    }

    let outcomes: Vec<TableOutcome> = loaded
        .into_par_iter()
        .map(|(table, stem, mut profiler, metadata)| {
            let outcome = analyze_table(metadata, &stem, options, &mut profiler);
            match &outcome {
                Ok(analysis) => info!(
                    table = %table,
                    columns = analysis.report.summary.column_count,
                    reclaimable = analysis.report.summary.reclaimable_bytes(),
                    elapsed_ms = analysis.elapsed.as_millis(),
                    "table analyzed"
                ),
                Err(err) => error!(table = %table, "analysis failed: {err:#}"),
            }
            TableOutcome { table, outcome }
        })
        .collect();

    Ok(outcomes)
}

fn analyze_table(
    metadata: Result<TableMetadata, IntrospectError>,
    file_stem: &str,
    options: &RunOptions,
    profiler: &mut Profiler,
) -> anyhow::Result<TableAnalysis> {
    let metadata = metadata?;
    let qualified = format!("{}.{}", metadata.schema, metadata.table);

    let report = profiler
        .record_phase("analyze", || {
            assemble(metadata.table.as_str(), &metadata.columns)
        })
        .with_context(|| format!("failed to analyze `{qualified}`"))?;

    let path = profiler
        .record_phase("export", || {
            write_report(
                &options.output_dir,
                file_stem,
                &metadata.schema,
                &report,
                options.format,
            )
        })
        .with_context(|| format!("failed to export report for `{qualified}`"))?;

    Ok(TableAnalysis {
        report,
        path,
        elapsed: profiler.total(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use colalign_introspect::ColumnRecord;
    use std::collections::BTreeMap;

    /// Tables keyed by name; `None` columns make `list_columns` fail.
    #[derive(Default)]
    struct FixtureSource {
        tables: BTreeMap<String, (Option<Vec<ColumnRecord>>, u64)>,
    }

    impl FixtureSource {
        fn table(mut self, name: &str, columns: &[(&str, &str)], rows: u64) -> Self {
            let records = columns
                .iter()
                .zip(1..)
                .map(|((column, ty), ordinal)| ColumnRecord {
                    ordinal_position: ordinal,
                    name: (*column).to_string(),
                    data_type: (*ty).to_string(),
                    nullable: false,
                })
                .collect();
            self.tables.insert(name.to_string(), (Some(records), rows));
            self
        }

        fn broken(mut self, name: &str) -> Self {
            self.tables.insert(name.to_string(), (None, 0));
            self
        }
    }

    impl SchemaSource for FixtureSource {
        fn list_tables(&mut self, _schema: &str) -> Result<Vec<String>, IntrospectError> {
            Ok(self.tables.keys().cloned().collect())
        }

        fn list_columns(
            &mut self,
            schema: &str,
            table: &str,
        ) -> Result<Vec<ColumnRecord>, IntrospectError> {
            self.tables
                .get(table)
                .and_then(|(columns, _)| columns.clone())
                .ok_or_else(|| IntrospectError::TableNotFound {
                    schema: schema.to_string(),
                    table: table.to_string(),
                })
        }

        fn row_count(
            &mut self,
            _schema: &str,
            table: &str,
            _mode: RowCountMode,
        ) -> Result<u64, IntrospectError> {
            Ok(self.tables.get(table).map_or(0, |(_, rows)| *rows))
        }
    }

    fn options(dir: &std::path::Path) -> RunOptions {
        RunOptions {
            schema: "public".to_string(),
            tables: Vec::new(),
            row_count_mode: RowCountMode::Exact,
            output_dir: dir.to_path_buf(),
            format: ReportFormat::Csv,
            catalog: TypeCatalog::postgres(),
        }
    }

    fn source() -> FixtureSource {
        FixtureSource::default()
            .table(
                "accounts",
                &[("active", "boolean"), ("id", "bigint"), ("name", "text")],
                100,
            )
            .table("tags", &[("label", "varchar(32)")], 5)
    }

    #[test]
    fn test_run_writes_one_report_per_table() {
        let tmp = tempfile::tempdir().unwrap();
        let outcomes = run(&mut source(), &options(tmp.path())).unwrap();

        let tables: Vec<_> = outcomes.iter().map(|o| o.table.as_str()).collect();
        assert_eq!(tables, ["accounts", "tags"]);
        assert!(outcomes.iter().all(|o| !o.is_failure()));

        let accounts = outcomes[0].outcome.as_ref().unwrap();
        assert_eq!(accounts.path, tmp.path().join("accounts_report.csv"));
        assert_eq!(accounts.report.summary.current_wasted_bytes, 700);
        assert_eq!(accounts.report.summary.reclaimable_bytes(), 700);
        assert!(tmp.path().join("tags_report.csv").exists());
    }

    #[test]
    fn test_run_respects_table_filter() {
        let tmp = tempfile::tempdir().unwrap();
        let mut opts = options(tmp.path());
        opts.tables = vec!["tags".to_string()];
        opts.format = ReportFormat::Json;

        let outcomes = run(&mut source(), &opts).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(tmp.path().join("tags_report.json").exists());
        assert!(!tmp.path().join("accounts_report.json").exists());
    }

    #[test]
    fn test_run_unknown_table_filter_aborts() {
        let tmp = tempfile::tempdir().unwrap();
        let mut opts = options(tmp.path());
        opts.tables = vec!["ghost".to_string()];

        let err = run(&mut source(), &opts).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_run_isolates_table_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let mut source = source()
            .broken("broken")
            .table("dupes", &[("a", "integer"), ("a", "bigint")], 1);

        let outcomes = run(&mut source, &options(tmp.path())).unwrap();
        let failed: Vec<_> = outcomes
            .iter()
            .filter(|o| o.is_failure())
            .map(|o| o.table.as_str())
            .collect();
        assert_eq!(failed, ["broken", "dupes"]);

        let dupes = outcomes.iter().find(|o| o.table == "dupes").unwrap();
        let message = format!("{:#}", dupes.outcome.as_ref().unwrap_err());
        assert!(message.contains("failed to analyze `public.dupes`"));
        assert!(message.contains("duplicate"));
        assert!(tmp.path().join("accounts_report.csv").exists());
    }

    #[test]
    fn test_run_keeps_reports_of_clashing_table_names_apart() {
        let tmp = tempfile::tempdir().unwrap();
        let mut source = FixtureSource::default()
            .table("a/b", &[("id", "integer")], 1)
            .table("a_b", &[("id", "bigint")], 2);

        let outcomes = run(&mut source, &options(tmp.path())).unwrap();
        assert!(outcomes.iter().all(|o| !o.is_failure()));

        let paths: Vec<_> = outcomes
            .iter()
            .map(|o| o.outcome.as_ref().unwrap().path.clone())
            .collect();
        assert_eq!(
            paths,
            [
                tmp.path().join("a_b_2_report.csv"),
                tmp.path().join("a_b_report.csv"),
            ]
        );

        let slashed = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(slashed.contains("1,id,integer,NO,4,0,1,0,4"));
        let plain = std::fs::read_to_string(&paths[1]).unwrap();
        assert!(plain.contains("1,id,bigint,NO,8,0,1,0,8"));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 2);
    }
}

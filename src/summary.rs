use std::fmt::Write as _;

use colored::Colorize;

use crate::pipeline::TableOutcome;

/// Renders one line per table plus a totals line.
pub fn render_summary(outcomes: &[TableOutcome]) -> String {
    let mut out = String::new();
    let mut reclaimable = 0u64;

    for table in outcomes {
        match &table.outcome {
            Ok(analysis) => {
                let summary = &analysis.report.summary;
                reclaimable = reclaimable.saturating_add(summary.reclaimable_bytes());
                let saving = format!("{} B reclaimable", summary.reclaimable_bytes());
                let saving = if summary.reclaimable_bytes() > 0 {
                    saving.yellow().bold()
                } else {
                    saving.normal()
                };
                let _ = writeln!(
                    out,
                    "{} {}: {} columns, {} rows, padding {} -> {} B/row, {} ({})",
                    "✓".green(),
                    table.table.bold(),
                    summary.column_count,
                    summary.row_count,
                    summary.current_padding_per_row,
                    summary.recommended_padding_per_row,
                    saving,
                    analysis.path.display()
                );
            }
            Err(err) => {
                let _ = writeln!(out, "{} {}: {err:#}", "✗".red(), table.table.bold());
            }
        }
    }

    let failed = failure_count(outcomes);
    let totals = format!(
        "{} tables analyzed, {} failed, {} B reclaimable",
        outcomes.len() - failed,
        failed,
        reclaimable
    );
    let _ = writeln!(
        out,
        "{}",
        if failed > 0 {
            totals.red()
        } else {
            totals.green()
        }
    );
    out
}

pub fn failure_count(outcomes: &[TableOutcome]) -> usize {
    outcomes.iter().filter(|table| table.is_failure()).count()
}

/// Prints the summary to stdout and returns how many tables failed.
pub fn print_summary(outcomes: &[TableOutcome]) -> usize {
    print!("{}", render_summary(outcomes));
    failure_count(outcomes)
}

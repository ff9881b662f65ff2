//! Console progress reporting
//!
//! One overall progress bar across every source row, plus per-table
//! sum-up blocks printed as each source table completes.

use crate::core::load::summary::TableSummary;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar and per-table console reporting for a run.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new(total_rows: u64) -> Self {
        let bar = ProgressBar::new(total_rows);
        bar.set_style(
            ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} rows ({percent}%) [{elapsed_precise}]",
            )
            .expect("static template")
            .progress_chars("=>-"),
        );
        bar.println(format!("Total rows to process: {total_rows}"));
        Self { bar }
    }

    /// Announce the start of one source table.
    pub fn table_started(&self, source_table: &str, rows: usize) {
        self.bar
            .println(format!("Working on {source_table} - {rows} rows to process."));
    }

    /// Advance the bar by one processed source row.
    pub fn row_processed(&self) {
        self.bar.inc(1);
    }

    /// Print the per-target sum-up for a finished source table.
    pub fn table_finished(&self, summary: &TableSummary) {
        let mut lines = format!(
            "Done with {}.\n| Out of {} medical records",
            summary.source_table, summary.rows_processed
        );

        if !summary.saved.is_empty() {
            lines.push_str(&format!(
                "\n| {} new rows created in the data warehouse:",
                summary.total_saved()
            ));
            for (target_table, count) in &summary.saved {
                lines.push_str(&format!("\n|\t'{target_table}': \t{count}"));
            }
        }

        if !summary.failed.is_empty() {
            lines.push_str(&format!(
                "\n| {} rows failed to enter the data warehouse:",
                summary.total_failed()
            ));
            for (target_table, count) in &summary.failed {
                lines.push_str(&format!("\n|\t'{target_table}': \t{count}"));
            }
        }

        self.bar.println(lines);
    }

    /// Finish the bar and print the total runtime.
    pub fn finished(&self, duration: Duration) {
        self.bar.finish_and_clear();
        let secs = duration.as_secs();
        println!(
            "Process original tables into DWH complete - runtime: {}:{:02} minutes.",
            secs / 60,
            secs % 60
        );
    }
}

//! Run summary and reporting
//!
//! Tracks per-source-table, per-target-table saved/failed counts for the
//! end-of-run report.

use crate::core::rules::RowOutcome;
use std::time::Duration;

/// Counts for one processed source table.
#[derive(Debug, Clone)]
pub struct TableSummary {
    /// Source table name
    pub source_table: String,

    /// Source rows processed
    pub rows_processed: usize,

    /// Rows queued for writing, per target table
    pub saved: Vec<(String, usize)>,

    /// Recoverable failures recorded, per target table
    pub failed: Vec<(String, usize)>,
}

impl TableSummary {
    pub fn new(source_table: impl Into<String>, rows_processed: usize) -> Self {
        Self {
            source_table: source_table.into(),
            rows_processed,
            saved: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Fold one (target table, outcome) pair into the counts.
    pub fn add(&mut self, target_table: &str, outcome: &RowOutcome) {
        if outcome.saved > 0 {
            bump(&mut self.saved, target_table, outcome.saved);
        }
        if outcome.failed > 0 {
            bump(&mut self.failed, target_table, outcome.failed);
        }
    }

    /// Total rows queued across target tables.
    pub fn total_saved(&self) -> usize {
        self.saved.iter().map(|(_, count)| count).sum()
    }

    /// Total failures recorded across target tables.
    pub fn total_failed(&self) -> usize {
        self.failed.iter().map(|(_, count)| count).sum()
    }
}

fn bump(counts: &mut Vec<(String, usize)>, key: &str, by: usize) {
    match counts.iter_mut().find(|(name, _)| name == key) {
        Some((_, count)) => *count += by,
        None => counts.push((key.to_string(), by)),
    }
}

/// Summary of a whole run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Total source rows across all tables
    pub total_rows: usize,

    /// Per-source-table counts, in processing order
    pub tables: Vec<TableSummary>,

    /// Elapsed wall-clock time
    pub duration: Duration,
}

impl RunSummary {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            tables: Vec::new(),
            duration: Duration::from_secs(0),
        }
    }

    /// Total rows queued for writing across the run.
    pub fn total_saved(&self) -> usize {
        self.tables.iter().map(TableSummary::total_saved).sum()
    }

    /// Total recoverable failures recorded across the run.
    pub fn total_failed(&self) -> usize {
        self.tables.iter().map(TableSummary::total_failed).sum()
    }

    /// True when no row-level failure was recorded.
    pub fn is_successful(&self) -> bool {
        self.total_failed() == 0
    }

    /// Log the summary through tracing.
    pub fn log_summary(&self) {
        tracing::info!(
            total_rows = self.total_rows,
            saved = self.total_saved(),
            failed = self.total_failed(),
            duration_secs = self.duration.as_secs(),
            "Run completed"
        );

        for table in &self.tables {
            tracing::info!(
                source_table = %table.source_table,
                rows = table.rows_processed,
                saved = table.total_saved(),
                failed = table.total_failed(),
                "Source table processed"
            );
        }
    }
}

//! Exception recorder
//!
//! Every recoverable row-level failure is recorded twice: as a
//! human-readable line in a dated, append-only log file, and as a
//! structured audit row queued to the `exceptions` warehouse table. The
//! log line index ties the two together.

use crate::core::load::batch::BatchWriter;
use crate::domain::{Result, Row, RowFailure, Value};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes exception details to the dated log file and the audit table.
pub struct ExceptionRecorder {
    log_dir: PathBuf,
}

impl ExceptionRecorder {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    /// Record one recoverable failure.
    ///
    /// Appends a formatted line to today's exception log and queues the
    /// matching audit row. Returns the 1-based log line index.
    pub async fn record(
        &self,
        source_row: &Row,
        partial_row: &Row,
        failure: &RowFailure,
        source_table: &str,
        target_table: &str,
        writer: &mut BatchWriter,
    ) -> Result<i64> {
        let message = format_message(failure, source_row, partial_row, source_table, target_table);
        let log_file_id = self.append_to_log(&message)?;

        tracing::warn!(
            source_table,
            target_table,
            column = failure.column(),
            log_file_id,
            "Recorded row-level failure"
        );

        // Only the NOT-NULL kind names a target column; the other two name
        // the missing source column.
        let (target_col, org_col) = match failure {
            RowFailure::NotNullColumnMissing(col) => (Value::Text(col.clone()), Value::Null),
            RowFailure::MandatoryFieldMissing(col)
            | RowFailure::OriginalDataFieldMissing(col) => (Value::Null, Value::Text(col.clone())),
        };

        let mut audit_row = Row::new();
        audit_row.set("log_file_id", log_file_id);
        audit_row.set("target_table", target_table);
        audit_row.set("org_table", source_table);
        audit_row.set("target_col", target_col);
        audit_row.set("org_col", org_col);
        audit_row.set("row_json", partial_row.to_json().to_string());
        writer.enqueue(audit_row, "exceptions").await?;

        Ok(log_file_id)
    }

    /// Append the message to today's log file with a 1-based line index.
    ///
    /// The index is recomputed by counting the existing lines on every
    /// call. That is O(existing lines) per exception, which is fine at
    /// batch scale; the recorder is the file's only writer within a run.
    fn append_to_log(&self, message: &str) -> Result<i64> {
        std::fs::create_dir_all(&self.log_dir)?;
        let path = self.log_file_path();

        let line_count = match std::fs::read_to_string(&path) {
            Ok(contents) => contents.lines().count() as i64,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };
        let index = line_count + 1;

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{index}. {message}")?;

        Ok(index)
    }

    fn log_file_path(&self) -> PathBuf {
        let filename = format!("{}-exceptions.log", Local::now().format("%Y-%m-%d"));
        Path::new(&self.log_dir).join(filename)
    }
}

/// Human-readable description of the failure, matching the wording the
/// audit tooling parses.
fn format_message(
    failure: &RowFailure,
    source_row: &Row,
    partial_row: &Row,
    source_table: &str,
    target_table: &str,
) -> String {
    match failure {
        RowFailure::MandatoryFieldMissing(column) => format!(
            "For '{target_table}', the mandatory field '{column}' is missing in: \
             Table: '{source_table}' Original row: ({})",
            source_row.describe()
        ),
        RowFailure::OriginalDataFieldMissing(column) => format!(
            "For '{target_table}', the field '{column}' is missing in: \
             Table: '{source_table}' Original row: ({})",
            source_row.describe()
        ),
        RowFailure::NotNullColumnMissing(column) => format!(
            "Validation failed for '{target_table}', '{column}' is missing: {partial_row}"
        ),
    }
}

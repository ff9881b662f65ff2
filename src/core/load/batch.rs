//! Batch writer
//!
//! Accumulates target rows per warehouse table and flushes them as
//! multi-row inserts once a table's queue reaches the flush threshold, or
//! at end-of-run via [`BatchWriter::flush_all`].
//!
//! Before queuing, every row is normalized to the target table's exact
//! column set (absent columns filled with null) so that batched inserts
//! have uniform shape.

use crate::adapters::database::StorageEngine;
use crate::domain::{Result, Row, Value};
use std::sync::Arc;

/// Per-table write queue with threshold-based flushing.
pub struct BatchWriter {
    warehouse: Arc<dyn StorageEngine>,
    /// Queues in table-insertion order
    queues: Vec<(String, Vec<Row>)>,
    flush_threshold: usize,
    dry_run: bool,
}

impl BatchWriter {
    pub fn new(warehouse: Arc<dyn StorageEngine>, flush_threshold: usize, dry_run: bool) -> Self {
        Self {
            warehouse,
            queues: Vec::new(),
            flush_threshold,
            dry_run,
        }
    }

    /// Normalize the row to the table's column set and queue it, flushing
    /// the table's queue if it reaches the threshold.
    pub async fn enqueue(&mut self, row: Row, table: &str) -> Result<()> {
        let columns = self.warehouse.get_columns(table).await?;

        let mut normalized = Row::new();
        for column in &columns {
            let value = row.get(column).cloned().unwrap_or(Value::Null);
            normalized.set(column.clone(), value);
        }

        let idx = match self.queues.iter().position(|(name, _)| name == table) {
            Some(idx) => idx,
            None => {
                self.queues.push((table.to_string(), Vec::new()));
                self.queues.len() - 1
            }
        };
        let queue = &mut self.queues[idx].1;
        queue.push(normalized);

        if queue.len() >= self.flush_threshold {
            let rows = std::mem::take(queue);
            self.write(&rows, table).await?;
        }

        Ok(())
    }

    /// Drain all remaining queues, in table-insertion order.
    pub async fn flush_all(&mut self) -> Result<()> {
        for idx in 0..self.queues.len() {
            if self.queues[idx].1.is_empty() {
                continue;
            }
            let rows = std::mem::take(&mut self.queues[idx].1);
            let table = self.queues[idx].0.clone();
            self.write(&rows, &table).await?;
        }
        Ok(())
    }

    /// Rows currently queued for the table.
    pub fn queued_len(&self, table: &str) -> usize {
        self.queues
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, queue)| queue.len())
            .unwrap_or(0)
    }

    async fn write(&self, rows: &[Row], table: &str) -> Result<()> {
        if self.dry_run {
            tracing::info!(table, rows = rows.len(), "Dry run - skipping batch write");
            return Ok(());
        }

        self.warehouse.save_rows(rows, table).await?;
        tracing::debug!(table, rows = rows.len(), "Flushed batch");
        Ok(())
    }
}

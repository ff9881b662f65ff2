//! Database abstraction traits
//!
//! This module defines the storage contract the pipeline runs against. Both
//! the warehouse and the original registry are accessed through the same
//! trait, which keeps the transformation engine testable against in-memory
//! fakes.

use crate::domain::{Result, Row};
use async_trait::async_trait;

/// Storage contract for the warehouse and the original registry
///
/// Implementations are expected to cache per-table column metadata for the
/// process lifetime; `get_columns` and `get_not_null_columns` are called for
/// every queued row.
#[async_trait]
pub trait StorageEngine: Send + Sync {
    /// Column names of the table, in ordinal position order.
    async fn get_columns(&self, table: &str) -> Result<Vec<String>>;

    /// Names of the columns whose constraint is NOT NULL.
    async fn get_not_null_columns(&self, table: &str) -> Result<Vec<String>>;

    /// Execute a SELECT and return its rows with null-normalized missing
    /// values.
    async fn fetch_rows(&self, query: &str) -> Result<Vec<Row>>;

    /// Bulk insert uniform rows into the table.
    ///
    /// Every row must carry the same column set; the batch writer
    /// normalizes rows before they reach this call.
    async fn save_rows(&self, rows: &[Row], table: &str) -> Result<()>;

    /// Release connection resources.
    async fn dispose(&self) -> Result<()>;
}

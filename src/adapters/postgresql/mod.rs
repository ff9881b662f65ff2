//! PostgreSQL adapter
//!
//! Storage engine implementation backed by tokio-postgres with deadpool
//! connection pooling. Both the warehouse and the original registry use
//! this adapter.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgresEngine;
pub use client::PostgresClient;
pub use models::ColumnMeta;

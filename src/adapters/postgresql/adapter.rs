//! PostgreSQL storage engine
//!
//! Implements [`StorageEngine`] over the pooled client, with a
//! process-lifetime column-metadata cache and multi-row inserts.

use crate::adapters::database::StorageEngine;
use crate::adapters::postgresql::client::PostgresClient;
use crate::adapters::postgresql::models::ColumnMeta;
use crate::config::DatabaseConfig;
use crate::domain::{CastorError, Result, Row, Value};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tokio_postgres::types::Type;

const NULL_VALUE: Value = Value::Null;

/// PostgreSQL implementation of the storage contract
pub struct PostgresEngine {
    client: PostgresClient,
    /// Per-table column metadata, cached for the process lifetime
    column_cache: Mutex<HashMap<String, Vec<ColumnMeta>>>,
}

impl PostgresEngine {
    /// Create an engine and verify the connection.
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        let client = PostgresClient::new(config)?;
        client.test_connection().await?;

        Ok(Self {
            client,
            column_cache: Mutex::new(HashMap::new()),
        })
    }

    /// Column metadata for the table, served from cache after the first
    /// lookup.
    async fn column_metadata(&self, table: &str) -> Result<Vec<ColumnMeta>> {
        let mut cache = self.column_cache.lock().await;
        if let Some(columns) = cache.get(table) {
            return Ok(columns.clone());
        }

        let rows = self
            .client
            .query(
                "SELECT column_name, is_nullable, data_type \
                 FROM information_schema.columns \
                 WHERE table_name = $1 \
                 ORDER BY ordinal_position",
                &[&table],
            )
            .await?;

        if rows.is_empty() {
            return Err(CastorError::Database(format!(
                "Table '{table}' has no columns or does not exist"
            )));
        }

        let columns: Vec<ColumnMeta> = rows
            .iter()
            .map(|row| {
                let name: String = row.get(0);
                let is_nullable: String = row.get(1);
                let data_type: String = row.get(2);
                ColumnMeta {
                    name,
                    is_nullable: is_nullable == "YES",
                    data_type,
                }
            })
            .collect();

        cache.insert(table.to_string(), columns.clone());
        Ok(columns)
    }
}

#[async_trait]
impl StorageEngine for PostgresEngine {
    async fn get_columns(&self, table: &str) -> Result<Vec<String>> {
        let columns = self.column_metadata(table).await?;
        Ok(columns.into_iter().map(|c| c.name).collect())
    }

    async fn get_not_null_columns(&self, table: &str) -> Result<Vec<String>> {
        let columns = self.column_metadata(table).await?;
        Ok(columns
            .into_iter()
            .filter(|c| !c.is_nullable)
            .map(|c| c.name)
            .collect())
    }

    async fn fetch_rows(&self, query: &str) -> Result<Vec<Row>> {
        let pg_rows = self.client.query(query, &[]).await?;

        let mut rows = Vec::with_capacity(pg_rows.len());
        for pg_row in &pg_rows {
            let mut row = Row::new();
            for (idx, column) in pg_row.columns().iter().enumerate() {
                row.set(column.name(), cell_value(pg_row, idx, column.type_())?);
            }
            rows.push(row);
        }
        Ok(rows)
    }

    async fn save_rows(&self, rows: &[Row], table: &str) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        // Rows are normalized upstream; the first row's column set is the
        // shape of the whole batch.
        let columns: Vec<&str> = rows[0].column_names().collect();
        let column_list = columns
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ");

        let mut placeholders = Vec::with_capacity(rows.len());
        let mut params: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> =
            Vec::with_capacity(rows.len() * columns.len());
        let mut index = 1;
        for row in rows {
            let row_placeholders: Vec<String> = columns
                .iter()
                .map(|col| {
                    params.push(row.get(col).unwrap_or(&NULL_VALUE));
                    let placeholder = format!("${index}");
                    index += 1;
                    placeholder
                })
                .collect();
            placeholders.push(format!("({})", row_placeholders.join(", ")));
        }

        let statement = format!(
            "INSERT INTO \"{table}\" ({column_list}) VALUES {}",
            placeholders.join(", ")
        );

        let inserted = self.client.execute(&statement, &params).await?;
        tracing::debug!(table, rows = inserted, "Inserted batch");
        Ok(())
    }

    async fn dispose(&self) -> Result<()> {
        self.client.close();
        Ok(())
    }
}

/// Convert one result cell to a tagged scalar.
///
/// Integer widths are widened to f64 and timestamptz values are normalized
/// to naive UTC; column types without a scalar mapping fall back to their
/// text rendering.
fn cell_value(row: &tokio_postgres::Row, idx: usize, ty: &Type) -> Result<Value> {
    let database_err =
        |e: tokio_postgres::Error| CastorError::Database(format!("Failed to read column: {e}"));

    let value = if *ty == Type::BOOL {
        row.try_get::<_, Option<bool>>(idx)
            .map_err(database_err)?
            .map(|b| Value::Number(if b { 1.0 } else { 0.0 }))
    } else if *ty == Type::INT2 {
        row.try_get::<_, Option<i16>>(idx)
            .map_err(database_err)?
            .map(|n| Value::Number(n as f64))
    } else if *ty == Type::INT4 {
        row.try_get::<_, Option<i32>>(idx)
            .map_err(database_err)?
            .map(|n| Value::Number(n as f64))
    } else if *ty == Type::INT8 {
        row.try_get::<_, Option<i64>>(idx)
            .map_err(database_err)?
            .map(|n| Value::Number(n as f64))
    } else if *ty == Type::FLOAT4 {
        row.try_get::<_, Option<f32>>(idx)
            .map_err(database_err)?
            .map(|n| Value::Number(n as f64))
    } else if *ty == Type::FLOAT8 {
        row.try_get::<_, Option<f64>>(idx)
            .map_err(database_err)?
            .map(Value::Number)
    } else if *ty == Type::DATE {
        row.try_get::<_, Option<NaiveDate>>(idx)
            .map_err(database_err)?
            .map(Value::from)
    } else if *ty == Type::TIMESTAMP {
        row.try_get::<_, Option<NaiveDateTime>>(idx)
            .map_err(database_err)?
            .map(Value::Timestamp)
    } else if *ty == Type::TIMESTAMPTZ {
        row.try_get::<_, Option<DateTime<Utc>>>(idx)
            .map_err(database_err)?
            .map(|ts| Value::Timestamp(ts.naive_utc()))
    } else {
        // TEXT, VARCHAR, BPCHAR and anything else that decodes as text.
        row.try_get::<_, Option<String>>(idx)
            .map_err(database_err)?
            .map(Value::Text)
    };

    Ok(value.unwrap_or(Value::Null))
}

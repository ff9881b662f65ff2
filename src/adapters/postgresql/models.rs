//! PostgreSQL-specific models and value conversions
//!
//! Holds the column metadata shape read from information_schema and the
//! [`ToSql`] bridge that lets [`Value`] cells be bound directly as statement
//! parameters against whatever column type the table declares.

use crate::domain::value::{Value, TIMESTAMP_FORMAT};
use bytes::BytesMut;
use chrono::{DateTime, Utc};
use std::error::Error;
use tokio_postgres::types::{to_sql_checked, IsNull, ToSql, Type};

/// One column as described by information_schema.columns.
#[derive(Debug, Clone)]
pub struct ColumnMeta {
    /// Column name
    pub name: String,
    /// Whether the column accepts NULL
    pub is_nullable: bool,
    /// Declared data type (lowercase information_schema spelling)
    pub data_type: String,
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Text(s) => s.to_sql(ty, out),
            Value::Number(n) => {
                if *ty == Type::INT2 {
                    (*n as i16).to_sql(ty, out)
                } else if *ty == Type::INT4 {
                    (*n as i32).to_sql(ty, out)
                } else if *ty == Type::INT8 {
                    (*n as i64).to_sql(ty, out)
                } else if *ty == Type::FLOAT4 {
                    (*n as f32).to_sql(ty, out)
                } else if *ty == Type::FLOAT8 {
                    n.to_sql(ty, out)
                } else if *ty == Type::BOOL {
                    (*n != 0.0).to_sql(ty, out)
                } else if *ty == Type::TEXT || *ty == Type::VARCHAR || *ty == Type::BPCHAR {
                    self.to_string().to_sql(ty, out)
                } else {
                    Err(format!("cannot bind numeric value to column type {ty}").into())
                }
            }
            Value::Timestamp(ts) => {
                if *ty == Type::DATE {
                    ts.date().to_sql(ty, out)
                } else if *ty == Type::TIMESTAMP {
                    ts.to_sql(ty, out)
                } else if *ty == Type::TIMESTAMPTZ {
                    DateTime::<Utc>::from_naive_utc_and_offset(*ts, Utc).to_sql(ty, out)
                } else if *ty == Type::TEXT || *ty == Type::VARCHAR || *ty == Type::BPCHAR {
                    ts.format(TIMESTAMP_FORMAT).to_string().to_sql(ty, out)
                } else {
                    Err(format!("cannot bind timestamp value to column type {ty}").into())
                }
            }
        }
    }

    fn accepts(_ty: &Type) -> bool {
        // Type compatibility is resolved per-cell in to_sql; a single row
        // mixes column types, so the blanket accept is required here.
        true
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_binds_to_any_type() {
        let mut buf = BytesMut::new();
        assert!(matches!(
            Value::Null.to_sql(&Type::INT8, &mut buf).unwrap(),
            IsNull::Yes
        ));
        assert!(matches!(
            Value::Null.to_sql(&Type::TEXT, &mut buf).unwrap(),
            IsNull::Yes
        ));
    }

    #[test]
    fn test_number_binds_to_integer_and_float() {
        let mut buf = BytesMut::new();
        assert!(Value::Number(42.0).to_sql(&Type::INT4, &mut buf).is_ok());
        buf.clear();
        assert!(Value::Number(42.5).to_sql(&Type::FLOAT8, &mut buf).is_ok());
    }

    #[test]
    fn test_number_rejects_incompatible_type() {
        let mut buf = BytesMut::new();
        assert!(Value::Number(1.0).to_sql(&Type::UUID, &mut buf).is_err());
    }

    #[test]
    fn test_timestamp_binds_to_date_and_text() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let mut buf = BytesMut::new();
        assert!(Value::Timestamp(ts).to_sql(&Type::DATE, &mut buf).is_ok());
        buf.clear();
        assert!(Value::Timestamp(ts).to_sql(&Type::TEXT, &mut buf).is_ok());
    }
}

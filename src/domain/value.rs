//! Tagged scalar values
//!
//! Every cell read from the registry or written to the warehouse is one of
//! four shapes: null, text, number, or timestamp. Keeping the tag explicit
//! lets the pipeline validate rows against table metadata instead of
//! guessing from stringly-typed data.

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Render format for timestamps in audit output and error messages.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single scalar cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL / absent value
    Null,
    /// Character data
    Text(String),
    /// Numeric data (integers are widened to f64)
    Number(f64),
    /// Date or date-time data (dates carry a midnight time component)
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true when the value counts as "missing" for NOT-NULL
    /// validation: null, empty string, or numeric zero.
    ///
    /// Zero and empty string are deliberately included: the warehouse
    /// validation has always rejected them and downstream audit tooling
    /// relies on that, even though it misclassifies legitimate zeros.
    pub fn is_falsy(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            Value::Number(n) => *n == 0.0,
            Value::Timestamp(_) => false,
        }
    }

    /// Borrow the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The date portion, if this is a timestamp value.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Timestamp(ts) => Some(ts.date()),
            _ => None,
        }
    }

    /// Convert to a JSON value for audit serialization.
    ///
    /// Timestamps are rendered with [`TIMESTAMP_FORMAT`] to match the
    /// format the audit table has always stored.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Timestamp(ts) => {
                serde_json::Value::String(ts.format(TIMESTAMP_FORMAT).to_string())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Timestamp(d.and_hms_opt(0, 0, 0).expect("midnight is always valid"))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_null_is_falsy() {
        assert!(Value::Null.is_falsy());
        assert!(Value::Null.is_null());
    }

    #[test]
    fn test_empty_text_is_falsy() {
        assert!(Value::Text(String::new()).is_falsy());
        assert!(!Value::Text("x".to_string()).is_falsy());
    }

    #[test]
    fn test_zero_is_falsy() {
        // Documented quirk: numeric zero counts as missing.
        assert!(Value::Number(0.0).is_falsy());
        assert!(!Value::Number(0.5).is_falsy());
        assert!(!Value::Number(-1.0).is_falsy());
    }

    #[test]
    fn test_timestamp_never_falsy() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(!Value::Timestamp(ts).is_falsy());
    }

    #[test]
    fn test_as_date_from_timestamp() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(
            Value::Timestamp(ts).as_date(),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(Value::Text("2024-03-15".to_string()).as_date(), None);
    }

    #[test]
    fn test_date_conversion_carries_midnight() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let v = Value::from(d);
        assert_eq!(v.as_date(), Some(d));
    }

    #[test]
    fn test_to_json_timestamp_format() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(
            Value::Timestamp(ts).to_json(),
            serde_json::json!("2024-01-02 03:04:05")
        );
    }

    #[test]
    fn test_display_whole_numbers_without_fraction() {
        assert_eq!(Value::Number(42.0).to_string(), "42");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
    }

    #[test]
    fn test_from_option() {
        let none: Option<i64> = None;
        assert_eq!(Value::from(none), Value::Null);
        assert_eq!(Value::from(Some(3_i64)), Value::Number(3.0));
    }
}

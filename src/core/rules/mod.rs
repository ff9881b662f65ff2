//! Rule evaluation and table-specific transformers
//!
//! This is the row-routing engine: for each source row the pipeline
//! decides which warehouse tables receive derived rows, assembles each
//! derived row from the catalog-described field mappings, applies the
//! table-specific business rules, and routes recoverable failures to the
//! exception recorder without aborting the surrounding loop.
//!
//! - [`evaluator`] resolves the mandatory columns for a (source table,
//!   target table) pair
//! - [`concept`], [`patient`], [`observation`] apply the per-table
//!   semantics (display-name coalescing, merge rules, fan-out with
//!   encounter attachment and value-type inference)

pub mod concept;
pub mod evaluator;
pub mod observation;
pub mod patient;

use crate::adapters::database::StorageEngine;
use crate::adapters::translator::TranslationService;
use crate::config::EtlConfig;
use crate::core::catalog::Catalog;
use crate::core::exceptions::ExceptionRecorder;
use crate::core::load::batch::BatchWriter;
use crate::core::state::{EncounterRegistrar, TranslationCache};
use crate::core::validate;
use crate::domain::{Result, Row};
use std::sync::Arc;

/// Per-(source row, target table) accounting returned to the orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowOutcome {
    /// Candidate rows queued for writing
    pub saved: usize,
    /// Recoverable failures recorded
    pub failed: usize,
}

/// The transformation engine and the run state it drives.
///
/// All mutable run state (translation cache, encounter table, batch
/// queues, exception log) lives here, owned by the coordinator for the
/// duration of one run.
pub struct Pipeline {
    pub warehouse: Arc<dyn StorageEngine>,
    pub translations: TranslationCache,
    pub encounters: EncounterRegistrar,
    pub writer: BatchWriter,
    pub recorder: ExceptionRecorder,
    pub etl: EtlConfig,
}

impl Pipeline {
    pub fn new(
        warehouse: Arc<dyn StorageEngine>,
        translator: Arc<dyn TranslationService>,
        etl: EtlConfig,
        dry_run: bool,
    ) -> Self {
        Self {
            translations: TranslationCache::new(warehouse.clone(), translator),
            encounters: EncounterRegistrar::new(warehouse.clone()),
            writer: BatchWriter::new(warehouse.clone(), etl.batch_flush_threshold, dry_run),
            recorder: ExceptionRecorder::new(&etl.exception_log_dir),
            warehouse,
            etl,
        }
    }

    /// Route one source row into every warehouse table the catalog maps it
    /// to. Returns the per-target outcome; recoverable failures are
    /// recorded and never abort remaining targets.
    pub async fn process_source_row(
        &mut self,
        source_row: &Row,
        source_table: &str,
        catalog: &Catalog,
    ) -> Result<Vec<(String, RowOutcome)>> {
        let mut outcomes = Vec::new();

        for target_table in catalog.target_tables_for(source_table) {
            let rules = catalog.rules_for_pair(source_table, target_table);
            let mut outcome = RowOutcome::default();

            match evaluator::mandatory_columns(&rules, source_row, &self.etl) {
                Err(failure) => {
                    // Missing mandatory data skips this pair only.
                    self.recorder
                        .record(
                            source_row,
                            &Row::new(),
                            &failure,
                            source_table,
                            target_table,
                            &mut self.writer,
                        )
                        .await?;
                    outcome.failed += 1;
                }
                Ok(mandatory) => match target_table {
                    "concept_dimension" => {
                        concept::process(
                            self,
                            mandatory,
                            source_row,
                            source_table,
                            target_table,
                            &mut outcome,
                        )
                        .await?;
                    }
                    "patient_dimension" => {
                        patient::process(
                            self,
                            mandatory,
                            source_row,
                            &rules,
                            source_table,
                            target_table,
                            &mut outcome,
                        )
                        .await?;
                    }
                    "observation_fact" => {
                        observation::process(
                            self,
                            mandatory,
                            source_row,
                            &rules,
                            source_table,
                            target_table,
                            &mut outcome,
                        )
                        .await?;
                    }
                    other => {
                        tracing::warn!(
                            target_table = other,
                            source_table,
                            "No transformer for target table, skipping"
                        );
                    }
                },
            }

            outcomes.push((target_table.to_string(), outcome));
        }

        Ok(outcomes)
    }

    /// Drain all remaining batch queues. Called once at end-of-run.
    pub async fn finish(&mut self) -> Result<()> {
        self.writer.flush_all().await
    }
}

/// Shared tail of the single-row transformers: translate, validate against
/// the target table's NOT-NULL columns, then queue or record the failure.
pub(crate) async fn finish_row(
    pipeline: &mut Pipeline,
    row: Row,
    source_row: &Row,
    source_table: &str,
    target_table: &str,
    outcome: &mut RowOutcome,
) -> Result<()> {
    let row = pipeline
        .translations
        .translate_row(row, &mut pipeline.writer)
        .await?;

    let not_null_columns = pipeline.warehouse.get_not_null_columns(target_table).await?;
    match validate::check_not_null(&row, &not_null_columns) {
        Ok(()) => {
            pipeline.writer.enqueue(row, target_table).await?;
            outcome.saved += 1;
        }
        Err(failure) => {
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
        }
    }
    Ok(())
}

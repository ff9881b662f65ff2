//! Load coordinator - main orchestrator for the ETL run
//!
//! Drives the whole run: loads the catalog, extracts the source tables it
//! names, routes every source row through the rule pipeline, and finishes
//! with a flush and a run summary. Recoverable row-level failures never
//! abort the run; storage and translation errors do.

use crate::adapters::database::StorageEngine;
use crate::adapters::postgresql::PostgresEngine;
use crate::adapters::translator::{MicrosoftTranslator, TranslationService};
use crate::config::CastorConfig;
use crate::core::catalog::Catalog;
use crate::core::load::progress::ProgressReporter;
use crate::core::load::summary::{RunSummary, TableSummary};
use crate::core::rules::Pipeline;
use crate::core::state::encounters;
use crate::domain::{Result, Row};
use std::sync::Arc;
use std::time::Instant;

/// Orchestrates one registry-to-warehouse run.
pub struct LoadCoordinator {
    config: CastorConfig,
    warehouse: Arc<dyn StorageEngine>,
    source: Arc<dyn StorageEngine>,
    translator: Arc<dyn TranslationService>,
}

impl LoadCoordinator {
    /// Connect to both databases and the translation service.
    pub async fn connect(config: CastorConfig) -> Result<Self> {
        let warehouse = Arc::new(PostgresEngine::new(config.warehouse.clone()).await?);
        let source = Arc::new(PostgresEngine::new(config.source.clone()).await?);
        let translator = Arc::new(MicrosoftTranslator::new(config.translator.clone())?);

        Ok(Self::with_collaborators(config, warehouse, source, translator))
    }

    /// Wire the coordinator with explicit collaborators. Production goes
    /// through [`LoadCoordinator::connect`]; tests inject fakes here.
    pub fn with_collaborators(
        config: CastorConfig,
        warehouse: Arc<dyn StorageEngine>,
        source: Arc<dyn StorageEngine>,
        translator: Arc<dyn TranslationService>,
    ) -> Self {
        Self {
            config,
            warehouse,
            source,
            translator,
        }
    }

    /// Execute the run.
    ///
    /// 1. Load the data catalog; its distinct source tables drive
    ///    extraction.
    /// 2. Extract every source table, excluding soft-deleted rows where a
    ///    `Delete_Date` column exists.
    /// 3. Route each source row through the rule pipeline, recording
    ///    recoverable failures as it goes.
    /// 4. Drain the batch queues, release connections, report.
    pub async fn execute(&self) -> Result<RunSummary> {
        let start = Instant::now();

        let catalog = Catalog::load(self.warehouse.as_ref()).await?;
        tracing::info!("Data catalog received");

        let source_tables = self.extract_source_tables(&catalog).await?;
        self.source.dispose().await?;
        tracing::info!(tables = source_tables.len(), "Original tables received");

        let mut pipeline = Pipeline::new(
            self.warehouse.clone(),
            self.translator.clone(),
            self.config.etl.clone(),
            self.config.application.dry_run,
        );

        let total_rows: usize = source_tables.iter().map(|(_, rows)| rows.len()).sum();
        let progress = ProgressReporter::new(total_rows as u64);
        let mut summary = RunSummary::new(total_rows);

        for (source_table, rows) in &source_tables {
            progress.table_started(source_table, rows.len());
            let mut table_summary = TableSummary::new(source_table.clone(), rows.len());

            for source_row in rows {
                let outcomes = pipeline
                    .process_source_row(source_row, source_table, &catalog)
                    .await?;
                for (target_table, outcome) in &outcomes {
                    table_summary.add(target_table, outcome);
                }
                progress.row_processed();
            }

            progress.table_finished(&table_summary);
            summary.tables.push(table_summary);
        }

        pipeline.finish().await?;
        self.warehouse.dispose().await?;

        summary.duration = start.elapsed();
        progress.finished(summary.duration);
        summary.log_summary();
        Ok(summary)
    }

    /// Rebuild the warehouse `encounters` table from the source tables'
    /// entry dates: ids 1..N in sorted-date order.
    pub async fn rebuild_encounters(&self) -> Result<usize> {
        let catalog = Catalog::load(self.warehouse.as_ref()).await?;
        let source_tables = self.extract_source_tables(&catalog).await?;
        encounters::rebuild_from_sources(self.warehouse.as_ref(), &source_tables).await
    }

    /// Pull every source table the catalog names.
    ///
    /// Tables carrying a `Delete_Date` column get soft-deleted rows
    /// excluded in the query.
    async fn extract_source_tables(&self, catalog: &Catalog) -> Result<Vec<(String, Vec<Row>)>> {
        let mut tables = Vec::new();
        for source_table in catalog.source_tables() {
            let columns = self.source.get_columns(source_table).await?;

            let mut query = format!("SELECT * FROM \"{source_table}\"");
            if columns.iter().any(|c| c == "Delete_Date") {
                query.push_str(" WHERE \"Delete_Date\" IS NULL");
            }

            let rows = self.source.fetch_rows(&query).await?;
            tracing::info!(
                table = source_table,
                rows = rows.len(),
                "Extracted source table"
            );
            tables.push((source_table.to_string(), rows));
        }
        Ok(tables)
    }
}

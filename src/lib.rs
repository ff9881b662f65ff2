// Castor - Clinical Registry to i2b2 Data Warehouse ETL Tool
// Copyright (c) 2025 Castor Contributors
// Licensed under the MIT License

//! # Castor - Clinical Registry to i2b2 Data Warehouse ETL
//!
//! Castor copies rows from a clinical registry into an i2b2-style
//! star-schema data warehouse (concept_dimension, patient_dimension,
//! observation_fact). A declarative mapping table, the data catalog,
//! drives every transformation decision: which warehouse tables a source
//! row feeds, how fields are renamed, and which clinical concept/modifier
//! codes tag the derived fact rows.
//!
//! Per source row the pipeline resolves the mandatory columns for each
//! target table, applies that table's business rules (encounter-number
//! assignment, value-type inference, merge-field coalescing), translates
//! Hebrew free text through a cached remote translator, validates NOT-NULL
//! completeness against the live table metadata, and queues the result for
//! batched insertion. Recoverable failures are recorded and the run keeps
//! going.
//!
//! # Module tree
//!
//! - [`cli`] - clap commands (`run`, `validate-config`, `init`)
//! - [`config`] - TOML configuration with env substitution and secrets
//! - [`core`] - catalog, rule engine, run state, batch loading, exceptions
//! - [`adapters`] - PostgreSQL storage engine, Microsoft Translator client
//! - [`domain`] - tagged values, rows, catalog rules, error taxonomy
//! - [`logging`] - tracing setup (console + optional JSON file)
//!
//! # Driving a run from code
//!
//! ```rust,no_run
//! use castor::config::load_config;
//! use castor::core::load::LoadCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("castor.toml")?;
//!     let coordinator = LoadCoordinator::connect(config).await?;
//!     let summary = coordinator.execute().await?;
//!     println!("Saved {} rows", summary.total_saved());
//!     Ok(())
//! }
//! ```
//!
//! # Failure handling
//!
//! Three row-level failures are recoverable and recorded through the
//! exception recorder while the run continues:
//!
//! - [`domain::RowFailure::MandatoryFieldMissing`] skips one
//!   (source row, target table) pair
//! - [`domain::RowFailure::OriginalDataFieldMissing`] skips one fan-out
//!   rule; sibling rules still execute
//! - [`domain::RowFailure::NotNullColumnMissing`] drops one candidate row
//!   before queuing
//!
//! Everything else ([`domain::CastorError`]: storage connectivity, remote
//! translation failure, malformed catalog) is fatal and terminates the
//! run with a nonzero exit.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

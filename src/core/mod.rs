//! Core business logic for Castor.
//!
//! This module contains the transformation engine and orchestration for
//! registry-to-warehouse runs.
//!
//! # Modules
//!
//! - [`catalog`] - the declarative mapping rules, loaded once per run
//! - [`rules`] - rule evaluation and the three table-specific transformers
//! - [`state`] - run-scoped translation cache and encounter registrar
//! - [`load`] - batch writer, run coordinator, progress, summary
//! - [`exceptions`] - the exception recorder (dated log file + audit rows)
//! - [`validate`] - NOT-NULL validation of assembled rows
//!
//! # Run Workflow
//!
//! 1. **Load catalog**: active mapping rules, sorted by target table
//! 2. **Extract**: every source table the catalog names, soft-deleted
//!    rows excluded
//! 3. **Transform**: per row, resolve mandatory columns and apply the
//!    target table's rules; translate Hebrew text; attach encounter ids
//! 4. **Validate**: NOT-NULL completeness before queuing
//! 5. **Load**: batched multi-row inserts at the flush threshold
//! 6. **Record**: recoverable failures go to the exception log and the
//!    `exceptions` audit table without aborting the run
//! 7. **Report**: per-table, per-target counts and total elapsed time
//!
//! # Example
//!
//! ```rust,no_run
//! use castor::config::load_config;
//! use castor::core::load::LoadCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("castor.toml")?;
//! let coordinator = LoadCoordinator::connect(config).await?;
//! let summary = coordinator.execute().await?;
//!
//! println!("Saved: {}", summary.total_saved());
//! println!("Failed: {}", summary.total_failed());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod exceptions;
pub mod load;
pub mod rules;
pub mod state;
pub mod validate;

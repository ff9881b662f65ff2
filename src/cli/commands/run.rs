//! Run command implementation
//!
//! This module implements the `run` command that executes the
//! registry-to-warehouse load.

use crate::config::load_config;
use crate::core::load::LoadCoordinator;
use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - process rows but skip warehouse writes
    #[arg(long)]
    pub dry_run: bool,

    /// Rebuild the encounters table from the source entry dates before
    /// processing
    #[arg(long)]
    pub rebuild_encounters: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Apply dry-run flag from CLI
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if config.application.dry_run {
            println!("DRY RUN MODE - no data will be written to the warehouse");
            println!();
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !config.application.dry_run {
            println!("Run Configuration:");
            println!("  Warehouse: {}", config.warehouse.connection_string_safe());
            println!("  Source: {}", config.source.connection_string_safe());
            println!("  Source system tag: {}", config.etl.sourcesystem_cd);
            println!("  Upload id: {}", config.etl.upload_id);
            println!("  Flush threshold: {}", config.etl.batch_flush_threshold);
            println!();
            print!("Proceed with the load? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Run cancelled.");
                return Ok(0);
            }
        }

        // Connect to both databases and the translator
        tracing::info!("Creating load coordinator");
        let coordinator = match LoadCoordinator::connect(config).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create load coordinator");
                eprintln!("Failed to initialize run: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        // Optional encounters rebuild before processing
        if self.rebuild_encounters {
            println!("Rebuilding encounters table...");
            match coordinator.rebuild_encounters().await {
                Ok(count) => println!("Encounters table updated ({count} encounters)."),
                Err(e) => {
                    tracing::error!(error = %e, "Encounters rebuild failed");
                    eprintln!("Encounters rebuild failed: {e}");
                    return Ok(5);
                }
            }
        }

        // Execute the load
        println!("Starting load...");
        println!();
        let summary = match coordinator.execute().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Run failed");
                eprintln!("Run failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        // Display summary
        println!();
        println!("Run Summary:");
        println!("  Source rows processed: {}", summary.total_rows);
        println!("  Rows saved: {}", summary.total_saved());
        println!("  Rows failed: {}", summary.total_failed());
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();

        let exit_code = if summary.is_successful() {
            println!("Run completed successfully!");
            0
        } else {
            println!("Run completed with row-level failures; see the exception log.");
            1 // Partial success
        };

        Ok(exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_defaults() {
        let args = RunArgs {
            yes: false,
            dry_run: false,
            rebuild_encounters: false,
        };

        assert!(!args.yes);
        assert!(!args.dry_run);
        assert!(!args.rebuild_encounters);
    }
}

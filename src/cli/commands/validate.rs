//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Castor configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates after parsing, so a successful load means
        // a valid configuration.
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("  Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Warehouse: {}", config.warehouse.connection_string_safe());
        println!("  Source: {}", config.source.connection_string_safe());
        println!("  Source system tag: {}", config.etl.sourcesystem_cd);
        println!("  Upload id: {}", config.etl.upload_id);
        println!("  Flush threshold: {}", config.etl.batch_flush_threshold);
        println!("  Exception log dir: {}", config.etl.exception_log_dir);
        println!("  Translator endpoint: {}", config.translator.endpoint);
        println!(
            "  Translation: {} -> {}",
            config.translator.source_lang, config.translator.target_lang
        );
        println!();
        Ok(0)
    }
}

// Castor - Clinical Registry to i2b2 Data Warehouse ETL Tool
// Copyright (c) 2025 Castor Contributors
// Licensed under the MIT License

use castor::cli::{Cli, Commands};
use castor::config::LoggingConfig;
use castor::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // .env is optional; a missing file is not an error.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging with console-only config; the file layer is
    // enabled later only through the loaded configuration's [logging]
    // section when a command wants it.
    let log_level = cli.log_level.as_deref().unwrap_or("info");
    let logging_config = LoggingConfig::default();
    let _guard = match init_logging(log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Castor - Clinical Registry to i2b2 Data Warehouse ETL Tool"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // fatal
        }
    };

    process::exit(exit_code);
}

/// Dispatch to the selected subcommand; the returned code becomes the
/// process exit status.
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}

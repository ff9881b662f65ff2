//! Command-line interface, built on clap derive.
//!
//! Global flags (config path, log level) sit on [`Cli`]; each subcommand
//! carries its own arguments and returns the process exit code.

pub mod commands;

use clap::{Parser, Subcommand};

/// Castor - Clinical registry to i2b2 data warehouse ETL
#[derive(Parser, Debug)]
#[command(name = "castor")]
#[command(version, about, long_about = None)]
#[command(author = "Castor Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "castor.toml", env = "CASTOR_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CASTOR_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the registry-to-warehouse load
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["castor", "run"]);
        assert_eq!(cli.config, "castor.toml");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["castor", "--config", "custom.toml", "run"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["castor", "--log-level", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_run_flags() {
        let cli = Cli::parse_from(["castor", "run", "--yes", "--dry-run", "--rebuild-encounters"]);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.yes);
                assert!(args.dry_run);
                assert!(args.rebuild_encounters);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["castor", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["castor", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}

//! Logging and observability
//!
//! Structured logging over `tracing`: console output plus an optional
//! JSON file layer with rotation.
//!
//! # Example
//!
//! ```no_run
//! use castor::logging::init_logging;
//! use castor::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

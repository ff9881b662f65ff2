//! Result type alias for Castor
//!
//! A convenience alias that uses `CastorError` as the error type for all
//! fallible operations that can abort the run. Row-level recoverable
//! failures use `Result<T, RowFailure>` instead and never cross this
//! boundary.

use super::errors::CastorError;

/// Result type alias for Castor operations
pub type Result<T> = std::result::Result<T, CastorError>;

//! Domain models and types for Castor.
//!
//! The domain layer provides:
//! - **Tagged scalar values** ([`Value`]) and **ordered rows** ([`Row`])
//! - **Catalog rules** ([`CatalogRule`]) with their [`RuleKind`]
//!   classification (mandatory / merge / fact)
//! - **Error types** ([`CastorError`] for fatal failures, [`RowFailure`]
//!   for the recoverable row-level taxonomy)
//! - **Result type alias** ([`Result`])
//!
//! Rows are schema-aware at the boundary: a row is validated against the
//! target table's column metadata before it is ever queued for writing,
//! and batched rows are normalized to the table's exact column set.

pub mod catalog;
pub mod errors;
pub mod result;
pub mod row;
pub mod value;

// Re-export commonly used types for convenience
pub use catalog::{CatalogRule, RuleKind, NO_MODIFIER};
pub use errors::{CastorError, RowFailure};
pub use result::Result;
pub use row::Row;
pub use value::Value;

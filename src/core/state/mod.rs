//! Run-scoped mutable state
//!
//! The translation cache and the encounter registrar are the two lazily
//! loaded, monotonically growing tables a run carries. Both are explicit
//! context objects owned by the coordinator and passed by reference into
//! the transformers; there is no ambient or static state.

pub mod encounters;
pub mod translation;

pub use encounters::EncounterRegistrar;
pub use translation::TranslationCache;

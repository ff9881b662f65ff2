//! Remote translation adapter
//!
//! The pipeline translates source-script text through an object-safe
//! [`TranslationService`] trait; [`MicrosoftTranslator`] is the production
//! implementation over the Microsoft Translator Text API v3.

pub mod microsoft;
pub mod models;
pub mod traits;

pub use microsoft::MicrosoftTranslator;
pub use traits::TranslationService;

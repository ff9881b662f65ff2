//! Translation service trait

use crate::domain::Result;
use async_trait::async_trait;

/// Remote translation contract
///
/// One text per call, synchronous request/response. Implementations return
/// an empty string when the service reports no translation; transport and
/// authentication failures are fatal and propagate as errors.
#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Translate the text from the configured source language to the
    /// configured target language.
    async fn translate(&self, text: &str) -> Result<String>;
}

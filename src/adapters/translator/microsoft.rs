//! Microsoft Translator Text API client
//!
//! REST API reference:
//! <https://learn.microsoft.com/en-us/azure/ai-services/translator/reference/rest-api-guide>

use crate::adapters::translator::models::{TranslateRequest, TranslateResponse};
use crate::adapters::translator::traits::TranslationService;
use crate::config::TranslatorConfig;
use crate::domain::{CastorError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;
use uuid::Uuid;

/// Client for the Microsoft Translator Text API v3
pub struct MicrosoftTranslator {
    /// Full URL of the translate operation
    translate_url: String,

    /// HTTP client for making requests
    client: Client,

    /// Translator configuration (endpoint, key, region, language pair)
    config: TranslatorConfig,
}

impl MicrosoftTranslator {
    /// Create a new translator client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                CastorError::Translation(format!("Failed to build HTTP client: {e}"))
            })?;

        let translate_url = format!("{}/translate", config.endpoint.trim_end_matches('/'));

        Ok(Self {
            translate_url,
            client,
            config,
        })
    }
}

#[async_trait]
impl TranslationService for MicrosoftTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        let body = vec![TranslateRequest {
            text: text.to_string(),
        }];

        let subscription_key: &str = self.config.key.expose_secret().as_ref();
        let response = self
            .client
            .post(&self.translate_url)
            .query(&[
                ("api-version", "3.0"),
                ("from", self.config.source_lang.as_str()),
                ("to", self.config.target_lang.as_str()),
            ])
            .header("Ocp-Apim-Subscription-Key", subscription_key)
            .header("Ocp-Apim-Subscription-Region", &self.config.location)
            .header("X-ClientTraceId", Uuid::new_v4().to_string())
            .json(&body)
            .send()
            .await
            .map_err(|e| CastorError::Translation(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CastorError::Translation(format!(
                "Translation request failed with status {status}: {body}"
            )));
        }

        let parsed: Vec<TranslateResponse> = response
            .json()
            .await
            .map_err(|e| CastorError::Translation(format!("Invalid response: {e}")))?;

        // Empty string when the service reports no translation.
        let translated = parsed
            .into_iter()
            .next()
            .and_then(|r| r.translations.into_iter().next())
            .map(|t| t.text)
            .unwrap_or_default();

        tracing::debug!(
            from = %self.config.source_lang,
            to = %self.config.target_lang,
            "Translated text"
        );

        Ok(translated)
    }
}

//! Wire format of the Microsoft Translator Text API v3

use serde::{Deserialize, Serialize};

/// Request body element: `[{"text": "..."}]`
#[derive(Debug, Serialize)]
pub struct TranslateRequest {
    pub text: String,
}

/// One element of the response array
#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub translations: Vec<Translation>,
}

/// A single translation alternative
#[derive(Debug, Deserialize)]
pub struct Translation {
    pub text: String,

    /// Target language code echoed by the service
    #[serde(default)]
    pub to: Option<String>,
}

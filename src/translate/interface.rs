/// Translate interface - providers are external services

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;

/// Body of `POST /api/translate`. Every field is optional on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    #[serde(default = "default_service")]
    pub service: String,
}

fn default_source_lang() -> String {
    "auto".to_string()
}

fn default_target_lang() -> String {
    "en".to_string()
}

fn default_service() -> String {
    "google".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub success: bool,
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

/// An external translation capability
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` with the named service (already lowercased)
    async fn translate(
        &self,
        text: &str,
        service: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError>;
}

/// True when both languages are explicit and identical
pub fn is_same_language(source_lang: &str, target_lang: &str) -> bool {
    source_lang != "auto" && source_lang == target_lang
}

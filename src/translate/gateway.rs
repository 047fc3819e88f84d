use std::sync::Arc;
use tracing::{debug, error};

use super::interface::{is_same_language, Translator};
use crate::errors::TranslateError;

/// Validates a translation request and forwards it to a provider
#[derive(Clone)]
pub struct TranslationGateway {
    translator: Arc<dyn Translator>,
}

impl TranslationGateway {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// Translate `text` with the named service.
    ///
    /// Empty text returns immediately without contacting a provider.
    /// Provider failures are logged and returned once, there is no retry.
    pub async fn translate(
        &self,
        text: &str,
        service: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        if text.is_empty() {
            return Ok(String::new());
        }

        if is_same_language(source_lang, target_lang) {
            return Err(TranslateError::SameLanguage);
        }

        let service = service.to_lowercase();
        debug!(
            "Translating {} chars via {} ({} -> {})",
            text.chars().count(),
            service,
            source_lang,
            target_lang
        );

        self.translator
            .translate(text, &service, source_lang, target_lang)
            .await
            .map_err(|e| {
                error!("Translation error with {}: {}", service, e);
                TranslateError::Provider(e.to_string())
            })
    }
}

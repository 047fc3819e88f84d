use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use super::google::GoogleTranslator;
use super::interface::Translator;
use super::relay_client::{RelayClient, RelayRequest};
use crate::config::TranslationConfig;
use crate::errors::ProviderError;

/// Services advertised by `GET /api/services`, in display order
pub const TRANSLATION_SERVICES: [&str; 7] = [
    "google", "bing", "baidu", "youdao", "tencent", "alibaba", "deepl",
];

/// Routes a translation to the named service.
///
/// With a relay configured every known service goes through it. Without
/// one, only `google` is available via its public endpoint.
pub struct ProviderTranslator {
    google: GoogleTranslator,
    relay: Option<RelayClient>,
}

impl ProviderTranslator {
    pub fn new(config: &TranslationConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let relay = config
            .relay_url
            .as_ref()
            .filter(|url| !url.trim().is_empty())
            .map(|url| RelayClient::new(client.clone(), url.clone()));

        info!(
            "Initialized translation providers: relay={}",
            config.relay_url.as_deref().unwrap_or("none")
        );

        Ok(Self {
            google: GoogleTranslator::new(client, config.google_endpoint.clone()),
            relay,
        })
    }
}

pub fn is_known_service(service: &str) -> bool {
    TRANSLATION_SERVICES.contains(&service)
}

#[async_trait]
impl Translator for ProviderTranslator {
    async fn translate(
        &self,
        text: &str,
        service: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError> {
        let service = service.to_lowercase();
        if !is_known_service(&service) {
            return Err(ProviderError::UnsupportedService(service));
        }

        match (&self.relay, service.as_str()) {
            (Some(relay), _) => {
                let request = RelayRequest {
                    text: text.to_string(),
                    translator: service.clone(),
                    from_language: source_lang.to_string(),
                    to_language: target_lang.to_string(),
                };
                relay.translate(&request).await
            }
            (None, "google") => self.google.translate(text, source_lang, target_lang).await,
            (None, _) => Err(ProviderError::NotConfigured(service)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_list_order() {
        assert_eq!(TRANSLATION_SERVICES[0], "google");
        assert_eq!(TRANSLATION_SERVICES[6], "deepl");
        assert!(is_known_service("youdao"));
        assert!(!is_known_service("Google"));
    }

    #[tokio::test]
    async fn test_unknown_service_rejected() {
        let translator = ProviderTranslator::new(&TranslationConfig::default()).unwrap();
        let err = translator.translate("hi", "klingon", "auto", "en").await.unwrap_err();
        assert!(matches!(err, ProviderError::UnsupportedService(_)));
    }

    #[tokio::test]
    async fn test_relay_only_service_without_relay() {
        let translator = ProviderTranslator::new(&TranslationConfig::default()).unwrap();
        let err = translator.translate("hi", "Baidu", "auto", "en").await.unwrap_err();
        match err {
            ProviderError::NotConfigured(name) => assert_eq!(name, "baidu"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

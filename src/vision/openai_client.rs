use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use super::interface::{PairDescriptionRequest, VisionDescriber};
use crate::config::VisionConfig;
use crate::errors::ProviderError;

/// OpenAI compatible chat-completions client for image pairs.
///
/// The HTTP client never consults proxy environment variables, so requests
/// always go straight to the caller's base URL.
pub struct OpenAiVisionClient {
    client: Client,
    max_tokens: u32,
}

impl OpenAiVisionClient {
    pub fn new(config: &VisionConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        info!(
            "Initialized OpenAiVisionClient: max_tokens={}, timeout={}s",
            config.max_tokens, config.timeout_secs
        );

        Ok(Self {
            client,
            max_tokens: config.max_tokens,
        })
    }

    pub fn build_body(&self, request: &PairDescriptionRequest) -> Value {
        json!({
            "model": request.credentials.model,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                {
                    "role": "user",
                    "content": [
                        { "type": "image_url", "image_url": { "url": request.reference.data_uri() } },
                        { "type": "image_url", "image_url": { "url": request.target.data_uri() } }
                    ]
                }
            ],
            "max_tokens": self.max_tokens
        })
    }
}

pub fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Pull `choices[0].message.content` out of a completion
pub fn extract_content(json: &Value) -> Result<String, ProviderError> {
    let content = json
        .pointer("/choices/0/message/content")
        .and_then(|c| c.as_str())
        .map(str::trim)
        .unwrap_or("");

    if content.is_empty() {
        return Err(ProviderError::InvalidResponse(
            "completion contained no message content".to_string(),
        ));
    }
    Ok(content.to_string())
}

#[async_trait]
impl VisionDescriber for OpenAiVisionClient {
    async fn describe_pair(&self, request: &PairDescriptionRequest) -> Result<String, ProviderError> {
        let url = completions_url(&request.credentials.base_url);
        debug!(
            "Describing pair {} / {} via {} ({})",
            request.reference.name, request.target.name, url, request.credentials.model
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&request.credentials.api_key)
            .json(&self.build_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        extract_content(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ImageFormat;
    use crate::vision::interface::{EncodedImage, VisionCredentials};

    fn sample_request() -> PairDescriptionRequest {
        PairDescriptionRequest {
            credentials: VisionCredentials {
                api_key: "sk-test".to_string(),
                base_url: "https://api.example.com/v1/".to_string(),
                model: "gpt-4o".to_string(),
            },
            system_prompt: "Describe the difference.".to_string(),
            reference: EncodedImage {
                name: "cat_R.png".to_string(),
                format: ImageFormat::Png,
                base64: "UkVG".to_string(),
            },
            target: EncodedImage {
                name: "cat_T.jpg".to_string(),
                format: ImageFormat::Jpeg,
                base64: "VEFS".to_string(),
            },
        }
    }

    #[test]
    fn test_body_orders_reference_first() {
        let client = OpenAiVisionClient::new(&VisionConfig::default()).unwrap();
        let body = client.build_body(&sample_request());

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 300);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "Describe the difference.");

        let parts = body["messages"][1]["content"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["image_url"]["url"], "data:image/png;base64,UkVG");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/jpeg;base64,VEFS");
    }

    #[test]
    fn test_completions_url() {
        assert_eq!(
            completions_url("https://api.example.com/v1/"),
            "https://api.example.com/v1/chat/completions"
        );
        assert_eq!(
            completions_url("http://localhost:11434/v1"),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_extract_content() {
        let ok = json!({"choices": [{"message": {"role": "assistant", "content": "  The cup was removed. "}}]});
        assert_eq!(extract_content(&ok).unwrap(), "The cup was removed.");

        let empty = json!({"choices": []});
        assert!(matches!(extract_content(&empty), Err(ProviderError::InvalidResponse(_))));
    }
}

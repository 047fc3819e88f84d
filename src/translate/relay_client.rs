use serde::{Deserialize, Serialize};
use reqwest::Client;

use crate::errors::ProviderError;

/// Client for a translation relay service.
///
/// The relay wraps a multi-provider translation library and exposes one
/// `POST /translate` endpoint; every named service is reachable through it.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RelayRequest {
    pub text: String,
    pub translator: String,
    pub from_language: String,
    pub to_language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RelayResponse {
    #[serde(default)]
    pub translated_text: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl RelayClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn translate(&self, request: &RelayRequest) -> Result<String, ProviderError> {
        let url = format!("{}/translate", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result: RelayResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        into_text(result)
    }
}

fn into_text(result: RelayResponse) -> Result<String, ProviderError> {
    if result.success {
        Ok(result.translated_text)
    } else {
        Err(ProviderError::InvalidResponse(
            result.error.unwrap_or_else(|| "Unknown error".to_string()),
        ))
    }
}

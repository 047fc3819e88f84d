use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::imaging::ImageFormat;

/// Per-request credentials for a vision provider. Supplied by the caller.
#[derive(Debug, Clone)]
pub struct VisionCredentials {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

/// An image ready to be sent inline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedImage {
    pub name: String,
    pub format: ImageFormat,
    /// Complete base64 payload
    #[serde(rename = "preview")]
    pub base64: String,
}

impl EncodedImage {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), self.base64)
    }
}

#[derive(Debug, Clone)]
pub struct PairDescriptionRequest {
    pub credentials: VisionCredentials,
    pub system_prompt: String,
    pub reference: EncodedImage,
    pub target: EncodedImage,
}

/// A vision-language model that describes a reference/target image pair
#[async_trait]
pub trait VisionDescriber: Send + Sync {
    /// Describe the pair in one call; the reference image is sent first
    async fn describe_pair(&self, request: &PairDescriptionRequest) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_uses_detected_mime() {
        let image = EncodedImage {
            name: "a_T.jpg".to_string(),
            format: ImageFormat::Jpeg,
            base64: "/9j/4AAQ".to_string(),
        };
        assert_eq!(image.data_uri(), "data:image/jpeg;base64,/9j/4AAQ");
    }

    #[test]
    fn test_wire_shape() {
        let image = EncodedImage {
            name: "a_R.png".to_string(),
            format: ImageFormat::Png,
            base64: "iVBORw0K".to_string(),
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["name"], "a_R.png");
        assert_eq!(json["format"], "png");
        assert_eq!(json["preview"], "iVBORw0K");
    }
}

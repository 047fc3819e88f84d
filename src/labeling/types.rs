use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::vision::EncodedImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// `_R` suffix
    Reference,
    /// `_T` suffix
    Target,
}

impl Role {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "R" => Some(Role::Reference),
            "T" => Some(Role::Target),
            _ => None,
        }
    }
}

/// A complete reference/target pair sharing one base name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePairGroup {
    pub base_name: String,
    pub reference: PathBuf,
    pub target: PathBuf,
}

/// Result of partitioning uploaded files
#[derive(Debug, Default)]
pub struct Grouping {
    pub pairs: Vec<ImagePairGroup>,
    /// Base names that had only one of the two roles
    pub incomplete: Vec<String>,
}

/// Outcome for one pair, serialized as the front-end expects it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelResult {
    Success {
        base_name: String,
        description: String,
        r_image: EncodedImage,
        t_image: EncodedImage,
    },
    Failure {
        base_name: String,
        error: String,
    },
}

impl LabelResult {
    pub fn base_name(&self) -> &str {
        match self {
            LabelResult::Success { base_name, .. } | LabelResult::Failure { base_name, .. } => base_name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LabelResult::Success { .. })
    }
}

/// Body of a successful `POST /api/kontext/label`
#[derive(Debug, Serialize, Deserialize)]
pub struct LabelResponse {
    pub success: bool,
    pub results: Vec<LabelResult>,
    #[serde(default)]
    pub incomplete: Vec<String>,
    /// Base64 zip of the description files, only when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ImageFormat;

    #[test]
    fn test_role_tokens() {
        assert_eq!(Role::from_token("R"), Some(Role::Reference));
        assert_eq!(Role::from_token("T"), Some(Role::Target));
        assert_eq!(Role::from_token("r"), None);
        assert_eq!(Role::from_token("RT"), None);
    }

    #[test]
    fn test_failure_serialization() {
        let result = LabelResult::Failure {
            base_name: "a".to_string(),
            error: "provider returned 401: bad key".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"base_name": "a", "error": "provider returned 401: bad key"}));
    }

    #[test]
    fn test_success_serialization() {
        let image = |name: &str| EncodedImage {
            name: name.to_string(),
            format: ImageFormat::Png,
            base64: "AAAA".to_string(),
        };
        let result = LabelResult::Success {
            base_name: "b".to_string(),
            description: "A lamp was removed.".to_string(),
            r_image: image("b_R.png"),
            t_image: image("b_T.png"),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["base_name"], "b");
        assert_eq!(json["r_image"]["name"], "b_R.png");
        assert_eq!(json["t_image"]["preview"], "AAAA");
        assert!(json.get("error").is_none());

        let back: LabelResult = serde_json::from_value(json).unwrap();
        assert!(back.is_success());
    }
}

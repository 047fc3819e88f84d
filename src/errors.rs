// Error types shared by the translation and labeling paths.
//
// Provider errors stay typed until they reach the HTTP surface, where
// ApiError decides the status code and the `{"error": ...}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures talking to an external translation or vision provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("unsupported translation service: {0}")]
    UnsupportedService(String),

    #[error("translation service '{0}' is not configured (set translation.relay_url)")]
    NotConfigured(String),
}

/// Failures of the translation gateway
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("source and target language must differ")]
    SameLanguage,

    #[error("{0}")]
    Provider(String),
}

/// Errors returned by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Provider(String),

    #[error("internal file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Provider(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message exposed to the caller. I/O details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            ApiError::Io(_) => "internal file error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<TranslateError> for ApiError {
    fn from(err: TranslateError) -> Self {
        match err {
            TranslateError::SameLanguage => ApiError::Validation(err.to_string()),
            TranslateError::Provider(msg) => ApiError::Provider(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ApiError::Io(ref e) = self {
            error!("I/O failure while handling request: {}", e);
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::validation("no files uploaded").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Provider("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert_eq!(ApiError::from(io).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_translate_error_mapping() {
        let api: ApiError = TranslateError::SameLanguage.into();
        assert!(matches!(api, ApiError::Validation(_)));
        assert_eq!(api.to_string(), "source and target language must differ");

        let api: ApiError = TranslateError::Provider("timeout".into()).into();
        assert_eq!(api.to_string(), "timeout");
    }

    #[test]
    fn test_io_message_is_generic() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "/secret/path");
        assert_eq!(ApiError::from(io).public_message(), "internal file error");
    }
}

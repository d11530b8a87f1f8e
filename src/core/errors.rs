//! Custom error types for translation operations

use thiserror::Error;

use crate::core::endpoint::Variant;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Translator could not be constructed (bad base URL, bad settings)
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// A translate option rejected its value
    #[error("error setting translate option: {message}")]
    OptionError {
        message: String,
    },

    /// Input text was neither a string nor a list of strings
    #[error("unsupported text type")]
    UnsupportedTextType,

    /// Structured call does not match the response variant of the translator
    #[error("invalid response type: translator decodes {actual} results, {expected} requested")]
    VersionMismatch {
        expected: Variant,
        actual: Variant,
    },

    /// Transport failed before a response was received
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
    },

    /// API answered with a non-200 status
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
    },

    /// Request body could not be serialized
    #[error("error encoding request data: {0}")]
    EncodeError(#[source] serde_json::Error),

    /// Response body did not match the expected shape
    #[error("error decoding response: {0}")]
    DecodeError(#[source] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl TranslationError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            TranslationError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error belongs to the retriable status classes (429, 5xx)
    pub fn is_retriable(&self) -> bool {
        self.status().is_some_and(is_retriable_status)
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        TranslationError::ConfigError {
            message: message.into(),
        }
    }

    pub(crate) fn option(message: impl Into<String>) -> Self {
        TranslationError::OptionError {
            message: message.into(),
        }
    }
}

/// 429 Too Many Requests and every 5xx status
pub fn is_retriable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retriable_status_classes() {
        assert!(is_retriable_status(429));
        assert!(is_retriable_status(500));
        assert!(is_retriable_status(503));
        assert!(is_retriable_status(599));
        assert!(!is_retriable_status(400));
        assert!(!is_retriable_status(403));
        assert!(!is_retriable_status(301));
        assert!(!is_retriable_status(200));
    }

    #[test]
    fn test_api_error_classification() {
        let err = TranslationError::ApiError {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(err.status(), Some(502));
        assert!(err.is_retriable());

        let err = TranslationError::ApiError {
            status: 456,
            message: "Quota exceeded".to_string(),
        };
        assert!(!err.is_retriable());
        assert!(!TranslationError::UnsupportedTextType.is_retriable());
    }

    #[test]
    fn test_option_error_names_stage() {
        let err = TranslationError::option("invalid formality: \"loud\"");
        assert_eq!(
            err.to_string(),
            "error setting translate option: invalid formality: \"loud\""
        );
    }
}

//! Error types for Scenegen
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// All error types that can occur in Scenegen
#[derive(Debug, Error)]
pub enum ScenegenError {
    /// Prompt template file missing from the templates directory
    #[error("Template not found: {0}")]
    TemplateNotFound(PathBuf),

    /// API credential absent from the environment
    #[error("Missing API key: {env_var} not set")]
    MissingApiKey { env_var: String },

    /// Non-success HTTP status from the generation service
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// 429 from the generation service
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Transport-level failure talking to the service
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Service replied without any usable text
    #[error("Empty response from model")]
    EmptyResponse,

    /// Service reply did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid state or operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Scenegen operations
pub type Result<T> = std::result::Result<T, ScenegenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_not_found_error() {
        let err = ScenegenError::TemplateNotFound(PathBuf::from("prompts/system.md"));
        assert_eq!(err.to_string(), "Template not found: prompts/system.md");
    }

    #[test]
    fn test_missing_api_key_error() {
        let err = ScenegenError::MissingApiKey {
            env_var: "GEMINI_API_KEY".to_string(),
        };
        assert_eq!(err.to_string(), "Missing API key: GEMINI_API_KEY not set");
    }

    #[test]
    fn test_api_error() {
        let err = ScenegenError::Api {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "API error 503: overloaded");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ScenegenError::RateLimited { retry_after_secs: 30 };
        assert_eq!(err.to_string(), "Rate limited, retry after 30s");
    }

    #[test]
    fn test_empty_response_error() {
        let err = ScenegenError::EmptyResponse;
        assert_eq!(err.to_string(), "Empty response from model");
    }

    #[test]
    fn test_invalid_response_error() {
        let err = ScenegenError::InvalidResponse("no candidates array".to_string());
        assert_eq!(err.to_string(), "Invalid response: no candidates array");
    }

    #[test]
    fn test_invalid_state_error() {
        let err = ScenegenError::InvalidState("no filter template configured".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid state: no filter template configured"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ScenegenError = io_err.into();
        assert!(matches!(err, ScenegenError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: ScenegenError = json_err.into();
        assert!(matches!(err, ScenegenError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(ScenegenError::EmptyResponse)
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}

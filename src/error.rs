//! Error types for the ScanLite CLI

use thiserror::Error;

/// Result type alias for ScanLite operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Scan not found: {0}")]
    ScanNotFound(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Scan submission errors.
///
/// Raised at the submission boundary only; a rejected submission never
/// reaches the scan store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid URL: {0}")]
    InvalidUrl(String),

    #[error("Username and password are required for form-based authentication.")]
    MissingFormCredentials,

    #[error("A token is required for header-based authentication.")]
    MissingToken,

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Invalid date range: {from} is after {to}")]
    InvertedDateRange { from: String, to: String },
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_invalid_url() {
        let err = ValidationError::InvalidUrl("not a url".to_string());
        let msg = err.to_string();
        assert!(msg.contains("valid URL"));
        assert!(msg.contains("not a url"));
    }

    #[test]
    fn test_validation_error_form_credentials() {
        let err = ValidationError::MissingFormCredentials;
        assert!(err.to_string().contains("Username and password"));
    }

    #[test]
    fn test_validation_error_token() {
        let err = ValidationError::MissingToken;
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn test_validation_error_date_range() {
        let err = ValidationError::InvertedDateRange {
            from: "2024-05-02".to_string(),
            to: "2024-05-01".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2024-05-02"));
        assert!(msg.contains("2024-05-01"));
    }

    #[test]
    fn test_config_error_parse() {
        let err = ConfigError::ParseError("unexpected key".to_string());
        assert!(err.to_string().contains("unexpected key"));
    }

    #[test]
    fn test_config_error_invalid() {
        let err = ConfigError::Invalid("bad format".to_string());
        assert!(err.to_string().contains("bad format"));
    }

    #[test]
    fn test_config_error_save() {
        let err = ConfigError::SaveError("disk full".to_string());
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_scan_not_found() {
        let err = Error::ScanNotFound("scan-abc123".to_string());
        assert!(err.to_string().contains("scan-abc123"));
    }

    #[test]
    fn test_error_from_validation_error() {
        let err: Error = ValidationError::MissingToken.into();

        match err {
            Error::Validation(ValidationError::MissingToken) => (),
            _ => panic!("Expected Error::Validation(ValidationError::MissingToken)"),
        }
    }

    #[test]
    fn test_error_from_config_error() {
        let err: Error = ConfigError::Invalid("x".to_string()).into();

        match err {
            Error::Config(ConfigError::Invalid(_)) => (),
            _ => panic!("Expected Error::Config(ConfigError::Invalid)"),
        }
    }

    #[test]
    fn test_config_error_from_yaml_error() {
        let yaml_str = "invalid: [yaml: content";
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let config_err: ConfigError = yaml_err.into();

        match config_err {
            ConfigError::ParseError(_) => (),
            _ => panic!("Expected ConfigError::ParseError"),
        }
    }
}

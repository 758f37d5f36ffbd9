//! Scan submission validation
//!
//! Everything a submission must satisfy is checked here, before the scan
//! store ever sees it. The store itself trusts its callers.

use url::Url;

use super::models::{AuthMethod, ScanMode};
use crate::error::ValidationError;

/// Raw input from the new-scan form or the `scan` command.
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    pub target_url: String,
    pub scan_mode: ScanMode,
    pub auth_method: AuthMethod,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
}

/// A submission that passed validation. Credentials are not carried forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDetails {
    pub target_url: String,
    pub scan_mode: ScanMode,
    pub auth_method: AuthMethod,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

impl ScanRequest {
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            ..Self::default()
        }
    }

    pub fn validate(self) -> Result<ScanDetails, ValidationError> {
        if Url::parse(&self.target_url).is_err() {
            return Err(ValidationError::InvalidUrl(self.target_url));
        }

        if self.scan_mode == ScanMode::Authenticated {
            match self.auth_method {
                AuthMethod::Form if is_blank(&self.username) || is_blank(&self.password) => {
                    return Err(ValidationError::MissingFormCredentials);
                }
                AuthMethod::Header if is_blank(&self.token) => {
                    return Err(ValidationError::MissingToken);
                }
                _ => {}
            }
        }

        Ok(ScanDetails {
            target_url: self.target_url,
            scan_mode: self.scan_mode,
            auth_method: self.auth_method,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticated(method: AuthMethod) -> ScanRequest {
        ScanRequest {
            scan_mode: ScanMode::Authenticated,
            auth_method: method,
            ..ScanRequest::new("https://app.example.com")
        }
    }

    #[test]
    fn test_valid_passive_scan() {
        let details = ScanRequest::new("https://example.com").validate().unwrap();
        assert_eq!(details.target_url, "https://example.com");
        assert_eq!(details.scan_mode, ScanMode::Passive);
        assert_eq!(details.auth_method, AuthMethod::None);
    }

    #[test]
    fn test_rejects_malformed_url() {
        for bad in ["", "example.com", "not a url", "http://"] {
            let err = ScanRequest::new(bad).validate().unwrap_err();
            assert_eq!(err, ValidationError::InvalidUrl(bad.to_string()));
        }
    }

    #[test]
    fn test_form_auth_requires_both_credentials() {
        let mut req = authenticated(AuthMethod::Form);
        req.username = Some("analyst@example.com".to_string());
        assert_eq!(
            req.clone().validate().unwrap_err(),
            ValidationError::MissingFormCredentials
        );

        req.password = Some(String::new());
        assert_eq!(
            req.clone().validate().unwrap_err(),
            ValidationError::MissingFormCredentials
        );

        req.password = Some("hunter2".to_string());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_header_auth_requires_token() {
        let mut req = authenticated(AuthMethod::Header);
        assert_eq!(
            req.clone().validate().unwrap_err(),
            ValidationError::MissingToken
        );

        req.token = Some("Bearer abc".to_string());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_auth_method_ignored_outside_authenticated_mode() {
        let req = ScanRequest {
            scan_mode: ScanMode::Active,
            auth_method: AuthMethod::Header,
            ..ScanRequest::new("https://example.com")
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_authenticated_without_auth_method() {
        assert!(authenticated(AuthMethod::None).validate().is_ok());
    }
}

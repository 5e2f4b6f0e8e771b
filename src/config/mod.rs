#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

use crate::core::metadata::{self, API_KEY_SETTING, HOSTNAME_SETTING};
use crate::utils::error::{DellError, Result};
use crate::utils::validation::{self, Validate};
use std::collections::HashMap;
use std::fmt;

/// Service-level settings read from the host's key-value store.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub hostname: String,
    pub api_key: String,
    pub timeout_seconds: Option<u64>,
}

impl ServiceSettings {
    pub fn new(hostname: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            api_key: api_key.into(),
            timeout_seconds: None,
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// 從主機平台的 settings 表建立，並套用 `set_config()` 宣告的規則
    pub fn from_settings(settings: &HashMap<String, String>) -> Result<Self> {
        for field in metadata::set_config() {
            field.check(settings.get(&field.key).map(String::as_str))?;
        }

        let hostname = validation::validate_required_field(
            HOSTNAME_SETTING,
            &settings.get(HOSTNAME_SETTING).cloned(),
        )?
        .clone();
        let api_key = validation::validate_required_field(
            API_KEY_SETTING,
            &settings.get(API_KEY_SETTING).cloned(),
        )?
        .clone();

        let settings = Self::new(hostname.trim(), api_key);
        settings.validate()?;
        Ok(settings)
    }

    /// Base URL of the provisioning API. A bare hostname is served over https.
    pub fn base_url(&self) -> String {
        let host = self.hostname.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }
}

impl fmt::Debug for ServiceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceSettings")
            .field("hostname", &self.hostname)
            .field("api_key", &"********")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl Validate for ServiceSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_hostname(HOSTNAME_SETTING, &self.hostname)?;
        validation::validate_non_empty_string(API_KEY_SETTING, &self.api_key).map_err(|_| {
            DellError::MissingConfigError {
                field: API_KEY_SETTING.to_string(),
            }
        })?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_range("http.timeout_seconds", timeout, 1, 600)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_settings() {
        let settings = ServiceSettings::from_settings(&host_settings(&[
            ("dellserver::hostname", "dell.example.com"),
            ("dellserver::api_key", "secret"),
        ]))
        .unwrap();

        assert_eq!(settings.hostname, "dell.example.com");
        assert_eq!(settings.api_key, "secret");
        assert_eq!(settings.base_url(), "https://dell.example.com");
    }

    #[test]
    fn test_from_settings_requires_api_key() {
        let err = ServiceSettings::from_settings(&host_settings(&[(
            "dellserver::hostname",
            "dell.example.com",
        )]))
        .unwrap_err();

        match err {
            DellError::MissingConfigError { field } => assert_eq!(field, "dellserver::api_key"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_settings_rejects_blank_hostname() {
        let result = ServiceSettings::from_settings(&host_settings(&[
            ("dellserver::hostname", "  "),
            ("dellserver::api_key", "secret"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_base_url_keeps_explicit_scheme() {
        let settings = ServiceSettings::new("http://127.0.0.1:8080/", "k");
        assert_eq!(settings.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = ServiceSettings::new("dell.example.com", "top-secret");
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("top-secret"));
    }

    #[test]
    fn test_timeout_is_range_checked() {
        let settings = ServiceSettings::new("dell.example.com", "k").with_timeout(0);
        assert!(settings.validate().is_err());
        let settings = ServiceSettings::new("dell.example.com", "k").with_timeout(30);
        assert!(settings.validate().is_ok());
    }
}

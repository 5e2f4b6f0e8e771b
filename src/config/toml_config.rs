use crate::config::ServiceSettings;
use crate::utils::error::{DellError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: ServiceSection,
    pub http: Option<HttpSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSection {
    pub hostname: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSection {
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DellError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DellError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DELL_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DellError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.http.as_ref().and_then(|h| h.timeout_seconds)
    }

    /// 轉成執行期使用的 `ServiceSettings`，未替換的 `${VAR}` 視為缺少設定
    pub fn to_settings(&self) -> Result<ServiceSettings> {
        if let Some(var) = unresolved_var(&self.service.api_key) {
            return Err(DellError::MissingConfigError {
                field: format!("service.api_key (environment variable {} is not set)", var),
            });
        }

        let mut settings = ServiceSettings::new(self.service.hostname.trim(), &self.service.api_key);
        settings.timeout_seconds = self.timeout_seconds();
        settings.validate()?;
        Ok(settings)
    }
}

fn unresolved_var(value: &str) -> Option<&str> {
    let rest = value.trim().strip_prefix("${")?;
    rest.strip_suffix('}')
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_settings().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[service]
hostname = "dell.example.com"
api_key = "secret"

[http]
timeout_seconds = 15
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let settings = config.to_settings().unwrap();

        assert_eq!(settings.hostname, "dell.example.com");
        assert_eq!(settings.api_key, "secret");
        assert_eq!(settings.timeout_seconds, Some(15));
    }

    #[test]
    fn test_http_section_is_optional() {
        let toml_content = r#"
[service]
hostname = "dell.example.com"
api_key = "secret"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.timeout_seconds(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DELLSERVER_TEST_API_KEY", "from-env");

        let toml_content = r#"
[service]
hostname = "dell.example.com"
api_key = "${DELLSERVER_TEST_API_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.service.api_key, "from-env");

        std::env::remove_var("DELLSERVER_TEST_API_KEY");
    }

    #[test]
    fn test_unresolved_env_var_is_missing_config() {
        let toml_content = r#"
[service]
hostname = "dell.example.com"
api_key = "${DELLSERVER_SURELY_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.to_settings(),
            Err(DellError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[service]
hostname = "ftp://dell.example.com"
api_key = "secret"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[service]
hostname = "file.example.com"
api_key = "secret"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.service.hostname, "file.example.com");
    }

    #[test]
    fn test_malformed_toml() {
        let result = TomlConfig::from_toml_str("[service\nhostname = ");
        assert!(matches!(
            result,
            Err(DellError::ConfigValidationError { .. })
        ));
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DellError {
    #[error("Transport error: {message}")]
    TransportError { message: String },

    #[error("Remote API returned status {status}: {body}")]
    RemoteError { status: u16, body: serde_json::Value },

    #[error("Could not find a suitable node to deploy your server on")]
    NoAvailableNode,

    #[error("Order is missing required field: {field}")]
    MissingOrderField { field: String },

    #[error("Unexpected API response: {message}")]
    UnexpectedResponse { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl From<reqwest::Error> for DellError {
    fn from(err: reqwest::Error) -> Self {
        DellError::TransportError {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Remote,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DellError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DellError::TransportError { .. } => ErrorCategory::Network,
            DellError::RemoteError { .. }
            | DellError::NoAvailableNode
            | DellError::UnexpectedResponse { .. } => ErrorCategory::Remote,
            DellError::MissingOrderField { .. } | DellError::SerializationError(_) => {
                ErrorCategory::Data
            }
            DellError::ConfigError { .. }
            | DellError::ConfigValidationError { .. }
            | DellError::InvalidConfigValueError { .. }
            | DellError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DellError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DellError::NoAvailableNode => ErrorSeverity::Low,
            DellError::TransportError { .. } => ErrorSeverity::Medium,
            DellError::RemoteError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            DellError::RemoteError { .. }
            | DellError::UnexpectedResponse { .. }
            | DellError::MissingOrderField { .. }
            | DellError::SerializationError(_) => ErrorSeverity::High,
            DellError::ConfigError { .. }
            | DellError::ConfigValidationError { .. }
            | DellError::InvalidConfigValueError { .. }
            | DellError::MissingConfigError { .. }
            | DellError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息，不含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            DellError::TransportError { .. } => {
                "Could not reach the Dell provisioning API".to_string()
            }
            DellError::RemoteError { status, .. } => {
                format!("The Dell provisioning API rejected the request (HTTP {})", status)
            }
            DellError::NoAvailableNode => self.to_string(),
            DellError::MissingOrderField { field } => {
                format!("The order is missing '{}'", field)
            }
            DellError::UnexpectedResponse { .. } => {
                "The Dell provisioning API returned an unexpected response".to_string()
            }
            DellError::IoError(e) => format!("File operation failed: {}", e),
            DellError::SerializationError(e) => format!("Invalid JSON: {}", e),
            _ => format!("Configuration problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the configured hostname and network connectivity",
            ErrorCategory::Remote => match self {
                DellError::NoAvailableNode => "Try again later or pick another location",
                _ => "Inspect the API response and the order data, then retry",
            },
            ErrorCategory::Configuration => {
                "Set dellserver::hostname and dellserver::api_key to valid values"
            }
            ErrorCategory::Data => "Make sure the order, package and checkout values are complete",
            ErrorCategory::System => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, DellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_severity_depends_on_status() {
        let server_side = DellError::RemoteError {
            status: 503,
            body: serde_json::Value::Null,
        };
        let client_side = DellError::RemoteError {
            status: 422,
            body: serde_json::Value::Null,
        };

        assert_eq!(server_side.severity(), ErrorSeverity::Medium);
        assert_eq!(client_side.severity(), ErrorSeverity::High);
        assert_eq!(client_side.category(), ErrorCategory::Remote);
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = DellError::MissingConfigError {
            field: "dellserver::api_key".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("dellserver::api_key"));
    }

    #[test]
    fn test_no_available_node_message() {
        let err = DellError::NoAvailableNode;
        assert_eq!(
            err.user_friendly_message(),
            "Could not find a suitable node to deploy your server on"
        );
        assert_eq!(err.recovery_suggestion(), "Try again later or pick another location");
    }
}

use crate::utils::error::{DellError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

/// One outbound call against the provisioning API. `path` is relative to the
/// configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Success yields the payload; any other status becomes a `RemoteError`.
    pub fn into_payload(self) -> Result<serde_json::Value> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(DellError::RemoteError {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// HTTP client injected into the lifecycle handler. `Err` is reserved for
/// transport failures; a non-success status is still `Ok`.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_payload_maps_failure_status() {
        let ok = ApiResponse {
            status: 201,
            body: json!({"server_id": "x"}),
        };
        assert_eq!(ok.into_payload().unwrap(), json!({"server_id": "x"}));

        let failed = ApiResponse {
            status: 500,
            body: json!({"error": "boom"}),
        };
        match failed.into_payload() {
            Err(DellError::RemoteError { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, json!({"error": "boom"}));
            }
            other => panic!("expected remote error, got {:?}", other),
        }
    }

    #[test]
    fn test_redirect_status_is_not_success() {
        let response = ApiResponse {
            status: 302,
            body: serde_json::Value::Null,
        };
        assert!(!response.is_success());
    }
}

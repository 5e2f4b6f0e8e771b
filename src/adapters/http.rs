use crate::config::ServiceSettings;
use crate::domain::ports::{ApiClient, ApiRequest, ApiResponse, HttpMethod};
use crate::utils::error::{DellError, Result};
use crate::utils::validation::Validate;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// `ApiClient` backed by reqwest. Every request carries the configured API
/// key as a bearer token.
#[derive(Clone)]
pub struct ReqwestApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ReqwestApiClient {
    pub fn new(settings: &ServiceSettings) -> Result<Self> {
        settings.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder.build().map_err(|e| DellError::ConfigError {
            message: format!("failed to build HTTP client: {}", e),
        })?;

        Ok(Self {
            client,
            base_url: settings.base_url(),
            api_key: settings.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| DellError::InvalidConfigValueError {
            field: "request_url".to_string(),
            value: raw.clone(),
            reason: format!("Invalid URL format: {}", e),
        })
    }
}

#[async_trait]
impl ApiClient for ReqwestApiClient {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path)?;

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        builder = builder
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        // 非 JSON 的回應保留為字串，方便錯誤訊息顯示
        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        tracing::debug!("{} {} -> {}", request.path, status, body);
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_send_attaches_api_key() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/servers/test-connection")
                .header("authorization", "Bearer test-key")
                .header("accept", "application/json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"status": "ok"}));
        });

        let client =
            ReqwestApiClient::new(&ServiceSettings::new(server.base_url(), "test-key")).unwrap();
        let response = client
            .send(ApiRequest::get("/api/servers/test-connection"))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_non_json_body_is_kept_as_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/servers/suspend");
            then.status(502).body("Bad Gateway");
        });

        let client = ReqwestApiClient::new(&ServiceSettings::new(server.base_url(), "k")).unwrap();
        let response = client
            .send(ApiRequest::post(
                "/api/servers/suspend",
                Some(json!({"server_id": "a"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status, 502);
        assert_eq!(response.body, json!("Bad Gateway"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // 綁定後立即釋放的埠，沒有服務在聽
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let settings = ServiceSettings::new(format!("http://127.0.0.1:{}", port), "k");
        let client = ReqwestApiClient::new(&settings).unwrap();

        let err = client
            .send(ApiRequest::get("/api/servers/test-connection"))
            .await
            .unwrap_err();
        assert!(matches!(err, DellError::TransportError { .. }));
    }

    #[test]
    fn test_new_rejects_invalid_settings() {
        assert!(ReqwestApiClient::new(&ServiceSettings::new("", "k")).is_err());
        assert!(ReqwestApiClient::new(&ServiceSettings::new("dell.example.com", "")).is_err());
    }

    #[test]
    fn test_base_url_defaults_to_https() {
        let client =
            ReqwestApiClient::new(&ServiceSettings::new("dell.example.com", "k")).unwrap();
        assert_eq!(client.base_url(), "https://dell.example.com");
    }
}

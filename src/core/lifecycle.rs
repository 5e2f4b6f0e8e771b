use crate::core::metadata::{DISK_SPACE_FIELD, LOCATION_FIELD, MEMORY_FIELD};
use crate::domain::model::{Notice, Order, Package};
use crate::domain::ports::{ApiClient, ApiRequest};
use crate::utils::error::{DellError, Result};
use serde_json::{json, Value};
use url::Url;

pub const CREATE_PATH: &str = "/api/servers/create";
pub const SUSPEND_PATH: &str = "/api/servers/suspend";
pub const UNSUSPEND_PATH: &str = "/api/servers/unsuspend";
pub const TERMINATE_PATH: &str = "/api/servers/delete";
pub const LOGIN_TOKEN_PATH: &str = "/api/v1/users/1/login-token";
pub const TEST_CONNECTION_PATH: &str = "/api/servers/test-connection";
pub const AVAILABLE_ALLOCATIONS_PATH: &str = "/nodes/allocations/available";

const SERVER_ID_FIELD: &str = "server_id";

/// `/api/servers/{server_id}/update` with the id escaped as one path segment.
pub fn upgrade_path(server_id: &str) -> Result<String> {
    if server_id == "." || server_id == ".." {
        return Err(DellError::InvalidConfigValueError {
            field: SERVER_ID_FIELD.to_string(),
            value: server_id.to_string(),
            reason: "Server id cannot be a relative path segment".to_string(),
        });
    }

    let mut url = Url::parse("http://localhost/api/servers").map_err(|e| DellError::ConfigError {
        message: format!("invalid upgrade path base: {}", e),
    })?;
    url.path_segments_mut()
        .map_err(|_| DellError::ConfigError {
            message: "upgrade path base cannot hold segments".to_string(),
        })?
        .push(server_id)
        .push("update");
    Ok(url.path().to_string())
}

/// Translates host lifecycle events into provisioning API calls.
///
/// The handler is stateless; every method issues at most one request through
/// the injected client. Methods that receive `&mut Order` record the outcome in
/// `Order::last_error` and only write response payloads on success.
pub struct LifecycleHandler<C: ApiClient> {
    client: C,
}

impl<C: ApiClient> LifecycleHandler<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    async fn call(&self, request: ApiRequest) -> Result<Value> {
        tracing::debug!("📡 {:?} {}", request.method, request.path);
        let response = self.client.send(request).await?;
        tracing::debug!("📡 API response status: {}", response.status);
        response.into_payload()
    }

    pub async fn create(&self, order: &mut Order) -> Result<Value> {
        tracing::info!("🚀 Creating server for order {}", order.id);

        let result = self.request_create(order).await;
        let payload = settle(order, "create", result)?;
        order.merge_data(payload.clone());
        Ok(payload)
    }

    pub async fn suspend(&self, order: &mut Order) -> Result<()> {
        self.server_action(order, "suspend", SUSPEND_PATH).await
    }

    pub async fn unsuspend(&self, order: &mut Order) -> Result<()> {
        self.server_action(order, "unsuspend", UNSUSPEND_PATH).await
    }

    pub async fn terminate(&self, order: &mut Order) -> Result<()> {
        self.server_action(order, "terminate", TERMINATE_PATH).await
    }

    async fn server_action(&self, order: &mut Order, action: &str, path: &str) -> Result<()> {
        tracing::info!("🔧 {} order {}", action, order.id);

        let result = self.request_server_action(order, path).await;
        settle(order, action, result).map(|_| ())
    }

    /// Pushes the new package's limits to the server stored on the order.
    pub async fn upgrade(
        &self,
        order: &mut Order,
        old_package: &Package,
        new_package: &Package,
    ) -> Result<Value> {
        tracing::info!(
            "⬆️ Upgrading order {} from '{}' to '{}'",
            order.id,
            old_package.name,
            new_package.name
        );

        let result = self.request_upgrade(order, new_package).await;
        settle(order, "upgrade", result)
    }

    async fn request_create(&self, order: &Order) -> Result<Value> {
        let body = create_payload(order)?;
        self.call(ApiRequest::post(CREATE_PATH, Some(body))).await
    }

    async fn request_server_action(&self, order: &Order, path: &str) -> Result<Value> {
        let server_id = stored_server_id(order)?;
        let body = json!({ SERVER_ID_FIELD: server_id });
        self.call(ApiRequest::post(path, Some(body))).await
    }

    async fn request_upgrade(&self, order: &Order, new_package: &Package) -> Result<Value> {
        let server_id = order.server_id().ok_or_else(|| DellError::MissingOrderField {
            field: SERVER_ID_FIELD.to_string(),
        })?;
        let path = upgrade_path(&server_id)?;
        let (memory, disk_space) = resource_limits(new_package)?;
        let body = json!({
            MEMORY_FIELD: memory,
            DISK_SPACE_FIELD: disk_space,
        });
        self.call(ApiRequest::post(path, Some(body))).await
    }

    /// Requests a one-time panel login URL.
    pub async fn login_to_panel(&self, order: &Order) -> Result<String> {
        tracing::info!("🔑 Requesting panel login for order {}", order.id);

        let payload = self.call(ApiRequest::post(LOGIN_TOKEN_PATH, None)).await?;
        payload
            .get("login_url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| DellError::UnexpectedResponse {
                message: "response does not contain a login_url".to_string(),
            })
    }

    pub async fn test_connection(&self) -> Result<()> {
        self.call(ApiRequest::get(TEST_CONNECTION_PATH)).await?;
        Ok(())
    }

    /// Runs the health check and phrases the outcome for the host UI.
    pub async fn connection_notice(&self) -> Notice {
        connection_notice_for(&self.test_connection().await)
    }

    /// Pre-checkout check that a node can take the new server.
    pub async fn event_checkout(&self) -> Result<()> {
        match self.call(ApiRequest::get(AVAILABLE_ALLOCATIONS_PATH)).await {
            Ok(_) => Ok(()),
            Err(DellError::RemoteError { status, .. }) => {
                tracing::warn!("No allocation available (status {})", status);
                Err(DellError::NoAvailableNode)
            }
            Err(e) => Err(e),
        }
    }

    pub fn event_load_package(&self, package: &Package) {
        tracing::debug!("Package {} ('{}') loaded", package.id, package.name);
    }
}

pub fn connection_notice_for(result: &Result<()>) -> Notice {
    match result {
        Ok(()) => {
            tracing::info!("✅ Connected to Dell API");
            Notice::Success("Successfully connected with Dell API".to_string())
        }
        Err(e) => {
            tracing::warn!("❌ Dell API connection test failed: {}", e);
            Notice::Error(format!("Failed to connect to Dell API. {}", e))
        }
    }
}

/// 將結果寫回訂單的錯誤狀態
fn settle<T>(order: &mut Order, action: &str, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            order.last_error = None;
            tracing::info!("✅ {} succeeded for order {}", action, order.id);
            Ok(value)
        }
        Err(e) => {
            tracing::error!(
                "❌ {} failed for order {}: {} (Category: {:?}, Severity: {:?})",
                action,
                order.id,
                e,
                e.category(),
                e.severity()
            );
            order.last_error = Some(e.to_string());
            Err(e)
        }
    }
}

fn required_value(value: Option<&Value>, field: &str) -> Result<Value> {
    match value {
        Some(Value::Null) | None => Err(DellError::MissingOrderField {
            field: field.to_string(),
        }),
        Some(Value::String(s)) if s.trim().is_empty() => Err(DellError::MissingOrderField {
            field: field.to_string(),
        }),
        Some(v) => Ok(v.clone()),
    }
}

fn resource_limits(package: &Package) -> Result<(Value, Value)> {
    Ok((
        required_value(package.data(MEMORY_FIELD), MEMORY_FIELD)?,
        required_value(package.data(DISK_SPACE_FIELD), DISK_SPACE_FIELD)?,
    ))
}

fn create_payload(order: &Order) -> Result<Value> {
    if order.user.username.trim().is_empty() {
        return Err(DellError::MissingOrderField {
            field: "username".to_string(),
        });
    }
    let (memory, disk_space) = resource_limits(&order.package)?;
    let location = required_value(order.option(LOCATION_FIELD), LOCATION_FIELD)?;

    Ok(json!({
        "username": order.user.username,
        MEMORY_FIELD: memory,
        DISK_SPACE_FIELD: disk_space,
        LOCATION_FIELD: location,
    }))
}

/// The raw stored identifier, sent back exactly as the API returned it.
fn stored_server_id(order: &Order) -> Result<Value> {
    match order.server_id() {
        Some(_) => Ok(order.data[SERVER_ID_FIELD].clone()),
        None => Err(DellError::MissingOrderField {
            field: SERVER_ID_FIELD.to_string(),
        }),
    }
}

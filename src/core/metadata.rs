//! Static descriptors the host platform uses to render settings forms,
//! package/checkout fields, permissions and order-page buttons.
//!
//! Every function here is pure: same input, same output, no I/O.

use crate::config::ServiceSettings;
use crate::core::routes;
use crate::domain::model::{Order, Package};
use crate::utils::error::{DellError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

pub const HOSTNAME_SETTING: &str = "dellserver::hostname";
pub const API_KEY_SETTING: &str = "dellserver::api_key";

pub const MEMORY_FIELD: &str = "memory";
pub const DISK_SPACE_FIELD: &str = "disk_space";
pub const LOCATION_FIELD: &str = "location";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMetadata {
    pub display_name: String,
    pub author: String,
    pub version: String,
    /// Host platform version constraints.
    pub platform_version: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Password,
    Number,
    Select,
}

/// Declarative validation tag, enforced by whoever renders the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    Required,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigField {
    pub key: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    pub rules: Vec<Rule>,
}

impl ConfigField {
    fn new(key: &str, name: &str, description: &str, field_type: FieldType) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            field_type,
            options: Vec::new(),
            default_value: None,
            rules: vec![Rule::Required],
        }
    }

    fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    fn with_options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = options
            .iter()
            .map(|(value, label)| SelectOption {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect();
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }

    /// Applies the declared rules and the field type to a submitted value.
    pub fn check(&self, value: Option<&str>) -> Result<()> {
        let value = match value.map(str::trim) {
            Some(v) if !v.is_empty() => v,
            _ if self.is_required() => {
                return Err(DellError::MissingConfigError {
                    field: self.key.clone(),
                })
            }
            _ => return Ok(()),
        };

        match self.field_type {
            FieldType::Number if value.parse::<f64>().is_err() => {
                Err(DellError::InvalidConfigValueError {
                    field: self.key.clone(),
                    value: value.to_string(),
                    reason: "Value must be a number".to_string(),
                })
            }
            FieldType::Select if !self.options.iter().any(|o| o.value == value) => {
                Err(DellError::InvalidConfigValueError {
                    field: self.key.clone(),
                    value: value.to_string(),
                    reason: format!(
                        "Value must be one of: {}",
                        self.options
                            .iter()
                            .map(|o| o.value.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                })
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceButton {
    pub name: String,
    pub color: String,
    pub href: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarButton {
    pub name: String,
    pub icon: String,
    pub href: String,
}

pub fn meta_data() -> ServiceMetadata {
    ServiceMetadata {
        display_name: "Dell Server".to_string(),
        author: "E".to_string(),
        version: "1.0.0".to_string(),
        platform_version: vec!["dev".to_string(), ">=1.8.0".to_string()],
    }
}

/// Service-level settings form.
pub fn set_config() -> Vec<ConfigField> {
    vec![
        ConfigField::new(
            HOSTNAME_SETTING,
            "Server Hostname",
            "Hostname of the Dell server",
            FieldType::Text,
        )
        .with_default(json!("dell.example.com")),
        ConfigField::new(
            API_KEY_SETTING,
            "API Key",
            "API key for the Dell server",
            FieldType::Password,
        ),
    ]
}

pub fn set_package_config(_package: &Package) -> Vec<ConfigField> {
    vec![
        // 32GB
        ConfigField::new(
            MEMORY_FIELD,
            "Memory in MB",
            "Allowed memory in MB",
            FieldType::Number,
        )
        .with_default(json!(32768)),
        // 1TB
        ConfigField::new(
            DISK_SPACE_FIELD,
            "Disk Space in GB",
            "Allowed disk space in GB",
            FieldType::Number,
        )
        .with_default(json!(1000)),
    ]
}

pub fn set_checkout_config(_package: &Package) -> Vec<ConfigField> {
    vec![ConfigField::new(
        LOCATION_FIELD,
        "Server Location",
        "Where do you want us to deploy your server?",
        FieldType::Select,
    )
    .with_options(&[("US", "United States"), ("CA", "Canada"), ("DE", "Germany")])
    .with_default(json!("US"))]
}

pub fn permissions() -> BTreeMap<String, Permission> {
    let mut permissions = BTreeMap::new();
    permissions.insert(
        "dellserver.server.start".to_string(),
        Permission {
            description: "Permission to start a Dell server from the dashboard".to_string(),
        },
    );
    permissions
}

pub fn set_service_buttons(_order: &Order, settings: &ServiceSettings) -> Vec<ServiceButton> {
    vec![ServiceButton {
        name: "Login to Dell Server".to_string(),
        color: "primary".to_string(),
        href: settings.base_url(),
        target: "_blank".to_string(),
    }]
}

pub fn set_service_sidebar_buttons(order: &Order) -> Vec<SidebarButton> {
    vec![SidebarButton {
        name: "Server Details".to_string(),
        icon: "<i class='bx bx-server' ></i>".to_string(),
        href: routes::details_route().url_for(order.id),
    }]
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 主機平台的使用者
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Product tier with operator-configured resource limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
}

impl Package {
    pub fn data(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }
}

/// A purchased instance of a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub package: Package,
    pub user: User,
    /// Buyer-selected checkout values, e.g. `location`.
    #[serde(default)]
    pub options: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl Order {
    pub fn data(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    pub fn option(&self, key: &str) -> Option<&serde_json::Value> {
        self.options.get(key)
    }

    /// Remote identifier stored after a successful create.
    pub fn server_id(&self) -> Option<String> {
        match self.data.get("server_id")? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// 合併遠端回應到 data；非物件回應存在 `response` 鍵下
    pub fn merge_data(&mut self, payload: serde_json::Value) {
        match payload {
            serde_json::Value::Object(map) => {
                for (key, value) in map {
                    self.data.insert(key, value);
                }
            }
            serde_json::Value::Null => {}
            other => {
                self.data.insert("response".to_string(), other);
            }
        }
    }
}

/// Presentation message handed back to the host instead of a redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Error(m) => m,
        }
    }
}

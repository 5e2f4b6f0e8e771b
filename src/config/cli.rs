use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "dellserver")]
#[command(about = "Drive Dell Server provisioning lifecycle events from the command line")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "dellserver.toml")]
    pub config: PathBuf,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print service metadata, settings schema, permissions and routes
    Metadata {
        /// Package JSON file; adds the package and checkout field schemas
        #[arg(long)]
        package: Option<PathBuf>,
    },
    /// Check that the provisioning API is reachable
    TestConnection,
    /// Check that a node can take a new server
    CheckAvailability,
    /// Provision a server for the order
    Create {
        #[arg(long)]
        order: PathBuf,
    },
    Suspend {
        #[arg(long)]
        order: PathBuf,
    },
    Unsuspend {
        #[arg(long)]
        order: PathBuf,
    },
    Terminate {
        #[arg(long)]
        order: PathBuf,
    },
    /// Move the order's server to a new package
    Upgrade {
        #[arg(long)]
        order: PathBuf,
        #[arg(long)]
        new_package: PathBuf,
    },
    /// Print a one-time panel login URL
    Login {
        #[arg(long)]
        order: PathBuf,
    },
}

impl Command {
    pub fn needs_settings(&self) -> bool {
        !matches!(self, Command::Metadata { .. })
    }
}

/// 讀取 JSON 檔案 (訂單、方案)
pub fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// 將更新後的訂單寫回檔案
pub fn save_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Order;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_parse_subcommand() {
        let cli = CliConfig::parse_from([
            "dellserver",
            "--config",
            "custom.toml",
            "suspend",
            "--order",
            "order.json",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert!(matches!(cli.command, Command::Suspend { .. }));
        assert!(cli.command.needs_settings());
    }

    #[test]
    fn test_metadata_needs_no_settings() {
        let cli = CliConfig::parse_from(["dellserver", "metadata"]);
        assert!(!cli.command.needs_settings());
    }

    #[test]
    fn test_order_json_round_trip_through_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orders").join("order.json");
        let order: Order = serde_json::from_value(json!({
            "id": 1,
            "package": {"id": 2, "name": "Basic", "data": {"memory": 1024}},
            "user": {"id": 3, "username": "bob"},
            "data": {"server_id": "abc123"}
        }))
        .unwrap();

        save_json(&path, &order).unwrap();
        let loaded: Order = load_json(&path).unwrap();
        assert_eq!(loaded, order);
    }

    #[test]
    fn test_load_json_missing_file() {
        let result: Result<Order> = load_json("/definitely/not/here.json");
        assert!(result.is_err());
    }
}

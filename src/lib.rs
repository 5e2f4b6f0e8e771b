pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::ReqwestApiClient;
pub use config::{toml_config::TomlConfig, ServiceSettings};
pub use core::lifecycle::LifecycleHandler;
pub use domain::model::{Notice, Order, Package, User};
pub use utils::error::{DellError, Result};

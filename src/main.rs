use clap::Parser;
use dellserver::config::cli::{load_json, save_json};
use dellserver::config::Command;
use dellserver::core::lifecycle::connection_notice_for;
use dellserver::core::{metadata, routes};
use dellserver::utils::error::ErrorSeverity;
use dellserver::utils::logger;
use dellserver::{
    CliConfig, DellError, LifecycleHandler, Order, Package, ReqwestApiClient, Result, TomlConfig,
};
use serde_json::json;
use std::path::Path;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting dellserver CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    if let Command::Metadata { package } = &cli.command {
        return print_metadata(package.as_deref());
    }

    tracing::info!("📁 Loading configuration from: {}", cli.config.display());
    let settings = TomlConfig::from_file(&cli.config)?.to_settings()?;
    tracing::info!("✅ Configuration loaded for {}", settings.base_url());

    let handler = LifecycleHandler::new(ReqwestApiClient::new(&settings)?);

    match cli.command {
        Command::Metadata { .. } => Ok(()),
        Command::TestConnection => {
            let result = handler.test_connection().await;
            println!("{}", connection_notice_for(&result).message());
            result
        }
        Command::CheckAvailability => {
            handler.event_checkout().await?;
            println!("✅ A node is available for new servers");
            Ok(())
        }
        Command::Create { order: path } => {
            let mut order: Order = load_json(&path)?;
            let result = handler.create(&mut order).await.map(|_| ());
            persist_order(&path, &order, result)
        }
        Command::Suspend { order: path } => {
            let mut order: Order = load_json(&path)?;
            let result = handler.suspend(&mut order).await;
            persist_order(&path, &order, result)
        }
        Command::Unsuspend { order: path } => {
            let mut order: Order = load_json(&path)?;
            let result = handler.unsuspend(&mut order).await;
            persist_order(&path, &order, result)
        }
        Command::Terminate { order: path } => {
            let mut order: Order = load_json(&path)?;
            let result = handler.terminate(&mut order).await;
            persist_order(&path, &order, result)
        }
        Command::Upgrade {
            order: path,
            new_package,
        } => {
            let new_package: Package = load_json(&new_package)?;
            let mut order: Order = load_json(&path)?;
            let old_package = order.package.clone();
            let result = handler
                .upgrade(&mut order, &old_package, &new_package)
                .await
                .map(|_| ());
            if result.is_ok() {
                order.package = new_package;
            }
            persist_order(&path, &order, result)
        }
        Command::Login { order: path } => {
            let order: Order = load_json(&path)?;
            let url = handler.login_to_panel(&order).await?;
            println!("{}", url);
            Ok(())
        }
    }
}

/// 無論成功與否都寫回訂單，保留 last_error
fn persist_order(path: &Path, order: &Order, result: Result<()>) -> Result<()> {
    save_json(path, order)?;
    if result.is_ok() {
        println!("✅ Order {} updated: {}", order.id, path.display());
    }
    result
}

fn print_metadata(package: Option<&Path>) -> Result<()> {
    let mut output = json!({
        "meta_data": metadata::meta_data(),
        "config": metadata::set_config(),
        "permissions": metadata::permissions(),
        "routes": routes::routes(),
        "provider": routes::service_provider(),
    });

    if let Some(path) = package {
        let package: Package = load_json(path)?;
        output["package_config"] = serde_json::to_value(metadata::set_package_config(&package))?;
        output["checkout_config"] =
            serde_json::to_value(metadata::set_checkout_config(&package))?;
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&output).map_err(DellError::SerializationError)?
    );
    Ok(())
}

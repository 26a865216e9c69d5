use clap::Parser;
use content_hub::core::Storage;
use content_hub::utils::error::{ContentError, ErrorSeverity};
use content_hub::utils::{logger, monitor::SystemMonitor};
use content_hub::{CliConfig, ContentAggregator, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting content-hub CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 載入並驗證設定
    let settings = match config.resolve_settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let monitor = SystemMonitor::new(config.monitor);
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    match run(&config, &settings, &monitor).await {
        Ok(destination) => {
            tracing::info!("✅ Content loaded successfully");
            if let Some(path) = destination {
                tracing::info!("📁 Output saved to: {}", path);
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Content load failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run(
    config: &CliConfig,
    settings: &content_hub::HubSettings,
    monitor: &SystemMonitor,
) -> Result<Option<String>, ContentError> {
    let aggregator = ContentAggregator::from_config(settings)?;

    monitor.log_stats("Before load");
    let content = aggregator.load().await?;
    monitor.log_stats("After load");

    let selected = config.category.select(&content)?;
    let rendered = serde_json::to_string_pretty(&selected)?;

    let destination = match &config.output {
        Some(path) => {
            LocalStorage::new(".")
                .write_file(path, rendered.as_bytes())
                .await?;
            Some(path.clone())
        }
        None => {
            println!("{}", rendered);
            None
        }
    };

    monitor.log_final_stats(content.total());
    Ok(destination)
}

use clap::Parser;
use degree_audit::adapters::catalog_csv::read_catalog_rows;
use degree_audit::catalog::list_concentrations;
use degree_audit::core::{ConfigProvider, Storage};
use degree_audit::utils::error::{AuditError, ErrorSeverity};
use degree_audit::utils::{logger, validation::Validate};
use degree_audit::{AuditPipeline, AuditRunner, CliConfig, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting degree-audit CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(".");

    if config.list {
        if let Err(e) = print_concentrations(&storage, &config).await {
            exit_with(e);
        }
        return Ok(());
    }

    if config.majors.is_empty() && config.minors.is_empty() {
        tracing::warn!("No --major or --minor given; the report will be empty");
    }

    let pipeline = AuditPipeline::new(storage, config);
    let runner = AuditRunner::new(pipeline);

    match runner.run().await {
        Ok(output) => match output.written_to {
            Some(path) => println!("✅ Report saved to: {}", path),
            None => print!("{}", output.rendered),
        },
        Err(e) => exit_with(e),
    }

    Ok(())
}

async fn print_concentrations(storage: &LocalStorage, config: &CliConfig) -> degree_audit::Result<()> {
    for (label, path) in [
        ("Majors", config.major_catalog_path()),
        ("Minors", config.minor_catalog_path()),
    ] {
        let rows = read_catalog_rows(&storage.read_file(path).await?)?;
        println!("{}:", label);
        for name in list_concentrations(&rows) {
            println!("  {}", name);
        }
    }
    Ok(())
}

fn exit_with(e: AuditError) {
    tracing::error!(
        "❌ Audit failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());

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

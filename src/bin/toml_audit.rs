use clap::Parser;
use degree_audit::adapters::catalog_csv::read_catalog_rows;
use degree_audit::catalog::load_concentration;
use degree_audit::config::toml_config::AuditConfig;
use degree_audit::core::{ConfigProvider, Storage};
use degree_audit::domain::model::ConcentrationKind;
use degree_audit::domain::policy::OutputFormat;
use degree_audit::utils::error::ErrorSeverity;
use degree_audit::utils::{logger, validation::Validate};
use degree_audit::{AuditPipeline, AuditRunner, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-audit")]
#[command(about = "Degree audit driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "audit-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the output format from config
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Dry run - show the selected rules without evaluating a transcript
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match AuditConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let verbose = args.verbose || config.verbose_logging();
    if config.json_logging() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(format) = args.format {
        config.output.get_or_insert_with(Default::default).format = Some(format);
        tracing::info!("🔧 Output format overridden to: {:?}", format);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 摘要走日誌 (stderr)，stdout 只留報告
    display_config_summary(&config, &args);

    let storage = LocalStorage::new(".");

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No transcript will be evaluated");
        perform_dry_run(&storage, &config).await?;
        return Ok(());
    }

    let pipeline = AuditPipeline::new(storage, config);
    let runner = AuditRunner::new(pipeline);

    match runner.run().await {
        Ok(output) => match output.written_to {
            Some(path) => println!("✅ Report saved to: {}", path),
            None => print!("{}", output.rendered),
        },
        Err(e) => {
            tracing::error!(
                "❌ Audit failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

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

fn display_config_summary(config: &AuditConfig, args: &Args) {
    tracing::info!("📋 Configuration Summary:");
    for line in config.summary_lines() {
        tracing::info!("  {}", line);
    }
    if args.dry_run {
        tracing::info!("  🔍 DRY RUN MODE ENABLED");
    }
}

async fn perform_dry_run(
    storage: &LocalStorage,
    config: &AuditConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let selections = [
        (ConcentrationKind::Major, config.major_catalog_path(), config.majors()),
        (ConcentrationKind::Minor, config.minor_catalog_path(), config.minors()),
    ];

    for (kind, path, names) in selections {
        if names.is_empty() {
            continue;
        }
        let rows = read_catalog_rows(&storage.read_file(path).await?)?;
        for name in names {
            println!();
            let concentration = load_concentration(kind, name, &rows);
            print!("{}", concentration);
        }
    }

    println!();
    println!("✅ Dry run completed - configuration is valid");
    Ok(())
}

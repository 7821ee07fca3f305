use clap::Parser;
use dsp_marketplace::core::MatchSource;
use dsp_marketplace::matching::MatchingConfig;
use dsp_marketplace::utils::error::{ErrorSeverity, MarketplaceError};
use dsp_marketplace::utils::logger;
use dsp_marketplace::utils::validation::{validate_required_field, Validate};
use dsp_marketplace::{
    ApiClient, AppConfig, JsonFileSource, LocalStorage, MatchArgs, MatchEngine, ShiftMatchPipeline,
};

#[tokio::main]
async fn main() {
    let args = MatchArgs::parse();

    // 載入配置
    let mut config = match AppConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    args.apply_overrides(&mut config);

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger_with_level(args.verbose, config.log_level());
    }
    tracing::info!("🚀 Starting dsp-marketplace matcher");
    tracing::debug!("CLI args: {:?}", args);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let result = match (&args.profile_file, &args.shifts_file) {
        (Some(profile), Some(shifts)) => {
            tracing::info!("📂 Offline mode: {} + {}", profile, shifts);
            let source = JsonFileSource::new(LocalStorage::new("."), profile, shifts);
            run(source, config, &args).await
        }
        _ => match build_client(&config) {
            Ok(client) => run(client, config, &args).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Match run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

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

fn build_client(config: &AppConfig) -> Result<ApiClient, MarketplaceError> {
    let token = *validate_required_field("api.token", &config.token())?;
    let client = ApiClient::with_timeout(&config.api.base_url, token, config.request_timeout())?;
    tracing::info!("🌐 Using API at {}", client.base_url());
    Ok(client)
}

async fn run<M: MatchSource>(
    source: M,
    config: AppConfig,
    args: &MatchArgs,
) -> Result<(), MarketplaceError> {
    let monitor_enabled = args.monitor || config.monitoring_enabled();

    let matching = MatchingConfig::with_weights(config.matching.weights);
    let storage = LocalStorage::new(config.output.output_path.clone());
    let pipeline = ShiftMatchPipeline::with_matching(source, storage, config, matching);
    let engine = MatchEngine::new_with_monitoring(pipeline, monitor_enabled);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no report will be written");
        let report = engine.preview().await?;
        println!(
            "Top {} of {} open shifts for {}:",
            report.matches.len(),
            report.shifts_considered,
            report.worker_id
        );
        for m in &report.matches {
            println!(
                "{:>3}. [{:>3}] {} @ {} ({})",
                m.rank,
                m.score,
                m.shift.title,
                m.shift.client_name,
                m.shift.starts_at.format("%Y-%m-%d %H:%M")
            );
            for reason in &m.reasons {
                println!("          - {}", reason);
            }
        }
        return Ok(());
    }

    let output_path = engine.run().await?;
    println!("✅ Match report saved to: {}", output_path);
    Ok(())
}

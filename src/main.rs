use clap::Parser;
use frescura_labels::utils::error::{ErrorSeverity, LabelError};
use frescura_labels::utils::{logger, validation::Validate};
use frescura_labels::{CliConfig, LabelEngine, LabelPipeline};
use std::path::Path;

fn main() {
    let config = CliConfig::parse();

    let _guard = if config.json_logs {
        logger::init_json_logger(config.verbose);
        None
    } else {
        logger::init_cli_logger(config.verbose, config.log_dir.as_deref().map(Path::new))
    };

    tracing::info!("Starting frescura-labels CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let result = LabelPipeline::new(config).and_then(|pipeline| LabelEngine::new(pipeline).run());

    match result {
        Ok(report) => {
            tracing::info!("✅ Labels generated: {} of {} requested", report.generated, report.requested);
            println!("✅ {} labels generated ({} skipped)", report.generated, report.skipped.total());
            println!("📁 Output saved to: {}", report.output_path);
        }
        Err(e) => exit_with(e),
    }
}

fn exit_with(e: LabelError) -> ! {
    tracing::error!(
        "❌ Label generation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

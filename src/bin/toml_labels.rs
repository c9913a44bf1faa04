use anyhow::Context;
use clap::Parser;
use frescura_labels::config::toml_config::TomlConfig;
use frescura_labels::core::ConfigProvider;
use frescura_labels::domain::ports::Pipeline;
use frescura_labels::utils::error::ErrorSeverity;
use frescura_labels::utils::{logger, validation::Validate};
use frescura_labels::{LabelEngine, LabelPipeline};
use std::path::Path;

#[derive(Parser)]
#[command(name = "toml-labels")]
#[command(about = "Freshness label generator driven by a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "labels.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override output.clear_before_run from config
    #[arg(long)]
    clear_output: Option<bool>,

    /// Resolve labels and print them without writing the document
    #[arg(long)]
    dry_run: bool,

    /// Print dry-run results as JSON
    #[arg(long, requires = "dry_run")]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let verbose = args.verbose || config.verbose();
    let _guard = if config.json_logs() {
        logger::init_json_logger(verbose);
        None
    } else {
        logger::init_cli_logger(verbose, config.log_dir().map(Path::new))
    };

    tracing::info!("🚀 Starting TOML-based label generator");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    if let Some(clear) = args.clear_output {
        config.output.clear_before_run = clear;
        tracing::info!("🔧 clear_before_run overridden to: {}", clear);
    }
    if args.dry_run {
        config.output.clear_before_run = false;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let pipeline = LabelPipeline::new(config).context("building label pipeline")?;

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no document will be written");
        return perform_dry_run(&pipeline, args.json);
    }

    match LabelEngine::new(pipeline).run() {
        Ok(report) => {
            tracing::info!("✅ Label generation completed");
            println!("✅ {} labels generated ({} skipped)", report.generated, report.skipped.total());
            println!("📁 Output saved to: {}", report.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Label generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low | ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Template: {}", config.template_path());
    if let Some(sheet) = config.template_sheet() {
        println!("  Sheet: {}", sheet);
    }
    println!("  Shelf-life table: {}", config.shelf_table_path());
    println!("  Pattern: {}", config.freshness_pattern());
    println!("  Block height: {}", config.layout().block_height);
    println!("  Output: {}/{}", config.output_path(), config.output_filename());
    println!("  Query items: {}", config.items().len());
    if let Some(file) = config.query_file() {
        println!("  Query file: {}", file);
    }
    println!("  Clear output: {}", config.clear_output());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
    println!();
}

fn perform_dry_run(pipeline: &LabelPipeline<TomlConfig>, json: bool) -> anyhow::Result<()> {
    let pairs = pipeline.extract().context("reading query items")?;
    let requested = pairs.len();
    let outcome = pipeline.transform(pairs).context("resolving records")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("🔍 Dry run: {} requested, {} resolved", requested, outcome.records.len());
    for (idx, record) in outcome.records.iter().enumerate() {
        println!(
            "  [{}] {} {} {} -> {} ({})",
            idx + 1,
            record.sku,
            record.freshness_code,
            record.base_date_string(),
            record.expiry_date_string(),
            record.description
        );
    }

    let skipped = outcome.skipped;
    if skipped.total() > 0 {
        println!(
            "  Skipped: {} invalid SKU, {} invalid code, {} invalid date, {} not in table",
            skipped.invalid_sku, skipped.invalid_code, skipped.invalid_date, skipped.lookup_miss
        );
    }
    println!("  Would write: {}", pipeline.output_file().display());

    Ok(())
}

use crate::core::decoder::{FreshnessPattern, DEFAULT_FRESHNESS_PATTERN};
use crate::domain::model::BlockLayout;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LabelError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "frescura-labels")]
#[command(about = "Generate freshness labels from SKU and freshness codes")]
pub struct CliConfig {
    #[arg(long, default_value = "data/plantilla.xlsx")]
    pub template: String,

    #[arg(long, help = "Template sheet name (defaults to the first sheet)")]
    pub sheet: Option<String>,

    #[arg(long, default_value = "data/frescuras.csv")]
    pub shelf_table: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "Frescuras.xlsx")]
    pub output_file: String,

    #[arg(long, default_value = DEFAULT_FRESHNESS_PATTERN)]
    pub pattern: String,

    #[arg(long = "item", value_delimiter = ',', help = "SKU:CODE or SKU:CODE:COPIES")]
    pub items: Vec<String>,

    #[arg(long, help = "CSV with sku,code[,copies] columns")]
    pub query_file: Option<String>,

    #[arg(long, help = "Empty the output folder before generating")]
    pub clear_output: bool,

    #[arg(long, help = "Also write logs to a daily file in this folder")]
    pub log_dir: Option<String>,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn template_path(&self) -> &str {
        &self.template
    }

    fn template_sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    fn shelf_table_path(&self) -> &str {
        &self.shelf_table
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_filename(&self) -> &str {
        &self.output_file
    }

    fn freshness_pattern(&self) -> &str {
        &self.pattern
    }

    fn layout(&self) -> BlockLayout {
        BlockLayout::default()
    }

    fn items(&self) -> &[String] {
        &self.items
    }

    fn query_file(&self) -> Option<&str> {
        self.query_file.as_deref()
    }

    fn clear_output(&self) -> bool {
        self.clear_output
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("template", &self.template)?;
        validation::validate_file_extension("template", &self.template, &["xlsx", "xlsm"])?;
        validation::validate_path("shelf_table", &self.shelf_table)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_file_extension("output_file", &self.output_file, &["xlsx"])?;
        FreshnessPattern::new(&self.pattern)?;

        if self.items.is_empty() && self.query_file.is_none() {
            return Err(LabelError::MissingConfigError {
                field: "item or query_file".to_string(),
            });
        }
        Ok(())
    }
}

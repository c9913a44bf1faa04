use crate::core::decoder::{FreshnessPattern, DEFAULT_FRESHNESS_PATTERN};
use crate::domain::model::{BlockLayout, TableColumns};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LabelError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub decoder: DecoderConfig,
    pub shelf_life: ShelfLifeConfig,
    pub template: TemplateConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub query: QueryConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
        }
    }
}

fn default_pattern() -> String {
    DEFAULT_FRESHNESS_PATTERN.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfLifeConfig {
    pub table_path: String,
    #[serde(default)]
    pub columns: TableColumns,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub path: String,
    pub sheet: Option<String>,
    #[serde(default)]
    pub layout: BlockLayout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default)]
    pub clear_before_run: bool,
}

fn default_filename() -> String {
    "Frescuras.xlsx".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default)]
    pub items: Vec<String>,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub dir: Option<String>,
    #[serde(default)]
    pub json: bool,
    #[serde(default)]
    pub verbose: bool,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LabelError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LabelError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("template.path", &self.template.path)?;
        validation::validate_file_extension("template.path", &self.template.path, &["xlsx", "xlsm"])?;
        validation::validate_layout("template.layout", &self.template.layout)?;

        validation::validate_path("shelf_life.table_path", &self.shelf_life.table_path)?;

        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_file_extension("output.filename", &self.output.filename, &["xlsx"])?;

        FreshnessPattern::new(&self.decoder.pattern).map_err(|e| LabelError::InvalidConfigValueError {
            field: "decoder.pattern".to_string(),
            value: self.decoder.pattern.clone(),
            reason: e.to_string(),
        })?;

        if self.query.items.is_empty() && self.query.file.is_none() {
            return Err(LabelError::MissingConfigError {
                field: "query.items or query.file".to_string(),
            });
        }

        Ok(())
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().map(|l| l.json).unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().map(|l| l.verbose).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn template_path(&self) -> &str {
        &self.template.path
    }

    fn template_sheet(&self) -> Option<&str> {
        self.template.sheet.as_deref()
    }

    fn shelf_table_path(&self) -> &str {
        &self.shelf_life.table_path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_filename(&self) -> &str {
        &self.output.filename
    }

    fn freshness_pattern(&self) -> &str {
        &self.decoder.pattern
    }

    fn layout(&self) -> BlockLayout {
        self.template.layout
    }

    fn items(&self) -> &[String] {
        &self.query.items
    }

    fn query_file(&self) -> Option<&str> {
        self.query.file.as_deref()
    }

    fn clear_output(&self) -> bool {
        self.output.clear_before_run
    }

    fn table_columns(&self) -> TableColumns {
        self.shelf_life.columns.clone()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

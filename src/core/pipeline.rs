use crate::adapters::{query, shelf_table::ShelfLifeTable, workbook};
use crate::config::OutputFolder;
use crate::core::decoder::FreshnessPattern;
use crate::core::resolver::RecordResolver;
use crate::core::{ConfigProvider, Pipeline, RawPair, ResolveOutcome};
use crate::utils::error::{LabelError, Result};
use std::path::Path;

/// Query items in, one label document out.
pub struct LabelPipeline<C: ConfigProvider> {
    config: C,
    pattern: FreshnessPattern,
    output: OutputFolder,
    reference_year: Option<i32>,
}

impl<C: ConfigProvider> LabelPipeline<C> {
    pub fn new(config: C) -> Result<Self> {
        let pattern = FreshnessPattern::new(config.freshness_pattern())?;
        let output = OutputFolder::new(config.output_path());
        Ok(Self {
            config,
            pattern,
            output,
            reference_year: None,
        })
    }

    /// Decode codes against `year` instead of the clock.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn output_file(&self) -> std::path::PathBuf {
        self.output.file_path(self.config.output_filename())
    }
}

impl<C: ConfigProvider> Pipeline for LabelPipeline<C> {
    fn extract(&self) -> Result<Vec<RawPair>> {
        if self.config.clear_output() {
            self.output.clear()?;
        }

        let mut items = query::parse_items(self.config.items())?;
        if let Some(path) = self.config.query_file() {
            items.extend(query::read_query_file(path)?);
        }

        let pairs = query::expand_items(&items);
        tracing::debug!("{} query items expand to {} labels", items.len(), pairs.len());

        let rows_needed = pairs.len() as u64 * u64::from(self.config.layout().block_height);
        if rows_needed > u64::from(workbook::MAX_ROW) {
            return Err(LabelError::ValidationError {
                message: format!(
                    "{} labels need {} rows, more than a sheet holds ({})",
                    pairs.len(),
                    rows_needed,
                    workbook::MAX_ROW
                ),
            });
        }
        Ok(pairs)
    }

    fn transform(&self, pairs: Vec<RawPair>) -> Result<ResolveOutcome> {
        let table = ShelfLifeTable::from_path(self.config.shelf_table_path(), &self.config.table_columns())?;
        if table.is_empty() {
            tracing::warn!("Shelf-life table is empty; every item will be skipped");
        }

        let resolver = match self.reference_year {
            Some(year) => RecordResolver::with_reference_year(&table, &self.pattern, year),
            None => RecordResolver::new(&table, &self.pattern),
        };
        Ok(resolver.resolve(&pairs))
    }

    fn load(&self, outcome: ResolveOutcome) -> Result<String> {
        self.output.ensure_exists()?;
        let output_file = self.output_file();

        workbook::render_document(
            Path::new(self.config.template_path()),
            self.config.template_sheet(),
            &self.config.layout(),
            &outcome.records,
            &output_file,
        )?;

        Ok(output_file.display().to_string())
    }
}

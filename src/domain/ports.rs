use crate::domain::model::{BlockLayout, CellRange, RawPair, ResolveOutcome, ShelfLifeEntry, TableColumns};
use crate::utils::error::Result;
use std::collections::HashMap;

/// Read-only view of the shelf-life table, keyed by product code.
pub trait ShelfLifeLookup {
    fn lookup(&self, code: &str) -> Option<&ShelfLifeEntry>;
}

impl ShelfLifeLookup for HashMap<String, ShelfLifeEntry> {
    fn lookup(&self, code: &str) -> Option<&ShelfLifeEntry> {
        self.get(code.trim())
    }
}

/// The slice of a worksheet the template replicator needs. Coordinates are 1-based.
///
/// `Value` and `Style` are owned snapshots: handing one to `set_cell_*` must never
/// alias the source cell.
pub trait SheetModel {
    type Value: Clone;
    type Style: Clone;

    fn cell_value(&self, col: u32, row: u32) -> Option<Self::Value>;
    fn set_cell_value(&mut self, col: u32, row: u32, value: Self::Value);

    fn cell_text(&self, col: u32, row: u32) -> String;
    fn set_cell_text(&mut self, col: u32, row: u32, text: &str);

    fn cell_style(&self, col: u32, row: u32) -> Option<Self::Style>;
    fn set_cell_style(&mut self, col: u32, row: u32, style: Self::Style) -> Result<()>;

    fn row_height(&self, row: u32) -> Option<f64>;
    fn set_row_height(&mut self, row: u32, height: f64);

    fn merged_ranges(&self) -> Vec<CellRange>;
    fn add_merged_range(&mut self, range: CellRange) -> Result<()>;

    /// Manual page break after `row`, so `row + 1` starts a new page.
    fn insert_page_break(&mut self, row: u32) -> Result<()>;
}

pub trait ConfigProvider {
    fn template_path(&self) -> &str;
    fn template_sheet(&self) -> Option<&str>;
    fn shelf_table_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_filename(&self) -> &str;
    fn freshness_pattern(&self) -> &str;
    fn layout(&self) -> BlockLayout;
    fn items(&self) -> &[String];
    fn query_file(&self) -> Option<&str>;
    fn clear_output(&self) -> bool;

    fn table_columns(&self) -> TableColumns {
        TableColumns::default()
    }
}

pub trait Pipeline {
    fn extract(&self) -> Result<Vec<RawPair>>;
    fn transform(&self, pairs: Vec<RawPair>) -> Result<ResolveOutcome>;
    fn load(&self, outcome: ResolveOutcome) -> Result<String>;
}

//! `umya-spreadsheet` backing for [`SheetModel`], plus template load and document save.

use crate::core::replicator;
use crate::domain::model::{BlockLayout, CellRange, ResolvedRecord};
use crate::domain::ports::SheetModel;
use crate::utils::error::{LabelError, Result};
use std::path::Path;
use umya_spreadsheet::helper::coordinate::index_from_coordinate;
use umya_spreadsheet::{Break, CellValue, Spreadsheet, Style, Worksheet};

/// Excel's last row; merges and breaks past it are rejected.
pub const MAX_ROW: u32 = 1_048_576;

pub struct UmyaSheet<'a> {
    sheet: &'a mut Worksheet,
}

impl<'a> UmyaSheet<'a> {
    pub fn new(sheet: &'a mut Worksheet) -> Self {
        Self { sheet }
    }
}

impl SheetModel for UmyaSheet<'_> {
    type Value = CellValue;
    type Style = Style;

    fn cell_value(&self, col: u32, row: u32) -> Option<CellValue> {
        self.sheet
            .get_cell((col, row))
            .map(|cell| cell.get_cell_value().clone())
    }

    fn set_cell_value(&mut self, col: u32, row: u32, value: CellValue) {
        self.sheet.get_cell_mut((col, row)).set_cell_value(value);
    }

    fn cell_text(&self, col: u32, row: u32) -> String {
        self.sheet
            .get_cell((col, row))
            .map(|cell| cell.get_value().to_string())
            .unwrap_or_default()
    }

    fn set_cell_text(&mut self, col: u32, row: u32, text: &str) {
        self.sheet.get_cell_mut((col, row)).set_value_string(text);
    }

    fn cell_style(&self, col: u32, row: u32) -> Option<Style> {
        self.sheet.get_cell((col, row)).map(|cell| cell.get_style().clone())
    }

    fn set_cell_style(&mut self, col: u32, row: u32, style: Style) -> Result<()> {
        if row > MAX_ROW {
            return Err(LabelError::spreadsheet(format!("row {} is past the last sheet row", row)));
        }
        self.sheet.get_cell_mut((col, row)).set_style(style);
        Ok(())
    }

    fn row_height(&self, row: u32) -> Option<f64> {
        self.sheet
            .get_row_dimension(&row)
            .map(|dimension| *dimension.get_height())
            .filter(|height| *height > 0.0)
    }

    fn set_row_height(&mut self, row: u32, height: f64) {
        let dimension = self.sheet.get_row_dimension_mut(&row);
        dimension.set_height(height);
        dimension.set_custom_height(true);
    }

    fn merged_ranges(&self) -> Vec<CellRange> {
        self.sheet
            .get_merge_cells()
            .iter()
            .filter_map(|range| {
                let text = range.get_range();
                let parsed = parse_range(&text);
                if parsed.is_none() {
                    tracing::warn!("Ignoring unreadable merged range {:?}", text);
                }
                parsed
            })
            .collect()
    }

    fn add_merged_range(&mut self, range: CellRange) -> Result<()> {
        if range.end_row > MAX_ROW {
            return Err(LabelError::spreadsheet(format!("{} is past the last sheet row", range)));
        }
        if let Some(existing) = self.merged_ranges().iter().find(|m| m.overlaps(&range)) {
            return Err(LabelError::spreadsheet(format!(
                "{} overlaps merged range {}",
                range, existing
            )));
        }
        self.sheet.add_merge_cells(range.to_string());
        Ok(())
    }

    fn insert_page_break(&mut self, row: u32) -> Result<()> {
        if row == 0 || row >= MAX_ROW {
            return Err(LabelError::spreadsheet(format!("no page break possible after row {}", row)));
        }
        let mut page_break = Break::default();
        page_break.set_id(row);
        page_break.set_max(16_383);
        page_break.set_manual_page_break(true);
        self.sheet.get_row_breaks_mut().add_break_list(page_break);
        Ok(())
    }
}

/// `"A1:E2"` into a [`CellRange`]. A single cell reference is a 1×1 range.
pub fn parse_range(text: &str) -> Option<CellRange> {
    let mut parts = text.split(':');
    let start = parse_cell(parts.next()?)?;
    let end = match parts.next() {
        Some(part) => parse_cell(part)?,
        None => start,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(CellRange::new(start.0, start.1, end.0, end.1))
}

fn parse_cell(reference: &str) -> Option<(u32, u32)> {
    match index_from_coordinate(reference.trim()) {
        (Some(col), Some(row), _, _) => Some((col, row)),
        _ => None,
    }
}

pub fn read_template<P: AsRef<Path>>(path: P) -> Result<Spreadsheet> {
    let path = path.as_ref();
    umya_spreadsheet::reader::xlsx::read(path).map_err(|e| {
        LabelError::template(format!("cannot read template {}: {}", path.display(), e))
    })
}

pub fn write_document<P: AsRef<Path>>(book: &Spreadsheet, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    umya_spreadsheet::writer::xlsx::write(book, path)
        .map_err(|e| LabelError::spreadsheet(format!("cannot write {}: {}", path.display(), e)))
}

/// The named sheet, or the first one.
pub fn template_sheet_mut<'a>(book: &'a mut Spreadsheet, name: Option<&str>) -> Result<&'a mut Worksheet> {
    match name {
        Some(name) => book
            .get_sheet_by_name_mut(name)
            .ok_or_else(|| LabelError::template(format!("sheet '{}' not found in template", name))),
        None => book
            .get_sheet_mut(&0)
            .ok_or_else(|| LabelError::template("template workbook has no sheets")),
    }
}

/// Load the template, stamp one block per record and save to `output`.
///
/// Nothing is written unless every block was stamped.
pub fn render_document(
    template: &Path,
    sheet_name: Option<&str>,
    layout: &BlockLayout,
    records: &[ResolvedRecord],
    output: &Path,
) -> Result<usize> {
    let mut book = read_template(template)?;
    let blocks = {
        let worksheet = template_sheet_mut(&mut book, sheet_name)?;
        let mut sheet = UmyaSheet::new(worksheet);
        replicator::render(&mut sheet, layout, records)?
    };

    write_document(&book, output)?;
    tracing::info!("Wrote {} label blocks to {}", blocks, output.display());
    Ok(blocks)
}

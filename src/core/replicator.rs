//! Template replication: one styled block per record, stacked down a single sheet.
//!
//! The first `block_height` rows of the sheet are captured once as a prototype.
//! Block 0 is the template itself and is written into directly; every further block
//! is a fresh copy stamped `index * block_height` rows lower, preceded by a manual
//! page break so each record prints on its own page.

use crate::domain::model::{BlockLayout, CellRange, ResolvedRecord};
use crate::domain::ports::SheetModel;
use crate::utils::error::{LabelError, Result};
use crate::utils::validation::validate_layout;

#[derive(Debug, Clone)]
struct CapturedCell<V, S> {
    col: u32,
    row: u32,
    value: Option<V>,
    style: Option<S>,
}

/// Immutable snapshot of the template block.
#[derive(Debug, Clone)]
pub struct TemplateBlock<V, S> {
    cells: Vec<CapturedCell<V, S>>,
    row_heights: Vec<(u32, f64)>,
    merges: Vec<CellRange>,
}

impl<V: Clone, S: Clone> TemplateBlock<V, S> {
    pub fn capture<M>(sheet: &M, layout: BlockLayout) -> Result<Self>
    where
        M: SheetModel<Value = V, Style = S>,
    {
        validate_layout("template", &layout).map_err(|e| LabelError::template(e.to_string()))?;

        let mut cells = Vec::new();
        let mut row_heights = Vec::new();

        for row in 1..=layout.block_height {
            if let Some(height) = sheet.row_height(row) {
                row_heights.push((row, height));
            }
            for col in 1..=layout.max_col {
                let value = sheet.cell_value(col, row);
                let style = sheet.cell_style(col, row);
                if value.is_some() || style.is_some() {
                    cells.push(CapturedCell {
                        col,
                        row,
                        value,
                        style,
                    });
                }
            }
        }

        let mut merges = Vec::new();
        for range in sheet.merged_ranges() {
            if range.within_rows(1, layout.block_height) {
                merges.push(range);
            } else if range.start_row <= layout.block_height {
                tracing::warn!(
                    "Merged range {} crosses the block boundary at row {}; it is not replicated",
                    range,
                    layout.block_height
                );
            }
        }

        tracing::debug!(
            "Captured template block: {} cells, {} row heights, {} merged ranges",
            cells.len(),
            row_heights.len(),
            merges.len()
        );

        Ok(Self {
            cells,
            row_heights,
            merges,
        })
    }

    pub fn merges(&self) -> &[CellRange] {
        &self.merges
    }

    /// Write a copy of the block `row_offset` rows down.
    pub fn stamp<M>(&self, sheet: &mut M, row_offset: u32) -> Result<()>
    where
        M: SheetModel<Value = V, Style = S>,
    {
        for cell in &self.cells {
            let row = cell.row + row_offset;
            if let Some(value) = &cell.value {
                sheet.set_cell_value(cell.col, row, value.clone());
            }
            if let Some(style) = &cell.style {
                sheet.set_cell_style(cell.col, row, style.clone()).map_err(|e| {
                    LabelError::template(format!(
                        "copying style to row {} column {}: {}",
                        row, cell.col, e
                    ))
                })?;
            }
        }

        for (row, height) in &self.row_heights {
            sheet.set_row_height(row + row_offset, *height);
        }

        for range in &self.merges {
            let shifted = range.shifted_rows(row_offset);
            sheet
                .add_merged_range(shifted)
                .map_err(|e| LabelError::template(format!("merging {}: {}", shifted, e)))?;
        }

        Ok(())
    }
}

/// Write one record's values into the block starting `row_offset` rows down.
pub fn inject_record<M: SheetModel>(
    sheet: &mut M,
    layout: &BlockLayout,
    row_offset: u32,
    record: &ResolvedRecord,
) {
    let col = layout.data_col;
    sheet.set_cell_text(col, layout.code_row + row_offset, &record.freshness_code);
    sheet.set_cell_text(col, layout.sku_row + row_offset, &record.sku);
    sheet.set_cell_text(col, layout.expiry_row + row_offset, &record.expiry_date_string());
}

/// Stamp one block per record onto `sheet`, returning the number of blocks written.
///
/// Any failure leaves `sheet` partially modified; callers must discard it rather than save.
pub fn render<M: SheetModel>(sheet: &mut M, layout: &BlockLayout, records: &[ResolvedRecord]) -> Result<usize> {
    let template = TemplateBlock::capture(&*sheet, *layout).inspect_err(|e| {
        tracing::error!("Capturing template block failed: {}", e);
    })?;

    if records.is_empty() {
        tracing::warn!("No records to render; the template is left untouched");
        return Ok(0);
    }

    for (idx, record) in records.iter().enumerate() {
        let row_offset = layout.row_offset(idx);

        if idx > 0 {
            template.stamp(sheet, row_offset).inspect_err(|e| {
                tracing::error!("Replicating block {} failed: {}", idx + 1, e);
            })?;
            sheet.insert_page_break(row_offset).map_err(|e| {
                tracing::error!("Page break before block {} failed: {}", idx + 1, e);
                LabelError::template(format!("page break after row {}: {}", row_offset, e))
            })?;
        }

        inject_record(sheet, layout, row_offset, record);
        tracing::debug!(
            "Block {} at row {}: {} / {} / {}",
            idx + 1,
            row_offset + 1,
            record.freshness_code,
            record.sku,
            record.expiry_date_string()
        );
    }

    Ok(records.len())
}

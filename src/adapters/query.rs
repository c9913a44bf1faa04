use crate::domain::model::{QueryItem, RawPair};
use crate::utils::error::{LabelError, Result};
use crate::utils::validation;
use std::path::Path;

/// Upper bound on labels requested by a single item.
pub const MAX_COPIES: u32 = 1_000;

/// Parse `SKU:CODE` or `SKU:CODE:COPIES`. SKU and code are validated later, by the resolver.
pub fn parse_item(spec: &str) -> Result<QueryItem> {
    let parts: Vec<&str> = spec.split(':').collect();
    let invalid = |reason: &str| LabelError::ValidationError {
        message: format!("item '{}': {}", spec, reason),
    };

    let (sku, code, copies) = match parts.as_slice() {
        [sku, code] => (*sku, *code, 1),
        [sku, code, copies] => {
            let copies = parse_copies(copies).ok_or_else(|| invalid("copies must be a non-negative integer"))?;
            (*sku, *code, copies)
        }
        _ => return Err(invalid("expected SKU:CODE or SKU:CODE:COPIES")),
    };

    if code.is_empty() {
        return Err(invalid("missing freshness code"));
    }
    validation::validate_range(&format!("item '{}' copies", spec), copies, 0, MAX_COPIES)?;

    Ok(QueryItem {
        sku: sku.to_string(),
        code: code.to_string(),
        copies,
    })
}

pub fn parse_items(specs: &[String]) -> Result<Vec<QueryItem>> {
    specs.iter().map(|spec| parse_item(spec)).collect()
}

/// Blank means one copy.
fn parse_copies(text: &str) -> Option<u32> {
    match text.trim() {
        "" => Some(1),
        text => text.parse().ok(),
    }
}

/// Read `sku,code[,copies]` rows. The copies column, or its value on a short row, may be left out.
pub fn read_query_file<P: AsRef<Path>>(path: P) -> Result<Vec<QueryItem>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let sku_idx = column_index(&headers, "sku").ok_or_else(|| missing_column(path, "sku"))?;
    let code_idx = column_index(&headers, "code").ok_or_else(|| missing_column(path, "code"))?;
    let copies_idx = column_index(&headers, "copies");

    let mut items = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row?;
        // header is line 1
        let line = line + 2;
        let invalid = |reason: &str| LabelError::ValidationError {
            message: format!("{} line {}: {}", path.display(), line, reason),
        };

        let code = row.get(code_idx).unwrap_or_default();
        if code.is_empty() {
            return Err(invalid("missing freshness code"));
        }
        let raw_copies = copies_idx.and_then(|idx| row.get(idx)).unwrap_or_default();
        let copies = parse_copies(raw_copies).ok_or_else(|| invalid("copies must be a non-negative integer"))?;
        validation::validate_range(&format!("{} line {} copies", path.display(), line), copies, 0, MAX_COPIES)?;

        items.push(QueryItem {
            sku: row.get(sku_idx).unwrap_or_default().to_string(),
            code: code.to_string(),
            copies,
        });
    }
    tracing::debug!("Read {} query rows from {}", items.len(), path.display());
    Ok(items)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(name))
}

fn missing_column(path: &Path, name: &str) -> LabelError {
    LabelError::ValidationError {
        message: format!("query file {} has no '{}' column", path.display(), name),
    }
}

/// One pair per copy, in order. Zero copies contributes nothing.
pub fn expand_items(items: &[QueryItem]) -> Vec<RawPair> {
    items
        .iter()
        .flat_map(|item| {
            std::iter::repeat((item.sku.clone(), item.code.clone())).take(item.copies as usize)
        })
        .collect()
}

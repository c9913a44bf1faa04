use crate::domain::model::{ShelfLifeEntry, TableColumns};
use crate::domain::ports::ShelfLifeLookup;
use crate::utils::error::{LabelError, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Shelf-life days per product code, loaded from CSV.
///
/// Codes are kept as trimmed strings, so `"3017868"` and `" 3017868 "` are the same
/// product while `"03017868"` is not.
#[derive(Debug, Clone, Default)]
pub struct ShelfLifeTable {
    entries: HashMap<String, ShelfLifeEntry>,
}

impl ShelfLifeTable {
    pub fn from_path<P: AsRef<Path>>(path: P, columns: &TableColumns) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading shelf-life table from {}", path.display());
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file, columns)?;
        tracing::info!("Loaded {} shelf-life entries from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, columns: &TableColumns) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let code_idx = column_index(&headers, &columns.code)?;
        let description_idx = column_index(&headers, &columns.description)?;
        let shelf_life_idx = column_index(&headers, &columns.shelf_life)?;

        let mut table = Self::default();
        for (line, row) in csv_reader.records().enumerate() {
            let row = row?;
            // header is line 1
            let line = line + 2;

            let code = normalize_code(row.get(code_idx).unwrap_or_default());
            if code.is_empty() {
                tracing::warn!("Shelf-life table line {}: empty product code, skipped", line);
                continue;
            }

            let raw_days = row.get(shelf_life_idx).unwrap_or_default();
            let shelf_life_days = match raw_days.parse::<u32>() {
                Ok(days) => days,
                Err(_) => {
                    tracing::warn!(
                        "Shelf-life table line {}: shelf life {:?} for {} is not a non-negative integer, skipped",
                        line,
                        raw_days,
                        code
                    );
                    continue;
                }
            };

            table.insert(ShelfLifeEntry {
                code,
                description: row.get(description_idx).unwrap_or_default().to_string(),
                shelf_life_days,
            });
        }

        Ok(table)
    }

    /// Keeps the first entry for a code.
    pub fn insert(&mut self, entry: ShelfLifeEntry) -> bool {
        if self.entries.contains_key(&entry.code) {
            tracing::warn!("Duplicate product code {} in shelf-life table; keeping the first", entry.code);
            return false;
        }
        self.entries.insert(entry.code.clone(), entry);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ShelfLifeLookup for ShelfLifeTable {
    fn lookup(&self, code: &str) -> Option<&ShelfLifeEntry> {
        self.entries.get(&normalize_code(code))
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_string()
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| LabelError::ValidationError {
            message: format!(
                "shelf-life table has no '{}' column (found: {})",
                name,
                headers.iter().collect::<Vec<_>>().join(", ")
            ),
        })
}

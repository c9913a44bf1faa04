use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display format shared by base and expiry dates.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// One row of the upstream form: a SKU, its freshness code and how many labels to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryItem {
    pub sku: String,
    pub code: String,
    #[serde(default = "default_copies")]
    pub copies: u32,
}

fn default_copies() -> u32 {
    1
}

impl QueryItem {
    pub fn new(sku: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            code: code.into(),
            copies: 1,
        }
    }
}

/// Raw `(sku, code)` pair as handed to the resolver.
pub type RawPair = (String, String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfLifeEntry {
    pub code: String,
    pub description: String,
    pub shelf_life_days: u32,
}

/// Header names of the shelf-life CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableColumns {
    pub code: String,
    pub description: String,
    pub shelf_life: String,
}

impl Default for TableColumns {
    fn default() -> Self {
        Self {
            code: "CODIGO".to_string(),
            description: "DESCRIPCION".to_string(),
            shelf_life: "SHELF_LIFE".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRecord {
    pub sku: String,
    pub freshness_code: String,
    pub description: String,
    #[serde(serialize_with = "serialize_date")]
    pub base_date: NaiveDate,
    #[serde(serialize_with = "serialize_date")]
    pub expiry_date: NaiveDate,
}

fn serialize_date<S: serde::Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(DATE_FORMAT))
}

impl ResolvedRecord {
    pub fn base_date_string(&self) -> String {
        self.base_date.format(DATE_FORMAT).to_string()
    }

    pub fn expiry_date_string(&self) -> String {
        self.expiry_date.format(DATE_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkipReason {
    InvalidSku,
    InvalidCode,
    InvalidDate,
    LookupMiss,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub invalid_sku: usize,
    pub invalid_code: usize,
    pub invalid_date: usize,
    pub lookup_miss: usize,
}

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::InvalidSku => self.invalid_sku += 1,
            SkipReason::InvalidCode => self.invalid_code += 1,
            SkipReason::InvalidDate => self.invalid_date += 1,
            SkipReason::LookupMiss => self.lookup_miss += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.invalid_sku + self.invalid_code + self.invalid_date + self.lookup_miss
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolveOutcome {
    pub records: Vec<ResolvedRecord>,
    pub skipped: SkipCounts,
}

/// Rectangle of cells, 1-based and inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRange {
    pub start_col: u32,
    pub start_row: u32,
    pub end_col: u32,
    pub end_row: u32,
}

impl CellRange {
    pub fn new(start_col: u32, start_row: u32, end_col: u32, end_row: u32) -> Self {
        Self {
            start_col: start_col.min(end_col),
            start_row: start_row.min(end_row),
            end_col: start_col.max(end_col),
            end_row: start_row.max(end_row),
        }
    }

    pub fn shifted_rows(&self, offset: u32) -> Self {
        Self {
            start_row: self.start_row + offset,
            end_row: self.end_row + offset,
            ..*self
        }
    }

    pub fn within_rows(&self, first: u32, last: u32) -> bool {
        self.start_row >= first && self.end_row <= last
    }

    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.start_col <= other.end_col
            && other.start_col <= self.end_col
            && self.start_row <= other.end_row
            && other.start_row <= self.end_row
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            column_letters(self.start_col),
            self.start_row,
            column_letters(self.end_col),
            self.end_row
        )
    }
}

/// `1 -> "A"`, `27 -> "AA"`.
pub fn column_letters(mut col: u32) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        col = (col - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Geometry of the template block and where each record's values go inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockLayout {
    pub block_height: u32,
    pub max_col: u32,
    pub data_col: u32,
    pub code_row: u32,
    pub sku_row: u32,
    pub expiry_row: u32,
}

impl Default for BlockLayout {
    fn default() -> Self {
        Self {
            block_height: 25,
            max_col: 5,
            data_col: 4,
            code_row: 8,
            sku_row: 15,
            expiry_row: 24,
        }
    }
}

impl BlockLayout {
    pub fn row_offset(&self, index: usize) -> u32 {
        index as u32 * self.block_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_range_display_and_shift() {
        let range = CellRange::new(1, 1, 5, 2);
        assert_eq!(range.to_string(), "A1:E2");
        assert_eq!(range.shifted_rows(25).to_string(), "A26:E27");
        assert_eq!(CellRange::new(28, 3, 2, 1).to_string(), "B1:AB3");
    }

    #[test]
    fn test_within_rows() {
        let range = CellRange::new(2, 20, 4, 25);
        assert!(range.within_rows(1, 25));
        assert!(!range.within_rows(1, 24));
        assert!(range.overlaps(&CellRange::new(4, 25, 5, 26)));
        assert!(!range.overlaps(&CellRange::new(5, 20, 6, 25)));
    }

    #[test]
    fn test_record_date_strings() {
        let record = ResolvedRecord {
            sku: "3017868".to_string(),
            freshness_code: "J305".to_string(),
            description: "Yogurt".to_string(),
            base_date: NaiveDate::from_ymd_opt(2025, 10, 30).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 11, 4).unwrap(),
        };
        assert_eq!(record.base_date_string(), "30/10/2025");
        assert_eq!(record.expiry_date_string(), "04/11/2025");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["base_date"], "30/10/2025");
        assert_eq!(json["expiry_date"], "04/11/2025");
        assert_eq!(json["sku"], "3017868");
    }
}

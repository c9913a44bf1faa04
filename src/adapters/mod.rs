// Adapters layer: concrete implementations for files the core never touches directly.

pub mod query;
pub mod shelf_table;
pub mod workbook;

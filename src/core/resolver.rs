use crate::core::decoder::{self, FreshnessPattern};
use crate::domain::model::{RawPair, ResolveOutcome, ResolvedRecord, SkipReason};
use crate::domain::ports::ShelfLifeLookup;
use chrono::{Datelike, Days, Local, NaiveDate};

/// Joins freshness codes with the shelf-life table.
///
/// Invalid pairs are filtered out, never reported as errors. Output order follows
/// input order and duplicates are kept, one record per input pair.
pub struct RecordResolver<'a, T: ShelfLifeLookup> {
    table: &'a T,
    pattern: &'a FreshnessPattern,
    reference_year: i32,
}

impl<'a, T: ShelfLifeLookup> RecordResolver<'a, T> {
    pub fn new(table: &'a T, pattern: &'a FreshnessPattern) -> Self {
        Self::with_reference_year(table, pattern, Local::now().year())
    }

    pub fn with_reference_year(table: &'a T, pattern: &'a FreshnessPattern, reference_year: i32) -> Self {
        Self {
            table,
            pattern,
            reference_year,
        }
    }

    pub fn resolve(&self, pairs: &[RawPair]) -> ResolveOutcome {
        let mut outcome = ResolveOutcome::default();

        for (sku, code) in pairs {
            match self.resolve_one(sku, code) {
                Ok(record) => outcome.records.push(record),
                Err(reason) => outcome.skipped.record(reason),
            }
        }

        tracing::info!(
            "Resolved {} of {} items (invalid sku: {}, invalid code: {}, invalid date: {}, not in table: {})",
            outcome.records.len(),
            pairs.len(),
            outcome.skipped.invalid_sku,
            outcome.skipped.invalid_code,
            outcome.skipped.invalid_date,
            outcome.skipped.lookup_miss
        );

        outcome
    }

    fn resolve_one(&self, sku: &str, code: &str) -> Result<ResolvedRecord, SkipReason> {
        if !decoder::validate_sku(sku) {
            tracing::debug!("Skipping malformed SKU {:?}", sku);
            return Err(SkipReason::InvalidSku);
        }
        if !decoder::validate(self.pattern, code) {
            tracing::debug!("Skipping malformed freshness code {:?} for SKU {}", code, sku.trim());
            return Err(SkipReason::InvalidCode);
        }

        let base_date = decoder::decode_date(code, self.reference_year).map_err(|e| {
            tracing::debug!("Skipping {} for SKU {}: {}", code, sku.trim(), e);
            SkipReason::InvalidDate
        })?;

        let sku = sku.trim();
        let entry = self.table.lookup(sku).ok_or_else(|| {
            tracing::warn!("SKU {} not found in shelf-life table", sku);
            SkipReason::LookupMiss
        })?;

        let expiry_date = add_shelf_life(base_date, entry.shelf_life_days).ok_or_else(|| {
            tracing::warn!(
                "Expiry for SKU {} overflows the calendar ({} + {} days)",
                sku,
                base_date,
                entry.shelf_life_days
            );
            SkipReason::InvalidDate
        })?;

        Ok(ResolvedRecord {
            sku: sku.to_string(),
            freshness_code: code.to_string(),
            description: entry.description.clone(),
            base_date,
            expiry_date,
        })
    }
}

pub fn add_shelf_life(base_date: NaiveDate, shelf_life_days: u32) -> Option<NaiveDate> {
    base_date.checked_add_days(Days::new(u64::from(shelf_life_days)))
}

/// One-shot form of [`RecordResolver::resolve`] against the current year.
pub fn resolve<T: ShelfLifeLookup>(table: &T, pattern: &FreshnessPattern, pairs: &[RawPair]) -> ResolveOutcome {
    RecordResolver::new(table, pattern).resolve(pairs)
}

pub mod decoder;
pub mod etl;
pub mod pipeline;
pub mod replicator;
pub mod resolver;

pub use crate::domain::model::{RawPair, ResolveOutcome, ResolvedRecord, SkipCounts};
pub use crate::domain::ports::{ConfigProvider, Pipeline, SheetModel, ShelfLifeLookup};
pub use crate::utils::error::Result;

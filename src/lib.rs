pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{OutputFolder, TomlConfig};

pub use core::{etl::LabelEngine, etl::RunReport, pipeline::LabelPipeline};
pub use utils::error::{LabelError, Result};

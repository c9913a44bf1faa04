pub mod output;
#[cfg(feature = "cli")]
pub mod args;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use args::CliConfig;
pub use output::OutputFolder;
pub use toml_config::TomlConfig;

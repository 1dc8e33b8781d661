//! Configuration loading: raw TOML structures and the multi-source loader

pub mod file_config;
pub mod loader;

pub use file_config::{
    FileConfig, FileLoggingConfig, FileMarketConfig, FileOrchestratorConfig, FileOutputConfig,
    FileOutputFormat, FilePanelConfig,
};
pub use loader::ConfigLoader;

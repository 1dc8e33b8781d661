//! Infrastructure layer for consilium
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod ledger;
pub mod logging;
pub mod panel;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileLoggingConfig, FileMarketConfig, FileOrchestratorConfig,
    FileOutputConfig, FileOutputFormat, FilePanelConfig,
};
pub use ledger::InMemoryTokenLedger;
pub use logging::JsonlConsultationLogger;
pub use panel::ScriptedSpecialist;
pub use store::{InMemoryConsultationStore, InMemoryMarketStore};

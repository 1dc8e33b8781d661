//! Orchestrator configuration from TOML (`[orchestrator]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [orchestrator]
//! per_call_timeout_secs = 50
//! outer_deadline_secs = 90
//! min_responses = 2
//! mode = "normal"          # or "fast"
//! ```

use consilium_domain::CollectionMode;
use serde::{Deserialize, Serialize};

/// Orchestrator section of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// Per-specialist call timeout in seconds
    pub per_call_timeout_secs: u64,
    /// Outer deadline for the whole consultation in seconds
    pub outer_deadline_secs: u64,
    /// Successful responses required before a fast-mode run returns
    pub min_responses: usize,
    /// Collection mode: "normal" or "fast"
    pub mode: String,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        Self {
            per_call_timeout_secs: 50,
            outer_deadline_secs: 90,
            min_responses: 2,
            mode: "normal".to_string(),
        }
    }
}

impl FileOrchestratorConfig {
    /// Parse the mode string, falling back to normal mode
    pub fn parse_mode(&self) -> CollectionMode {
        match self.mode.to_lowercase().as_str() {
            "fast" => CollectionMode::Fast,
            _ => CollectionMode::Normal,
        }
    }

    pub fn mode_is_known(&self) -> bool {
        matches!(self.mode.to_lowercase().as_str(), "normal" | "fast")
    }
}

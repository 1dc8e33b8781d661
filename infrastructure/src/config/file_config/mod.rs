//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod market;
mod orchestrator;
mod output;
mod panel;

pub use logging::FileLoggingConfig;
pub use market::FileMarketConfig;
pub use orchestrator::FileOrchestratorConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use panel::FilePanelConfig;

use consilium_application::ConsultationParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Orchestrator timeouts and collection policy
    pub orchestrator: FileOrchestratorConfig,
    /// Market fees and starting balances
    pub market: FileMarketConfig,
    /// Scripted panel composition
    pub panel: FilePanelConfig,
    /// Structured event logging
    pub logging: FileLoggingConfig,
    /// Console output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Build the application-layer consultation parameters
    pub fn consultation_params(&self) -> ConsultationParams {
        ConsultationParams::default()
            .with_per_call_timeout(Duration::from_secs(self.orchestrator.per_call_timeout_secs))
            .with_outer_deadline(Duration::from_secs(self.orchestrator.outer_deadline_secs))
            .with_min_responses(self.orchestrator.min_responses)
            .with_base_fee(self.market.base_fee)
    }

    /// Validate the configuration, returning human-readable issues.
    ///
    /// Issues are warnings: loading proceeds on defaults where a value
    /// cannot be used.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.orchestrator.mode_is_known() {
            issues.push(format!(
                "orchestrator.mode: unknown value '{}', falling back to 'normal'",
                self.orchestrator.mode
            ));
        }
        if self.orchestrator.min_responses == 0 {
            issues.push("orchestrator.min_responses: 0 is clamped to 1".to_string());
        }

        let (specialties, mut panel_issues) = self.panel.parse_specialties();
        issues.append(&mut panel_issues);
        if specialties.is_empty() {
            issues.push("panel.specialties: no usable specialty tags".to_string());
        }

        issues
    }
}

//! Panel configuration from TOML (`[panel]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [panel]
//! specialties = ["coordination", "pain_management", "movement"]
//! latency_ms = 0
//! ```

use consilium_domain::Specialty;
use serde::{Deserialize, Serialize};

/// Panel section of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePanelConfig {
    /// Specialty tags of the scripted panel; aliases accepted
    pub specialties: Vec<String>,
    /// Simulated reasoning latency for scripted specialists, in ms
    pub latency_ms: u64,
}

impl Default for FilePanelConfig {
    fn default() -> Self {
        Self {
            specialties: Specialty::all()
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            latency_ms: 0,
        }
    }
}

impl FilePanelConfig {
    /// Parse the configured tags; unknown tags are returned as issues
    pub fn parse_specialties(&self) -> (Vec<Specialty>, Vec<String>) {
        let mut specialties = Vec::new();
        let mut issues = Vec::new();

        for tag in &self.specialties {
            match tag.parse::<Specialty>() {
                Ok(specialty) => {
                    if !specialties.contains(&specialty) {
                        specialties.push(specialty);
                    }
                }
                Err(e) => issues.push(format!("panel.specialties: {}", e)),
            }
        }

        (specialties, issues)
    }
}

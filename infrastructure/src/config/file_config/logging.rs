//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logging section of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Path for the JSONL consultation event log; unset disables it
    pub consultation_log: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_path_disables_log() {
        assert!(FileLoggingConfig::default().consultation_log.is_none());
    }

    #[test]
    fn test_path_parses() {
        let config: FileLoggingConfig =
            toml::from_str("consultation_log = \".consilium/events.jsonl\"").unwrap();
        assert_eq!(
            config.consultation_log,
            Some(PathBuf::from(".consilium/events.jsonl"))
        );
    }
}

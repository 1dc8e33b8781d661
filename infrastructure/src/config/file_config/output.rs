//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileOutputFormat {
    /// Full report: plan, conference, market movements
    #[default]
    Full,
    /// Report summary only
    Summary,
    /// Machine-readable JSON
    Json,
}

/// Output section of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileOutputConfig {
    pub format: FileOutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parses_from_toml() {
        let config: FileOutputConfig = toml::from_str("format = \"json\"").unwrap();
        assert_eq!(config.format, FileOutputFormat::Json);
    }

    #[test]
    fn test_default_is_full() {
        assert_eq!(FileOutputConfig::default().format, FileOutputFormat::Full);
    }
}

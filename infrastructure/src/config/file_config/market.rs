//! Market configuration from TOML (`[market]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [market]
//! base_fee = 10
//! starting_balance = 1000
//! ```

use serde::{Deserialize, Serialize};

/// Market section of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMarketConfig {
    /// Base consultation fee before multipliers
    pub base_fee: u64,
    /// Starting token balance for fresh agent accounts
    pub starting_balance: u64,
}

impl Default for FileMarketConfig {
    fn default() -> Self {
        Self {
            base_fee: 10,
            starting_balance: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileMarketConfig::default();
        assert_eq!(config.base_fee, 10);
        assert_eq!(config.starting_balance, 1000);
    }
}

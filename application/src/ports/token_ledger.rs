//! Token ledger port
//!
//! The market computes token *amounts*; moving them is the ledger's
//! business. Persistence and settlement verification live behind this
//! trait, outside the core.

use async_trait::async_trait;
use consilium_domain::AgentId;
use thiserror::Error;

/// Errors that can occur in ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Insufficient balance: have {available}, need {required}")]
    InsufficientBalance { available: u64, required: u64 },

    #[error("Ledger error: {0}")]
    Other(String),
}

/// Token account operations for agents
#[async_trait]
pub trait TokenLedger: Send + Sync {
    /// Credit tokens to an agent's account
    async fn credit(&self, agent: &AgentId, amount: u64) -> Result<(), LedgerError>;

    /// Debit tokens from an agent's account.
    ///
    /// Fails with [`LedgerError::InsufficientBalance`] rather than going
    /// negative.
    async fn debit(&self, agent: &AgentId, amount: u64) -> Result<(), LedgerError>;

    /// Current balance of an agent's account
    async fn balance(&self, agent: &AgentId) -> Result<u64, LedgerError>;
}

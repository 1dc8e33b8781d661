//! In-memory token ledger adapter.
//!
//! Account-keyed by agent id, no negative balances, atomic operations
//! behind a single `RwLock`. Accounts spring into existence at the
//! configured starting balance on first touch, so a fresh process can
//! run consultations without a provisioning step. Persistence and
//! settlement verification belong to an external ledger; this adapter
//! only keeps the amounts.

use async_trait::async_trait;
use consilium_application::ports::token_ledger::{LedgerError, TokenLedger};
use consilium_domain::AgentId;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory [`TokenLedger`] implementation
pub struct InMemoryTokenLedger {
    starting_balance: u64,
    balances: RwLock<HashMap<AgentId, u64>>,
}

impl InMemoryTokenLedger {
    pub fn new(starting_balance: u64) -> Self {
        Self {
            starting_balance,
            balances: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot of every known account, sorted by agent id
    pub async fn snapshot(&self) -> Vec<(AgentId, u64)> {
        let balances = self.balances.read().await;
        let mut entries: Vec<(AgentId, u64)> =
            balances.iter().map(|(k, v)| (k.clone(), *v)).collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }
}

#[async_trait]
impl TokenLedger for InMemoryTokenLedger {
    async fn credit(&self, agent: &AgentId, amount: u64) -> Result<(), LedgerError> {
        let mut balances = self.balances.write().await;
        let balance = balances
            .entry(agent.clone())
            .or_insert(self.starting_balance);
        *balance += amount;
        debug!("Credited {} to {}; balance now {}", amount, agent, balance);
        Ok(())
    }

    async fn debit(&self, agent: &AgentId, amount: u64) -> Result<(), LedgerError> {
        let mut balances = self.balances.write().await;
        let balance = balances
            .entry(agent.clone())
            .or_insert(self.starting_balance);
        if *balance < amount {
            return Err(LedgerError::InsufficientBalance {
                available: *balance,
                required: amount,
            });
        }
        *balance -= amount;
        debug!("Debited {} from {}; balance now {}", amount, agent, balance);
        Ok(())
    }

    async fn balance(&self, agent: &AgentId) -> Result<u64, LedgerError> {
        let mut balances = self.balances.write().await;
        Ok(*balances
            .entry(agent.clone())
            .or_insert(self.starting_balance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_accounts_start_at_configured_balance() {
        let ledger = InMemoryTokenLedger::new(500);
        assert_eq!(ledger.balance(&"pain-1".into()).await.unwrap(), 500);
    }

    #[tokio::test]
    async fn test_credit_and_debit() {
        let ledger = InMemoryTokenLedger::new(100);
        let agent: AgentId = "move-1".into();

        ledger.credit(&agent, 40).await.unwrap();
        ledger.debit(&agent, 30).await.unwrap();
        assert_eq!(ledger.balance(&agent).await.unwrap(), 110);
    }

    #[tokio::test]
    async fn test_debit_never_goes_negative() {
        let ledger = InMemoryTokenLedger::new(10);
        let agent: AgentId = "psy-1".into();

        let result = ledger.debit(&agent, 25).await;
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance {
                available: 10,
                required: 25
            })
        ));
        // The failed debit left the balance untouched
        assert_eq!(ledger.balance(&agent).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_snapshot_is_sorted() {
        let ledger = InMemoryTokenLedger::new(100);
        ledger.credit(&"b-agent".into(), 1).await.unwrap();
        ledger.credit(&"a-agent".into(), 1).await.unwrap();

        let snapshot = ledger.snapshot().await;
        assert_eq!(snapshot[0].0.as_str(), "a-agent");
        assert_eq!(snapshot[1].0.as_str(), "b-agent");
    }
}

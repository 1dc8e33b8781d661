//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod consultation_log;
pub mod progress;
pub mod specialist;
pub mod store;
pub mod token_ledger;

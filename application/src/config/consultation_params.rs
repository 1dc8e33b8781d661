//! Consultation execution parameters.
//!
//! [`ConsultationParams`] groups the static parameters that control a
//! consultation run in
//! [`RunConsultationUseCase`](crate::use_cases::run_consultation::RunConsultationUseCase).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Consultation run control parameters.
///
/// Controls per-specialist and whole-run timeouts, the fast-mode quorum
/// size, and the base consultation fee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationParams {
    /// Timeout for each individual specialist call.
    pub per_call_timeout: Duration,
    /// Outer deadline bounding the whole consultation, including the
    /// conference round and synthesis.
    pub outer_deadline: Duration,
    /// Successful responses required before a fast-mode run returns.
    pub min_responses: usize,
    /// Base consultation fee credited to each participating agent,
    /// before complexity and performance multipliers.
    pub base_fee: u64,
}

impl Default for ConsultationParams {
    fn default() -> Self {
        Self {
            per_call_timeout: Duration::from_secs(50),
            outer_deadline: Duration::from_secs(90),
            min_responses: 2,
            base_fee: 10,
        }
    }
}

impl ConsultationParams {
    // ==================== Builder Methods ====================

    pub fn with_per_call_timeout(mut self, timeout: Duration) -> Self {
        self.per_call_timeout = timeout;
        self
    }

    pub fn with_outer_deadline(mut self, deadline: Duration) -> Self {
        self.outer_deadline = deadline;
        self
    }

    pub fn with_min_responses(mut self, min: usize) -> Self {
        self.min_responses = min.max(1);
        self
    }

    pub fn with_base_fee(mut self, fee: u64) -> Self {
        self.base_fee = fee;
        self
    }
}

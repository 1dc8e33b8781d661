//! Rolling per-agent performance records and whole-market statistics.
//!
//! Records mutate on every resolution event and are never deleted; the
//! rolling averages feed both the consultation-fee performance multiplier
//! and the market statistics surface.

use crate::core::AgentId;
use crate::market::resolution::AgentSettlement;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Running accuracy for one dimension name
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DimensionStats {
    pub resolutions: u64,
    pub accuracy_sum: f64,
}

impl DimensionStats {
    pub fn average(&self) -> f64 {
        if self.resolutions == 0 {
            0.0
        } else {
            self.accuracy_sum / self.resolutions as f64
        }
    }
}

/// Running totals for one agent across every consultation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentPerformanceRecord {
    pub agent_id: AgentId,
    /// Prediction dimensions committed at initiation time
    pub predictions_made: u64,
    pub total_staked: u64,
    pub total_won: u64,
    pub total_lost: u64,
    /// Count of resolution events that scored this agent
    pub resolutions: u64,
    accuracy_sum: f64,
    /// Per-dimension running accuracy
    pub per_dimension: HashMap<String, DimensionStats>,
}

impl AgentPerformanceRecord {
    pub fn new(agent_id: AgentId) -> Self {
        Self {
            agent_id,
            predictions_made: 0,
            total_staked: 0,
            total_won: 0,
            total_lost: 0,
            resolutions: 0,
            accuracy_sum: 0.0,
            per_dimension: HashMap::new(),
        }
    }

    /// Record a fresh initiation: dimensions committed and tokens staked
    pub fn record_initiation(&mut self, dimensions: u64, staked: u64) {
        self.predictions_made += dimensions;
        self.total_staked += staked;
    }

    /// Fold one settlement into the rolling statistics.
    ///
    /// Called on every resolution event, not only the first for a
    /// consultation.
    pub fn record_settlement(&mut self, settlement: &AgentSettlement) {
        self.resolutions += 1;
        self.accuracy_sum += settlement.accuracy;
        self.total_won += settlement.tokens_won;
        self.total_lost += settlement.tokens_lost;

        for (name, accuracy) in &settlement.dimension_accuracy {
            let stats = self.per_dimension.entry(name.clone()).or_default();
            stats.resolutions += 1;
            stats.accuracy_sum += accuracy;
        }
    }

    /// Rolling average accuracy across all resolutions (0.0 to 1.0)
    pub fn average_accuracy(&self) -> f64 {
        if self.resolutions == 0 {
            0.0
        } else {
            self.accuracy_sum / self.resolutions as f64
        }
    }

    /// Fee multiplier rewarding historically accurate agents:
    /// `1.0 + clamp(avg_accuracy - 0.5, 0, 0.5)`.
    ///
    /// Agents without history earn the neutral 1.0.
    pub fn performance_multiplier(&self) -> f64 {
        if self.resolutions == 0 {
            return 1.0;
        }
        1.0 + (self.average_accuracy() - 0.5).clamp(0.0, 0.5)
    }
}

/// Whole-market statistics snapshot
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MarketStats {
    pub prediction_sets: usize,
    pub active_sets: usize,
    pub resolved_sets: usize,
    pub total_staked: u64,
    pub total_won: u64,
    pub total_lost: u64,
    pub resolutions: u64,
    pub tracked_agents: usize,
}

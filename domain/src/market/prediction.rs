//! Prediction generation and non-linear staking.
//!
//! At consultation start every participating agent commits to a set of
//! outcome dimensions and stakes tokens on each. The cubic stake curve
//! makes high self-declared confidence disproportionately expensive,
//! while the balance-share and absolute caps bound tail risk.

use crate::core::{AgentId, CaseInput, ConsultationId, Specialty};
use serde::{Deserialize, Serialize};

/// Absolute per-dimension stake cap
const STAKE_CAP: f64 = 50.0;
/// Share of the agent's balance a single stake may consume
const BALANCE_SHARE_CAP: f64 = 0.2;

/// A predicted or observed outcome value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutcomeValue {
    Bool(bool),
    Number(f64),
}

impl OutcomeValue {
    /// Coerce to a boolean; numbers at or above 0.5 read as true
    pub fn as_bool(&self) -> bool {
        match self {
            OutcomeValue::Bool(b) => *b,
            OutcomeValue::Number(n) => *n >= 0.5,
        }
    }

    /// Coerce to a number; booleans read as 0.0 / 1.0
    pub fn as_number(&self) -> f64 {
        match self {
            OutcomeValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            OutcomeValue::Number(n) => *n,
        }
    }
}

/// Kind of a prediction dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DimensionKind {
    /// Hit or miss
    Binary,
    /// Continuous value inside [min, max]; accuracy falls linearly and
    /// zeroes at half the range
    Range { min: f64, max: f64 },
    /// Day-count prediction scored on stepped brackets
    TimelineDays,
}

/// One staked outcome dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionDimension {
    pub name: String,
    pub kind: DimensionKind,
    pub predicted: OutcomeValue,
    /// Self-declared confidence for this dimension (0.0 to 1.0)
    pub confidence: f64,
    /// Tokens staked, computed by [`compute_stake`]
    pub stake: u64,
}

/// `round(min(5 x confidence^3, 0.2 x balance, 50))`
///
/// The cubic term discourages cheap overconfidence; the two caps keep a
/// losing streak survivable.
pub fn compute_stake(confidence: f64, balance: u64) -> u64 {
    let confidence = confidence.clamp(0.0, 1.0);
    let raw = 5.0 * confidence.powi(3);
    let capped = raw.min(BALANCE_SHARE_CAP * balance as f64).min(STAKE_CAP);
    capped.round() as u64
}

/// All predictions one agent holds for a consultation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentPrediction {
    pub agent_id: AgentId,
    pub specialty: Specialty,
    pub dimensions: Vec<PredictionDimension>,
}

impl AgentPrediction {
    /// Generate this agent's dimension set for a case and stake each one
    /// against the given balance snapshot.
    pub fn generate(
        agent_id: AgentId,
        specialty: Specialty,
        case: &CaseInput,
        confidence: f64,
        balance: u64,
    ) -> Self {
        let dimensions = dimension_templates(specialty, case, confidence)
            .into_iter()
            .map(|(name, kind, predicted, dim_confidence)| PredictionDimension {
                name: name.to_string(),
                kind,
                predicted,
                confidence: dim_confidence,
                stake: compute_stake(dim_confidence, balance),
            })
            .collect();

        Self {
            agent_id,
            specialty,
            dimensions,
        }
    }

    pub fn total_stake(&self) -> u64 {
        self.dimensions.iter().map(|d| d.stake).sum()
    }
}

/// Lifecycle status of a prediction set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSetStatus {
    Active,
    Resolved,
}

/// The predictions of every participating agent for one consultation
///
/// Invariant: an agent id appears at most once, however many times
/// initiation runs (fast-mode flows initiate for the triage agent first
/// and for the remaining panel later).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionSet {
    pub consultation_id: ConsultationId,
    pub predictions: Vec<AgentPrediction>,
    pub status: PredictionSetStatus,
}

impl PredictionSet {
    pub fn new(consultation_id: ConsultationId) -> Self {
        Self {
            consultation_id,
            predictions: Vec::new(),
            status: PredictionSetStatus::Active,
        }
    }

    pub fn has_agent(&self, agent_id: &AgentId) -> bool {
        self.predictions.iter().any(|p| &p.agent_id == agent_id)
    }

    /// Merge in predictions for agents not already represented.
    ///
    /// Returns how many were actually added; duplicates are dropped.
    pub fn merge(&mut self, incoming: Vec<AgentPrediction>) -> usize {
        let mut added = 0;
        for prediction in incoming {
            if !self.has_agent(&prediction.agent_id) {
                self.predictions.push(prediction);
                added += 1;
            }
        }
        added
    }

    pub fn total_stake(&self) -> u64 {
        self.predictions.iter().map(|p| p.total_stake()).sum()
    }

    pub fn agent_count(&self) -> usize {
        self.predictions.len()
    }

    pub fn mark_resolved(&mut self) {
        self.status = PredictionSetStatus::Resolved;
    }
}

/// Dimension templates per specialty.
///
/// Every agent predicts binary `user_satisfaction`; the rest derive
/// deterministically from the declared specialty. Predicted values are
/// conservative functions of the case picture and the agent's own
/// confidence.
fn dimension_templates(
    specialty: Specialty,
    case: &CaseInput,
    confidence: f64,
) -> Vec<(&'static str, DimensionKind, OutcomeValue, f64)> {
    let confidence = confidence.clamp(0.0, 1.0);
    let pain = f64::from(case.pain_level);

    let mut dims = vec![(
        "user_satisfaction",
        DimensionKind::Binary,
        OutcomeValue::Bool(confidence >= 0.5),
        confidence,
    )];

    match specialty {
        Specialty::PainManagement => {
            dims.push((
                "pain_reduction_day7",
                DimensionKind::Range { min: 0.0, max: 10.0 },
                OutcomeValue::Number((pain * 0.4 * confidence).min(10.0)),
                confidence,
            ));
            dims.push((
                "pain_reduction_percentage",
                DimensionKind::Range { min: 0.0, max: 100.0 },
                OutcomeValue::Number((60.0 * confidence).min(100.0)),
                confidence * 0.9,
            ));
        }
        Specialty::Movement => {
            dims.push((
                "mobility_improvement",
                DimensionKind::Range { min: 0.0, max: 100.0 },
                OutcomeValue::Number((50.0 * confidence).min(100.0)),
                confidence,
            ));
            dims.push((
                "rom_restoration",
                DimensionKind::Range { min: 0.0, max: 100.0 },
                OutcomeValue::Number((70.0 * confidence).min(100.0)),
                confidence * 0.9,
            ));
        }
        Specialty::Strength => {
            dims.push((
                "functional_restoration",
                DimensionKind::Range { min: 0.0, max: 100.0 },
                OutcomeValue::Number((65.0 * confidence).min(100.0)),
                confidence,
            ));
            dims.push((
                "return_to_activity_days",
                DimensionKind::TimelineDays,
                OutcomeValue::Number(21.0 + f64::from(case.duration_weeks).min(12.0) * 2.0),
                confidence * 0.8,
            ));
        }
        Specialty::Psychology => {
            dims.push((
                "adherence_rate",
                DimensionKind::Range { min: 0.0, max: 100.0 },
                OutcomeValue::Number((75.0 * confidence).min(100.0)),
                confidence,
            ));
            dims.push((
                "psychological_improvement",
                DimensionKind::Binary,
                OutcomeValue::Bool(confidence >= 0.4),
                confidence * 0.9,
            ));
        }
        Specialty::Coordination => {
            dims.push((
                "md_approval",
                DimensionKind::Binary,
                OutcomeValue::Bool(confidence >= 0.5),
                confidence,
            ));
            dims.push((
                "phase_transition_days",
                DimensionKind::TimelineDays,
                OutcomeValue::Number(14.0 + pain),
                confidence * 0.8,
            ));
        }
    }

    dims
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stake_balance_cap_binds_first() {
        // Raw cubic value is 5, but 20% of balance 10 is 2
        assert_eq!(compute_stake(1.0, 10), 2);
    }

    #[test]
    fn test_stake_cubic_discourages_overconfidence() {
        let low = compute_stake(0.5, 1000);
        let high = compute_stake(1.0, 1000);
        // 5 * 0.125 rounds to 1; full confidence costs 5
        assert_eq!(low, 1);
        assert_eq!(high, 5);
    }

    #[test]
    fn test_stake_never_exceeds_caps() {
        for balance in [0u64, 3, 10, 100, 10_000] {
            for confidence in [0.0, 0.3, 0.7, 1.0] {
                let stake = compute_stake(confidence, balance);
                assert!(stake <= 5);
                assert!(stake <= 50);
                assert!(stake as f64 <= (0.2 * balance as f64).round());
            }
        }
    }

    #[test]
    fn test_every_specialty_predicts_satisfaction_plus_two() {
        let case = CaseInput::new("test", 6, 4);
        for specialty in Specialty::all() {
            let prediction =
                AgentPrediction::generate("a-1".into(), specialty, &case, 0.8, 1000);
            assert_eq!(prediction.dimensions.len(), 3);
            assert_eq!(prediction.dimensions[0].name, "user_satisfaction");
        }
    }

    #[test]
    fn test_merge_is_idempotent_by_agent_id() {
        let case = CaseInput::new("test", 4, 2);
        let mut set = PredictionSet::new(ConsultationId::from_raw("cons_test"));

        let first = vec![
            AgentPrediction::generate("coord-1".into(), Specialty::Coordination, &case, 0.7, 500),
        ];
        let second = vec![
            AgentPrediction::generate("coord-1".into(), Specialty::Coordination, &case, 0.9, 500),
            AgentPrediction::generate("pain-1".into(), Specialty::PainManagement, &case, 0.6, 500),
        ];

        assert_eq!(set.merge(first), 1);
        assert_eq!(set.merge(second), 1);
        assert_eq!(set.agent_count(), 2);

        // The original coord-1 prediction survived the second call
        let coord = set
            .predictions
            .iter()
            .find(|p| p.agent_id.as_str() == "coord-1")
            .unwrap();
        assert_eq!(coord.dimensions[0].confidence, 0.7);
    }

    #[test]
    fn test_total_stake_sums_dimensions() {
        let case = CaseInput::new("test", 4, 2);
        let prediction =
            AgentPrediction::generate("pain-1".into(), Specialty::PainManagement, &case, 1.0, 1000);
        let expected: u64 = prediction.dimensions.iter().map(|d| d.stake).sum();
        assert_eq!(prediction.total_stake(), expected);
        assert!(expected > 0);
    }
}

//! Cascading resolution: settling predictions against prioritized
//! ground-truth sources.
//!
//! A resolve payload may carry outcomes from several sources at once;
//! strict priority picks exactly one: `follow_up > user_modal >
//! md_review > inter_agent`. In practice each call supplies one source
//! and the market is re-invoked as richer feedback arrives - the
//! inter-agent baseline right after the dialogue round, then MD review,
//! user modal, and follow-up check-ins.

use crate::core::{AgentId, ConsultationId, timestamp_ms};
use crate::market::prediction::{AgentPrediction, OutcomeValue, PredictionSet};
use crate::market::scoring::{OutcomeSet, score_dimension};
use serde::{Deserialize, Serialize};

/// Where a resolution's ground truth came from, in ascending authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    InterAgent,
    MdReview,
    UserModal,
    FollowUp,
}

impl ResolutionSource {
    /// Authority rank; higher wins when a payload carries several sources
    pub fn priority(&self) -> u8 {
        match self {
            ResolutionSource::InterAgent => 0,
            ResolutionSource::MdReview => 1,
            ResolutionSource::UserModal => 2,
            ResolutionSource::FollowUp => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionSource::InterAgent => "inter_agent",
            ResolutionSource::MdReview => "md_review",
            ResolutionSource::UserModal => "user_modal",
            ResolutionSource::FollowUp => "follow_up",
        }
    }
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResolutionSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inter_agent" | "inter-agent" => Ok(ResolutionSource::InterAgent),
            "md_review" | "md-review" => Ok(ResolutionSource::MdReview),
            "user_modal" | "user-modal" => Ok(ResolutionSource::UserModal),
            "follow_up" | "follow-up" | "followup" => Ok(ResolutionSource::FollowUp),
            other => Err(format!("unknown resolution source: {other}")),
        }
    }
}

/// Outcomes from up to four sources, as delivered by callers
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResolutionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<OutcomeSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_modal: Option<OutcomeSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md_review: Option<OutcomeSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inter_agent: Option<OutcomeSet>,
}

impl ResolutionPayload {
    /// Payload carrying a single source
    pub fn from_source(source: ResolutionSource, outcomes: OutcomeSet) -> Self {
        let mut payload = Self::default();
        match source {
            ResolutionSource::FollowUp => payload.follow_up = Some(outcomes),
            ResolutionSource::UserModal => payload.user_modal = Some(outcomes),
            ResolutionSource::MdReview => payload.md_review = Some(outcomes),
            ResolutionSource::InterAgent => payload.inter_agent = Some(outcomes),
        }
        payload
    }

    /// Pick the highest-priority source present
    pub fn select(&self) -> Option<(ResolutionSource, &OutcomeSet)> {
        if let Some(outcomes) = &self.follow_up {
            return Some((ResolutionSource::FollowUp, outcomes));
        }
        if let Some(outcomes) = &self.user_modal {
            return Some((ResolutionSource::UserModal, outcomes));
        }
        if let Some(outcomes) = &self.md_review {
            return Some((ResolutionSource::MdReview, outcomes));
        }
        self.inter_agent
            .as_ref()
            .map(|outcomes| (ResolutionSource::InterAgent, outcomes))
    }
}

/// One agent's scored result for a resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettlement {
    pub agent_id: AgentId,
    /// Accuracy per dimension name, in prediction order
    pub dimension_accuracy: Vec<(String, f64)>,
    /// Mean accuracy across dimensions (0.0 to 1.0)
    pub accuracy: f64,
    pub tokens_won: u64,
    pub tokens_lost: u64,
    /// `tokens_won - tokens_lost`
    pub net_change: i64,
}

/// Settle one agent's predictions against observed outcomes.
///
/// `won = round(stake_total x accuracy x 2)`,
/// `lost = round(stake_total x (1 - accuracy))`.
pub fn settle_agent(prediction: &AgentPrediction, outcomes: &OutcomeSet) -> AgentSettlement {
    let dimension_accuracy: Vec<(String, f64)> = prediction
        .dimensions
        .iter()
        .map(|d| (d.name.clone(), score_dimension(d, outcomes.get(&d.name))))
        .collect();

    let accuracy = if dimension_accuracy.is_empty() {
        0.0
    } else {
        dimension_accuracy.iter().map(|(_, a)| a).sum::<f64>() / dimension_accuracy.len() as f64
    };

    let stake_total = prediction.total_stake() as f64;
    let tokens_won = (stake_total * accuracy * 2.0).round() as u64;
    let tokens_lost = (stake_total * (1.0 - accuracy)).round() as u64;

    AgentSettlement {
        agent_id: prediction.agent_id.clone(),
        dimension_accuracy,
        accuracy,
        tokens_won,
        tokens_lost,
        net_change: tokens_won as i64 - tokens_lost as i64,
    }
}

/// A consultation's resolution record.
///
/// Overwritten on every resolve call; ledger deltas from each call are
/// nonetheless cumulative (incremental reward shaping, preserved as
/// specified).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    pub consultation_id: ConsultationId,
    pub source: ResolutionSource,
    pub outcomes: OutcomeSet,
    pub settlements: Vec<AgentSettlement>,
    pub resolved_at_ms: u64,
}

impl Resolution {
    /// Settle every agent of a prediction set against the outcomes
    pub fn settle(
        set: &PredictionSet,
        source: ResolutionSource,
        outcomes: &OutcomeSet,
    ) -> Self {
        let settlements = set
            .predictions
            .iter()
            .map(|p| settle_agent(p, outcomes))
            .collect();
        Self {
            consultation_id: set.consultation_id.clone(),
            source,
            outcomes: outcomes.clone(),
            settlements,
            resolved_at_ms: timestamp_ms(),
        }
    }
}

/// Agreement figure for the baseline inter-agent resolution:
/// `max(0.3, 1 - 0.2 x disagreements)`
pub fn inter_agent_agreement(disagreement_count: usize) -> f64 {
    (1.0 - 0.2 * disagreement_count as f64).max(0.3)
}

/// Build the provisional outcome set the orchestrator feeds the market
/// right after the dialogue round.
///
/// `user_satisfaction` is proxied by the panel's mean confidence; the
/// agreement figure rides along under its own key for observability.
/// Every other dimension stays absent and scores neutral.
pub fn inter_agent_outcomes(disagreement_count: usize, mean_confidence: f64) -> OutcomeSet {
    let mut outcomes = OutcomeSet::new();
    outcomes.insert(
        "user_satisfaction".to_string(),
        OutcomeValue::Bool(mean_confidence >= 0.6),
    );
    outcomes.insert(
        "inter_agent_agreement".to_string(),
        OutcomeValue::Number(inter_agent_agreement(disagreement_count)),
    );
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CaseInput, Specialty};

    #[test]
    fn test_source_priority_order() {
        assert!(ResolutionSource::FollowUp.priority() > ResolutionSource::UserModal.priority());
        assert!(ResolutionSource::UserModal.priority() > ResolutionSource::MdReview.priority());
        assert!(ResolutionSource::MdReview.priority() > ResolutionSource::InterAgent.priority());
    }

    #[test]
    fn test_payload_select_prefers_follow_up() {
        let mut payload = ResolutionPayload::default();
        payload.inter_agent = Some(OutcomeSet::new());
        payload.md_review = Some(OutcomeSet::new());
        payload.follow_up = Some(OutcomeSet::new());

        let (source, _) = payload.select().unwrap();
        assert_eq!(source, ResolutionSource::FollowUp);
    }

    #[test]
    fn test_empty_payload_selects_nothing() {
        assert!(ResolutionPayload::default().select().is_none());
    }

    #[test]
    fn test_inter_agent_agreement_values() {
        assert_eq!(inter_agent_agreement(0), 1.0);
        assert!((inter_agent_agreement(1) - 0.8).abs() < 1e-9);
        assert_eq!(inter_agent_agreement(10), 0.3);
    }

    #[test]
    fn test_settle_agent_full_accuracy_doubles_stake() {
        let case = CaseInput::new("test", 5, 4);
        let prediction = AgentPrediction::generate(
            "psy-1".into(),
            Specialty::Psychology,
            &case,
            0.8,
            1000,
        );
        let stake = prediction.total_stake();

        // Feed every dimension its own predicted value: accuracy 1.0
        let mut outcomes = OutcomeSet::new();
        for d in &prediction.dimensions {
            outcomes.insert(d.name.clone(), d.predicted);
        }

        let settlement = settle_agent(&prediction, &outcomes);
        assert_eq!(settlement.accuracy, 1.0);
        assert_eq!(settlement.tokens_won, stake * 2);
        assert_eq!(settlement.tokens_lost, 0);
        assert_eq!(settlement.net_change, (stake * 2) as i64);
    }

    #[test]
    fn test_settle_agent_neutral_on_empty_outcomes() {
        let case = CaseInput::new("test", 5, 4);
        let prediction = AgentPrediction::generate(
            "move-1".into(),
            Specialty::Movement,
            &case,
            0.9,
            1000,
        );
        let settlement = settle_agent(&prediction, &OutcomeSet::new());
        assert!((settlement.accuracy - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_source_parse_round_trip() {
        for source in [
            ResolutionSource::InterAgent,
            ResolutionSource::MdReview,
            ResolutionSource::UserModal,
            ResolutionSource::FollowUp,
        ] {
            let parsed: ResolutionSource = source.as_str().parse().unwrap();
            assert_eq!(parsed, source);
        }
        assert!("tea_leaves".parse::<ResolutionSource>().is_err());
    }
}

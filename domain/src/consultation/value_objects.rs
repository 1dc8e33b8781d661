//! Consultation value objects - immutable per-specialist result types.
//!
//! These types represent what a single specialist contributes to a
//! consultation:
//! - [`AssessmentResult`] - The machine-parseable envelope an agent returns
//! - [`SpecialistResponse`] - The envelope plus collection metadata
//!   (status, confidence, latency)

use crate::conference::entities::PeerQuestion;
use crate::core::{AgentId, Specialty};
use serde::{Deserialize, Serialize};

/// Ordinal clinical-importance rating across the panel
///
/// Ordered `Low < Moderate < High < Critical`; the ordinal gap between
/// two agents' ratings feeds importance-conflict detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClinicalImportance {
    Low,
    #[default]
    Moderate,
    High,
    Critical,
}

impl ClinicalImportance {
    /// Ordinal rank, for spread comparisons
    pub fn rank(&self) -> u8 {
        match self {
            ClinicalImportance::Low => 0,
            ClinicalImportance::Moderate => 1,
            ClinicalImportance::High => 2,
            ClinicalImportance::Critical => 3,
        }
    }
}

impl std::fmt::Display for ClinicalImportance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClinicalImportance::Low => "low",
            ClinicalImportance::Moderate => "moderate",
            ClinicalImportance::High => "high",
            ClinicalImportance::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

/// How far an agent's dispute of a peer's baseline goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeExtent {
    Partial,
    Full,
}

/// An explicit dispute one agent raises against another's assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentDispute {
    /// The specialty whose baseline is being disputed
    pub target: Specialty,
    /// What the dispute is about
    pub topic: String,
    /// Partial or full disagreement
    pub extent: DisputeExtent,
}

/// A single intervention recommendation with a 1-5 priority
///
/// Priority 1 is most urgent. The normalized intervention name is the
/// key for cross-agent priority-conflict detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub intervention: String,
    pub priority: u8,
}

impl Recommendation {
    pub fn new(intervention: impl Into<String>, priority: u8) -> Self {
        Self {
            intervention: intervention.into(),
            priority: priority.clamp(1, 5),
        }
    }

    /// Normalized intervention key: lowercased, whitespace collapsed
    pub fn normalized_intervention(&self) -> String {
        self.intervention
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The machine-parseable envelope a specialist returns for a case
///
/// Agents are asked for this structure first; free-text fallback parsing
/// only fills the gaps the envelope leaves (see the conference module).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AssessmentResult {
    /// Narrative assessment
    pub summary: String,
    /// Recommended interventions with priorities
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    /// Overall clinical importance this agent assigns the case
    #[serde(default)]
    pub importance: ClinicalImportance,
    /// Expected recovery timeline in days, when the agent commits to one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_timeline_days: Option<u32>,
    /// Questions directed at named peer specialists
    #[serde(default)]
    pub peer_questions: Vec<PeerQuestion>,
    /// Explicit disagreements with peers' baselines
    #[serde(default)]
    pub disputes: Vec<AssessmentDispute>,
}

impl AssessmentResult {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Default::default()
        }
    }

    pub fn with_recommendations(mut self, recommendations: Vec<Recommendation>) -> Self {
        self.recommendations = recommendations;
        self
    }

    pub fn with_importance(mut self, importance: ClinicalImportance) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_timeline_days(mut self, days: u32) -> Self {
        self.expected_timeline_days = Some(days);
        self
    }

    pub fn with_peer_questions(mut self, questions: Vec<PeerQuestion>) -> Self {
        self.peer_questions = questions;
        self
    }

    pub fn with_disputes(mut self, disputes: Vec<AssessmentDispute>) -> Self {
        self.disputes = disputes;
        self
    }
}

/// Collection status of a specialist's response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Failed,
    Skipped,
}

/// One specialist's contribution to a consultation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistResponse {
    /// The agent that produced this response
    pub agent_id: AgentId,
    /// The agent's specialty tag
    pub specialty: Specialty,
    /// The assessment envelope, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<AssessmentResult>,
    /// Self-declared confidence (0.0 to 1.0)
    pub confidence: f64,
    /// How much specialty-relevant input was available (0.0 to 1.0)
    pub data_completeness: f64,
    /// Collection status
    pub status: ResponseStatus,
    /// Wall-clock latency of the specialist call
    pub latency_ms: u64,
    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SpecialistResponse {
    /// Creates a successful response from a specialist.
    pub fn success(
        agent_id: AgentId,
        specialty: Specialty,
        assessment: AssessmentResult,
        confidence: f64,
        data_completeness: f64,
        latency_ms: u64,
    ) -> Self {
        Self {
            agent_id,
            specialty,
            assessment: Some(assessment),
            confidence: confidence.clamp(0.0, 1.0),
            data_completeness: data_completeness.clamp(0.0, 1.0),
            status: ResponseStatus::Success,
            latency_ms,
            error: None,
        }
    }

    /// Creates a failed response indicating the specialist could not answer.
    pub fn failure(
        agent_id: AgentId,
        specialty: Specialty,
        error: impl Into<String>,
        latency_ms: u64,
    ) -> Self {
        Self {
            agent_id,
            specialty,
            assessment: None,
            confidence: 0.0,
            data_completeness: 0.0,
            status: ResponseStatus::Failed,
            latency_ms,
            error: Some(error.into()),
        }
    }

    /// Creates a skipped response for a specialist that was never called.
    pub fn skipped(agent_id: AgentId, specialty: Specialty) -> Self {
        Self {
            agent_id,
            specialty,
            assessment: None,
            confidence: 0.0,
            data_completeness: 0.0,
            status: ResponseStatus::Skipped,
            latency_ms: 0,
            error: None,
        }
    }

    /// Returns `true` if this response carries a usable assessment.
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

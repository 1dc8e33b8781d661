//! Conference entities - typed records of the inter-agent dialogue round.
//!
//! These types capture what the dialogue round produced:
//! - [`PeerQuestion`] - A question one agent directs at a named peer
//! - [`DialogueExchange`] - A routed question with its answer
//! - [`Disagreement`] - A detected conflict between agents' assessments
//! - [`EmergentFinding`] - An insight visible only across agents
//! - [`ConferenceMetadata`] - The well-formed result of a whole round

use crate::core::Specialty;
use serde::{Deserialize, Serialize};

/// Priority of a peer question; high priority questions are routed first
/// and escalate diagnostic impact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum QuestionPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl QuestionPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionPriority::High => "high",
            QuestionPriority::Medium => "medium",
            QuestionPriority::Low => "low",
        }
    }
}

/// A question one agent directs at a named peer specialist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerQuestion {
    /// Origin specialty
    pub from: Specialty,
    /// Target specialty
    pub to: Specialty,
    pub text: String,
    #[serde(default)]
    pub priority: QuestionPriority,
}

impl PeerQuestion {
    pub fn new(from: Specialty, to: Specialty, text: impl Into<String>) -> Self {
        Self {
            from,
            to,
            text: text.into(),
            priority: QuestionPriority::Medium,
        }
    }

    pub fn with_priority(mut self, priority: QuestionPriority) -> Self {
        self.priority = priority;
        self
    }
}

/// A routed peer question together with the target agent's answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueExchange {
    pub from: Specialty,
    pub to: Specialty,
    pub question: String,
    pub answer: String,
    /// True when the question was high priority or the answer carries
    /// clinical-urgency language
    pub diagnostic_impact: bool,
    pub priority: QuestionPriority,
}

/// Kind of detected disagreement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisagreementKind {
    /// An agent explicitly disputed a peer's baseline
    Explicit,
    /// Same intervention recommended with widely differing priorities
    PriorityConflict,
    /// Expected recovery timelines far apart
    TimelineConflict,
    /// Clinical-importance ratings far apart
    ImportanceConflict,
}

/// Severity of a disagreement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A detected conflict between two or more agents' assessments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disagreement {
    /// Agents involved in the conflict
    pub agents: Vec<Specialty>,
    /// What the conflict is about (normalized intervention, "importance", ...)
    pub topic: String,
    pub kind: DisagreementKind,
    pub severity: Severity,
    /// Proposed resolution, assigned to high-severity disagreements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Detection confidence (0.0 to 1.0)
    pub confidence: f64,
}

impl Disagreement {
    pub fn new(
        agents: Vec<Specialty>,
        topic: impl Into<String>,
        kind: DisagreementKind,
        severity: Severity,
    ) -> Self {
        Self {
            agents,
            topic: topic.into(),
            kind,
            severity,
            resolution: None,
            confidence: 0.5,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    pub fn is_high_severity(&self) -> bool {
        self.severity == Severity::High
    }
}

/// Novelty grade of an emergent finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Novelty {
    Routine,
    Unusual,
    Novel,
}

/// Where an emergent finding came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingSource {
    /// Novelty language inside a high-impact exchange
    ExchangeNovelty,
    /// A high-severity disagreement that received a resolution
    ResolvedDisagreement,
    /// A domain keyword shared by exchanges of three or more agents
    CrossSpecialtyConsensus,
}

/// An insight surfaced only through cross-agent interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergentFinding {
    pub finding: String,
    /// Agents whose interaction surfaced it
    pub discovered_by: Vec<Specialty>,
    pub novelty: Novelty,
    pub significance: String,
    pub source: FindingSource,
}

/// Result of a whole dialogue round - always well-formed, never an error
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConferenceMetadata {
    pub exchanges: Vec<DialogueExchange>,
    pub disagreements: Vec<Disagreement>,
    pub findings: Vec<EmergentFinding>,
    /// Recorded when the round itself failed; the rest stays empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConferenceMetadata {
    /// Empty-but-well-formed metadata recording a round-level failure
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn disagreement_count(&self) -> usize {
        self.disagreements.len()
    }

    /// Exchanges flagged as diagnostically impactful
    pub fn high_impact_exchanges(&self) -> impl Iterator<Item = &DialogueExchange> {
        self.exchanges.iter().filter(|e| e.diagnostic_impact)
    }
}

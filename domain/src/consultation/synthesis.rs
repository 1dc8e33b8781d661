//! Consultation synthesis - structured report built from successful responses.
//!
//! Pure aggregation over [`SpecialistResponse`] values: a phase-bucketed
//! care plan, red-flag extraction, and a consensus confidence figure.
//! Formatting for humans lives in the presentation layer.

use crate::consultation::value_objects::SpecialistResponse;
use crate::core::Specialty;
use serde::{Deserialize, Serialize};

/// Keywords whose presence in an assessment summary flags the case for
/// escalation before any plan is applied.
const RED_FLAG_KEYWORDS: &[&str] = &[
    "numbness",
    "night pain",
    "fever",
    "unexplained weight loss",
    "bowel",
    "bladder",
    "saddle anesthesia",
    "chest pain",
    "progressive weakness",
];

/// Recovery phase a plan item is bucketed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanPhase {
    /// Immediate symptom control (priority 1-2 recommendations)
    Acute,
    /// Active rehabilitation (priority 3)
    Recovery,
    /// Long-term maintenance (priority 4-5)
    Maintenance,
}

impl PlanPhase {
    /// Bucket a recommendation priority (1-5) into a phase
    pub fn from_priority(priority: u8) -> Self {
        match priority {
            0..=2 => PlanPhase::Acute,
            3 => PlanPhase::Recovery,
            _ => PlanPhase::Maintenance,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanPhase::Acute => "acute",
            PlanPhase::Recovery => "recovery",
            PlanPhase::Maintenance => "maintenance",
        }
    }
}

/// One intervention in the synthesized plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    pub phase: PlanPhase,
    pub specialty: Specialty,
    pub intervention: String,
    pub priority: u8,
}

/// A red flag surfaced by a specialist's assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedFlag {
    pub specialty: Specialty,
    pub keyword: String,
    /// The sentence the keyword appeared in
    pub context: String,
}

/// Structured output of a consultation, built from successful responses
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConsultationReport {
    /// Care plan items grouped by recovery phase, acute first
    pub plan: Vec<PlanItem>,
    /// Red flags extracted from assessment summaries
    pub red_flags: Vec<RedFlag>,
    /// Completeness-weighted mean confidence across the panel (0.0 to 1.0)
    pub consensus_confidence: f64,
    /// Per-specialist one-line summaries, in specialty order
    pub specialist_summaries: Vec<(Specialty, String)>,
}

impl ConsultationReport {
    /// Synthesize a report from the successful responses.
    ///
    /// Returns `None` when no response succeeded - callers map that to
    /// their no-successful-responses error.
    pub fn from_responses<'a>(
        responses: impl IntoIterator<Item = &'a SpecialistResponse>,
    ) -> Option<Self> {
        let successful: Vec<&SpecialistResponse> =
            responses.into_iter().filter(|r| r.is_success()).collect();
        if successful.is_empty() {
            return None;
        }

        let mut plan = Vec::new();
        let mut red_flags = Vec::new();
        let mut specialist_summaries = Vec::new();

        for response in &successful {
            let Some(assessment) = &response.assessment else {
                continue;
            };

            for rec in &assessment.recommendations {
                plan.push(PlanItem {
                    phase: PlanPhase::from_priority(rec.priority),
                    specialty: response.specialty,
                    intervention: rec.normalized_intervention(),
                    priority: rec.priority,
                });
            }

            red_flags.extend(extract_red_flags(response.specialty, &assessment.summary));

            specialist_summaries.push((response.specialty, first_sentence(&assessment.summary)));
        }

        plan.sort_by_key(|item| (item.priority, item.specialty));
        specialist_summaries.sort_by_key(|(specialty, _)| *specialty);

        Some(Self {
            plan,
            red_flags,
            consensus_confidence: consensus_confidence(&successful),
            specialist_summaries,
        })
    }

    /// Plan items for one phase, in priority order
    pub fn phase_items(&self, phase: PlanPhase) -> impl Iterator<Item = &PlanItem> {
        self.plan.iter().filter(move |item| item.phase == phase)
    }

    pub fn has_red_flags(&self) -> bool {
        !self.red_flags.is_empty()
    }
}

/// Completeness-weighted mean confidence over successful responses
fn consensus_confidence(successful: &[&SpecialistResponse]) -> f64 {
    let mut weighted = 0.0;
    let mut weight = 0.0;
    for response in successful {
        // A specialist that saw little relevant data should sway the
        // consensus figure less than a fully-informed one.
        let w = response.data_completeness.max(0.1);
        weighted += response.confidence * w;
        weight += w;
    }
    if weight == 0.0 { 0.0 } else { weighted / weight }
}

/// Scan a summary for red-flag keywords, keeping the sentence of each hit
fn extract_red_flags(specialty: Specialty, summary: &str) -> Vec<RedFlag> {
    let lower = summary.to_lowercase();
    let mut flags = Vec::new();

    for keyword in RED_FLAG_KEYWORDS {
        if lower.contains(keyword) {
            let context = lower
                .split(['.', ';', '\n'])
                .find(|sentence| sentence.contains(keyword))
                .unwrap_or(summary)
                .trim()
                .to_string();
            flags.push(RedFlag {
                specialty,
                keyword: (*keyword).to_string(),
                context,
            });
        }
    }

    flags
}

fn first_sentence(text: &str) -> String {
    text.split(['.', '\n'])
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .to_string()
}

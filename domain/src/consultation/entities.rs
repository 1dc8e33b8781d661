//! Consultation aggregate and lifecycle types

use crate::consultation::value_objects::SpecialistResponse;
use crate::core::{CaseInput, ConsultationId, Specialty, timestamp_ms};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response-collection policy for a consultation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollectionMode {
    /// Wait for every specialist to settle (success or failure)
    #[default]
    Normal,
    /// Return once a minimum number of successes has arrived;
    /// the rest keep settling in the background
    Fast,
}

impl std::fmt::Display for CollectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionMode::Normal => write!(f, "normal"),
            CollectionMode::Fast => write!(f, "fast"),
        }
    }
}

/// Lifecycle status of a consultation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationStatus {
    InProgress,
    Completed,
}

/// One case-evaluation session spanning response collection, dialogue,
/// and prediction settlement
///
/// Created at request time and mutated only by the owning orchestration
/// call (plus its detached fast-mode continuation, which merges through
/// the idempotent [`Consultation::insert_response`]). Immutable once
/// `Completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
    pub id: ConsultationId,
    pub case: CaseInput,
    /// Specialties requested for this panel
    pub requested: Vec<Specialty>,
    pub mode: CollectionMode,
    /// Specialty tag -> response; keys unique, insertion order irrelevant
    pub responses: HashMap<Specialty, SpecialistResponse>,
    pub status: ConsultationStatus,
    /// Start timestamp (milliseconds since epoch)
    pub started_at_ms: u64,
    /// Completion timestamp, set when the consultation closes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
}

impl Consultation {
    /// Open a new consultation for a case and panel
    pub fn new(case: CaseInput, requested: Vec<Specialty>, mode: CollectionMode) -> Self {
        Self {
            id: ConsultationId::generate(),
            case,
            requested,
            mode,
            responses: HashMap::new(),
            status: ConsultationStatus::InProgress,
            started_at_ms: timestamp_ms(),
            completed_at_ms: None,
        }
    }

    /// Insert a response if that specialty has none yet.
    ///
    /// Check-then-insert keyed by specialty keeps the primary flow and the
    /// fast-mode background drain idempotent against each other. Returns
    /// whether the response was inserted.
    pub fn insert_response(&mut self, response: SpecialistResponse) -> bool {
        if self.responses.contains_key(&response.specialty) {
            return false;
        }
        self.responses.insert(response.specialty, response);
        true
    }

    /// Mark the consultation completed
    pub fn complete(&mut self) {
        self.status = ConsultationStatus::Completed;
        self.completed_at_ms = Some(timestamp_ms());
    }

    pub fn is_completed(&self) -> bool {
        self.status == ConsultationStatus::Completed
    }

    /// Iterate over successful responses only
    pub fn successful_responses(&self) -> impl Iterator<Item = &SpecialistResponse> {
        self.responses.values().filter(|r| r.is_success())
    }

    pub fn success_count(&self) -> usize {
        self.successful_responses().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consultation::value_objects::AssessmentResult;

    fn response(specialty: Specialty) -> SpecialistResponse {
        SpecialistResponse::success(
            format!("{}-1", specialty).into(),
            specialty,
            AssessmentResult::new("ok"),
            0.8,
            0.9,
            10,
        )
    }

    #[test]
    fn test_insert_response_is_idempotent_per_specialty() {
        let mut consultation = Consultation::new(
            CaseInput::new("test", 3, 2),
            vec![Specialty::Movement],
            CollectionMode::Normal,
        );

        assert!(consultation.insert_response(response(Specialty::Movement)));
        assert!(!consultation.insert_response(response(Specialty::Movement)));
        assert_eq!(consultation.responses.len(), 1);
    }

    #[test]
    fn test_complete_sets_timestamp_and_status() {
        let mut consultation = Consultation::new(
            CaseInput::new("test", 3, 2),
            Specialty::default_panel(),
            CollectionMode::Fast,
        );
        assert_eq!(consultation.status, ConsultationStatus::InProgress);

        consultation.complete();
        assert!(consultation.is_completed());
        assert!(consultation.completed_at_ms.is_some());
    }

    #[test]
    fn test_success_count_ignores_failures() {
        let mut consultation = Consultation::new(
            CaseInput::new("test", 3, 2),
            Specialty::default_panel(),
            CollectionMode::Normal,
        );
        consultation.insert_response(response(Specialty::Movement));
        consultation.insert_response(SpecialistResponse::failure(
            "pain-1".into(),
            Specialty::PainManagement,
            "unreachable",
            100,
        ));

        assert_eq!(consultation.responses.len(), 2);
        assert_eq!(consultation.success_count(), 1);
    }
}

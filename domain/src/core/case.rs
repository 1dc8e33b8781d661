//! Case input value object

use serde::{Deserialize, Serialize};

/// A rehabilitation case submitted for panel consultation (Value Object)
///
/// Carries the clinical picture every specialist assesses. The complexity
/// multiplier derived from it sizes the consultation fee each participating
/// agent earns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseInput {
    /// Free-text case description
    pub description: String,
    /// Reported pain level (0-10)
    pub pain_level: u8,
    /// Symptom duration in weeks
    pub duration_weeks: u32,
    /// Reported symptoms
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// Known comorbidities
    #[serde(default)]
    pub comorbidities: Vec<String>,
    /// Recovery goals stated by the user
    #[serde(default)]
    pub goals: Vec<String>,
}

impl CaseInput {
    /// Create a new case with the minimum required fields
    pub fn new(description: impl Into<String>, pain_level: u8, duration_weeks: u32) -> Self {
        Self {
            description: description.into(),
            pain_level: pain_level.min(10),
            duration_weeks,
            symptoms: Vec::new(),
            comorbidities: Vec::new(),
            goals: Vec::new(),
        }
    }

    pub fn with_symptoms(mut self, symptoms: Vec<String>) -> Self {
        self.symptoms = symptoms;
        self
    }

    pub fn with_comorbidities(mut self, comorbidities: Vec<String>) -> Self {
        self.comorbidities = comorbidities;
        self
    }

    pub fn with_goals(mut self, goals: Vec<String>) -> Self {
        self.goals = goals;
        self
    }

    /// Complexity multiplier for consultation-fee sizing (1.0 to 2.5)
    ///
    /// Derived from pain level, symptom duration, symptom count, and
    /// comorbidities. Severe pain and chronic duration dominate; symptom
    /// and comorbidity counts contribute capped increments.
    pub fn complexity_multiplier(&self) -> f64 {
        let mut multiplier = 1.0;

        if self.pain_level >= 7 {
            multiplier += 0.4;
        } else if self.pain_level >= 4 {
            multiplier += 0.2;
        }

        if self.duration_weeks >= 12 {
            multiplier += 0.3;
        } else if self.duration_weeks >= 6 {
            multiplier += 0.15;
        }

        let extra_symptoms = self.symptoms.len().saturating_sub(2) as f64;
        multiplier += (extra_symptoms * 0.1).min(0.3);

        multiplier += (self.comorbidities.len() as f64 * 0.2).min(0.5);

        multiplier.min(2.5)
    }

    /// Data-completeness hint for a given specialty focus (0.0 to 1.0)
    ///
    /// Scores how much specialty-relevant input the case actually carries.
    /// Adapters may refine this with their own heuristics.
    pub fn completeness_hint(&self) -> f64 {
        let mut present = 1.0; // description is mandatory
        let mut total = 4.0;

        if !self.symptoms.is_empty() {
            present += 1.0;
        }
        if !self.comorbidities.is_empty() {
            present += 1.0;
        }
        if !self.goals.is_empty() {
            present += 1.0;
        }

        // pain level 0 with no symptoms usually means "not reported"
        if self.pain_level == 0 && self.symptoms.is_empty() {
            total += 1.0;
        }

        present / total
    }
}

//! Scripted specialist panel.
//!
//! Deterministic local implementations of the [`SpecialistAgent`] port,
//! one playbook per specialty. The CLI and integration flows run against
//! this panel; production deployments register remote reasoning adapters
//! behind the same trait instead.

use async_trait::async_trait;
use consilium_application::ports::specialist::{GatewayError, SpecialistAgent};
use consilium_domain::{
    AgentId, AssessmentDispute, AssessmentResult, CaseInput, ClinicalImportance, DisputeExtent,
    PeerQuestion, QuestionPriority, Recommendation, Specialty,
};
use std::time::Duration;

/// A deterministic specialist driven by a per-specialty playbook
pub struct ScriptedSpecialist {
    id: AgentId,
    specialty: Specialty,
    base_confidence: f64,
    latency: Option<Duration>,
    available: bool,
}

impl ScriptedSpecialist {
    pub fn new(id: impl Into<AgentId>, specialty: Specialty) -> Self {
        Self {
            id: id.into(),
            specialty,
            base_confidence: 0.75,
            latency: None,
            available: true,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.base_confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Simulated reasoning latency, for demos and timeout exercises
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Build the full standard panel, one scripted agent per specialty
    pub fn standard_panel() -> Vec<ScriptedSpecialist> {
        Specialty::all()
            .into_iter()
            .map(|specialty| {
                ScriptedSpecialist::new(format!("{}-1", specialty), specialty)
            })
            .collect()
    }

    fn playbook(&self, case: &CaseInput) -> AssessmentResult {
        let severe = case.pain_level >= 7;
        let chronic = case.duration_weeks >= 12;

        let importance = if severe && !case.comorbidities.is_empty() {
            ClinicalImportance::Critical
        } else if severe || chronic {
            ClinicalImportance::High
        } else if case.pain_level >= 4 {
            ClinicalImportance::Moderate
        } else {
            ClinicalImportance::Low
        };

        match self.specialty {
            Specialty::PainManagement => {
                let mut result = AssessmentResult::new(format!(
                    "Pain presentation at {}/10 over {} weeks. {}",
                    case.pain_level,
                    case.duration_weeks,
                    if severe {
                        "Escalate analgesic strategy before loading work."
                    } else {
                        "Pain picture compatible with graded activity."
                    }
                ))
                .with_recommendations(vec![
                    Recommendation::new("graded activity pacing", if severe { 1 } else { 2 }),
                    Recommendation::new("heat and manual therapy", 3),
                ])
                .with_importance(importance)
                .with_timeline_days(if chronic { 42 } else { 21 })
                .with_peer_questions(vec![PeerQuestion::new(
                    self.specialty,
                    Specialty::Movement,
                    "Does the movement screen show guarding that matches the reported pain?",
                )]);
                if chronic && severe {
                    result = result.with_peer_questions(vec![
                        PeerQuestion::new(
                            self.specialty,
                            Specialty::Movement,
                            "Does the movement screen show guarding that matches the reported pain?",
                        ),
                        PeerQuestion::new(
                            self.specialty,
                            Specialty::Psychology,
                            "Urgent: any kinesiophobia pattern that would block pacing?",
                        )
                        .with_priority(QuestionPriority::High),
                    ]);
                }
                result
            }
            Specialty::Movement => AssessmentResult::new(format!(
                "Movement screen for: {}. Range limited in the affected segment; \
                 compensation likely with prolonged symptoms.",
                case.description
            ))
            .with_recommendations(vec![
                Recommendation::new("range of motion drills", 2),
                Recommendation::new("gait retraining", if chronic { 2 } else { 4 }),
            ])
            .with_importance(importance)
            .with_timeline_days(if chronic { 56 } else { 28 })
            .with_peer_questions(vec![PeerQuestion::new(
                self.specialty,
                Specialty::Strength,
                "What loading ceiling do you want respected during mobility work?",
            )]),
            Specialty::Strength => {
                let mut result = AssessmentResult::new(format!(
                    "Functional capacity reduced; {} weeks of deconditioning to reverse.",
                    case.duration_weeks
                ))
                .with_recommendations(vec![
                    Recommendation::new("progressive resistance program", 3),
                    Recommendation::new("graded activity pacing", 5),
                ])
                .with_importance(importance)
                .with_timeline_days(if chronic { 70 } else { 35 });
                if severe {
                    // A severe pain picture makes early loading contestable
                    result = result.with_disputes(vec![AssessmentDispute {
                        target: Specialty::PainManagement,
                        topic: "loading before pain control".to_string(),
                        extent: DisputeExtent::Partial,
                    }]);
                }
                result
            }
            Specialty::Psychology => AssessmentResult::new(format!(
                "Adherence outlook {} given duration of {} weeks{}.",
                if chronic { "guarded" } else { "good" },
                case.duration_weeks,
                if case.goals.is_empty() {
                    "; no stated goals to anchor to"
                } else {
                    ""
                }
            ))
            .with_recommendations(vec![Recommendation::new("goal setting session", 2)])
            .with_importance(if chronic {
                ClinicalImportance::High
            } else {
                ClinicalImportance::Moderate
            })
            .with_peer_questions(vec![PeerQuestion::new(
                self.specialty,
                Specialty::Coordination,
                "Who follows up on adherence between sessions?",
            )]),
            Specialty::Coordination => AssessmentResult::new(format!(
                "Panel triage: {} specialties engaged; {}.",
                Specialty::all().len(),
                if severe {
                    "MD review before phase transition"
                } else {
                    "standard phase progression"
                }
            ))
            .with_recommendations(vec![Recommendation::new(
                "schedule md review",
                if severe { 1 } else { 4 },
            )])
            .with_importance(importance)
            .with_timeline_days(14 + u32::from(case.pain_level)),
        }
    }
}

#[async_trait]
impl SpecialistAgent for ScriptedSpecialist {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn specialty(&self) -> Specialty {
        self.specialty
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn assess(&self, case: &CaseInput) -> Result<AssessmentResult, GatewayError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(self.playbook(case))
    }

    fn confidence(&self, _topic: &str) -> f64 {
        self.base_confidence
    }

    async fn answer(
        &self,
        case: &CaseInput,
        questions: &[PeerQuestion],
        own_assessment: Option<&AssessmentResult>,
    ) -> Result<String, GatewayError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let baseline = own_assessment
            .map(|a| a.summary.clone())
            .unwrap_or_else(|| format!("initial review of: {}", case.description));

        let reply = questions
            .iter()
            .enumerate()
            .map(|(i, question)| {
                format!(
                    "{}. Regarding '{}': consistent with my assessment ({}).",
                    i + 1,
                    question.text,
                    first_words(&baseline, 8)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(reply)
    }
}

fn first_words(text: &str, count: usize) -> String {
    text.split_whitespace()
        .take(count)
        .collect::<Vec<_>>()
        .join(" ")
}

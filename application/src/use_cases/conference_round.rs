//! Conference round use case
//!
//! Orchestrates one inter-agent dialogue round: gather peer questions,
//! route them to target agents in parallel, parse the free-form replies,
//! then run disagreement and emergent-finding detection over the results.
//!
//! This use case never fails upward: an unreachable target yields
//! per-question "unavailable" answers, and a round-level error comes back
//! as empty-but-well-formed metadata with the error recorded.

use crate::ports::specialist::SpecialistAgent;
use crate::registry::SpecialistRegistry;
use consilium_domain::{
    AssessmentResult, CaseInput, ConferenceMetadata, DialogueExchange, PeerQuestion,
    QuestionPriority, SpecialistResponse, Specialty, collect_peer_questions,
    detect_disagreements, detect_emergent_findings, group_by_target, split_numbered_answers,
};
use consilium_domain::conference::vocabulary::{URGENCY_KEYWORDS, contains_any};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Answer recorded when a target agent cannot be reached
const UNAVAILABLE_ANSWER: &str = "unavailable";

/// Use case for conducting one dialogue round
pub struct ConductConferenceUseCase {
    registry: Arc<SpecialistRegistry>,
}

impl ConductConferenceUseCase {
    pub fn new(registry: Arc<SpecialistRegistry>) -> Self {
        Self { registry }
    }

    /// Conduct the round. Infallible by contract: whatever goes wrong is
    /// folded into the returned metadata.
    pub async fn execute(
        &self,
        responses: &[SpecialistResponse],
        case: &CaseInput,
    ) -> ConferenceMetadata {
        match self.round(responses, case).await {
            Ok(metadata) => metadata,
            Err(error) => {
                warn!("Conference round failed: {}", error);
                ConferenceMetadata::failed(error)
            }
        }
    }

    async fn round(
        &self,
        responses: &[SpecialistResponse],
        case: &CaseInput,
    ) -> Result<ConferenceMetadata, String> {
        let successful: Vec<&SpecialistResponse> =
            responses.iter().filter(|r| r.is_success()).collect();

        let questions = collect_peer_questions(&successful);
        info!(
            "Conference round: {} peer questions across {} responses",
            questions.len(),
            successful.len()
        );

        let exchanges = self.route_questions(questions, &successful, case).await?;

        let disagreements = detect_disagreements(&successful);
        let findings = detect_emergent_findings(&exchanges, &disagreements);

        debug!(
            "Conference round done: {} exchanges, {} disagreements, {} findings",
            exchanges.len(),
            disagreements.len(),
            findings.len()
        );

        Ok(ConferenceMetadata {
            exchanges,
            disagreements,
            findings,
            error: None,
        })
    }

    /// Dispatch one batched message per target agent, all in parallel.
    async fn route_questions(
        &self,
        questions: Vec<PeerQuestion>,
        successful: &[&SpecialistResponse],
        case: &CaseInput,
    ) -> Result<Vec<DialogueExchange>, String> {
        let mut exchanges = Vec::new();
        if questions.is_empty() {
            return Ok(exchanges);
        }

        let mut join_set: JoinSet<(Specialty, Vec<PeerQuestion>, Result<String, String>)> =
            JoinSet::new();

        for (target, pending) in group_by_target(questions) {
            let Some(agent) = self.registry.get_available(target) else {
                // No reachable agent: every pending question gets the
                // documented "unavailable" answer, without impact
                // escalation.
                exchanges.extend(unavailable_exchanges(pending));
                continue;
            };

            let own_assessment = successful
                .iter()
                .find(|r| r.specialty == target)
                .and_then(|r| r.assessment.clone());

            join_set.spawn(dispatch_batch(agent, case.clone(), pending, own_assessment));
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((_, pending, Ok(reply))) => {
                    exchanges.extend(parse_batch_reply(pending, &reply));
                }
                Ok((target, pending, Err(error))) => {
                    warn!("Conference routing to {} failed: {}", target, error);
                    exchanges.extend(unavailable_exchanges(pending));
                }
                Err(join_error) => {
                    // A panicked dispatch loses its question batch; the
                    // other parallel dispatches are unaffected.
                    warn!("Conference dispatch task failed: {}", join_error);
                }
            }
        }

        Ok(exchanges)
    }
}

async fn dispatch_batch(
    agent: Arc<dyn SpecialistAgent>,
    case: CaseInput,
    pending: Vec<PeerQuestion>,
    own_assessment: Option<AssessmentResult>,
) -> (Specialty, Vec<PeerQuestion>, Result<String, String>) {
    let target = agent.specialty();
    let result = agent
        .answer(&case, &pending, own_assessment.as_ref())
        .await
        .map_err(|e| e.to_string());
    (target, pending, result)
}

/// Parse a batched free-form reply into one exchange per question.
fn parse_batch_reply(pending: Vec<PeerQuestion>, reply: &str) -> Vec<DialogueExchange> {
    let answers = split_numbered_answers(reply, pending.len());

    pending
        .into_iter()
        .zip(answers)
        .map(|(question, answer)| {
            let diagnostic_impact = question.priority == QuestionPriority::High
                || contains_any(&answer, URGENCY_KEYWORDS);
            DialogueExchange {
                from: question.from,
                to: question.to,
                question: question.text,
                answer,
                diagnostic_impact,
                priority: question.priority,
            }
        })
        .collect()
}

/// "Unavailable" exchanges for an unreachable target - no impact-flag
/// escalation, whatever the question priority was.
fn unavailable_exchanges(pending: Vec<PeerQuestion>) -> Vec<DialogueExchange> {
    pending
        .into_iter()
        .map(|question| DialogueExchange {
            from: question.from,
            to: question.to,
            question: question.text,
            answer: UNAVAILABLE_ANSWER.to_string(),
            diagnostic_impact: false,
            priority: question.priority,
        })
        .collect()
}

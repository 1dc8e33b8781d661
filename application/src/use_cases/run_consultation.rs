//! Run Consultation use case
//!
//! Orchestrates the full consultation flow: panel validation, background
//! prediction initiation and fee accrual, concurrent response collection
//! (full or partial quorum), the dialogue conference, report synthesis,
//! and the guaranteed baseline prediction resolution.
//!
//! Background work is never fire-and-forget in the invisible sense: every
//! detached task runs on a [`TaskTracker`] the caller can join during
//! shutdown or in tests.

use crate::config::ConsultationParams;
use crate::ports::consultation_log::{ConsultationEvent, ConsultationLogger, NoConsultationLogger};
use crate::ports::progress::{ConsultationPhase, ConsultationProgress, NoProgress};
use crate::ports::specialist::SpecialistAgent;
use crate::ports::store::{ConsultationStore, StoreError};
use crate::ports::token_ledger::TokenLedger;
use crate::registry::SpecialistRegistry;
use crate::use_cases::conference_round::ConductConferenceUseCase;
use crate::use_cases::prediction_market::PredictionMarket;
use consilium_domain::{
    CaseInput, CollectionMode, ConferenceMetadata, Consultation, ConsultationId,
    ConsultationReport, SpecialistResponse, Specialty, consultation_fee,
};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Errors that can surface from a consultation run
///
/// Everything else degrades into partial results with explicit status
/// markers on the individual responses.
#[derive(Error, Debug)]
pub enum RunConsultationError {
    #[error("No specialists available for the requested panel")]
    NoSpecialistsAvailable,

    #[error("No specialist produced a successful response")]
    NoSuccessfulResponses,

    #[error("Consultation exceeded the {0:?} outer deadline")]
    DeadlineExceeded(Duration),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Input for the RunConsultation use case
#[derive(Debug, Clone)]
pub struct RunConsultationInput {
    /// The case to evaluate
    pub case: CaseInput,
    /// Requested panel; unresolvable tags are dropped during validation
    pub specialties: Vec<Specialty>,
    /// Collection policy
    pub mode: CollectionMode,
    /// Fast-mode quorum override; defaults to the configured value
    pub min_responses: Option<usize>,
}

impl RunConsultationInput {
    /// Full default panel in normal mode
    pub fn new(case: CaseInput) -> Self {
        Self {
            case,
            specialties: Specialty::default_panel(),
            mode: CollectionMode::Normal,
            min_responses: None,
        }
    }

    pub fn with_specialties(mut self, specialties: Vec<Specialty>) -> Self {
        self.specialties = specialties;
        self
    }

    /// Switch to partial-quorum fast mode
    pub fn fast(mut self) -> Self {
        self.mode = CollectionMode::Fast;
        self
    }

    pub fn with_min_responses(mut self, min: usize) -> Self {
        self.min_responses = Some(min.max(1));
        self
    }
}

/// Result of a consultation run
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConsultationOutput {
    pub consultation_id: ConsultationId,
    /// Synthesized report over the successful responses
    pub report: ConsultationReport,
    /// Dialogue-round metadata, present when two or more specialists
    /// responded
    pub conference: Option<ConferenceMetadata>,
    /// Responses visible to this caller at return time. In fast mode the
    /// remaining in-flight calls keep merging into the store afterwards;
    /// which responses made the early return is arrival-ordered by
    /// design.
    pub responses: Vec<SpecialistResponse>,
    pub mode: CollectionMode,
}

/// Use case for running one consultation end-to-end
pub struct RunConsultationUseCase {
    registry: Arc<SpecialistRegistry>,
    consultations: Arc<dyn ConsultationStore>,
    market: Arc<PredictionMarket>,
    ledger: Arc<dyn TokenLedger>,
    conference: ConductConferenceUseCase,
    params: ConsultationParams,
    logger: Arc<dyn ConsultationLogger>,
    background: TaskTracker,
}

impl RunConsultationUseCase {
    pub fn new(
        registry: Arc<SpecialistRegistry>,
        consultations: Arc<dyn ConsultationStore>,
        market: Arc<PredictionMarket>,
        ledger: Arc<dyn TokenLedger>,
        params: ConsultationParams,
    ) -> Self {
        let conference = ConductConferenceUseCase::new(Arc::clone(&registry));
        Self {
            registry,
            consultations,
            market,
            ledger,
            conference,
            params,
            logger: Arc::new(NoConsultationLogger),
            background: TaskTracker::new(),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConsultationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Tracker carrying the detached background work (prediction
    /// initiation, fee accrual, baseline resolution, fast-mode drain).
    /// Join it during shutdown or in tests.
    pub fn background(&self) -> &TaskTracker {
        &self.background
    }

    /// Close the tracker and wait for all detached work to settle.
    pub async fn join_background(&self) {
        self.background.close();
        self.background.wait().await;
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunConsultationInput,
    ) -> Result<ConsultationOutput, RunConsultationError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks.
    ///
    /// The whole run is bounded by the configured outer deadline;
    /// exceeding it surfaces as [`RunConsultationError::DeadlineExceeded`],
    /// distinct from per-specialist timeouts.
    pub async fn execute_with_progress(
        &self,
        input: RunConsultationInput,
        progress: &dyn ConsultationProgress,
    ) -> Result<ConsultationOutput, RunConsultationError> {
        let deadline = self.params.outer_deadline;
        match tokio::time::timeout(deadline, self.run(input, progress)).await {
            Ok(result) => result,
            Err(_) => Err(RunConsultationError::DeadlineExceeded(deadline)),
        }
    }

    async fn run(
        &self,
        input: RunConsultationInput,
        progress: &dyn ConsultationProgress,
    ) -> Result<ConsultationOutput, RunConsultationError> {
        let agents = self.registry.resolve_available(&input.specialties);
        if agents.is_empty() {
            return Err(RunConsultationError::NoSpecialistsAvailable);
        }

        let resolved: Vec<Specialty> = agents.iter().map(|a| a.specialty()).collect();
        let consultation = Consultation::new(input.case.clone(), resolved, input.mode);
        let consultation_id = consultation.id.clone();
        self.consultations.insert(consultation).await?;

        info!(
            "Consultation {} opened: {} specialists, {} mode",
            consultation_id,
            agents.len(),
            input.mode
        );
        self.logger.log(ConsultationEvent::new(
            "consultation_opened",
            json!({
                "consultation_id": consultation_id.to_string(),
                "mode": input.mode.to_string(),
                "panel": agents.iter().map(|a| a.specialty().to_string()).collect::<Vec<_>>(),
            }),
        ));

        // Non-blocking side work; errors are logged, never propagated.
        self.spawn_initiation(&consultation_id, &input.case, &agents);
        self.spawn_fee_accrual(&consultation_id, &input.case, &agents);

        // Phase 1: Response collection
        progress.on_phase_start(&ConsultationPhase::Collection, agents.len());
        let min_responses = input.min_responses.unwrap_or(self.params.min_responses);
        let responses = self
            .collect_responses(&consultation_id, &input.case, &agents, input.mode, min_responses, progress)
            .await?;
        progress.on_phase_complete(&ConsultationPhase::Collection);

        // Phase 2: Conference, when there is anyone to talk to
        let conference = if responses.len() >= 2 {
            progress.on_phase_start(&ConsultationPhase::Conference, 1);
            let metadata = self.conference.execute(&responses, &input.case).await;
            progress.on_phase_complete(&ConsultationPhase::Conference);
            self.logger.log(ConsultationEvent::new(
                "conference_completed",
                json!({
                    "consultation_id": consultation_id.to_string(),
                    "exchanges": metadata.exchanges.len(),
                    "disagreements": metadata.disagreement_count(),
                    "findings": metadata.findings.len(),
                }),
            ));
            Some(metadata)
        } else {
            debug!("Skipping conference: fewer than two responses collected");
            None
        };

        // Guaranteed baseline resolution, even absent external feedback
        self.spawn_baseline_resolution(&consultation_id, &responses, conference.as_ref());

        // Phase 3: Synthesis
        progress.on_phase_start(&ConsultationPhase::Synthesis, 1);
        let report = ConsultationReport::from_responses(responses.iter())
            .ok_or(RunConsultationError::NoSuccessfulResponses)?;
        progress.on_phase_complete(&ConsultationPhase::Synthesis);

        self.consultations.complete(&consultation_id).await?;
        info!("Consultation {} completed", consultation_id);

        Ok(ConsultationOutput {
            consultation_id,
            report,
            conference,
            responses,
            mode: input.mode,
        })
    }

    /// Launch every specialist call concurrently and collect per policy.
    ///
    /// **Normal** waits for all calls to settle. **Fast** returns once
    /// `min_responses` successes arrived and detaches the remainder onto
    /// the background tracker, where late responses still merge into the
    /// consultation's response map.
    async fn collect_responses(
        &self,
        consultation_id: &ConsultationId,
        case: &CaseInput,
        agents: &[Arc<dyn SpecialistAgent>],
        mode: CollectionMode,
        min_responses: usize,
        progress: &dyn ConsultationProgress,
    ) -> Result<Vec<SpecialistResponse>, RunConsultationError> {
        let mut join_set = JoinSet::new();
        for agent in agents {
            join_set.spawn(call_specialist(
                Arc::clone(agent),
                case.clone(),
                self.params.per_call_timeout,
            ));
        }

        let mut collected = Vec::new();
        let mut successes = 0;

        while let Some(joined) = join_set.join_next().await {
            let response = match joined {
                Ok(response) => response,
                Err(join_error) => {
                    warn!("Specialist task failed to join: {}", join_error);
                    continue;
                }
            };

            progress.on_specialist_complete(
                &ConsultationPhase::Collection,
                &response.specialty,
                response.is_success(),
            );
            self.logger.log(ConsultationEvent::new(
                "response_collected",
                json!({
                    "consultation_id": consultation_id.to_string(),
                    "specialty": response.specialty.to_string(),
                    "status": response.is_success(),
                    "latency_ms": response.latency_ms,
                }),
            ));

            if response.is_success() {
                successes += 1;
            }
            self.consultations
                .insert_response(consultation_id, response.clone())
                .await?;
            collected.push(response);

            if mode == CollectionMode::Fast && successes >= min_responses {
                info!(
                    "Fast quorum reached ({}/{} successes); detaching remainder",
                    successes, min_responses
                );
                break;
            }
        }

        if mode == CollectionMode::Fast && !join_set.is_empty() {
            let store = Arc::clone(&self.consultations);
            let id = consultation_id.clone();
            self.background.spawn(async move {
                while let Some(joined) = join_set.join_next().await {
                    let Ok(response) = joined else { continue };
                    match store.insert_response(&id, response).await {
                        Ok(inserted) => {
                            debug!("Late response merged into {}: {}", id, inserted)
                        }
                        Err(e) => warn!("Late response merge into {} failed: {}", id, e),
                    }
                }
            });
        }

        Ok(collected)
    }

    /// Background prediction initiation for the participating agents
    fn spawn_initiation(
        &self,
        consultation_id: &ConsultationId,
        case: &CaseInput,
        agents: &[Arc<dyn SpecialistAgent>],
    ) {
        let market = Arc::clone(&self.market);
        let id = consultation_id.clone();
        let case = case.clone();
        let agents = agents.to_vec();
        self.background.spawn(async move {
            if let Err(e) = market.initiate(&id, &case, &agents).await {
                warn!("Background prediction initiation for {} failed: {}", id, e);
            }
        });
    }

    /// Background consultation-fee accrual:
    /// `base_fee x complexity x performance`
    fn spawn_fee_accrual(
        &self,
        consultation_id: &ConsultationId,
        case: &CaseInput,
        agents: &[Arc<dyn SpecialistAgent>],
    ) {
        let market = Arc::clone(&self.market);
        let ledger = Arc::clone(&self.ledger);
        let logger = Arc::clone(&self.logger);
        let id = consultation_id.clone();
        let case = case.clone();
        let base_fee = self.params.base_fee;
        let agents = agents.to_vec();

        self.background.spawn(async move {
            let accruals = agents.iter().map(|agent| {
                let market = Arc::clone(&market);
                let ledger = Arc::clone(&ledger);
                let logger = Arc::clone(&logger);
                let case = case.clone();
                let id = id.clone();
                async move {
                    let performance = match market.agent_performance(agent.id()).await {
                        Ok(performance) => performance,
                        Err(e) => {
                            warn!("Performance lookup for {} failed: {}", agent.id(), e);
                            None
                        }
                    };
                    let fee = consultation_fee(base_fee, &case, performance.as_ref());
                    if let Err(e) = ledger.credit(agent.id(), fee).await {
                        warn!("Fee accrual for {} failed: {}", agent.id(), e);
                        return;
                    }
                    logger.log(ConsultationEvent::new(
                        "fee_accrued",
                        json!({
                            "consultation_id": id.to_string(),
                            "agent": agent.id().to_string(),
                            "fee": fee,
                        }),
                    ));
                }
            });
            futures::future::join_all(accruals).await;
        });
    }

    /// Background inter-agent resolution using the conference's
    /// disagreement count and the panel's own confidences as provisional
    /// ground truth. Guarantees at least one resolution event per
    /// consultation.
    fn spawn_baseline_resolution(
        &self,
        consultation_id: &ConsultationId,
        responses: &[SpecialistResponse],
        conference: Option<&ConferenceMetadata>,
    ) {
        let disagreement_count = conference.map_or(0, ConferenceMetadata::disagreement_count);
        let successful: Vec<f64> = responses
            .iter()
            .filter(|r| r.is_success())
            .map(|r| r.confidence)
            .collect();
        let mean_confidence = if successful.is_empty() {
            0.0
        } else {
            successful.iter().sum::<f64>() / successful.len() as f64
        };

        let market = Arc::clone(&self.market);
        let logger = Arc::clone(&self.logger);
        let id = consultation_id.clone();
        self.background.spawn(async move {
            match market
                .resolve_inter_agent(&id, disagreement_count, mean_confidence)
                .await
            {
                Ok(Some(resolution)) => {
                    logger.log(ConsultationEvent::new(
                        "resolution_applied",
                        json!({
                            "consultation_id": id.to_string(),
                            "source": resolution.source.to_string(),
                            "agents": resolution.settlements.len(),
                        }),
                    ));
                }
                Ok(None) => debug!("No prediction set yet for {}; baseline skipped", id),
                Err(e) => warn!("Baseline resolution for {} failed: {}", id, e),
            }
        });
    }
}

/// One specialist call, raced against the per-call timeout.
///
/// A losing timeout stops the await, not the callee; the failure is
/// recorded as a response so the batch never aborts.
async fn call_specialist(
    agent: Arc<dyn SpecialistAgent>,
    case: CaseInput,
    timeout: Duration,
) -> SpecialistResponse {
    let started = Instant::now();
    let result = tokio::time::timeout(timeout, agent.assess(&case)).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(assessment)) => {
            let confidence = agent.confidence(agent.specialty().as_str());
            SpecialistResponse::success(
                agent.id().clone(),
                agent.specialty(),
                assessment,
                confidence,
                case.completeness_hint(),
                latency_ms,
            )
        }
        Ok(Err(e)) => {
            warn!("Specialist {} failed: {}", agent.id(), e);
            SpecialistResponse::failure(agent.id().clone(), agent.specialty(), e.to_string(), latency_ms)
        }
        Err(_) => {
            warn!("Specialist {} timed out after {:?}", agent.id(), timeout);
            SpecialistResponse::failure(
                agent.id().clone(),
                agent.specialty(),
                format!("timed out after {:?}", timeout),
                latency_ms,
            )
        }
    }
}

//! Prediction market use case: initiation, cascading resolution, and
//! statistics.
//!
//! Initiation is idempotent by agent id because fast-mode flows initiate
//! for the triage agent immediately and for the remaining specialists
//! once background coordination starts. Resolution may run several times
//! per consultation as richer ground truth arrives; every call settles
//! the full set again and applies fresh ledger deltas, while the stored
//! resolution record keeps only the latest source.

use crate::ports::specialist::SpecialistAgent;
use crate::ports::store::{MarketStore, StoreError};
use crate::ports::token_ledger::{LedgerError, TokenLedger};
use consilium_domain::{
    AgentId, AgentPerformanceRecord, AgentPrediction, CaseInput, ConsultationId, MarketStats,
    Resolution, ResolutionPayload, ResolutionSource, inter_agent_outcomes,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur in market operations
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Summary of one initiation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiationSummary {
    pub consultation_id: ConsultationId,
    /// Agents actually added by this call
    pub agents_added: usize,
    /// Agents in the set after the merge
    pub total_agents: usize,
    /// Total stake across the whole set after the merge
    pub total_stake: u64,
}

/// The prediction market over a [`MarketStore`] and a [`TokenLedger`]
pub struct PredictionMarket {
    store: Arc<dyn MarketStore>,
    ledger: Arc<dyn TokenLedger>,
}

impl PredictionMarket {
    pub fn new(store: Arc<dyn MarketStore>, ledger: Arc<dyn TokenLedger>) -> Self {
        Self { store, ledger }
    }

    /// Generate and stake predictions for the given agents.
    ///
    /// Agents already represented in the consultation's set are skipped;
    /// calling this twice with overlapping panels yields the union.
    pub async fn initiate(
        &self,
        consultation_id: &ConsultationId,
        case: &CaseInput,
        agents: &[Arc<dyn SpecialistAgent>],
    ) -> Result<InitiationSummary, MarketError> {
        let mut generated = Vec::with_capacity(agents.len());
        for agent in agents {
            let balance = match self.ledger.balance(agent.id()).await {
                Ok(balance) => balance,
                Err(e) => {
                    warn!("Balance lookup failed for {}: {}", agent.id(), e);
                    0
                }
            };
            let confidence = agent.confidence(agent.specialty().as_str());
            generated.push(AgentPrediction::generate(
                agent.id().clone(),
                agent.specialty(),
                case,
                confidence,
                balance,
            ));
        }

        let added = self
            .store
            .merge_predictions(consultation_id, generated.clone())
            .await?;

        // Only newly-added agents book initiation totals; re-runs must
        // not inflate the records.
        for prediction in generated
            .iter()
            .filter(|p| added.contains(&p.agent_id))
        {
            self.store
                .record_initiation(
                    &prediction.agent_id,
                    prediction.dimensions.len() as u64,
                    prediction.total_stake(),
                )
                .await?;
        }

        let set = self
            .store
            .prediction_set(consultation_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(consultation_id.to_string()))?;

        info!(
            "Predictions initiated for {}: {} added, {} total",
            consultation_id,
            added.len(),
            set.agent_count()
        );

        Ok(InitiationSummary {
            consultation_id: consultation_id.clone(),
            agents_added: added.len(),
            total_agents: set.agent_count(),
            total_stake: set.total_stake(),
        })
    }

    /// Resolve a consultation's predictions against the highest-priority
    /// source present in the payload.
    ///
    /// Returns `None` when the consultation has no prediction set or the
    /// payload names no source. Each call settles the full set and moves
    /// tokens; the stored record reflects only this call's source.
    pub async fn resolve(
        &self,
        consultation_id: &ConsultationId,
        payload: &ResolutionPayload,
    ) -> Result<Option<Resolution>, MarketError> {
        let Some(set) = self.store.prediction_set(consultation_id).await? else {
            debug!("No prediction set for {}", consultation_id);
            return Ok(None);
        };
        let Some((source, outcomes)) = payload.select() else {
            debug!("Resolution payload for {} names no source", consultation_id);
            return Ok(None);
        };

        let resolution = Resolution::settle(&set, source, outcomes);

        for settlement in &resolution.settlements {
            self.apply_to_ledger(&settlement.agent_id, settlement.tokens_won, settlement.tokens_lost)
                .await;
            self.store.record_settlement(settlement).await?;
        }

        self.store.store_resolution(resolution.clone()).await?;
        self.store.mark_resolved(consultation_id).await?;

        info!(
            "Resolved {} via {}: {} agents settled",
            consultation_id,
            source,
            resolution.settlements.len()
        );

        Ok(Some(resolution))
    }

    /// Baseline resolution right after the dialogue round, using the
    /// panel's own agreement as provisional ground truth.
    pub async fn resolve_inter_agent(
        &self,
        consultation_id: &ConsultationId,
        disagreement_count: usize,
        mean_confidence: f64,
    ) -> Result<Option<Resolution>, MarketError> {
        let payload = ResolutionPayload::from_source(
            ResolutionSource::InterAgent,
            inter_agent_outcomes(disagreement_count, mean_confidence),
        );
        self.resolve(consultation_id, &payload).await
    }

    /// Whole-market statistics
    pub async fn statistics(&self) -> Result<MarketStats, MarketError> {
        Ok(self.store.stats().await?)
    }

    /// One agent's rolling performance record
    pub async fn agent_performance(
        &self,
        agent: &AgentId,
    ) -> Result<Option<AgentPerformanceRecord>, MarketError> {
        Ok(self.store.performance(agent).await?)
    }

    /// Credit winnings, then debit losses - draining the account rather
    /// than failing when the balance cannot cover the full loss.
    async fn apply_to_ledger(&self, agent: &AgentId, won: u64, lost: u64) {
        if won > 0
            && let Err(e) = self.ledger.credit(agent, won).await
        {
            warn!("Credit of {} to {} failed: {}", won, agent, e);
        }
        if lost == 0 {
            return;
        }
        match self.ledger.debit(agent, lost).await {
            Ok(()) => {}
            Err(LedgerError::InsufficientBalance { available, .. }) => {
                if available > 0
                    && let Err(e) = self.ledger.debit(agent, available).await
                {
                    warn!("Drain debit of {} from {} failed: {}", available, agent, e);
                }
            }
            Err(e) => warn!("Debit of {} from {} failed: {}", lost, agent, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockSpecialist, TestLedger, TestMarketStore};
    use consilium_domain::{OutcomeSet, OutcomeValue, Specialty};

    fn market() -> (PredictionMarket, Arc<TestLedger>) {
        let ledger = Arc::new(TestLedger::new(1000));
        let market = PredictionMarket::new(
            Arc::new(TestMarketStore::new()),
            Arc::clone(&ledger) as Arc<dyn TokenLedger>,
        );
        (market, ledger)
    }

    fn panel(specialties: &[Specialty]) -> Vec<Arc<dyn SpecialistAgent>> {
        specialties
            .iter()
            .map(|s| {
                Arc::new(MockSpecialist::new(&format!("{}-1", s), *s)) as Arc<dyn SpecialistAgent>
            })
            .collect()
    }

    #[tokio::test]
    async fn test_initiate_twice_yields_union() {
        let (market, _) = market();
        let case = CaseInput::new("test", 5, 4);
        let id = ConsultationId::from_raw("cons_union");

        let first = market
            .initiate(&id, &case, &panel(&[Specialty::Coordination]))
            .await
            .unwrap();
        assert_eq!(first.agents_added, 1);

        let second = market
            .initiate(
                &id,
                &case,
                &panel(&[Specialty::Coordination, Specialty::Movement, Specialty::Strength]),
            )
            .await
            .unwrap();
        assert_eq!(second.agents_added, 2);
        assert_eq!(second.total_agents, 3);
    }

    #[tokio::test]
    async fn test_resolve_without_set_is_none() {
        let (market, _) = market();
        let payload = ResolutionPayload::from_source(
            ResolutionSource::MdReview,
            OutcomeSet::new(),
        );
        let result = market
            .resolve(&ConsultationId::from_raw("cons_missing"), &payload)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_double_resolution_applies_deltas_twice() {
        let (market, ledger) = market();
        let case = CaseInput::new("test", 5, 4);
        let id = ConsultationId::from_raw("cons_double");
        let agents = panel(&[Specialty::Psychology]);
        let agent_id: AgentId = "psychology-1".into();

        market.initiate(&id, &case, &agents).await.unwrap();
        let before = ledger.balance(&agent_id).await.unwrap();

        // Perfect outcomes: every dimension at its predicted value
        let set = market.store.prediction_set(&id).await.unwrap().unwrap();
        let mut outcomes = OutcomeSet::new();
        for d in &set.predictions[0].dimensions {
            outcomes.insert(d.name.clone(), d.predicted);
        }
        let stake = set.total_stake();

        let first = market
            .resolve(
                &id,
                &ResolutionPayload::from_source(ResolutionSource::InterAgent, outcomes.clone()),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.source, ResolutionSource::InterAgent);

        let second = market
            .resolve(
                &id,
                &ResolutionPayload::from_source(ResolutionSource::UserModal, outcomes),
            )
            .await
            .unwrap()
            .unwrap();

        // Stored record reflects the most recent source only
        let stored = market.store.resolution(&id).await.unwrap().unwrap();
        assert_eq!(stored.source, ResolutionSource::UserModal);
        assert_eq!(second.source, ResolutionSource::UserModal);

        // Both payouts landed on the balance
        let after = ledger.balance(&agent_id).await.unwrap();
        assert_eq!(after, before + 2 * stake * 2);
    }

    #[tokio::test]
    async fn test_payload_priority_prefers_follow_up() {
        let (market, _) = market();
        let case = CaseInput::new("test", 5, 4);
        let id = ConsultationId::from_raw("cons_priority");
        market
            .initiate(&id, &case, &panel(&[Specialty::Movement]))
            .await
            .unwrap();

        let mut payload = ResolutionPayload::default();
        payload.inter_agent = Some(OutcomeSet::new());
        payload.follow_up = Some(OutcomeSet::new());

        let resolution = market.resolve(&id, &payload).await.unwrap().unwrap();
        assert_eq!(resolution.source, ResolutionSource::FollowUp);
    }

    #[tokio::test]
    async fn test_inter_agent_baseline_scores_satisfaction() {
        let (market, _) = market();
        let case = CaseInput::new("test", 5, 4);
        let id = ConsultationId::from_raw("cons_baseline");
        market
            .initiate(&id, &case, &panel(&[Specialty::Coordination]))
            .await
            .unwrap();

        // Mean confidence 0.8 proxies satisfied; the mock predicts true
        let resolution = market
            .resolve_inter_agent(&id, 1, 0.8)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolution.source, ResolutionSource::InterAgent);
        let agreement = resolution
            .outcomes
            .get("inter_agent_agreement")
            .map(OutcomeValue::as_number)
            .unwrap();
        assert!((agreement - 0.8).abs() < 1e-9);

        let settlement = &resolution.settlements[0];
        let satisfaction = settlement
            .dimension_accuracy
            .iter()
            .find(|(name, _)| name == "user_satisfaction")
            .unwrap();
        assert_eq!(satisfaction.1, 1.0);
    }

    #[tokio::test]
    async fn test_performance_updates_on_every_resolution() {
        let (market, _) = market();
        let case = CaseInput::new("test", 5, 4);
        let id = ConsultationId::from_raw("cons_perf");
        market
            .initiate(&id, &case, &panel(&[Specialty::Strength]))
            .await
            .unwrap();

        market.resolve_inter_agent(&id, 0, 0.9).await.unwrap();
        market.resolve_inter_agent(&id, 2, 0.9).await.unwrap();

        let record = market
            .agent_performance(&"strength-1".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.resolutions, 2);
        assert!(record.average_accuracy() > 0.0);
    }
}

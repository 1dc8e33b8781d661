//! Test doubles shared by the use-case tests.

use crate::ports::specialist::{GatewayError, SpecialistAgent};
use crate::ports::store::{ConsultationStore, MarketStore, StoreError};
use crate::ports::token_ledger::{LedgerError, TokenLedger};
use async_trait::async_trait;
use consilium_domain::{
    AgentId, AgentPerformanceRecord, AgentPrediction, AgentSettlement, AssessmentResult,
    CaseInput, Consultation, ConsultationId, MarketStats, PeerQuestion, PredictionSet,
    PredictionSetStatus, Resolution, SpecialistResponse, Specialty,
};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

/// Configurable in-process specialist for tests
pub struct MockSpecialist {
    id: AgentId,
    specialty: Specialty,
    available: bool,
    confidence: f64,
    delay: Option<Duration>,
    fail_assess: bool,
    fail_answers: bool,
    assessment: AssessmentResult,
    reply: String,
}

impl MockSpecialist {
    pub fn new(id: &str, specialty: Specialty) -> Self {
        Self {
            id: id.into(),
            specialty,
            available: true,
            confidence: 0.8,
            delay: None,
            fail_assess: false,
            fail_answers: false,
            assessment: AssessmentResult::new("baseline assessment"),
            reply: "1. Agreed with the baseline.".to_string(),
        }
    }

    pub fn with_assessment(mut self, assessment: AssessmentResult) -> Self {
        self.assessment = assessment;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = reply.into();
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_assess = true;
        self
    }

    pub fn failing_answers(mut self) -> Self {
        self.fail_answers = true;
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

#[async_trait]
impl SpecialistAgent for MockSpecialist {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn specialty(&self) -> Specialty {
        self.specialty
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn assess(&self, _case: &CaseInput) -> Result<AssessmentResult, GatewayError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_assess {
            return Err(GatewayError::RequestFailed("mock failure".to_string()));
        }
        Ok(self.assessment.clone())
    }

    fn confidence(&self, _topic: &str) -> f64 {
        self.confidence
    }

    async fn answer(
        &self,
        _case: &CaseInput,
        _questions: &[PeerQuestion],
        _own_assessment: Option<&AssessmentResult>,
    ) -> Result<String, GatewayError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_answers {
            return Err(GatewayError::Unavailable("mock offline".to_string()));
        }
        Ok(self.reply.clone())
    }
}

/// In-memory ledger double; accounts spring into existence at a fixed
/// starting balance on first touch.
pub struct TestLedger {
    starting_balance: u64,
    balances: RwLock<HashMap<AgentId, u64>>,
}

impl TestLedger {
    pub fn new(starting_balance: u64) -> Self {
        Self {
            starting_balance,
            balances: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl TokenLedger for TestLedger {
    async fn credit(&self, agent: &AgentId, amount: u64) -> Result<(), LedgerError> {
        let mut balances = self.balances.write().await;
        let balance = balances.entry(agent.clone()).or_insert(self.starting_balance);
        *balance += amount;
        Ok(())
    }

    async fn debit(&self, agent: &AgentId, amount: u64) -> Result<(), LedgerError> {
        let mut balances = self.balances.write().await;
        let balance = balances.entry(agent.clone()).or_insert(self.starting_balance);
        if *balance < amount {
            return Err(LedgerError::InsufficientBalance {
                available: *balance,
                required: amount,
            });
        }
        *balance -= amount;
        Ok(())
    }

    async fn balance(&self, agent: &AgentId) -> Result<u64, LedgerError> {
        let mut balances = self.balances.write().await;
        Ok(*balances.entry(agent.clone()).or_insert(self.starting_balance))
    }
}

/// In-memory consultation store double
#[derive(Default)]
pub struct TestConsultationStore {
    consultations: RwLock<HashMap<ConsultationId, Consultation>>,
}

impl TestConsultationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConsultationStore for TestConsultationStore {
    async fn insert(&self, consultation: Consultation) -> Result<(), StoreError> {
        self.consultations
            .write()
            .await
            .insert(consultation.id.clone(), consultation);
        Ok(())
    }

    async fn get(&self, id: &ConsultationId) -> Result<Option<Consultation>, StoreError> {
        Ok(self.consultations.read().await.get(id).cloned())
    }

    async fn insert_response(
        &self,
        id: &ConsultationId,
        response: SpecialistResponse,
    ) -> Result<bool, StoreError> {
        let mut consultations = self.consultations.write().await;
        let consultation = consultations
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(consultation.insert_response(response))
    }

    async fn complete(&self, id: &ConsultationId) -> Result<(), StoreError> {
        let mut consultations = self.consultations.write().await;
        let consultation = consultations
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        consultation.complete();
        Ok(())
    }
}

/// In-memory market store double
#[derive(Default)]
pub struct TestMarketStore {
    sets: RwLock<HashMap<ConsultationId, PredictionSet>>,
    resolutions: RwLock<HashMap<ConsultationId, Resolution>>,
    performance: RwLock<HashMap<AgentId, AgentPerformanceRecord>>,
}

impl TestMarketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketStore for TestMarketStore {
    async fn merge_predictions(
        &self,
        id: &ConsultationId,
        predictions: Vec<AgentPrediction>,
    ) -> Result<Vec<AgentId>, StoreError> {
        let mut sets = self.sets.write().await;
        let set = sets
            .entry(id.clone())
            .or_insert_with(|| PredictionSet::new(id.clone()));

        let mut added = Vec::new();
        for prediction in predictions {
            let agent_id = prediction.agent_id.clone();
            if set.merge(vec![prediction]) == 1 {
                added.push(agent_id);
            }
        }
        Ok(added)
    }

    async fn prediction_set(
        &self,
        id: &ConsultationId,
    ) -> Result<Option<PredictionSet>, StoreError> {
        Ok(self.sets.read().await.get(id).cloned())
    }

    async fn mark_resolved(&self, id: &ConsultationId) -> Result<(), StoreError> {
        if let Some(set) = self.sets.write().await.get_mut(id) {
            set.mark_resolved();
        }
        Ok(())
    }

    async fn store_resolution(&self, resolution: Resolution) -> Result<(), StoreError> {
        self.resolutions
            .write()
            .await
            .insert(resolution.consultation_id.clone(), resolution);
        Ok(())
    }

    async fn resolution(&self, id: &ConsultationId) -> Result<Option<Resolution>, StoreError> {
        Ok(self.resolutions.read().await.get(id).cloned())
    }

    async fn record_initiation(
        &self,
        agent: &AgentId,
        dimensions: u64,
        staked: u64,
    ) -> Result<(), StoreError> {
        let mut performance = self.performance.write().await;
        performance
            .entry(agent.clone())
            .or_insert_with(|| AgentPerformanceRecord::new(agent.clone()))
            .record_initiation(dimensions, staked);
        Ok(())
    }

    async fn record_settlement(&self, settlement: &AgentSettlement) -> Result<(), StoreError> {
        let mut performance = self.performance.write().await;
        performance
            .entry(settlement.agent_id.clone())
            .or_insert_with(|| AgentPerformanceRecord::new(settlement.agent_id.clone()))
            .record_settlement(settlement);
        Ok(())
    }

    async fn performance(
        &self,
        agent: &AgentId,
    ) -> Result<Option<AgentPerformanceRecord>, StoreError> {
        Ok(self.performance.read().await.get(agent).cloned())
    }

    async fn stats(&self) -> Result<MarketStats, StoreError> {
        let sets = self.sets.read().await;
        let performance = self.performance.read().await;

        let mut stats = MarketStats {
            prediction_sets: sets.len(),
            tracked_agents: performance.len(),
            ..Default::default()
        };
        for set in sets.values() {
            match set.status {
                PredictionSetStatus::Active => stats.active_sets += 1,
                PredictionSetStatus::Resolved => stats.resolved_sets += 1,
            }
        }
        for record in performance.values() {
            stats.total_staked += record.total_staked;
            stats.total_won += record.total_won;
            stats.total_lost += record.total_lost;
            stats.resolutions += record.resolutions;
        }
        Ok(stats)
    }
}

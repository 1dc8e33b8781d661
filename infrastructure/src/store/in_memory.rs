//! In-memory repository adapters.
//!
//! Lock-per-map `RwLock` implementations of the consultation and market
//! store ports. Merge operations run check-then-act under the write lock,
//! which is what keeps the primary flow and the detached background
//! continuations idempotent against each other in a single process. A
//! multi-worker deployment would shard consultation ids or swap these for
//! a transactional store behind the same ports.

use async_trait::async_trait;
use consilium_application::ports::store::{ConsultationStore, MarketStore, StoreError};
use consilium_domain::{
    AgentId, AgentPerformanceRecord, AgentPrediction, AgentSettlement, Consultation,
    ConsultationId, MarketStats, PredictionSet, PredictionSetStatus, Resolution,
    SpecialistResponse,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory [`ConsultationStore`] implementation
#[derive(Default)]
pub struct InMemoryConsultationStore {
    consultations: RwLock<HashMap<ConsultationId, Consultation>>,
}

impl InMemoryConsultationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.consultations.read().await.len()
    }
}

#[async_trait]
impl ConsultationStore for InMemoryConsultationStore {
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

/// In-memory [`MarketStore`] implementation
#[derive(Default)]
pub struct InMemoryMarketStore {
    sets: RwLock<HashMap<ConsultationId, PredictionSet>>,
    resolutions: RwLock<HashMap<ConsultationId, Resolution>>,
    performance: RwLock<HashMap<AgentId, AgentPerformanceRecord>>,
}

impl InMemoryMarketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketStore for InMemoryMarketStore {
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

#[cfg(test)]
mod tests {
    use super::*;
    use consilium_domain::{CaseInput, CollectionMode, Specialty};

    #[tokio::test]
    async fn test_insert_response_is_check_then_insert() {
        let store = InMemoryConsultationStore::new();
        let consultation = Consultation::new(
            CaseInput::new("test", 3, 2),
            vec![Specialty::Movement],
            CollectionMode::Normal,
        );
        let id = consultation.id.clone();
        store.insert(consultation).await.unwrap();

        let response = |confidence: f64| {
            SpecialistResponse::success(
                "move-1".into(),
                Specialty::Movement,
                consilium_domain::AssessmentResult::new("ok"),
                confidence,
                0.9,
                5,
            )
        };

        assert!(store.insert_response(&id, response(0.8)).await.unwrap());
        // Second write for the same specialty is dropped, first wins
        assert!(!store.insert_response(&id, response(0.1)).await.unwrap());

        let stored = store.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.responses[&Specialty::Movement].confidence, 0.8);
    }

    #[tokio::test]
    async fn test_merge_predictions_reports_added_ids() {
        let store = InMemoryMarketStore::new();
        let id = ConsultationId::from_raw("cons_store");
        let case = CaseInput::new("test", 4, 2);

        let prediction = |agent: &str| {
            AgentPrediction::generate(agent.into(), Specialty::Movement, &case, 0.7, 500)
        };

        let added = store
            .merge_predictions(&id, vec![prediction("a"), prediction("b")])
            .await
            .unwrap();
        assert_eq!(added.len(), 2);

        let added = store
            .merge_predictions(&id, vec![prediction("b"), prediction("c")])
            .await
            .unwrap();
        assert_eq!(added, vec![AgentId::new("c")]);
    }

    #[tokio::test]
    async fn test_stats_counts_set_status() {
        let store = InMemoryMarketStore::new();
        let case = CaseInput::new("test", 4, 2);
        let open = ConsultationId::from_raw("cons_open");
        let closed = ConsultationId::from_raw("cons_closed");

        for id in [&open, &closed] {
            store
                .merge_predictions(
                    id,
                    vec![AgentPrediction::generate(
                        "coord-1".into(),
                        Specialty::Coordination,
                        &case,
                        0.7,
                        500,
                    )],
                )
                .await
                .unwrap();
        }
        store.mark_resolved(&closed).await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.prediction_sets, 2);
        assert_eq!(stats.active_sets, 1);
        assert_eq!(stats.resolved_sets, 1);
    }
}

//! Repository ports for consultations and the prediction market.
//!
//! Shared mutable state - the consultation response map, prediction sets,
//! resolutions, and performance records - sits behind these traits.
//! Mutating operations are phrased check-then-act per key, so the primary
//! flow and detached background continuations stay idempotent against
//! each other. An in-memory map is a valid first implementation; the
//! boundary allows swapping to persistent storage without touching
//! orchestration logic.

use async_trait::async_trait;
use consilium_domain::{
    AgentId, AgentPerformanceRecord, AgentPrediction, AgentSettlement, Consultation,
    ConsultationId, MarketStats, PredictionSet, Resolution, SpecialistResponse,
};
use thiserror::Error;

/// Errors that can occur in repository operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Other(String),
}

/// Repository for consultation records
#[async_trait]
pub trait ConsultationStore: Send + Sync {
    /// Insert a freshly opened consultation
    async fn insert(&self, consultation: Consultation) -> Result<(), StoreError>;

    /// Fetch a consultation by id
    async fn get(&self, id: &ConsultationId) -> Result<Option<Consultation>, StoreError>;

    /// Insert a specialist response unless that specialty already has one.
    ///
    /// Returns whether the response was inserted. This is the merge point
    /// shared by the primary flow and the fast-mode background drain.
    async fn insert_response(
        &self,
        id: &ConsultationId,
        response: SpecialistResponse,
    ) -> Result<bool, StoreError>;

    /// Mark a consultation completed
    async fn complete(&self, id: &ConsultationId) -> Result<(), StoreError>;
}

/// Repository for prediction sets, resolutions, and performance records
#[async_trait]
pub trait MarketStore: Send + Sync {
    /// Merge predictions into a consultation's set, creating it when
    /// absent. Agents already represented are dropped; the ids actually
    /// added are returned.
    async fn merge_predictions(
        &self,
        id: &ConsultationId,
        predictions: Vec<AgentPrediction>,
    ) -> Result<Vec<AgentId>, StoreError>;

    /// Fetch a consultation's prediction set
    async fn prediction_set(
        &self,
        id: &ConsultationId,
    ) -> Result<Option<PredictionSet>, StoreError>;

    /// Mark a prediction set resolved
    async fn mark_resolved(&self, id: &ConsultationId) -> Result<(), StoreError>;

    /// Store a resolution record, replacing any previous one for the
    /// consultation
    async fn store_resolution(&self, resolution: Resolution) -> Result<(), StoreError>;

    /// Fetch the latest resolution for a consultation
    async fn resolution(&self, id: &ConsultationId) -> Result<Option<Resolution>, StoreError>;

    /// Record initiation totals against an agent's performance record,
    /// creating it on first contact
    async fn record_initiation(
        &self,
        agent: &AgentId,
        dimensions: u64,
        staked: u64,
    ) -> Result<(), StoreError>;

    /// Fold a settlement into an agent's performance record
    async fn record_settlement(&self, settlement: &AgentSettlement) -> Result<(), StoreError>;

    /// Fetch an agent's performance record
    async fn performance(
        &self,
        agent: &AgentId,
    ) -> Result<Option<AgentPerformanceRecord>, StoreError>;

    /// Whole-market statistics snapshot
    async fn stats(&self) -> Result<MarketStats, StoreError>;
}

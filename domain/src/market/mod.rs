//! Prediction market: staked outcome predictions, cascading resolution,
//! and rolling agent performance

pub mod fees;
pub mod performance;
pub mod prediction;
pub mod resolution;
pub mod scoring;

pub use fees::consultation_fee;
pub use performance::{AgentPerformanceRecord, DimensionStats, MarketStats};
pub use prediction::{
    AgentPrediction, DimensionKind, OutcomeValue, PredictionDimension, PredictionSet,
    PredictionSetStatus, compute_stake,
};
pub use resolution::{
    AgentSettlement, Resolution, ResolutionPayload, ResolutionSource, inter_agent_agreement,
    inter_agent_outcomes, settle_agent,
};
pub use scoring::{OutcomeSet, aggregate_accuracy, score_dimension};

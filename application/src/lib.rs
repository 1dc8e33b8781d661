//! Application layer for consilium
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::ConsultationParams;
pub use ports::{
    consultation_log::{ConsultationEvent, ConsultationLogger, NoConsultationLogger},
    progress::{ConsultationPhase, ConsultationProgress, NoProgress},
    specialist::{GatewayError, SpecialistAgent},
    store::{ConsultationStore, MarketStore, StoreError},
    token_ledger::{LedgerError, TokenLedger},
};
pub use registry::SpecialistRegistry;
pub use use_cases::{
    ConductConferenceUseCase, ConsultationOutput, InitiationSummary, MarketError,
    PredictionMarket, RunConsultationError, RunConsultationInput, RunConsultationUseCase,
};

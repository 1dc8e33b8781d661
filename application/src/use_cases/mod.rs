//! Use cases orchestrating the domain through the ports

pub mod conference_round;
pub mod prediction_market;
pub mod run_consultation;

pub use conference_round::ConductConferenceUseCase;
pub use prediction_market::{InitiationSummary, MarketError, PredictionMarket};
pub use run_consultation::{
    ConsultationOutput, RunConsultationError, RunConsultationInput, RunConsultationUseCase,
};

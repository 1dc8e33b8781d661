//! Core domain primitives: errors, identities, case input, specialty tags

pub mod case;
pub mod error;
pub mod ids;
pub mod specialty;

pub use case::CaseInput;
pub use error::DomainError;
pub use ids::{AgentId, ConsultationId, timestamp_ms};
pub use specialty::Specialty;

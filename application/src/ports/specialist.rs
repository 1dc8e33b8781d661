//! Specialist agent port
//!
//! Defines the capability contract for a specialist reasoning agent. The
//! core never talks to any network itself - all agent reasoning is an
//! external collaborator reached through this trait. Dispatch is by
//! specialty tag plus the single polymorphic [`SpecialistAgent::assess`]
//! entry point; never by probing which methods an object happens to
//! expose.

use async_trait::async_trait;
use consilium_domain::{AgentId, AssessmentResult, CaseInput, PeerQuestion, Specialty};
use thiserror::Error;

/// Errors that can occur while calling a specialist agent
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Specialist unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// A specialist reasoning agent
///
/// Implementations (adapters) live in the infrastructure layer: remote
/// reasoning services in production, scripted panels in tests and demos.
#[async_trait]
pub trait SpecialistAgent: Send + Sync {
    /// Stable identity for the process lifetime
    fn id(&self) -> &AgentId;

    /// Declared capability tag
    fn specialty(&self) -> Specialty;

    /// Whether the agent can currently take a case
    fn is_available(&self) -> bool {
        true
    }

    /// Assess a case and return the structured envelope
    async fn assess(&self, case: &CaseInput) -> Result<AssessmentResult, GatewayError>;

    /// Self-reported confidence on a topic (0.0 to 1.0)
    fn confidence(&self, topic: &str) -> f64;

    /// Answer a batch of peer questions, given the case and the agent's
    /// own initial assessment as context. The reply is free-form; the
    /// conference parses it.
    async fn answer(
        &self,
        case: &CaseInput,
        questions: &[PeerQuestion],
        own_assessment: Option<&AssessmentResult>,
    ) -> Result<String, GatewayError>;
}

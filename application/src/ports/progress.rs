//! Progress notification port
//!
//! Defines the interface for reporting progress during a consultation.

use consilium_domain::Specialty;

/// Phases of a consultation, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsultationPhase {
    /// Concurrent specialist response collection
    Collection,
    /// Inter-agent dialogue round
    Conference,
    /// Report synthesis
    Synthesis,
    /// Prediction settlement
    Settlement,
}

impl ConsultationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationPhase::Collection => "collection",
            ConsultationPhase::Conference => "conference",
            ConsultationPhase::Synthesis => "synthesis",
            ConsultationPhase::Settlement => "settlement",
        }
    }
}

/// Callback for progress updates during a consultation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, structured logs, ...).
pub trait ConsultationProgress: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &ConsultationPhase, total_tasks: usize);

    /// Called when a specialist task completes within a phase
    fn on_specialist_complete(&self, phase: &ConsultationPhase, specialty: &Specialty, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &ConsultationPhase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ConsultationProgress for NoProgress {
    fn on_phase_start(&self, _phase: &ConsultationPhase, _total_tasks: usize) {}
    fn on_specialist_complete(
        &self,
        _phase: &ConsultationPhase,
        _specialty: &Specialty,
        _success: bool,
    ) {
    }
    fn on_phase_complete(&self, _phase: &ConsultationPhase) {}
}

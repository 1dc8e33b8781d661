//! Port for structured consultation event logging.
//!
//! Defines the [`ConsultationLogger`] trait for recording consultation
//! events (responses collected, disagreements detected, resolutions
//! applied, fees accrued) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the
//! consultation's event stream in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured consultation event for logging.
///
/// Each event has a type string and a JSON payload with event-specific
/// fields; the sink adds its own timestamp.
pub struct ConsultationEvent {
    /// Event type identifier (e.g., "response_collected", "resolution_applied").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConsultationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging consultation events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL
/// line). The `log` method is intentionally synchronous and non-fallible
/// to avoid disrupting the main execution flow - logging failures are
/// silently ignored.
pub trait ConsultationLogger: Send + Sync {
    /// Record a consultation event.
    fn log(&self, event: ConsultationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConsultationLogger;

impl ConsultationLogger for NoConsultationLogger {
    fn log(&self, _event: ConsultationEvent) {}
}

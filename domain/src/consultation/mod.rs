//! Consultation aggregate: the case-evaluation session and its outputs

pub mod entities;
pub mod synthesis;
pub mod value_objects;

pub use entities::{CollectionMode, Consultation, ConsultationStatus};
pub use synthesis::{ConsultationReport, PlanItem, PlanPhase, RedFlag};
pub use value_objects::{
    AssessmentDispute, AssessmentResult, ClinicalImportance, DisputeExtent, Recommendation,
    ResponseStatus, SpecialistResponse,
};

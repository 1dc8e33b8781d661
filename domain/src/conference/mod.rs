//! Dialogue conference: inter-agent question routing, disagreement
//! detection, and emergent findings

pub mod disagreement;
pub mod entities;
pub mod findings;
pub mod parsing;
pub mod questions;
pub mod vocabulary;

pub use disagreement::detect_disagreements;
pub use entities::{
    ConferenceMetadata, DialogueExchange, Disagreement, DisagreementKind, EmergentFinding,
    FindingSource, Novelty, PeerQuestion, QuestionPriority, Severity,
};
pub use findings::detect_emergent_findings;
pub use parsing::split_numbered_answers;
pub use questions::{collect_peer_questions, extract_questions_from_text, group_by_target};

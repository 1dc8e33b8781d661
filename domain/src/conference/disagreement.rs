//! Disagreement detection across specialist assessments.
//!
//! Three independent signals, any of which may fire for a topic:
//!
//! 1. **Explicit** - an agent's envelope disputes a peer's baseline
//! 2. **Priority conflict** - the same normalized intervention is
//!    recommended with a priority spread of 3 or more
//! 3. **Importance conflict** - clinical-importance ratings differ by
//!    two or more ordinal levels
//!
//! A fourth, same-machinery signal covers expected recovery timelines
//! that sit 14 or more days apart.

use crate::conference::entities::{Disagreement, DisagreementKind, Severity};
use crate::consultation::value_objects::{DisputeExtent, SpecialistResponse};
use crate::core::Specialty;
use std::collections::HashMap;

/// Priority spread at which a shared recommendation becomes a conflict
const PRIORITY_SPREAD_THRESHOLD: u8 = 3;
/// Ordinal importance gap at which ratings become a conflict
const IMPORTANCE_GAP_THRESHOLD: u8 = 2;
/// Timeline spread (days) at which expectations become a conflict
const TIMELINE_SPREAD_THRESHOLD: u32 = 14;

/// Run every detection signal over the responses.
///
/// High-severity disagreements leave with a proposed resolution attached;
/// lower severities stay unresolved for the coordinator to weigh.
pub fn detect_disagreements(responses: &[&SpecialistResponse]) -> Vec<Disagreement> {
    let successful: Vec<&SpecialistResponse> =
        responses.iter().copied().filter(|r| r.is_success()).collect();

    let mut disagreements = Vec::new();
    disagreements.extend(explicit_disputes(&successful));
    disagreements.extend(priority_conflicts(&successful));
    disagreements.extend(importance_conflicts(&successful));
    disagreements.extend(timeline_conflicts(&successful));

    for disagreement in &mut disagreements {
        if disagreement.is_high_severity() && disagreement.resolution.is_none() {
            disagreement.resolution = Some(propose_resolution(disagreement));
        }
    }

    disagreements
}

/// Signal 1: envelope-declared disputes
fn explicit_disputes(responses: &[&SpecialistResponse]) -> Vec<Disagreement> {
    let mut out = Vec::new();
    for response in responses {
        let Some(assessment) = &response.assessment else {
            continue;
        };
        for dispute in &assessment.disputes {
            let severity = match dispute.extent {
                DisputeExtent::Full => Severity::High,
                DisputeExtent::Partial => Severity::Medium,
            };
            out.push(
                Disagreement::new(
                    vec![response.specialty, dispute.target],
                    dispute.topic.clone(),
                    DisagreementKind::Explicit,
                    severity,
                )
                .with_confidence(0.9),
            );
        }
    }
    out
}

/// Signal 2: same intervention, priority spread >= 3
fn priority_conflicts(responses: &[&SpecialistResponse]) -> Vec<Disagreement> {
    // intervention -> (specialty, priority) per recommending agent
    let mut by_intervention: HashMap<String, Vec<(Specialty, u8)>> = HashMap::new();

    for response in responses {
        let Some(assessment) = &response.assessment else {
            continue;
        };
        for rec in &assessment.recommendations {
            by_intervention
                .entry(rec.normalized_intervention())
                .or_default()
                .push((response.specialty, rec.priority));
        }
    }

    let mut out = Vec::new();
    for (intervention, entries) in by_intervention {
        if entries.len() < 2 {
            continue;
        }
        let min = entries.iter().map(|(_, p)| *p).min().unwrap_or(1);
        let max = entries.iter().map(|(_, p)| *p).max().unwrap_or(1);
        let spread = max - min;
        if spread < PRIORITY_SPREAD_THRESHOLD {
            continue;
        }

        let severity = if spread >= 4 {
            Severity::High
        } else {
            Severity::Medium
        };
        let mut agents: Vec<Specialty> = entries.iter().map(|(s, _)| *s).collect();
        agents.sort();
        agents.dedup();

        out.push(
            Disagreement::new(
                agents,
                intervention,
                DisagreementKind::PriorityConflict,
                severity,
            )
            .with_confidence((0.5 + 0.1 * f64::from(spread)).min(1.0)),
        );
    }
    out
}

/// Signal 3: clinical-importance ordinal gap >= 2
fn importance_conflicts(responses: &[&SpecialistResponse]) -> Vec<Disagreement> {
    let rated: Vec<(Specialty, u8)> = responses
        .iter()
        .filter_map(|r| {
            r.assessment
                .as_ref()
                .map(|a| (r.specialty, a.importance.rank()))
        })
        .collect();
    if rated.len() < 2 {
        return Vec::new();
    }

    let min = rated.iter().map(|(_, rank)| *rank).min().unwrap_or(0);
    let max = rated.iter().map(|(_, rank)| *rank).max().unwrap_or(0);
    let gap = max - min;
    if gap < IMPORTANCE_GAP_THRESHOLD {
        return Vec::new();
    }

    // Only the agents at the extremes define the conflict
    let mut agents: Vec<Specialty> = rated
        .iter()
        .filter(|(_, rank)| *rank == min || *rank == max)
        .map(|(s, _)| *s)
        .collect();
    agents.sort();
    agents.dedup();

    let severity = if gap >= 3 {
        Severity::High
    } else {
        Severity::Medium
    };

    vec![
        Disagreement::new(
            agents,
            "clinical importance",
            DisagreementKind::ImportanceConflict,
            severity,
        )
        .with_confidence(0.8),
    ]
}

/// Supplemental signal: expected timelines >= 14 days apart
fn timeline_conflicts(responses: &[&SpecialistResponse]) -> Vec<Disagreement> {
    let committed: Vec<(Specialty, u32)> = responses
        .iter()
        .filter_map(|r| {
            r.assessment
                .as_ref()
                .and_then(|a| a.expected_timeline_days)
                .map(|days| (r.specialty, days))
        })
        .collect();
    if committed.len() < 2 {
        return Vec::new();
    }

    let min = committed.iter().map(|(_, d)| *d).min().unwrap_or(0);
    let max = committed.iter().map(|(_, d)| *d).max().unwrap_or(0);
    let spread = max - min;
    if spread < TIMELINE_SPREAD_THRESHOLD {
        return Vec::new();
    }

    let mut agents: Vec<Specialty> = committed
        .iter()
        .filter(|(_, d)| *d == min || *d == max)
        .map(|(s, _)| *s)
        .collect();
    agents.sort();
    agents.dedup();

    let severity = if spread >= 28 {
        Severity::High
    } else {
        Severity::Medium
    };

    vec![
        Disagreement::new(
            agents,
            "expected recovery timeline",
            DisagreementKind::TimelineConflict,
            severity,
        )
        .with_confidence(0.7),
    ]
}

fn propose_resolution(disagreement: &Disagreement) -> String {
    let agents = disagreement
        .agents
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    match disagreement.kind {
        DisagreementKind::Explicit => format!(
            "Coordinator to reconcile the disputed baseline on '{}' between {}",
            disagreement.topic, agents
        ),
        DisagreementKind::PriorityConflict => format!(
            "Align on a single priority for '{}' across {}; defer to the most conservative until reviewed",
            disagreement.topic, agents
        ),
        DisagreementKind::TimelineConflict => format!(
            "Reassess expected timeline with {}; stage milestones instead of a single date",
            agents
        ),
        DisagreementKind::ImportanceConflict => format!(
            "Escalate importance rating gap between {} to coordinator review",
            agents
        ),
    }
}

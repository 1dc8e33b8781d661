//! Emergent-finding detection.
//!
//! A finding is emergent when it only becomes visible across agents:
//! novelty language inside a high-impact exchange, a high-severity
//! disagreement that earned a resolution, or a domain keyword shared by
//! exchanges of three or more distinct agents.

use crate::conference::entities::{
    Disagreement, DialogueExchange, EmergentFinding, FindingSource, Novelty,
};
use crate::conference::vocabulary::{DOMAIN_KEYWORDS, NOVELTY_KEYWORDS, matches};
use crate::core::Specialty;
use std::collections::{HashMap, HashSet};

/// Detect emergent findings from a round's exchanges and disagreements.
pub fn detect_emergent_findings(
    exchanges: &[DialogueExchange],
    disagreements: &[Disagreement],
) -> Vec<EmergentFinding> {
    let mut findings = Vec::new();
    findings.extend(novelty_findings(exchanges));
    findings.extend(resolved_disagreement_findings(disagreements));
    findings.extend(cross_specialty_findings(exchanges));
    findings
}

/// Novelty language in a high-impact exchange
fn novelty_findings(exchanges: &[DialogueExchange]) -> Vec<EmergentFinding> {
    exchanges
        .iter()
        .filter(|e| e.diagnostic_impact)
        .filter_map(|exchange| {
            let hits = matches(&exchange.answer, NOVELTY_KEYWORDS);
            if hits.is_empty() {
                return None;
            }
            Some(EmergentFinding {
                finding: exchange.answer.clone(),
                discovered_by: vec![exchange.from, exchange.to],
                novelty: Novelty::Novel,
                significance: format!(
                    "novelty language ({}) in a high-impact exchange",
                    hits.join(", ")
                ),
                source: FindingSource::ExchangeNovelty,
            })
        })
        .collect()
}

/// A high-severity disagreement that was assigned a resolution
fn resolved_disagreement_findings(disagreements: &[Disagreement]) -> Vec<EmergentFinding> {
    disagreements
        .iter()
        .filter(|d| d.is_high_severity())
        .filter_map(|disagreement| {
            let resolution = disagreement.resolution.as_ref()?;
            Some(EmergentFinding {
                finding: format!(
                    "high-severity disagreement on '{}' resolved: {}",
                    disagreement.topic, resolution
                ),
                discovered_by: disagreement.agents.clone(),
                novelty: Novelty::Unusual,
                significance: "panel conflict required an explicit resolution".to_string(),
                source: FindingSource::ResolvedDisagreement,
            })
        })
        .collect()
}

/// A shared domain keyword across exchanges of >= 3 distinct agents
fn cross_specialty_findings(exchanges: &[DialogueExchange]) -> Vec<EmergentFinding> {
    // keyword -> agents that used it in any exchange they took part in
    let mut keyword_agents: HashMap<&str, HashSet<Specialty>> = HashMap::new();

    for exchange in exchanges {
        let text = format!("{} {}", exchange.question, exchange.answer);
        for keyword in matches(&text, DOMAIN_KEYWORDS) {
            let agents = keyword_agents.entry(keyword).or_default();
            agents.insert(exchange.from);
            agents.insert(exchange.to);
        }
    }

    let mut findings: Vec<EmergentFinding> = keyword_agents
        .into_iter()
        .filter(|(_, agents)| agents.len() >= 3)
        .map(|(keyword, agents)| {
            let mut discovered_by: Vec<Specialty> = agents.into_iter().collect();
            discovered_by.sort();
            EmergentFinding {
                finding: format!("'{}' raised independently across the panel", keyword),
                discovered_by,
                novelty: Novelty::Routine,
                significance: "cross-specialty consensus on a shared mechanism".to_string(),
                source: FindingSource::CrossSpecialtyConsensus,
            }
        })
        .collect();
    findings.sort_by(|a, b| a.finding.cmp(&b.finding));
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conference::entities::{DisagreementKind, QuestionPriority, Severity};

    fn exchange(
        from: Specialty,
        to: Specialty,
        answer: &str,
        impact: bool,
    ) -> DialogueExchange {
        DialogueExchange {
            from,
            to,
            question: "context?".to_string(),
            answer: answer.to_string(),
            diagnostic_impact: impact,
            priority: QuestionPriority::Medium,
        }
    }

    #[test]
    fn test_novelty_in_high_impact_exchange() {
        let exchanges = vec![exchange(
            Specialty::PainManagement,
            Specialty::Movement,
            "Atypical gait pattern for this presentation",
            true,
        )];

        let findings = detect_emergent_findings(&exchanges, &[]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].novelty, Novelty::Novel);
        assert_eq!(findings[0].source, FindingSource::ExchangeNovelty);
    }

    #[test]
    fn test_novelty_ignored_without_impact() {
        let exchanges = vec![exchange(
            Specialty::PainManagement,
            Specialty::Movement,
            "rare presentation but nothing urgent",
            false,
        )];
        assert!(detect_emergent_findings(&exchanges, &[]).is_empty());
    }

    #[test]
    fn test_resolved_high_severity_disagreement_surfaces() {
        let disagreement = Disagreement::new(
            vec![Specialty::Movement, Specialty::Strength],
            "loading tolerance",
            DisagreementKind::Explicit,
            Severity::High,
        )
        .with_resolution("coordinator to reconcile");

        let findings = detect_emergent_findings(&[], &[disagreement]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].novelty, Novelty::Unusual);
    }

    #[test]
    fn test_unresolved_high_severity_disagreement_stays_quiet() {
        let disagreement = Disagreement::new(
            vec![Specialty::Movement],
            "loading tolerance",
            DisagreementKind::Explicit,
            Severity::High,
        );
        assert!(detect_emergent_findings(&[], &[disagreement]).is_empty());
    }

    #[test]
    fn test_cross_specialty_keyword_needs_three_agents() {
        let two_agents = vec![exchange(
            Specialty::PainManagement,
            Specialty::Movement,
            "looks like central sensitization",
            false,
        )];
        assert!(detect_emergent_findings(&two_agents, &[]).is_empty());

        let three_agents = vec![
            exchange(
                Specialty::PainManagement,
                Specialty::Movement,
                "looks like central sensitization",
                false,
            ),
            exchange(
                Specialty::Psychology,
                Specialty::PainManagement,
                "central sensitization would explain the fear component",
                false,
            ),
        ];
        let findings = detect_emergent_findings(&three_agents, &[]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].source, FindingSource::CrossSpecialtyConsensus);
        assert_eq!(findings[0].discovered_by.len(), 3);
    }
}

//! Peer-question gathering for the dialogue round.
//!
//! Questions come from the typed assessment envelope first. For agents
//! that ramble instead, two documented fallbacks run over the summary
//! text, in order:
//!
//! 1. An embedded JSON object carrying a `peer_questions` array
//! 2. Line patterns: `@movement: ...` or `Question for movement: ...`
//!
//! A parse miss never drops a question silently - whatever any fallback
//! finds is kept.

use crate::conference::entities::{PeerQuestion, QuestionPriority};
use crate::conference::vocabulary::{URGENCY_KEYWORDS, contains_any};
use crate::consultation::value_objects::SpecialistResponse;
use crate::core::Specialty;

/// Gather every peer question from the given responses, tagged with its
/// origin and priority.
pub fn collect_peer_questions(responses: &[&SpecialistResponse]) -> Vec<PeerQuestion> {
    let mut questions = Vec::new();

    for response in responses {
        let Some(assessment) = &response.assessment else {
            continue;
        };

        let envelope: Vec<PeerQuestion> = assessment
            .peer_questions
            .iter()
            .map(|q| PeerQuestion {
                // The orchestrator knows who authored the envelope; never
                // trust the agent's own `from` field.
                from: response.specialty,
                to: q.to,
                text: q.text.clone(),
                priority: q.priority,
            })
            .collect();

        if envelope.is_empty() {
            questions.extend(extract_questions_from_text(
                response.specialty,
                &assessment.summary,
            ));
        } else {
            questions.extend(envelope);
        }
    }

    // Questions directed at the author itself carry no routing value
    questions.retain(|q| q.from != q.to);
    questions
}

/// Free-text fallback extraction of peer questions.
///
/// Tries an embedded JSON `peer_questions` array first, then the line
/// heuristics. Priority defaults to medium; urgency language upgrades
/// a question to high.
pub fn extract_questions_from_text(from: Specialty, text: &str) -> Vec<PeerQuestion> {
    let mut questions = extract_json_questions(from, text);
    if !questions.is_empty() {
        return questions;
    }

    for line in text.lines() {
        let line = line.trim();

        let parsed = if let Some(rest) = line.strip_prefix('@') {
            rest.split_once(':')
                .map(|(tag, q)| (tag.to_string(), q.trim().to_string()))
        } else {
            let lower = line.to_lowercase();
            lower.strip_prefix("question for ").and_then(|rest| {
                rest.split_once(':').map(|(tag, _)| {
                    // Slice the original line to keep the question's casing
                    let offset = line.len() - rest.len() + tag.len() + 1;
                    (tag.to_string(), line[offset..].trim().to_string())
                })
            })
        };

        if let Some((tag, question_text)) = parsed
            && let Ok(target) = tag.trim().parse::<Specialty>()
            && !question_text.is_empty()
        {
            questions.push(
                PeerQuestion::new(from, target, question_text.clone())
                    .with_priority(priority_from_text(&question_text)),
            );
        }
    }

    questions
}

/// Look for an embedded JSON object with a `peer_questions` array,
/// mirroring the envelope shape.
fn extract_json_questions(from: Specialty, text: &str) -> Vec<PeerQuestion> {
    let Some(start) = text.find('{') else {
        return Vec::new();
    };
    let Some(end) = text[start..].rfind('}') else {
        return Vec::new();
    };

    let Ok(value) = serde_json::from_str::<serde_json::Value>(&text[start..start + end + 1])
    else {
        return Vec::new();
    };

    let Some(items) = value.get("peer_questions").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let to: Specialty = item.get("to")?.as_str()?.parse().ok()?;
            let text = item.get("text")?.as_str()?.trim();
            if text.is_empty() || to == from {
                return None;
            }
            let priority = item
                .get("priority")
                .and_then(|p| p.as_str())
                .and_then(|p| match p {
                    "high" => Some(QuestionPriority::High),
                    "medium" => Some(QuestionPriority::Medium),
                    "low" => Some(QuestionPriority::Low),
                    _ => None,
                })
                .unwrap_or_else(|| priority_from_text(text));
            Some(PeerQuestion::new(from, to, text).with_priority(priority))
        })
        .collect()
}

fn priority_from_text(text: &str) -> QuestionPriority {
    if contains_any(text, URGENCY_KEYWORDS) {
        QuestionPriority::High
    } else {
        QuestionPriority::Medium
    }
}

/// Sort questions high -> medium -> low and group them by target
/// specialty, preserving the priority order inside each group.
pub fn group_by_target(mut questions: Vec<PeerQuestion>) -> Vec<(Specialty, Vec<PeerQuestion>)> {
    questions.sort_by_key(|q| q.priority);

    let mut groups: Vec<(Specialty, Vec<PeerQuestion>)> = Vec::new();
    for question in questions {
        if let Some((_, group)) = groups.iter_mut().find(|(target, _)| *target == question.to) {
            group.push(question);
        } else {
            groups.push((question.to, vec![question]));
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consultation::value_objects::AssessmentResult;

    fn response_with(
        specialty: Specialty,
        assessment: AssessmentResult,
    ) -> SpecialistResponse {
        SpecialistResponse::success(
            format!("{}-1", specialty).into(),
            specialty,
            assessment,
            0.8,
            0.9,
            10,
        )
    }

    #[test]
    fn test_envelope_questions_preferred() {
        let assessment = AssessmentResult::new("@strength: ignored fallback line")
            .with_peer_questions(vec![PeerQuestion::new(
                Specialty::PainManagement,
                Specialty::Movement,
                "Is the gait pattern antalgic?",
            )]);
        let response = response_with(Specialty::PainManagement, assessment);

        let questions = collect_peer_questions(&[&response]);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].to, Specialty::Movement);
    }

    #[test]
    fn test_text_fallback_at_mention() {
        let assessment = AssessmentResult::new(
            "Overall stable.\n@psychology: any signs of kinesiophobia?\n@movement: urgent - check for foot drop",
        );
        let response = response_with(Specialty::PainManagement, assessment);

        let questions = collect_peer_questions(&[&response]);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].to, Specialty::Psychology);
        assert_eq!(questions[0].priority, QuestionPriority::Medium);
        assert_eq!(questions[1].priority, QuestionPriority::High);
    }

    #[test]
    fn test_text_fallback_question_for() {
        let questions = extract_questions_from_text(
            Specialty::Strength,
            "Question for coordination: who owns the MD referral?",
        );
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].to, Specialty::Coordination);
        assert!(questions[0].text.contains("MD referral"));
    }

    #[test]
    fn test_json_fallback() {
        let text = r#"My thoughts below.
{"peer_questions": [{"to": "movement", "text": "ROM at day 7?", "priority": "high"}]}"#;
        let questions = extract_questions_from_text(Specialty::Coordination, text);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].priority, QuestionPriority::High);
    }

    #[test]
    fn test_self_directed_questions_dropped() {
        let assessment = AssessmentResult::new("").with_peer_questions(vec![PeerQuestion::new(
            Specialty::Movement,
            Specialty::Movement,
            "note to self",
        )]);
        let response = response_with(Specialty::Movement, assessment);
        assert!(collect_peer_questions(&[&response]).is_empty());
    }

    #[test]
    fn test_group_by_target_sorts_high_first() {
        let questions = vec![
            PeerQuestion::new(Specialty::PainManagement, Specialty::Movement, "low one")
                .with_priority(QuestionPriority::Low),
            PeerQuestion::new(Specialty::Strength, Specialty::Movement, "high one")
                .with_priority(QuestionPriority::High),
            PeerQuestion::new(Specialty::Psychology, Specialty::Coordination, "mid one"),
        ];

        let groups = group_by_target(questions);
        assert_eq!(groups.len(), 2);

        let (target, movement_group) = &groups[0];
        assert_eq!(*target, Specialty::Movement);
        assert_eq!(movement_group[0].text, "high one");
        assert_eq!(movement_group[1].text, "low one");
    }
}

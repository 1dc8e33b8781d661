//! Reply parsing for batched dialogue answers.
//!
//! A target agent receives all pending questions in one batched message
//! and answers free-form. [`split_numbered_answers`] recovers per-question
//! answers from a numbered list. When no structure is found the whole
//! reply is applied to every pending question - an explicit, documented
//! fallback, not silent data loss.

/// Split a free-form reply into one answer per question.
///
/// Recognized markers at line start: `1.`, `1)`, `1:`, and `Answer 1:`.
/// Lines between markers belong to the preceding answer. Questions beyond
/// the last parsed answer receive the whole reply as their answer.
///
/// Always returns exactly `expected` answers.
pub fn split_numbered_answers(reply: &str, expected: usize) -> Vec<String> {
    if expected == 0 {
        return Vec::new();
    }

    let mut parsed: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for line in reply.lines() {
        if let Some(rest) = strip_answer_marker(line) {
            if let Some(done) = current.take() {
                parsed.push(done);
            }
            current = Some(rest.to_string());
        } else if let Some(answer) = current.as_mut() {
            if !line.trim().is_empty() {
                answer.push('\n');
                answer.push_str(line.trim());
            }
        }
    }
    if let Some(done) = current.take() {
        parsed.push(done);
    }

    if parsed.is_empty() {
        // No structure found: the whole reply answers every question.
        return vec![reply.trim().to_string(); expected];
    }

    (0..expected)
        .map(|i| {
            parsed
                .get(i)
                .cloned()
                .unwrap_or_else(|| reply.trim().to_string())
        })
        .collect()
}

/// Strip a numbered-answer marker from a line, returning the remainder
fn strip_answer_marker(line: &str) -> Option<&str> {
    let trimmed = line.trim();

    let rest = trimmed
        .strip_prefix("Answer ")
        .or_else(|| trimmed.strip_prefix("answer "))
        .unwrap_or(trimmed);

    let digits: &str = rest.split(['.', ')', ':']).next()?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let after = &rest[digits.len()..];
    let mut chars = after.chars();
    match chars.next() {
        Some('.') | Some(')') | Some(':') => Some(chars.as_str().trim()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_list_split() {
        let reply = "1. Gait looks antalgic on the left.\n2) No sign of foot drop.\n3: Re-test in a week.";
        let answers = split_numbered_answers(reply, 3);
        assert_eq!(answers[0], "Gait looks antalgic on the left.");
        assert_eq!(answers[1], "No sign of foot drop.");
        assert_eq!(answers[2], "Re-test in a week.");
    }

    #[test]
    fn test_answer_prefix_marker() {
        let reply = "Answer 1: within normal limits\nAnswer 2: refer to MD";
        let answers = split_numbered_answers(reply, 2);
        assert_eq!(answers[0], "within normal limits");
        assert_eq!(answers[1], "refer to MD");
    }

    #[test]
    fn test_continuation_lines_attach_to_answer() {
        let reply = "1. First part\nmore detail here\n2. Second";
        let answers = split_numbered_answers(reply, 2);
        assert_eq!(answers[0], "First part\nmore detail here");
        assert_eq!(answers[1], "Second");
    }

    #[test]
    fn test_unstructured_reply_applies_to_all() {
        let reply = "Everything is consistent with my initial assessment.";
        let answers = split_numbered_answers(reply, 3);
        assert_eq!(answers.len(), 3);
        assert!(answers.iter().all(|a| a == reply));
    }

    #[test]
    fn test_fewer_answers_than_questions_falls_back() {
        let reply = "1. Only one answer given";
        let answers = split_numbered_answers(reply, 2);
        assert_eq!(answers[0], "Only one answer given");
        assert_eq!(answers[1], reply);
    }

    #[test]
    fn test_zero_expected_returns_empty() {
        assert!(split_numbered_answers("1. whatever", 0).is_empty());
    }

    #[test]
    fn test_plain_number_without_marker_is_not_split() {
        let reply = "The patient is 42 years old and recovering well.";
        let answers = split_numbered_answers(reply, 1);
        assert_eq!(answers[0], reply);
    }
}

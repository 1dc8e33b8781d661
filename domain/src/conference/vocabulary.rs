//! Fixed keyword sets the conference heuristics scan for.
//!
//! Kept in one place so the urgency, novelty, and shared-domain
//! vocabularies stay auditable. Matching is lowercase substring.

/// Clinical-urgency language; any hit escalates an exchange to
/// diagnostic-impact.
pub const URGENCY_KEYWORDS: &[&str] = &[
    "urgent",
    "immediate",
    "emergency",
    "red flag",
    "refer out",
    "escalate",
    "worsening",
    "severe",
    "contraindicated",
];

/// Novelty language; a hit in a high-impact exchange raises an emergent
/// finding.
pub const NOVELTY_KEYWORDS: &[&str] = &[
    "unexpected",
    "atypical",
    "rare",
    "unusual",
    "surprising",
    "not typical",
    "first time",
];

/// Shared domain terms; the same term appearing in exchanges of three or
/// more distinct agents marks cross-specialty consensus.
pub const DOMAIN_KEYWORDS: &[&str] = &[
    "inflammation",
    "compensation",
    "kinesiophobia",
    "central sensitization",
    "overload",
    "deconditioning",
    "guarding",
    "flare",
];

/// Check whether any keyword from the set appears in the text
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

/// Return the keywords from the set that appear in the text
pub fn matches<'a>(text: &str, keywords: &'a [&'a str]) -> Vec<&'a str> {
    let lower = text.to_lowercase();
    keywords
        .iter()
        .filter(|k| lower.contains(**k))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_any_is_case_insensitive() {
        assert!(contains_any("This looks URGENT to me", URGENCY_KEYWORDS));
        assert!(!contains_any("all quiet", URGENCY_KEYWORDS));
    }

    #[test]
    fn test_matches_returns_every_hit() {
        let hits = matches(
            "atypical presentation, rare in this age group",
            NOVELTY_KEYWORDS,
        );
        assert_eq!(hits, vec!["atypical", "rare"]);
    }
}

//! Backend error classification.
//!
//! Maps a raw provider error message onto a small set of caller-facing
//! categories by case-insensitive substring match. First matching rule wins;
//! anything unmatched passes through unchanged.

struct Rule {
    needle: &'static str,
    message: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        needle: "api key",
        message: "Invalid API key. Please check your configuration.",
    },
    Rule {
        needle: "quota",
        message: "API quota exceeded. Please try again later.",
    },
    Rule {
        needle: "rate limit",
        message: "Rate limit exceeded. Please try again later.",
    },
];

/// Classify a raw backend error message.
pub fn classify(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    RULES
        .iter()
        .find(|rule| lowered.contains(rule.needle))
        .map(|rule| rule.message.to_string())
        .unwrap_or_else(|| raw.to_string())
}

//! Task decomposition: prompt template and step parser.
//!
//! [`build_prompt`] turns a task into a full instruction for the model;
//! [`parse_steps`] turns the model's reply back into an ordered step list.

/// Lines this short (after trimming and de-numbering) are noise, not steps.
const MIN_STEP_CHARS: usize = 5;

/// Embed `task` into the fixed decomposition instruction.
pub fn build_prompt(task: &str) -> String {
    format!(
        "Break the following task down into no more than 5 small, concrete, actionable steps:\n\
         \"{task}\"\n\
         \n\
         Write each step on its own line and do not number them.\n\
         Start each step with an imperative verb (for example \"Draft\", \"Email\", \"Review\").\n\
         Keep each step short: one sentence per step."
    )
}

/// Parse a model reply into steps.
///
/// Splits on line breaks, trims, drops blank lines, strips a leading
/// enumeration marker (`1.`, `2)`, `3-`, `4:`), then drops anything of
/// five characters or fewer. Order is preserved.
pub fn parse_steps(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(strip_enumeration)
        .filter(|line| line.chars().count() > MIN_STEP_CHARS)
        .map(String::from)
        .collect()
}

/// Remove a leading `<digits><.|)|-|:>` marker and the whitespace after it.
fn strip_enumeration(line: &str) -> &str {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return line;
    }
    match rest.strip_prefix(['.', ')', '-', ':']) {
        Some(after) => after.trim_start(),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_task() {
        let prompt = build_prompt("Prepare the quarterly report");
        assert!(prompt.contains("\"Prepare the quarterly report\""));
        assert!(prompt.contains("no more than 5"));
        assert!(prompt.contains("do not number"));
    }

    #[test]
    fn test_parse_mixed_enumeration() {
        let steps = parse_steps("1. Do thing\n2) Another thing\nhi\nWrite the report");
        assert_eq!(steps, vec!["Do thing", "Another thing", "Write the report"]);
    }

    #[test]
    fn test_parse_dash_and_colon_markers() {
        let steps = parse_steps("3- Book the venue\n4:Send the invites");
        assert_eq!(steps, vec!["Book the venue", "Send the invites"]);
    }

    #[test]
    fn test_parse_drops_blank_and_short_lines() {
        let steps = parse_steps("\n   \nOk\n12345\n  Gather receipts  \n\n");
        assert_eq!(steps, vec!["Gather receipts"]);
    }

    #[test]
    fn test_marker_without_digits_is_kept() {
        // A bullet is not an enumeration marker.
        let steps = parse_steps("- Review the draft");
        assert_eq!(steps, vec!["- Review the draft"]);
    }

    #[test]
    fn test_digits_without_marker_are_kept() {
        let steps = parse_steps("2024 budget review");
        assert_eq!(steps, vec!["2024 budget review"]);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // Seven Hangul syllables: longer than the noise threshold.
        let steps = parse_steps("1. 보고서작성하기\n2. 검토");
        assert_eq!(steps, vec!["보고서작성하기"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let steps = parse_steps("1. Outline chapters\r\n2. Draft chapter one\r\n");
        assert_eq!(steps, vec!["Outline chapters", "Draft chapter one"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(parse_steps("").is_empty());
    }
}

//! Utility helpers: data path, timestamps, string truncation.

use std::path::PathBuf;

/// Get the promptgate data directory (e.g. `~/.promptgate/`).
pub fn get_data_path() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".promptgate")
}

/// Get current ISO 8601 timestamp.
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Truncate a string to `max_len` characters, adding "..." if truncated.
/// Unicode-safe.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_exact_length() {
        assert_eq!(truncate_string("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        let result = truncate_string("summarize the quarterly report in three bullets", 15);
        assert_eq!(result, "summarize th...");
        assert_eq!(result.chars().count(), 15);
    }

    #[test]
    fn test_truncate_unicode() {
        let result = truncate_string("보고서를 작성하기 위한 단계", 5);
        assert_eq!(result, "보고...");
    }

    #[test]
    fn test_timestamp_is_valid() {
        let ts = timestamp();
        // Should be parseable as RFC 3339
        chrono::DateTime::parse_from_rfc3339(&ts).unwrap();
    }

    #[test]
    fn test_data_path_ends_with_promptgate() {
        let path = get_data_path();
        assert!(path.ends_with(".promptgate"));
    }
}

//! Shared CLI helpers: response printing, version banner.

use colored::Colorize;

use promptgate_core::GenerationResult;

/// Print a generation reply to stdout.
pub fn print_response(reply: &GenerationResult) {
    let provider = reply.provider.as_deref().unwrap_or("unknown provider");
    let text = reply.text.as_deref().unwrap_or_default();

    println!();
    println!(
        "{}  {}",
        "🚪 promptgate".cyan().bold(),
        format_meta(provider, reply.duration_ms).dimmed()
    );
    if text.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{text}");
    }
    println!();
}

/// Print a numbered step list.
pub fn print_steps(task: &str, steps: &[String]) {
    println!();
    println!("{} {}", "🚪 Breakdown:".cyan().bold(), task);
    if steps.is_empty() {
        println!("{}", "(the model returned no usable steps)".dimmed());
    }
    for (i, step) in steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
    println!();
}

/// Print the banner shown when the server starts.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🚪 promptgate".cyan().bold(), version.dimmed());
    println!("{}", "LLM gateway. Press Ctrl+C to stop.".dimmed());
    println!();
}

fn format_meta(provider: &str, duration_ms: Option<u64>) -> String {
    match duration_ms {
        Some(ms) => format!("{provider} · {ms} ms"),
        None => provider.to_string(),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_meta_with_duration() {
        assert_eq!(format_meta("OpenAI", Some(420)), "OpenAI · 420 ms");
    }

    #[test]
    fn format_meta_without_duration() {
        assert_eq!(format_meta("Hugging Face", None), "Hugging Face");
    }
}

//! Request body checks, run after the rate-limit gate and before any
//! provider is resolved.

use serde_json::Value;

use promptgate_core::{BreakdownRequest, GenerationRequest};

use crate::error::GatewayError;

/// Upper bound on `prompt`, in characters.
pub const MAX_PROMPT_CHARS: usize = 2000;

/// Extract `prompt`: a non-empty string of at most [`MAX_PROMPT_CHARS`].
pub fn validate_prompt(body: &Value) -> Result<GenerationRequest, GatewayError> {
    let prompt = required_string(body, "prompt")
        .ok_or_else(|| invalid("Prompt is required and must be a string"))?;
    check_prompt_length(prompt)?;
    Ok(GenerationRequest::new(prompt))
}

/// Extract `task`: a non-empty string.
///
/// The task itself has no length cap; the prompt built from it does.
pub fn validate_task(body: &Value) -> Result<BreakdownRequest, GatewayError> {
    required_string(body, "task")
        .map(BreakdownRequest::new)
        .ok_or_else(|| invalid("Task is required and must be a string"))
}

/// Reject prompts longer than [`MAX_PROMPT_CHARS`] characters.
pub fn check_prompt_length(prompt: &str) -> Result<(), GatewayError> {
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return Err(invalid(&format!(
            "Prompt is too long (max {} characters)",
            MAX_PROMPT_CHARS
        )));
    }
    Ok(())
}

fn required_string<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn invalid(message: &str) -> GatewayError {
    GatewayError::Validation(message.to_string())
}

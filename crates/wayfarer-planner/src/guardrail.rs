use wayfarer_core::{WayfarerError, WayfarerResult};

const MIN_INPUT_CHARS: usize = 8;
const MAX_INPUT_CHARS: usize = 4_000;

/// Validate the raw request before any provider is contacted.
///
/// Rejections here are the caller's `validation_error` outcome — cheap,
/// local checks only, no network.
pub fn validate_input(input: &str) -> WayfarerResult<()> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(WayfarerError::Validation(
            "input text cannot be empty".to_string(),
        ));
    }
    if trimmed.chars().count() < MIN_INPUT_CHARS {
        return Err(WayfarerError::Validation(format!(
            "input too short to describe a trip (minimum {MIN_INPUT_CHARS} characters)"
        )));
    }
    if trimmed.chars().count() > MAX_INPUT_CHARS {
        return Err(WayfarerError::Validation(format!(
            "input too long (maximum {MAX_INPUT_CHARS} characters)"
        )));
    }
    if !trimmed.chars().any(char::is_alphabetic) {
        return Err(WayfarerError::Validation(
            "input contains no readable text".to_string(),
        ));
    }

    Ok(())
}

//! Validation boundaries enforced before any collaborator call
//!
//! Violations are reported with the offending field so the UI can show them
//! inline next to the control that produced them.

use thiserror::Error;

pub const DILEMMA_MIN_CHARS: usize = 10;
pub const DILEMMA_MAX_CHARS: usize = 1000;
pub const ADDITIONAL_CONTEXT_MAX_CHARS: usize = 300;
pub const UTTERANCE_MIN_CHARS: usize = 1;
pub const UTTERANCE_MAX_CHARS: usize = 500;
pub const MIN_ADVISORS: u8 = 3;
pub const MAX_ADVISORS: u8 = 7;

/// Local input failed a boundary check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A collaborator response that does not conform to the expected shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed response at {path}: {message}")]
pub struct ShapeError {
    pub path: String,
    pub message: String,
}

impl ShapeError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Prefix the path with the enclosing location
    pub fn nested(self, parent: &str) -> Self {
        Self {
            path: format!("{parent}.{}", self.path),
            message: self.message,
        }
    }
}

fn char_len(text: &str) -> usize {
    text.trim().chars().count()
}

fn check_range(
    field: &'static str,
    text: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = char_len(text);
    if len < min {
        return Err(ValidationError::new(
            field,
            format!("must be at least {min} characters (got {len})"),
        ));
    }
    if len > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {max} characters (got {len})"),
        ));
    }
    Ok(())
}

pub fn validate_dilemma(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::new("dilemmaText", "please describe your dilemma"));
    }
    check_range("dilemmaText", text, DILEMMA_MIN_CHARS, DILEMMA_MAX_CHARS)
}

pub fn validate_additional_context(text: &str) -> Result<(), ValidationError> {
    check_range("additionalContext", text, 0, ADDITIONAL_CONTEXT_MAX_CHARS)
}

pub fn validate_utterance(text: &str) -> Result<(), ValidationError> {
    check_range("userUtterance", text, UTTERANCE_MIN_CHARS, UTTERANCE_MAX_CHARS)
}

/// Advisor counts outside the product range are clamped, not rejected
pub fn clamp_advisor_count(count: u8) -> u8 {
    count.clamp(MIN_ADVISORS, MAX_ADVISORS)
}

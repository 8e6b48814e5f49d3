use council_types::ValidationError;
use thiserror::Error;

/// Errors surfaced to the control that triggered them
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouncilError {
    /// Local input failed a boundary check; nothing was sent
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The collaborator call failed or its response was rejected
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// A referenced advisor or tension no longer exists in the current analysis
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
}

impl CouncilError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Validation errors are shown inline next to the field
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, CouncilError>;

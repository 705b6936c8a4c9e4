use thiserror::Error;

/// Fatal contract violations. These signal a caller bug, never a fairness
/// edge case: degraded configurations (unknown presets, exhausted pools,
/// unresolvable pair conflicts) all produce usable results instead of
/// errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("requested_count must be >= 1, got {0}")]
    InvalidRequestedCount(u32),

    #[error("group_count must be >= 2, got {0}")]
    InvalidGroupCount(u32),

    #[error("duplicate candidate id in roster: {0}")]
    DuplicateCandidateId(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

//! Error types for quizbox-core.

use thiserror::Error;

/// Result type alias using ProgressError.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Errors that can occur while recording progress or aggregating sessions.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("invalid box number {value}: must be 1, 2, or 3")]
    InvalidBox { value: i32 },

    #[error("session contains no valid review events")]
    EmptySession,

    #[error("box tallies sum to {tallied} but {cards_reviewed} cards were reviewed")]
    InconsistentAggregate { cards_reviewed: u32, tallied: u32 },
}

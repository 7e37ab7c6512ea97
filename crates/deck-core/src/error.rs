//! Error types for SoundDeck

use thiserror::Error;

/// Board-wide error type.
///
/// No variant is fatal: every failure degrades to "operation had no effect"
/// plus a reported diagnostic. `NotFound` is reserved for unknown scene ids;
/// unknown group/sound/category ids are `Validation` (they are recovered
/// locally as no-ops or user messages).
#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Resource error: {0}")]
    Resource(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Result type alias
pub type BoardResult<T> = Result<T, BoardError>;

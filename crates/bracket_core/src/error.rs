//! Error taxonomy for bracket operations.

use thiserror::Error;

/// Failure of a single bracket operation.
///
/// None of these are transient: they describe a malformed request or data that
/// does not fit the bracket, so callers surface them unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BracketError {
    /// A referenced record does not exist
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// The request names something that cannot apply to this battle
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The bracket is not in a state that allows the operation
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The storage collaborator failed (I/O, serialization)
    #[error("storage error: {0}")]
    Storage(String),
}

impl BracketError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, BracketError>;

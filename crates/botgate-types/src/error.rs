use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors surfaced by bot operations.
#[derive(Debug, Error)]
pub enum BotError {
    /// No such bot, or an id that can never exist.
    #[error("bot not found")]
    NotFound,

    /// Authenticated, but not allowed to act on this bot.
    #[error("access denied")]
    Denied,

    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The row disappeared between read and write.
    #[error("edit conflict")]
    EditConflict,

    #[error("storage error: {0}")]
    Storage(String),

    /// Credential confirmation did not complete. Says nothing about whether
    /// the credential is valid.
    #[error("credential confirmation failed: {0}")]
    ExternalService(String),
}

impl From<ValidationErrors> for BotError {
    fn from(e: ValidationErrors) -> Self {
        BotError::Validation(e)
    }
}

impl From<TokenCheckError> for BotError {
    fn from(e: TokenCheckError) -> Self {
        BotError::ExternalService(e.to_string())
    }
}

/// Errors from repository operations (used by trait definitions in botgate-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("entity not found")]
    NotFound,

    /// Optimistic update affected zero rows.
    #[error("edit conflict")]
    EditConflict,

    #[error("storage operation timed out")]
    Timeout,

    #[error("query error: {0}")]
    Query(String),
}

impl From<RepositoryError> for BotError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => BotError::NotFound,
            RepositoryError::EditConflict => BotError::EditConflict,
            other => BotError::Storage(other.to_string()),
        }
    }
}

/// Reasons a credential confirmation call did not produce an answer.
#[derive(Debug, Error)]
pub enum TokenCheckError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("confirmation service timed out")]
    Timeout,

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

//! Shared error types for the services crate.

use thiserror::Error;

use mcq_core::model::AttemptError;
use storage::repository::StorageError;

/// Errors emitted while loading the static question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("failed to parse question bank: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors emitted by session services.
///
/// Note what is deliberately *not* here: a missing category/set and an empty
/// session are terminal states the caller renders, not errors, and invalid
/// ledger actions are silent no-ops.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Attempt(#[from] AttemptError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

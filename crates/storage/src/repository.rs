use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use mcq_core::model::{AttemptSummary, QuestionId};

/// Maximum number of attempts retained in history. Oldest entries beyond the
/// cap are evicted on append.
pub const HISTORY_CAP: usize = 50;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable, bounded attempt history kept under a single fixed storage slot.
///
/// The store is single-writer: there is no locking or merge strategy, the
/// last writer wins. Absent or corrupt stored data reads as an empty list.
#[async_trait]
pub trait AttemptHistoryRepository: Send + Sync {
    /// Prepend an attempt to history, evicting the oldest beyond the cap.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history slot cannot be written.
    async fn append(&self, attempt: &AttemptSummary) -> Result<(), StorageError>;

    /// Load all retained attempts, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only on backend access failures; missing or
    /// unparseable data yields an empty list.
    async fn load_all(&self) -> Result<Vec<AttemptSummary>, StorageError>;
}

/// Transient per-session slots used to hand data between views: the most
/// recently finalized attempt, and the wrong-id filter for a follow-up run.
///
/// Contents are scoped to one running session and never survive it.
#[async_trait]
pub trait SessionHandoffRepository: Send + Sync {
    /// Store the most recently finalized attempt.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be written.
    async fn set_last_attempt(&self, attempt: &AttemptSummary) -> Result<(), StorageError>;

    /// Read the most recently finalized attempt, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend access failures.
    async fn last_attempt(&self) -> Result<Option<AttemptSummary>, StorageError>;

    /// Store the wrong-id filter set for the next wrong-only session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be written.
    async fn set_wrong_ids(&self, wrong_ids: &HashSet<QuestionId>) -> Result<(), StorageError>;

    /// Read the stored wrong-id filter set, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend access failures.
    async fn wrong_ids(&self) -> Result<Option<HashSet<QuestionId>>, StorageError>;

    /// Clear both handoff slots.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slots cannot be cleared.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and for the
/// session-scoped handoff slots.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    history: Arc<Mutex<Vec<AttemptSummary>>>,
    last_attempt: Arc<Mutex<Option<AttemptSummary>>>,
    wrong_ids: Arc<Mutex<Option<HashSet<QuestionId>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttemptHistoryRepository for InMemoryRepository {
    async fn append(&self, attempt: &AttemptSummary) -> Result<(), StorageError> {
        let mut guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(0, attempt.clone());
        guard.truncate(HISTORY_CAP);
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<AttemptSummary>, StorageError> {
        let guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl SessionHandoffRepository for InMemoryRepository {
    async fn set_last_attempt(&self, attempt: &AttemptSummary) -> Result<(), StorageError> {
        let mut guard = self
            .last_attempt
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(attempt.clone());
        Ok(())
    }

    async fn last_attempt(&self) -> Result<Option<AttemptSummary>, StorageError> {
        let guard = self
            .last_attempt
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn set_wrong_ids(&self, wrong_ids: &HashSet<QuestionId>) -> Result<(), StorageError> {
        let mut guard = self
            .wrong_ids
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(wrong_ids.clone());
        Ok(())
    }

    async fn wrong_ids(&self) -> Result<Option<HashSet<QuestionId>>, StorageError> {
        let guard = self
            .wrong_ids
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        {
            let mut guard = self
                .last_attempt
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            *guard = None;
        }
        let mut guard = self
            .wrong_ids
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Aggregates the history and handoff repositories behind trait objects for
/// easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub history: Arc<dyn AttemptHistoryRepository>,
    pub handoff: Arc<dyn SessionHandoffRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let history: Arc<dyn AttemptHistoryRepository> = Arc::new(repo.clone());
        let handoff: Arc<dyn SessionHandoffRepository> = Arc::new(repo);
        Self { history, handoff }
    }
}

use academy_core::model::{ClassId, StudyEngineSnapshot, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

//
// ─── KEY-VALUE SLOTS ───────────────────────────────────────────────────────────
//

/// Durable string slots keyed by a namespaced name, one set per device.
///
/// Values are written and read wholesale; there is no partial update.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Drop `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store rejects the removal.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local slots for tests and previews.
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

//
// ─── STUDY ENGINE ROWS ─────────────────────────────────────────────────────────
//

/// One synced snapshot per `(user, class)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyEngineRow {
    pub id: Uuid,
    pub user_id: UserId,
    pub class_id: ClassId,
    pub snapshot: StudyEngineSnapshot,
    pub updated_at: DateTime<Utc>,
}

/// Row store for cross-device snapshots, keyed by `(user, class)`.
#[async_trait]
pub trait StudyEngineRowRepository: Send + Sync {
    /// Fetch the row for `(user, class)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or decoding failures.
    async fn get_row(
        &self,
        user: UserId,
        class: &ClassId,
    ) -> Result<Option<StudyEngineRow>, StorageError>;

    /// Insert or replace the snapshot for `(user, snapshot.state.class_id)` and
    /// bump its `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be written.
    async fn upsert_row(
        &self,
        user: UserId,
        snapshot: &StudyEngineSnapshot,
        at: DateTime<Utc>,
    ) -> Result<StudyEngineRow, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    rows: Arc<Mutex<HashMap<(UserId, ClassId), StudyEngineRow>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudyEngineRowRepository for InMemoryRepository {
    async fn get_row(
        &self,
        user: UserId,
        class: &ClassId,
    ) -> Result<Option<StudyEngineRow>, StorageError> {
        let guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&(user, class.clone())).cloned())
    }

    async fn upsert_row(
        &self,
        user: UserId,
        snapshot: &StudyEngineSnapshot,
        at: DateTime<Utc>,
    ) -> Result<StudyEngineRow, StorageError> {
        let mut guard = self
            .rows
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let class_id = snapshot.state.class_id.clone();
        let row = guard
            .entry((user, class_id.clone()))
            .and_modify(|row| {
                row.snapshot = snapshot.clone();
                row.updated_at = at;
            })
            .or_insert_with(|| StudyEngineRow {
                id: Uuid::new_v4(),
                user_id: user,
                class_id,
                snapshot: snapshot.clone(),
                updated_at: at,
            });
        Ok(row.clone())
    }
}

/// Aggregates the slot store and row store behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub slots: Arc<dyn KeyValueStore>,
    pub rows: Arc<dyn StudyEngineRowRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            slots: Arc::new(InMemoryKeyValueStore::new()),
            rows: Arc::new(InMemoryRepository::new()),
        }
    }
}

use std::sync::Arc;

use academy_core::Clock;
use academy_core::model::{ClassId, StudyEngineSnapshot, UserId};
use storage::repository::{StudyEngineRow, StudyEngineRowRepository};
use tracing::{debug, info};

use crate::error::SyncError;

/// Explicit push/pull of Study Engine snapshots to the row store.
///
/// Local commands never call this; syncing is a separate user action.
#[derive(Clone)]
pub struct SnapshotSyncService {
    clock: Clock,
    user: UserId,
    rows: Arc<dyn StudyEngineRowRepository>,
}

impl SnapshotSyncService {
    #[must_use]
    pub fn new(clock: Clock, user: UserId, rows: Arc<dyn StudyEngineRowRepository>) -> Self {
        Self { clock, user, rows }
    }

    #[must_use]
    pub fn user(&self) -> UserId {
        self.user
    }

    /// Upsert `snapshot` for this user and its class.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Storage` if the row cannot be written.
    pub async fn push(&self, snapshot: &StudyEngineSnapshot) -> Result<StudyEngineRow, SyncError> {
        let row = self
            .rows
            .upsert_row(self.user, snapshot, self.clock.now())
            .await?;
        info!(user = %self.user, class = %row.class_id, "study engine snapshot pushed");
        Ok(row)
    }

    /// Fetch the stored snapshot for `class`, if any.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Storage` on read failures and
    /// `SyncError::ClassMismatch` if the stored blob names a different class.
    pub async fn pull(&self, class: &ClassId) -> Result<Option<StudyEngineSnapshot>, SyncError> {
        let Some(row) = self.rows.get_row(self.user, class).await? else {
            debug!(user = %self.user, %class, "no remote snapshot");
            return Ok(None);
        };
        if row.snapshot.state.class_id != *class {
            return Err(SyncError::ClassMismatch {
                expected: class.to_string(),
                found: row.snapshot.state.class_id.to_string(),
            });
        }
        Ok(Some(row.snapshot))
    }
}

use academy_core::model::{ClassId, StudyEngineSnapshot, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::SqliteRepository;
use super::mapping::{map_study_engine_row, snapshot_to_json};
use crate::repository::{StorageError, StudyEngineRow, StudyEngineRowRepository};

#[async_trait]
impl StudyEngineRowRepository for SqliteRepository {
    async fn get_row(
        &self,
        user: UserId,
        class: &ClassId,
    ) -> Result<Option<StudyEngineRow>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, class_id, snapshot, updated_at
            FROM study_engine_states
            WHERE user_id = ?1 AND class_id = ?2
            LIMIT 1
            ",
        )
        .bind(user.to_string())
        .bind(class.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        row.as_ref().map(map_study_engine_row).transpose()
    }

    async fn upsert_row(
        &self,
        user: UserId,
        snapshot: &StudyEngineSnapshot,
        at: DateTime<Utc>,
    ) -> Result<StudyEngineRow, StorageError> {
        let blob = snapshot_to_json(snapshot)?;
        let class_id = snapshot.state.class_id.as_str();

        let row = sqlx::query(
            r"
            INSERT INTO study_engine_states (id, user_id, class_id, snapshot, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id, class_id) DO UPDATE SET
                snapshot = excluded.snapshot,
                updated_at = excluded.updated_at
            RETURNING id, user_id, class_id, snapshot, updated_at
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user.to_string())
        .bind(class_id)
        .bind(blob)
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        debug!(user = %user, class_id, "study engine row upserted");
        map_study_engine_row(&row)
    }
}

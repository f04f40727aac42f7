use academy_core::model::{ClassId, StudyEngineSnapshot, UserId};
use sqlx::Row;
use uuid::Uuid;

use crate::repository::{StorageError, StudyEngineRow};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn uuid_from_text(field: &'static str, raw: &str) -> Result<Uuid, StorageError> {
    Uuid::parse_str(raw).map_err(|_| StorageError::Serialization(format!("invalid {field}: {raw}")))
}

pub(crate) fn snapshot_to_json(snapshot: &StudyEngineSnapshot) -> Result<String, StorageError> {
    serde_json::to_string(snapshot).map_err(ser)
}

pub(crate) fn map_study_engine_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<StudyEngineRow, StorageError> {
    let id = uuid_from_text("id", &row.try_get::<String, _>("id").map_err(ser)?)?;
    let user_id = UserId::new(uuid_from_text(
        "user_id",
        &row.try_get::<String, _>("user_id").map_err(ser)?,
    )?);
    let class_id = ClassId::new(row.try_get::<String, _>("class_id").map_err(ser)?);
    let snapshot: StudyEngineSnapshot =
        serde_json::from_str(&row.try_get::<String, _>("snapshot").map_err(ser)?).map_err(ser)?;
    let updated_at = row.try_get("updated_at").map_err(ser)?;

    Ok(StudyEngineRow {
        id,
        user_id,
        class_id,
        snapshot,
        updated_at,
    })
}

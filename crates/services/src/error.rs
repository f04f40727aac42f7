//! Shared error types for the services crate.

use thiserror::Error;

use academy_core::model::{LessonId, QuizError, TrackId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `LessonSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonSessionError {
    #[error("lesson {lesson} is not part of track {track}")]
    UnknownLesson { track: TrackId, lesson: LessonId },
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// Errors emitted by `SnapshotSyncService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    #[error("remote snapshot belongs to class {found}, expected {expected}")]
    ClassMismatch { expected: String, found: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Catalog(#[from] academy_core::Error),
}

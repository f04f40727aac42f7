#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod lesson_session;
pub mod preview;
pub mod progress_service;
pub mod study_engine_service;
pub mod sync_service;

pub use academy_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, LessonSessionError, SyncError};
pub use lesson_session::LessonSession;
pub use preview::{PREVIEW_DEBOUNCE, PreviewDebouncer};
pub use progress_service::{LessonProgressService, PROGRESS_SLOT};
pub use study_engine_service::{DiscardReason, LoadOutcome, STUDY_ENGINE_SLOT, StudyEngineService};
pub use sync_service::SnapshotSyncService;

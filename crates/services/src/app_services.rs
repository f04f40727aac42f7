use std::sync::Arc;

use academy_core::model::{LessonCatalog, StudyPlan, UserId};
use storage::repository::{KeyValueStore, Storage};

use crate::Clock;
use crate::error::AppServicesError;
use crate::progress_service::LessonProgressService;
use crate::study_engine_service::StudyEngineService;
use crate::sync_service::SnapshotSyncService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    plan: Arc<StudyPlan>,
    catalog: Arc<LessonCatalog>,
    slots: Arc<dyn KeyValueStore>,
    sync: Arc<SnapshotSyncService>,
}

impl AppServices {
    /// Build services over `storage` with the built-in plan and catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the built-in catalog is invalid.
    pub fn new(storage: Storage, clock: Clock, user: UserId) -> Result<Self, AppServicesError> {
        let catalog = LessonCatalog::academy().map_err(academy_core::Error::from)?;
        let sync = Arc::new(SnapshotSyncService::new(clock, user, storage.rows));
        Ok(Self {
            clock,
            plan: Arc::new(StudyPlan::web_awakening()),
            catalog: Arc::new(catalog),
            slots: storage.slots,
            sync,
        })
    }

    /// Device slots from `slots`, synced rows in `SQLite` at `db_url`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        slots: Arc<dyn KeyValueStore>,
        db_url: &str,
        clock: Clock,
        user: UserId,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(slots, db_url).await?;
        Self::new(storage, clock, user)
    }

    #[must_use]
    pub fn plan(&self) -> Arc<StudyPlan> {
        Arc::clone(&self.plan)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<LessonCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Load the Study Engine from this device's slot.
    #[must_use]
    pub fn study_engine(&self) -> StudyEngineService {
        StudyEngineService::load(self.clock, self.plan(), Arc::clone(&self.slots))
    }

    /// Load lesson progress from this device's slot.
    #[must_use]
    pub fn lesson_progress(&self) -> LessonProgressService {
        LessonProgressService::load(self.clock, Arc::clone(&self.slots))
    }

    #[must_use]
    pub fn sync(&self) -> Arc<SnapshotSyncService> {
        Arc::clone(&self.sync)
    }
}

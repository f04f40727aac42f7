use std::sync::Arc;

use academy_core::Clock;
use academy_core::model::{LessonCatalog, LessonId, LessonProgress, TrackId, TrackSummary};
use chrono::{DateTime, Utc};
use storage::repository::KeyValueStore;
use tracing::{debug, warn};

/// Slot holding every track's lesson progress on this device.
pub const PROGRESS_SLOT: &str = "gaia:academy:progress";

/// Lesson progress with write-through persistence.
///
/// Unreadable or corrupt data yields empty progress. Write failures are logged
/// and the in-memory progress stays authoritative.
pub struct LessonProgressService {
    clock: Clock,
    slots: Arc<dyn KeyValueStore>,
    progress: LessonProgress,
}

impl LessonProgressService {
    #[must_use]
    pub fn load(clock: Clock, slots: Arc<dyn KeyValueStore>) -> Self {
        let progress = match slots.get(PROGRESS_SLOT) {
            Ok(Some(raw)) => serde_json::from_str::<Option<LessonProgress>>(&raw)
                .unwrap_or_else(|err| {
                    warn!(error = %err, "discarded unreadable lesson progress");
                    None
                })
                .unwrap_or_default(),
            Ok(None) => LessonProgress::new(),
            Err(err) => {
                warn!(error = %err, "failed to read lesson progress");
                LessonProgress::new()
            }
        };
        Self {
            clock,
            slots,
            progress,
        }
    }

    #[must_use]
    pub fn progress(&self) -> &LessonProgress {
        &self.progress
    }

    #[must_use]
    pub fn is_lesson_completed(&self, track: &TrackId, lesson: &LessonId) -> bool {
        self.progress.is_lesson_completed(track, lesson)
    }

    /// Flip the completion flag and return the new value.
    pub fn toggle_lesson_completed(&mut self, track: &TrackId, lesson: &LessonId) -> bool {
        let done = self.progress.toggle_lesson_completed(track, lesson);
        self.persist();
        done
    }

    /// Set the flag if unset. Returns whether it changed; a no-op does not write.
    pub fn mark_completed(&mut self, track: &TrackId, lesson: &LessonId) -> bool {
        let changed = self.progress.mark_completed(track, lesson);
        if changed {
            self.persist();
        }
        changed
    }

    /// Stamp `track` as visited now and return the timestamp.
    pub fn mark_study_visit(&mut self, track: &TrackId) -> DateTime<Utc> {
        let at = self.clock.now();
        self.progress.mark_study_visit(track, at);
        self.persist();
        at
    }

    #[must_use]
    pub fn last_visit(&self, track: &TrackId) -> Option<DateTime<Utc>> {
        self.progress.last_visit(track)
    }

    #[must_use]
    pub fn track_summary(&self, catalog: &LessonCatalog, track: &TrackId) -> TrackSummary {
        self.progress.track_summary(catalog, track)
    }

    fn persist(&self) {
        let raw = match serde_json::to_string(&self.progress) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "failed to encode lesson progress");
                return;
            }
        };
        match self.slots.set(PROGRESS_SLOT, &raw) {
            Ok(()) => debug!(bytes = raw.len(), "lesson progress saved"),
            Err(err) => warn!(error = %err, "failed to save lesson progress"),
        }
    }
}

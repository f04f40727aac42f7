use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{LessonId, TrackId};
use crate::model::lesson::LessonCatalog;

/// Per-lesson completion flags and per-track last visits.
///
/// Records are created lazily by the first toggle and never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    #[serde(default)]
    completed: BTreeMap<TrackId, BTreeMap<LessonId, bool>>,
    #[serde(default)]
    last_visits: BTreeMap<TrackId, DateTime<Utc>>,
}

/// Completed/total view of one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSummary {
    pub track: TrackId,
    pub completed: u32,
    pub total: u32,
}

impl TrackSummary {
    /// Rounded completion percent; `0` for an empty track.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = (f64::from(self.completed) / f64::from(self.total) * 100.0).round();
        // Bounded to [0, 100] by construction.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = pct.clamp(0.0, 100.0) as u32;
        pct
    }
}

impl LessonProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unknown keys read as not completed.
    #[must_use]
    pub fn is_lesson_completed(&self, track: &TrackId, lesson: &LessonId) -> bool {
        self.completed
            .get(track)
            .and_then(|lessons| lessons.get(lesson))
            .copied()
            .unwrap_or(false)
    }

    /// Flip the flag for `(track, lesson)` and return the new value.
    pub fn toggle_lesson_completed(&mut self, track: &TrackId, lesson: &LessonId) -> bool {
        let flag = self
            .completed
            .entry(track.clone())
            .or_default()
            .entry(lesson.clone())
            .or_insert(false);
        *flag = !*flag;
        *flag
    }

    /// Set the flag only if it is not already set. Returns whether it toggled.
    pub fn mark_completed(&mut self, track: &TrackId, lesson: &LessonId) -> bool {
        if self.is_lesson_completed(track, lesson) {
            return false;
        }
        self.toggle_lesson_completed(track, lesson);
        true
    }

    pub fn mark_study_visit(&mut self, track: &TrackId, at: DateTime<Utc>) {
        self.last_visits.insert(track.clone(), at);
    }

    #[must_use]
    pub fn last_visit(&self, track: &TrackId) -> Option<DateTime<Utc>> {
        self.last_visits.get(track).copied()
    }

    /// Number of completed lessons recorded for `track`, catalog or not.
    #[must_use]
    pub fn completed_count(&self, track: &TrackId) -> usize {
        self.completed
            .get(track)
            .map_or(0, |lessons| lessons.values().filter(|done| **done).count())
    }

    /// Summary of `track` measured against the catalog.
    ///
    /// Tracks with written lessons only count those; tracks without fall back to
    /// every recorded completion.
    #[must_use]
    pub fn track_summary(&self, catalog: &LessonCatalog, track: &TrackId) -> TrackSummary {
        let written: Vec<_> = catalog.lessons(track).collect();
        let completed = if written.is_empty() {
            self.completed_count(track)
        } else {
            written
                .iter()
                .filter(|lesson| self.is_lesson_completed(track, &lesson.id))
                .count()
        };
        let total = catalog.lesson_count(track);
        TrackSummary {
            track: track.clone(),
            completed: u32::try_from(completed).unwrap_or(u32::MAX).min(total),
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::lesson::PROGRAMMING_TRACK;
    use crate::time::fixed_now;

    fn ids() -> (TrackId, LessonId) {
        (TrackId::new(PROGRAMMING_TRACK), LessonId::new("prog-2-1"))
    }

    #[test]
    fn unknown_lessons_are_not_completed() {
        let (track, lesson) = ids();
        assert!(!LessonProgress::new().is_lesson_completed(&track, &lesson));
    }

    #[test]
    fn toggle_flips_and_first_toggle_sets() {
        let (track, lesson) = ids();
        let mut progress = LessonProgress::new();
        assert!(progress.toggle_lesson_completed(&track, &lesson));
        assert!(progress.is_lesson_completed(&track, &lesson));
        assert!(!progress.toggle_lesson_completed(&track, &lesson));
        assert!(!progress.is_lesson_completed(&track, &lesson));
    }

    #[test]
    fn mark_completed_is_idempotent() {
        let (track, lesson) = ids();
        let mut progress = LessonProgress::new();
        assert!(progress.mark_completed(&track, &lesson));
        assert!(!progress.mark_completed(&track, &lesson));
        assert!(progress.is_lesson_completed(&track, &lesson));
    }

    #[test]
    fn visits_are_recorded_per_track() {
        let (track, _) = ids();
        let mut progress = LessonProgress::new();
        assert_eq!(progress.last_visit(&track), None);
        progress.mark_study_visit(&track, fixed_now());
        assert_eq!(progress.last_visit(&track), Some(fixed_now()));
        assert_eq!(progress.last_visit(&TrackId::new("accounting")), None);
    }

    #[test]
    fn summary_counts_catalog_lessons() {
        let catalog = LessonCatalog::academy().unwrap();
        let (track, lesson) = ids();
        let mut progress = LessonProgress::new();
        progress.toggle_lesson_completed(&track, &lesson);
        progress.toggle_lesson_completed(&track, &LessonId::new("prog-2-2"));
        progress.toggle_lesson_completed(&track, &LessonId::new("not-in-catalog"));

        let summary = progress.track_summary(&catalog, &track);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.total, 34);
        assert_eq!(summary.percent(), 6);

        let empty = progress.track_summary(&catalog, &TrackId::new("nowhere"));
        assert_eq!(empty.percent(), 0);
    }

    #[test]
    fn serializes_nested_maps() {
        let (track, lesson) = ids();
        let mut progress = LessonProgress::new();
        progress.toggle_lesson_completed(&track, &lesson);
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["completed"]["programming"]["prog-2-1"], true);
        let back: LessonProgress = serde_json::from_value(json).unwrap();
        assert_eq!(back, progress);
    }
}

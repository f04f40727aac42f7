use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ClassId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CurriculumError {
    #[error("class id cannot be empty")]
    EmptyClassId,

    #[error("total planned days must be > 0")]
    NoPlannedDays,

    #[error("duplicate arc id: {0}")]
    DuplicateArc(String),

    #[error("day range for {arc_id} references an unknown arc")]
    UnknownArc { arc_id: String },

    #[error("day range {start}-{end} for {arc_id} is outside 1..={total}")]
    RangeOutOfBounds {
        arc_id: String,
        start: u32,
        end: u32,
        total: u32,
    },

    #[error("day range for {arc_id} starts at {start}, overlapping the previous range")]
    RangeOverlap { arc_id: String, start: u32 },
}

//
// ─── ARCS ──────────────────────────────────────────────────────────────────────
//

/// A named chapter of the class. Static configuration, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyArc {
    pub id: String,
    pub label: String,
    pub title: String,
    pub focus: String,
    pub estimated_duration: String,
    pub approx_lessons: String,
}

impl StudyArc {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        title: impl Into<String>,
        focus: impl Into<String>,
        estimated_duration: impl Into<String>,
        approx_lessons: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            title: title.into(),
            focus: focus.into(),
            estimated_duration: estimated_duration.into(),
            approx_lessons: approx_lessons.into(),
        }
    }
}

/// Inclusive, 1-indexed block of Study Days owned by one arc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcDayRange {
    pub arc_id: String,
    pub start: u32,
    pub end: u32,
}

impl ArcDayRange {
    #[must_use]
    pub fn new(arc_id: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            arc_id: arc_id.into(),
            start,
            end,
        }
    }

    #[must_use]
    pub fn contains(&self, day: u32) -> bool {
        day >= self.start && day <= self.end
    }

    /// Number of Study Days covered by this range.
    #[must_use]
    pub fn day_count(&self) -> u32 {
        self.end - self.start + 1
    }
}

/// Where a given Study Day sits inside its arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcPlacement<'a> {
    pub arc: &'a StudyArc,
    pub range: &'a ArcDayRange,
    pub day_index_within_arc: u32,
    pub total_days_in_arc: u32,
}

//
// ─── PLAN ──────────────────────────────────────────────────────────────────────
//

/// Unvalidated plan input. Call [`StudyPlanDraft::validate`] to obtain a [`StudyPlan`].
#[derive(Debug, Clone, Default)]
pub struct StudyPlanDraft {
    pub class_id: String,
    pub class_name: String,
    pub class_goal: String,
    pub learner_name: String,
    pub engine_version: String,
    pub total_planned_days: u32,
    pub arcs: Vec<StudyArc>,
    pub ranges: Vec<ArcDayRange>,
}

impl StudyPlanDraft {
    /// Validate the draft into an immutable plan.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` if the class id is blank, the plan has no days,
    /// arc ids repeat, or the day ranges are unordered, overlapping, out of
    /// bounds, or point at an unknown arc.
    pub fn validate(self) -> Result<StudyPlan, CurriculumError> {
        let class_id = self.class_id.trim().to_owned();
        if class_id.is_empty() {
            return Err(CurriculumError::EmptyClassId);
        }
        if self.total_planned_days == 0 {
            return Err(CurriculumError::NoPlannedDays);
        }

        for (idx, arc) in self.arcs.iter().enumerate() {
            if self.arcs[..idx].iter().any(|other| other.id == arc.id) {
                return Err(CurriculumError::DuplicateArc(arc.id.clone()));
            }
        }

        let mut previous_end = 0;
        for range in &self.ranges {
            if !self.arcs.iter().any(|arc| arc.id == range.arc_id) {
                return Err(CurriculumError::UnknownArc {
                    arc_id: range.arc_id.clone(),
                });
            }
            if range.start == 0 || range.start > range.end || range.end > self.total_planned_days
            {
                return Err(CurriculumError::RangeOutOfBounds {
                    arc_id: range.arc_id.clone(),
                    start: range.start,
                    end: range.end,
                    total: self.total_planned_days,
                });
            }
            if range.start <= previous_end {
                return Err(CurriculumError::RangeOverlap {
                    arc_id: range.arc_id.clone(),
                    start: range.start,
                });
            }
            previous_end = range.end;
        }

        Ok(StudyPlan {
            class_id: ClassId::new(class_id),
            class_name: self.class_name,
            class_goal: self.class_goal,
            learner_name: self.learner_name,
            engine_version: self.engine_version,
            total_planned_days: self.total_planned_days,
            arcs: self.arcs,
            ranges: self.ranges,
        })
    }
}

/// Immutable curriculum configuration for one class.
///
/// Built once at startup and shared by reference with the engine; swapping in an
/// alternate plan is how tests exercise other day layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyPlan {
    class_id: ClassId,
    class_name: String,
    class_goal: String,
    learner_name: String,
    engine_version: String,
    total_planned_days: u32,
    arcs: Vec<StudyArc>,
    ranges: Vec<ArcDayRange>,
}

pub const WEB_AWAKENING_CLASS_ID: &str = "web-awakening-line-01";
pub const STUDY_ENGINE_VERSION: &str = "1.0.0";
pub const WEB_AWAKENING_PLANNED_DAYS: u32 = 200;

impl StudyPlan {
    /// The "Web Awakening" class: seven arcs over 200 Study Days.
    #[must_use]
    pub fn web_awakening() -> Self {
        let arcs = vec![
            StudyArc::new(
                "arc-1-grounding",
                "Arc 1",
                "Grounding",
                "Tools + HTML + very basic CSS. Understanding what the web is and how pages are built from the ground up.",
                "4-6 weeks",
                "20-25 lessons",
            ),
            StudyArc::new(
                "arc-2-layout-style",
                "Arc 2",
                "Layout & Style",
                "Layout systems, CSS, and responsive design. Making pages actually look good and adapt to different screens.",
                "4-6 weeks",
                "20-25 lessons",
            ),
            StudyArc::new(
                "arc-3-movement",
                "Arc 3",
                "Movement",
                "JavaScript basics plus DOM manipulation. Turning static pages into interactive experiences.",
                "6-8 weeks",
                "25-30 lessons",
            ),
            StudyArc::new(
                "arc-4-components",
                "Arc 4",
                "Components",
                "React core: components, props, state, and simple hooks. Thinking in reusable, composable pieces.",
                "8-10 weeks",
                "30-35 lessons",
            ),
            StudyArc::new(
                "arc-5-apps",
                "Arc 5",
                "Apps",
                "From components to small apps: multi-section React apps with basic navigation and state flow.",
                "10-12 weeks",
                "35-40 lessons",
            ),
            StudyArc::new(
                "arc-6-craft",
                "Craft",
                "Craft",
                "Design, UX, accessibility, and performance. Making your projects feel professional and pleasant to use.",
                "8-10 weeks",
                "25-30 lessons",
            ),
            StudyArc::new(
                "arc-7-systems",
                "Systems",
                "Systems",
                "Full-stack basics and architecture: backend, database, auth, and structuring bigger apps.",
                "12-16 weeks (ongoing)",
                "30-40 lessons",
            ),
        ];

        let ranges = vec![
            ArcDayRange::new("arc-1-grounding", 1, 28),
            ArcDayRange::new("arc-2-layout-style", 29, 56),
            ArcDayRange::new("arc-3-movement", 57, 88),
            ArcDayRange::new("arc-4-components", 89, 124),
            ArcDayRange::new("arc-5-apps", 125, 160),
            ArcDayRange::new("arc-6-craft", 161, 184),
            ArcDayRange::new("arc-7-systems", 185, 200),
        ];

        Self {
            class_id: ClassId::new(WEB_AWAKENING_CLASS_ID),
            class_name: "Web Awakening - From Zero to Web Crafter".into(),
            class_goal: "Take Mustafa from \"I feel like a noob\" to \"I can design and build clean, responsive, interactive websites and small web apps on my own, using HTML, CSS, JavaScript and basic React.\"".into(),
            learner_name: "Mustafa".into(),
            engine_version: STUDY_ENGINE_VERSION.into(),
            total_planned_days: WEB_AWAKENING_PLANNED_DAYS,
            arcs,
            ranges,
        }
    }

    #[must_use]
    pub fn class_id(&self) -> &ClassId {
        &self.class_id
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[must_use]
    pub fn class_goal(&self) -> &str {
        &self.class_goal
    }

    #[must_use]
    pub fn learner_name(&self) -> &str {
        &self.learner_name
    }

    #[must_use]
    pub fn engine_version(&self) -> &str {
        &self.engine_version
    }

    #[must_use]
    pub fn total_planned_days(&self) -> u32 {
        self.total_planned_days
    }

    #[must_use]
    pub fn arcs(&self) -> &[StudyArc] {
        &self.arcs
    }

    #[must_use]
    pub fn ranges(&self) -> &[ArcDayRange] {
        &self.ranges
    }

    /// Clamp a day index into `[1, total_planned_days]`.
    #[must_use]
    pub fn clamp_day(&self, day: u32) -> u32 {
        day.clamp(1, self.total_planned_days.max(1))
    }

    /// Locate the arc that owns `day` (after clamping).
    ///
    /// Returns `None` when the clamped day falls outside every configured range.
    #[must_use]
    pub fn arc_for_day(&self, day: u32) -> Option<ArcPlacement<'_>> {
        let clamped = self.clamp_day(day);
        let range = self.ranges.iter().find(|r| r.contains(clamped))?;
        let arc = self.arcs.iter().find(|a| a.id == range.arc_id)?;

        Some(ArcPlacement {
            arc,
            range,
            day_index_within_arc: clamped - range.start + 1,
            total_days_in_arc: range.day_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> StudyPlanDraft {
        StudyPlanDraft {
            class_id: "tiny".into(),
            class_name: "Tiny".into(),
            class_goal: String::new(),
            learner_name: "Sasa".into(),
            engine_version: STUDY_ENGINE_VERSION.into(),
            total_planned_days: 10,
            arcs: vec![
                StudyArc::new("a", "Arc A", "First", "", "", ""),
                StudyArc::new("b", "Arc B", "Second", "", "", ""),
            ],
            ranges: vec![ArcDayRange::new("a", 1, 4), ArcDayRange::new("b", 5, 8)],
        }
    }

    #[test]
    fn every_planned_day_has_exactly_one_arc() {
        let plan = StudyPlan::web_awakening();
        for day in 1..=plan.total_planned_days() {
            let placement = plan.arc_for_day(day).expect("arc for day");
            assert!(placement.day_index_within_arc >= 1);
            assert!(placement.day_index_within_arc <= placement.total_days_in_arc);
            let owners = plan.ranges().iter().filter(|r| r.contains(day)).count();
            assert_eq!(owners, 1, "day {day}");
        }
    }

    #[test]
    fn arc_lookup_is_monotonic() {
        let plan = StudyPlan::web_awakening();
        let position = |day| {
            let placement = plan.arc_for_day(day).unwrap();
            plan.arcs()
                .iter()
                .position(|a| a.id == placement.arc.id)
                .unwrap()
        };
        for day in 1..plan.total_planned_days() {
            let here = position(day);
            let next = position(day + 1);
            assert!(next == here || next == here + 1, "day {day}");
        }
    }

    #[test]
    fn arc_lookup_clamps_out_of_range_days() {
        let plan = StudyPlan::web_awakening();
        let first = plan.arc_for_day(0).unwrap();
        assert_eq!(first.arc.id, "arc-1-grounding");
        assert_eq!(first.day_index_within_arc, 1);

        let last = plan.arc_for_day(5_000).unwrap();
        assert_eq!(last.arc.id, "arc-7-systems");
        assert_eq!(last.day_index_within_arc, 16);
        assert_eq!(last.total_days_in_arc, 16);
    }

    #[test]
    fn arc_boundaries_match_ranges() {
        let plan = StudyPlan::web_awakening();
        let day_28 = plan.arc_for_day(28).unwrap();
        assert_eq!(day_28.arc.title, "Grounding");
        assert_eq!(day_28.day_index_within_arc, 28);

        let day_29 = plan.arc_for_day(29).unwrap();
        assert_eq!(day_29.arc.title, "Layout & Style");
        assert_eq!(day_29.day_index_within_arc, 1);
        assert_eq!(day_29.total_days_in_arc, 28);
    }

    #[test]
    fn uncovered_day_yields_no_arc() {
        let plan = draft().validate().unwrap();
        assert!(plan.arc_for_day(9).is_none());
        assert!(plan.arc_for_day(10).is_none());
        assert_eq!(plan.arc_for_day(5).unwrap().arc.id, "b");
    }

    #[test]
    fn validate_rejects_overlap() {
        let mut d = draft();
        d.ranges = vec![ArcDayRange::new("a", 1, 5), ArcDayRange::new("b", 5, 8)];
        assert!(matches!(
            d.validate(),
            Err(CurriculumError::RangeOverlap { .. })
        ));
    }

    #[test]
    fn validate_rejects_unknown_arc_and_bounds() {
        let mut d = draft();
        d.ranges = vec![ArcDayRange::new("zzz", 1, 2)];
        assert!(matches!(
            d.validate(),
            Err(CurriculumError::UnknownArc { .. })
        ));

        let mut d = draft();
        d.ranges = vec![ArcDayRange::new("a", 3, 11)];
        assert!(matches!(
            d.validate(),
            Err(CurriculumError::RangeOutOfBounds { .. })
        ));
    }

    #[test]
    fn validate_rejects_empty_plan() {
        let mut d = draft();
        d.total_planned_days = 0;
        assert_eq!(d.validate(), Err(CurriculumError::NoPlannedDays));

        let mut d = draft();
        d.class_id = "  ".into();
        assert_eq!(d.validate(), Err(CurriculumError::EmptyClassId));
    }
}

use std::sync::Arc;

use crate::model::{ArcPlacement, StudyEngineSnapshot, StudyEngineState, StudyPlan, TodayArc};
use crate::narrative;

/// Deterministic progress bookkeeping for one class.
///
/// Commands return `true` when they changed the state and `false` when their
/// precondition did not hold. A `false` command is a no-op, never an error, so
/// callers persist only after `true`.
#[derive(Debug, Clone)]
pub struct StudyEngine {
    plan: Arc<StudyPlan>,
    state: StudyEngineState,
}

impl StudyEngine {
    /// Start from defaults: day 1, every counter zero.
    #[must_use]
    pub fn new(plan: Arc<StudyPlan>) -> Self {
        let state = StudyEngineState::initial(plan.class_id().clone(), plan.total_planned_days());
        Self { plan, state }
    }

    /// Rebuild an engine from persisted counters.
    ///
    /// Returns `None` when `state` belongs to a different class. The plan is
    /// authoritative for the class length; the day pointer and completed count
    /// are clamped back into range.
    #[must_use]
    pub fn restore(plan: Arc<StudyPlan>, state: StudyEngineState) -> Option<Self> {
        if state.class_id != *plan.class_id() {
            return None;
        }
        let total = plan.total_planned_days();
        let state = StudyEngineState {
            current_day_index: plan.clamp_day(state.current_day_index),
            completed_days: state.completed_days.min(total),
            total_planned_days: total,
            ..state
        };
        Some(Self { plan, state })
    }

    #[must_use]
    pub fn plan(&self) -> &StudyPlan {
        &self.plan
    }

    #[must_use]
    pub fn state(&self) -> &StudyEngineState {
        &self.state
    }

    fn has_days_left(&self) -> bool {
        self.state.completed_days < self.plan.total_planned_days()
    }

    fn advance_day(&mut self) {
        self.state.current_day_index = self
            .plan
            .clamp_day(self.state.current_day_index.saturating_add(1));
    }

    /// Do today's work.
    ///
    /// Also burns one backlog day when any is owed, overlapping with
    /// [`StudyEngine::complete_backlog_day`].
    pub fn complete_today(&mut self) -> bool {
        if !self.has_days_left() {
            return false;
        }
        self.state.completed_days += 1;
        self.advance_day();
        self.state.streak = self.state.streak.saturating_add(1);
        if self.state.backlog_days > 0 {
            self.state.backlog_days -= 1;
        }
        true
    }

    /// Record a missed day: one more backlog day, streak broken.
    pub fn simulate_missed_day(&mut self) -> bool {
        self.state.backlog_days = self.state.backlog_days.saturating_add(1);
        self.state.streak = 0;
        true
    }

    /// Pay back one backlog day. The day pointer does not move.
    pub fn complete_backlog_day(&mut self) -> bool {
        if self.state.backlog_days == 0 {
            return false;
        }
        self.state.backlog_days -= 1;
        // Backlog may outlive the plan; completed still never passes the total.
        self.state.completed_days =
            (self.state.completed_days + 1).min(self.plan.total_planned_days());
        self.state.streak = self.state.streak.saturating_add(1);
        true
    }

    /// Complete tomorrow's day in advance.
    pub fn work_ahead(&mut self) -> bool {
        if !self.has_days_left() {
            return false;
        }
        self.state.ahead_days = self.state.ahead_days.saturating_add(1);
        self.state.completed_days += 1;
        self.advance_day();
        self.state.streak = self.state.streak.saturating_add(1);
        true
    }

    /// Back to day 1 with every counter zeroed. Returns whether anything changed.
    pub fn reset(&mut self) -> bool {
        let fresh =
            StudyEngineState::initial(self.plan.class_id().clone(), self.plan.total_planned_days());
        let changed = self.state != fresh;
        self.state = fresh;
        changed
    }

    //
    // ─── DERIVED QUERIES ───────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn arc_for_day(&self, day: u32) -> Option<ArcPlacement<'_>> {
        self.plan.arc_for_day(day)
    }

    #[must_use]
    pub fn today_arc(&self) -> Option<ArcPlacement<'_>> {
        self.plan.arc_for_day(self.state.current_day_index)
    }

    #[must_use]
    pub fn daily_message(&self) -> String {
        narrative::daily_message(&self.plan, &self.state)
    }

    /// Share of planned days completed, in `[0, 100]`.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        let total = self.plan.total_planned_days().max(1);
        (f64::from(self.state.completed_days) / f64::from(total) * 100.0).clamp(0.0, 100.0)
    }

    #[must_use]
    pub fn remaining_days(&self) -> u32 {
        self.plan
            .total_planned_days()
            .saturating_sub(self.state.completed_days)
    }

    /// Human readable arc context for the current day.
    #[must_use]
    pub fn arc_context(&self) -> String {
        match self.today_arc() {
            Some(p) => format!(
                "{} - {}. You are on day {} of {} in this Arc. Focus of this Arc: {}",
                p.arc.label, p.arc.title, p.day_index_within_arc, p.total_days_in_arc, p.arc.focus
            ),
            None => "This Study Day is outside the configured Arc ranges. Once the final schedule is locked, every day will belong to an Arc.".to_owned(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> StudyEngineSnapshot {
        StudyEngineSnapshot {
            version: self.plan.engine_version().to_owned(),
            state: self.state.clone(),
            today_arc: self.today_arc().map(TodayArc::from),
        }
    }
}

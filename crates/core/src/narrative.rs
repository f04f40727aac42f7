//! Daily narrative shown above the Study Engine controls.

use crate::model::{StudyEngineState, StudyPlan};

/// `completed_days` below this is still "early in the journey".
pub const EARLY_STAGE_LIMIT: u32 = 40;
/// `completed_days` below this is the core of the class; at or above is the advanced stretch.
pub const CORE_STAGE_LIMIT: u32 = 120;

const FALLBACK_ARC_LABEL: &str = "Arc";
const FALLBACK_ARC_TITLE: &str = "Current section";

const CLOSING_RECOMMENDATION: &str = "Recommendation for today: complete one Study Day with full attention. Anything extra you do - catching up backlog or working ahead - is a bonus, not an obligation.";

fn plural(count: u32) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Milestone tier message selected by how many days are done.
#[must_use]
pub fn milestone_message(completed_days: u32) -> &'static str {
    if completed_days == 0 {
        "This is your very first Study Day here. We will start gently and build momentum over time."
    } else if completed_days < EARLY_STAGE_LIMIT {
        "You are still early in the journey. Each Study Day you complete now is building the foundation the rest of the class will stand on."
    } else if completed_days < CORE_STAGE_LIMIT {
        "You are deep into the core of this class. Small, consistent steps now matter more than perfection."
    } else {
        "You are in the advanced stretch of this class. Most people never get this far. The goal now is steady, sustainable progress."
    }
}

/// Backlog / ahead message for the four combinations of the two counters.
#[must_use]
pub fn balance_message(backlog_days: u32, ahead_days: u32) -> String {
    match (backlog_days > 0, ahead_days > 0) {
        (false, false) => "You have no backlog days and you are not working ahead. Today is a clean, on-time Study Day.".to_owned(),
        (true, false) => format!(
            "You currently have {backlog_days} backlog day{}. For today, we will treat this Study Day as your primary focus; if you still have energy afterwards, you can clear one extra backlog day.",
            plural(backlog_days)
        ),
        (false, true) => format!(
            "You are {ahead_days} Study Day{} ahead of schedule. You can simply complete today's plan, or choose to coast for a while when life gets heavier.",
            plural(ahead_days)
        ),
        (true, true) => format!(
            "You have a mixed state: {backlog_days} backlog day{} and {ahead_days} ahead day{}. The plan is to gently reduce backlog first, and treat your ahead days as a cushion rather than pressure.",
            plural(backlog_days),
            plural(ahead_days)
        ),
    }
}

/// Build the full daily message for `state` under `plan`.
#[must_use]
pub fn daily_message(plan: &StudyPlan, state: &StudyEngineState) -> String {
    let placement = plan.arc_for_day(state.current_day_index);
    let (arc_label, arc_title) = placement.map_or((FALLBACK_ARC_LABEL, FALLBACK_ARC_TITLE), |p| {
        (p.arc.label.as_str(), p.arc.title.as_str())
    });

    let parts = [
        format!(
            "{}, welcome back to {}.",
            plan.learner_name(),
            plan.class_name()
        ),
        format!(
            "You are currently at Study Day {} of about {} planned days for this class.",
            state.current_day_index,
            plan.total_planned_days()
        ),
        format!("Today's Study Day lives in {arc_label} - {arc_title}."),
        milestone_message(state.completed_days).to_owned(),
        balance_message(state.backlog_days, state.ahead_days),
        CLOSING_RECOMMENDATION.to_owned(),
    ];

    parts.join(" ")
}

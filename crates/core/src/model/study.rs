use serde::{Deserialize, Deserializer, Serialize};

use crate::model::ids::ClassId;
use crate::model::plan::ArcPlacement;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Linear progress counters for one learner in one class.
///
/// Serialized in camelCase so snapshots written by the browser build stay readable.
/// Every numeric field is optional on the wire: absent or `null` falls back to
/// its zero value (or day 1 for the day pointer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyEngineState {
    pub class_id: ClassId,
    #[serde(default = "first_day", deserialize_with = "first_day_if_null")]
    pub current_day_index: u32,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub completed_days: u32,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub backlog_days: u32,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub ahead_days: u32,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub streak: u32,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub total_planned_days: u32,
}

fn first_day() -> u32 {
    1
}

fn first_day_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_else(first_day))
}

fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

impl StudyEngineState {
    /// Fresh state: day 1, all counters zero.
    #[must_use]
    pub fn initial(class_id: ClassId, total_planned_days: u32) -> Self {
        Self {
            class_id,
            current_day_index: 1,
            completed_days: 0,
            backlog_days: 0,
            ahead_days: 0,
            streak: 0,
            total_planned_days,
        }
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Arc summary embedded in a snapshot. Always recomputed from the day pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayArc {
    pub arc_id: String,
    pub label: String,
    pub title: String,
    pub day_index_within_arc: u32,
    pub total_days_in_arc: u32,
}

impl From<ArcPlacement<'_>> for TodayArc {
    fn from(placement: ArcPlacement<'_>) -> Self {
        Self {
            arc_id: placement.arc.id.clone(),
            label: placement.arc.label.clone(),
            title: placement.arc.title.clone(),
            day_index_within_arc: placement.day_index_within_arc,
            total_days_in_arc: placement.total_days_in_arc,
        }
    }
}

/// Versioned unit written wholesale to the durable slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyEngineSnapshot {
    #[serde(default)]
    pub version: String,
    pub state: StudyEngineState,
    #[serde(default)]
    pub today_arc: Option<TodayArc>,
}

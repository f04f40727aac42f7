use std::sync::Arc;

use academy_core::model::{ClassId, StudyEngineSnapshot, StudyEngineState, StudyPlan};
use academy_core::{Clock, StudyEngine};
use chrono::{DateTime, Utc};
use storage::repository::KeyValueStore;
use tracing::{debug, info, warn};

/// Slot holding the Web Awakening engine snapshot on this device.
pub const STUDY_ENGINE_SLOT: &str = "gaia:web-awakening:study-engine";

const LOAD_ADVISORY: &str = "Could not read local study data. Starting fresh this session.";

/// Why a stored snapshot was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    /// The slot could not be read at all.
    Unreadable,
    /// The slot did not hold valid JSON.
    Malformed,
    /// Valid JSON, but without a usable `state` (missing, or missing `classId`).
    Unrecognized,
    /// The snapshot belongs to another class.
    ForeignClass(ClassId),
}

/// What happened when the engine was hydrated from its slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Restored,
    Fresh,
    Discarded(DiscardReason),
}

impl LoadOutcome {
    #[must_use]
    pub fn loaded_from_cache(&self) -> bool {
        matches!(self, Self::Restored)
    }

    /// Display-only advisory for unreadable or corrupt data.
    #[must_use]
    pub fn advisory(&self) -> Option<&'static str> {
        match self {
            Self::Discarded(DiscardReason::Unreadable | DiscardReason::Malformed) => {
                Some(LOAD_ADVISORY)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn status_line(&self) -> &'static str {
        if self.loaded_from_cache() {
            "Loaded an existing Study Engine snapshot from this device."
        } else {
            "No previous Study Engine snapshot was found on this device. You are starting fresh for this class here."
        }
    }
}

/// Study Engine commands with "mutate, then persist" sequencing.
///
/// Each command writes the slot at most once, and only when the engine state
/// actually changed. Write failures are logged and swallowed; the in-memory
/// engine stays authoritative.
pub struct StudyEngineService {
    clock: Clock,
    plan: Arc<StudyPlan>,
    slots: Arc<dyn KeyValueStore>,
    slot_key: String,
    engine: StudyEngine,
    load_outcome: LoadOutcome,
    last_saved_at: Option<DateTime<Utc>>,
}

impl StudyEngineService {
    /// Hydrate from [`STUDY_ENGINE_SLOT`].
    #[must_use]
    pub fn load(clock: Clock, plan: Arc<StudyPlan>, slots: Arc<dyn KeyValueStore>) -> Self {
        Self::load_from(clock, plan, slots, STUDY_ENGINE_SLOT)
    }

    /// Hydrate from `slot_key`, falling back to defaults on any problem.
    #[must_use]
    pub fn load_from(
        clock: Clock,
        plan: Arc<StudyPlan>,
        slots: Arc<dyn KeyValueStore>,
        slot_key: &str,
    ) -> Self {
        let (engine, load_outcome) = hydrate(Arc::clone(&plan), slots.as_ref(), slot_key);
        match &load_outcome {
            LoadOutcome::Restored => info!(slot = slot_key, "study engine restored"),
            LoadOutcome::Fresh => debug!(slot = slot_key, "no study engine snapshot"),
            LoadOutcome::Discarded(reason) => {
                warn!(slot = slot_key, ?reason, "discarded study engine snapshot");
            }
        }
        Self {
            clock,
            plan,
            slots,
            slot_key: slot_key.to_owned(),
            engine,
            load_outcome,
            last_saved_at: None,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &StudyEngine {
        &self.engine
    }

    #[must_use]
    pub fn state(&self) -> &StudyEngineState {
        self.engine.state()
    }

    #[must_use]
    pub fn snapshot(&self) -> StudyEngineSnapshot {
        self.engine.snapshot()
    }

    #[must_use]
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Time of the last successful write in this session.
    #[must_use]
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn complete_today(&mut self) -> bool {
        self.apply(StudyEngine::complete_today)
    }

    pub fn simulate_missed_day(&mut self) -> bool {
        self.apply(StudyEngine::simulate_missed_day)
    }

    pub fn complete_backlog_day(&mut self) -> bool {
        self.apply(StudyEngine::complete_backlog_day)
    }

    pub fn work_ahead(&mut self) -> bool {
        self.apply(StudyEngine::work_ahead)
    }

    /// Back to defaults and clear the slot. Returns whether the counters changed.
    pub fn reset(&mut self) -> bool {
        let changed = self.engine.reset();
        self.load_outcome = LoadOutcome::Fresh;
        self.last_saved_at = None;
        if let Err(err) = self.slots.remove(&self.slot_key) {
            warn!(slot = %self.slot_key, error = %err, "failed to clear study engine slot");
        }
        changed
    }

    /// Replace the counters with `state` (e.g. pulled from the row store).
    ///
    /// Returns `false` without touching anything when `state` belongs to a
    /// different class or equals the current state.
    pub fn adopt(&mut self, state: StudyEngineState) -> bool {
        match StudyEngine::restore(Arc::clone(&self.plan), state) {
            Some(engine) if engine.state() != self.engine.state() => {
                self.engine = engine;
                self.persist();
                true
            }
            _ => false,
        }
    }

    fn apply(&mut self, command: impl FnOnce(&mut StudyEngine) -> bool) -> bool {
        let changed = command(&mut self.engine);
        if changed {
            self.persist();
        }
        changed
    }

    fn persist(&mut self) {
        let raw = match serde_json::to_string(&self.engine.snapshot()) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "failed to encode study engine snapshot");
                return;
            }
        };
        match self.slots.set(&self.slot_key, &raw) {
            Ok(()) => self.last_saved_at = Some(self.clock.now()),
            Err(err) => {
                warn!(slot = %self.slot_key, error = %err, "failed to save study engine snapshot");
            }
        }
    }
}

fn hydrate(
    plan: Arc<StudyPlan>,
    slots: &dyn KeyValueStore,
    slot_key: &str,
) -> (StudyEngine, LoadOutcome) {
    let raw = match slots.get(slot_key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (StudyEngine::new(plan), LoadOutcome::Fresh),
        Err(err) => {
            warn!(slot = slot_key, error = %err, "failed to read study engine slot");
            return (
                StudyEngine::new(plan),
                LoadOutcome::Discarded(DiscardReason::Unreadable),
            );
        }
    };

    let value = match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(serde_json::Value::Null) => return (StudyEngine::new(plan), LoadOutcome::Fresh),
        Ok(value) => value,
        Err(err) => {
            debug!(error = %err, "study engine snapshot is not JSON");
            return (
                StudyEngine::new(plan),
                LoadOutcome::Discarded(DiscardReason::Malformed),
            );
        }
    };
    let snapshot = match serde_json::from_value::<StudyEngineSnapshot>(value) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            debug!(error = %err, "study engine snapshot has no usable state");
            return (
                StudyEngine::new(plan),
                LoadOutcome::Discarded(DiscardReason::Unrecognized),
            );
        }
    };

    let class_id = snapshot.state.class_id.clone();
    match StudyEngine::restore(Arc::clone(&plan), snapshot.state) {
        Some(engine) => (engine, LoadOutcome::Restored),
        None => (
            StudyEngine::new(plan),
            LoadOutcome::Discarded(DiscardReason::ForeignClass(class_id)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use academy_core::time::fixed_clock;
    use storage::repository::{InMemoryKeyValueStore, StorageError};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Connection("disk gone".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk gone".into()))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk gone".into()))
        }
    }

    fn plan() -> Arc<StudyPlan> {
        Arc::new(StudyPlan::web_awakening())
    }

    #[test]
    fn write_failure_keeps_memory_state() {
        let mut svc = StudyEngineService::load(fixed_clock(), plan(), Arc::new(BrokenStore));
        assert_eq!(
            svc.load_outcome(),
            &LoadOutcome::Discarded(DiscardReason::Unreadable)
        );
        assert!(svc.complete_today());
        assert_eq!(svc.state().completed_days, 1);
        assert_eq!(svc.last_saved_at(), None);
        assert!(svc.reset());
        assert_eq!(svc.state().completed_days, 0);
    }

    #[test]
    fn noop_commands_do_not_write() {
        let slots = Arc::new(InMemoryKeyValueStore::new());
        let mut svc = StudyEngineService::load(fixed_clock(), plan(), slots.clone());
        assert!(!svc.complete_backlog_day());
        assert_eq!(slots.get(STUDY_ENGINE_SLOT).unwrap(), None);
        assert_eq!(svc.last_saved_at(), None);
    }

    #[test]
    fn adopt_ignores_foreign_class() {
        let slots = Arc::new(InMemoryKeyValueStore::new());
        let mut svc = StudyEngineService::load(fixed_clock(), plan(), slots);
        let foreign = StudyEngineState::initial(ClassId::new("other"), 200);
        assert!(!svc.adopt(foreign));

        let mut ahead = svc.state().clone();
        ahead.completed_days = 12;
        ahead.current_day_index = 13;
        assert!(svc.adopt(ahead));
        assert_eq!(svc.state().completed_days, 12);
        assert!(svc.last_saved_at().is_some());
    }
}

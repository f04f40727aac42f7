use std::sync::Arc;

use academy_core::model::lesson::PROGRAMMING_TRACK;
use academy_core::model::{LessonCatalog, LessonId, OptionId, PracticeFailure, TrackId};
use academy_core::time::{fixed_clock, fixed_now};
use academy_core::{CheckOutcome, LessonPhase};
use services::{LessonProgressService, LessonSession, LessonSessionError, PROGRESS_SLOT};
use storage::repository::{InMemoryKeyValueStore, KeyValueStore};

fn catalog() -> LessonCatalog {
    LessonCatalog::academy().unwrap()
}

fn programming() -> TrackId {
    TrackId::new(PROGRAMMING_TRACK)
}

fn html_practice() -> String {
    let mut text = String::from(
        "<html>\n<head><title>About me</title></head>\n<body>\n<h1>Mustafa</h1>\n<p>I am building my first page.</p>\n",
    );
    while text.trim().chars().count() < 260 {
        text.push_str("<p>Another line about what I am learning.</p>\n");
    }
    text.push_str("</body>\n</html>");
    text
}

#[test]
fn toggles_and_visits_survive_reload() {
    let slots: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let track = programming();
    let lesson = LessonId::new("prog-1-1");

    let mut progress = LessonProgressService::load(fixed_clock(), Arc::clone(&slots));
    assert!(progress.toggle_lesson_completed(&track, &lesson));
    assert_eq!(progress.mark_study_visit(&track), fixed_now());

    let reloaded = LessonProgressService::load(fixed_clock(), Arc::clone(&slots));
    assert!(reloaded.is_lesson_completed(&track, &lesson));
    assert_eq!(reloaded.last_visit(&track), Some(fixed_now()));

    let summary = reloaded.track_summary(&catalog(), &track);
    assert_eq!((summary.completed, summary.total), (1, 34));
    assert_eq!(summary.percent(), 3);
}

#[test]
fn corrupt_progress_starts_empty() {
    let slots: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    slots.set(PROGRESS_SLOT, "[1, 2").unwrap();
    let progress = LessonProgressService::load(fixed_clock(), slots);
    assert!(!progress.is_lesson_completed(&programming(), &LessonId::new("prog-1-1")));
}

#[test]
fn passing_lesson_marks_completed_once() {
    let slots: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let catalog = catalog();
    let track = programming();
    let lesson = LessonId::new("prog-2-1");
    let mut progress = LessonProgressService::load(fixed_clock(), Arc::clone(&slots));

    let mut session = LessonSession::open(&catalog, &progress, &track, &lesson).unwrap();
    assert_eq!(session.lesson().title, "Your first HTML page");
    for (idx, option) in ["b", "a", "c"].into_iter().enumerate() {
        session.select_answer(idx, OptionId::new(option)).unwrap();
    }
    assert!(session.submit_quiz().all_correct);

    assert_eq!(
        session.check_practice(&html_practice(), &mut progress),
        CheckOutcome::Passed
    );
    assert!(progress.is_lesson_completed(&track, &lesson));
    assert_eq!(
        session.check_practice(&html_practice(), &mut progress),
        CheckOutcome::AlreadyCompleted
    );
    // Still completed: a pass never toggles the flag back.
    assert!(progress.is_lesson_completed(&track, &lesson));

    let reopened = LessonSession::open(&catalog, &progress, &track, &lesson).unwrap();
    assert_eq!(reopened.phase(), &LessonPhase::Completed);
}

#[test]
fn missing_tags_are_reported() {
    let slots: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let catalog = catalog();
    let track = programming();
    let lesson = LessonId::new("prog-2-2");
    let mut progress = LessonProgressService::load(fixed_clock(), slots);

    let mut session = LessonSession::open(&catalog, &progress, &track, &lesson).unwrap();
    let outcome = session.check_practice(&html_practice(), &mut progress);
    match outcome {
        CheckOutcome::Rejected(PracticeFailure::MissingContent { missing }) => {
            assert!(missing.iter().any(|m| m == "href"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(!progress.is_lesson_completed(&track, &lesson));
}

#[test]
fn unknown_lesson_fails_to_open() {
    let slots: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let progress = LessonProgressService::load(fixed_clock(), slots);
    let err = LessonSession::open(
        &catalog(),
        &progress,
        &programming(),
        &LessonId::new("prog-9-9"),
    );
    assert!(matches!(err, Err(LessonSessionError::UnknownLesson { .. })));
}

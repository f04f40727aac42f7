use std::sync::Arc;

use academy_core::StudyEngine;
use academy_core::model::{ClassId, StudyPlan, UserId};
use academy_core::time::fixed_now;
use chrono::Duration;
use storage::repository::StudyEngineRowRepository;
use storage::sqlite::SqliteRepository;

fn engine_after(days: usize) -> StudyEngine {
    let mut engine = StudyEngine::new(Arc::new(StudyPlan::web_awakening()));
    for _ in 0..days {
        engine.complete_today();
    }
    engine
}

#[tokio::test]
async fn sqlite_upsert_replaces_snapshot_per_user_and_class() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_upsert?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let user = UserId::random();
    let first = repo
        .upsert_row(user, &engine_after(2).snapshot(), fixed_now())
        .await
        .unwrap();
    assert_eq!(first.class_id, ClassId::new("web-awakening-line-01"));
    assert_eq!(first.snapshot.state.completed_days, 2);

    let later = fixed_now() + Duration::days(1);
    let mut engine = engine_after(2);
    engine.simulate_missed_day();
    engine.work_ahead();
    let second = repo
        .upsert_row(user, &engine.snapshot(), later)
        .await
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.updated_at, later);
    assert_eq!(second.snapshot, engine.snapshot());

    let fetched = repo
        .get_row(user, &first.class_id)
        .await
        .unwrap()
        .expect("row");
    assert_eq!(fetched, second);
}

#[tokio::test]
async fn sqlite_rows_are_isolated_by_user_and_migrations_rerun() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_isolated?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo.migrate().await.expect("migrate twice");

    let alice = UserId::random();
    let bob = UserId::random();
    let snapshot = engine_after(5).snapshot();
    repo.upsert_row(alice, &snapshot, fixed_now()).await.unwrap();

    assert!(
        repo.get_row(bob, &snapshot.state.class_id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        repo.get_row(alice, &ClassId::new("other-class"))
            .await
            .unwrap()
            .is_none()
    );
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM study_engine_states")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

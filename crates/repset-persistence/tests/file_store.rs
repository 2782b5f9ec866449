//! Tests for the JSON file store.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use repset_model::{Routine, RoutineSession, SessionTotals};
use repset_persistence::{JsonFileStore, WorkoutStore, find_routine, upsert_routine};
use tempfile::tempdir;

fn routine(id: &str, title: &str) -> Routine {
    Routine::new(id, title, Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap())
}

fn session(id: &str) -> RoutineSession {
    RoutineSession {
        id: id.to_string(),
        routine_id: "r-1".to_string(),
        routine_title: "Push".to_string(),
        date: Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap(),
        exercises: vec![],
        totals: SessionTotals::new(0, 60, 0, 90),
        notes: vec![],
        muscles: vec![],
        exercise_count: 1,
        series_count: 3,
    }
}

#[tokio::test]
async fn test_empty_directory_has_no_routines() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    assert!(store.get_routines().await.unwrap().is_empty());
    assert!(store.get_routine_sessions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_routines_are_replaced_as_a_whole() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());

    store
        .save_routines(&[routine("r-1", "Push"), routine("r-2", "Pull")])
        .await
        .unwrap();
    store.save_routines(&[routine("r-3", "Legs")]).await.unwrap();

    let routines = store.get_routines().await.unwrap();
    assert_eq!(routines.len(), 1);
    assert_eq!(routines[0].title, "Legs");
}

#[tokio::test]
async fn test_upsert_and_find() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());

    upsert_routine(&store, routine("r-1", "Push")).await.unwrap();
    upsert_routine(&store, routine("r-2", "Pull")).await.unwrap();
    upsert_routine(&store, routine("r-1", "Push v2")).await.unwrap();

    let found = find_routine(&store, "r-1").await.unwrap().expect("routine r-1");
    assert_eq!(found.title, "Push v2");
    assert_eq!(store.get_routines().await.unwrap().len(), 2);
    assert!(find_routine(&store, "nope").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_upserts_keep_every_routine() {
    let dir = tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));

    let handles: Vec<_> = (0..16)
        .map(|n| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let id = format!("r-{n}");
                upsert_routine(store.as_ref(), routine(&id, "Full body")).await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let mut ids: Vec<String> = store
        .get_routines()
        .await
        .unwrap()
        .into_iter()
        .map(|routine| routine.id)
        .collect();
    ids.sort();
    let mut expected: Vec<String> = (0..16).map(|n| format!("r-{n}")).collect();
    expected.sort();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_sessions_are_appended() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());

    store.save_routine_session(&session("s-1")).await.unwrap();
    store.save_routine_session(&session("s-2")).await.unwrap();

    let sessions = store.get_routine_sessions().await.unwrap();
    let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s-1", "s-2"]);
    assert_eq!(sessions[0].totals.total_seconds, 150);
}

#[tokio::test]
async fn test_corrupt_document_is_reported() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    std::fs::write(store.routines_path(), "{").unwrap();

    let error = store.get_routines().await.unwrap_err();
    assert!(error.user_message().contains("not a valid workout store"));
    assert!(error.suggestion().is_some());
}

//! Session engine behavior, driven tick by tick.

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use repset_core::session::{RestKind, SessionPhase};
use repset_core::{
    ESTIMATED_WORK_SECONDS_PER_SERIES, Feedback, FeedbackError, FeedbackKind, Notice, Notifier,
    SessionDeps, SessionEngine, StaticCatalog,
};
use repset_model::{
    Exercise, Routine, RpePolicy, Series, SeriesType, SessionSettings, UnitType,
};
use repset_persistence::{MemoryStore, WorkoutStore};

fn series(rest: &str) -> Series {
    Series {
        unit_type: UnitType::RepsAndWeight,
        weight: 60.0,
        reps: Some(8),
        duration: None,
        distance: None,
        note: String::new(),
        rest: rest.to_string(),
        rpe: 7,
        series_type: SeriesType::WorkingSet,
    }
}

fn warm_up(rest: &str) -> Series {
    Series {
        rpe: 0,
        series_type: SeriesType::WarmUp,
        ..series(rest)
    }
}

fn routine(exercises: Vec<Exercise>) -> Routine {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap();
    exercises
        .into_iter()
        .fold(Routine::new("r-1", "Upper", at), Routine::with_exercise)
}

fn deps(store: Arc<MemoryStore>, policy: RpePolicy) -> SessionDeps {
    SessionDeps::new(store)
        .with_settings(Arc::new(SessionSettings::default().with_rpe_policy(policy)))
}

fn engine(routine: Routine, policy: RpePolicy) -> SessionEngine {
    SessionEngine::from_routine(deps(Arc::new(MemoryStore::new()), policy), routine)
}

/// Tick until the running rest or preparation is over.
fn run_down(engine: &mut SessionEngine) {
    while let Some(token) = engine.timer_token() {
        engine.tick_with(token);
    }
}

#[derive(Default)]
struct RecordingNotifier(Mutex<Vec<Notice>>);

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.0.lock().unwrap().push(notice);
    }
}

#[derive(Default)]
struct RecordingFeedback(Mutex<Vec<FeedbackKind>>);

impl Feedback for RecordingFeedback {
    fn trigger(&self, kind: FeedbackKind) -> Result<(), FeedbackError> {
        self.0.lock().unwrap().push(kind);
        Ok(())
    }
}

fn feedback_engine(vibration: bool, feedback: Arc<RecordingFeedback>) -> SessionEngine {
    let settings = SessionSettings {
        vibration,
        ..SessionSettings::default().with_rpe_policy(RpePolicy::Never)
    };
    let deps = SessionDeps::new(Arc::new(MemoryStore::new()))
        .with_settings(Arc::new(settings))
        .with_feedback(feedback);
    SessionEngine::from_routine(
        deps,
        routine(vec![Exercise::new("Bench", "bench", vec![series("0")], 0)]),
    )
}

#[test]
fn test_feedback_fires_when_vibration_is_on() {
    let feedback = Arc::new(RecordingFeedback::default());
    let mut engine = feedback_engine(true, Arc::clone(&feedback));

    engine.complete_current_series();

    assert!(engine.routine_finished());
    assert_eq!(
        *feedback.0.lock().unwrap(),
        vec![FeedbackKind::SeriesComplete, FeedbackKind::SessionFinished]
    );
}

#[test]
fn test_vibration_off_silences_feedback() {
    let feedback = Arc::new(RecordingFeedback::default());
    let mut engine = feedback_engine(false, Arc::clone(&feedback));

    engine.complete_current_series();

    assert!(engine.routine_finished());
    assert!(feedback.0.lock().unwrap().is_empty());
}

#[test]
fn test_zero_rest_last_series_finishes_without_resting() {
    let mut engine = engine(
        routine(vec![Exercise::new("Bench", "bench", vec![series("0")], 0)]),
        RpePolicy::Never,
    );

    engine.complete_current_series();

    assert!(engine.routine_finished());
    assert!(!engine.is_resting());
    assert!(engine.summary().is_some());
}

#[test]
fn test_rpe_on_last_series_finishes_in_the_same_call() {
    let mut engine = engine(
        routine(vec![Exercise::new("Bench", "bench", vec![series("")], 0)]),
        RpePolicy::Always,
    );

    engine.complete_current_series();
    assert!(engine.state().unwrap().pending_series().is_some());
    assert!(!engine.routine_finished());

    engine.save_rpe(9);
    assert!(engine.routine_finished());
    assert!(!engine.is_resting());
    assert_eq!(engine.summary().unwrap().exercises[0].series[0].rpe, 9);
}

#[tokio::test]
async fn test_missing_routine_leaves_engine_inert() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = SessionEngine::load(deps(store, RpePolicy::Always), "nope").await;

    assert!(engine.routine().is_none());
    engine.complete_current_series();
    engine.tick();
    engine.complete_rest();
    engine.save_rpe(7);
    engine.adjust_rest(30);
    engine.cancel();
    assert!(!engine.routine_finished());
    assert!(engine.summary().is_none());
    assert!(engine.wait_for_persistence().await.is_none());
}

#[tokio::test]
async fn test_failed_lookup_leaves_routine_unresolved() {
    let store = Arc::new(MemoryStore::with_routines(vec![routine(vec![
        Exercise::new("Bench", "bench", vec![series("")], 0),
    ])]));
    store.set_unavailable(true);

    let mut engine = SessionEngine::load(deps(store, RpePolicy::Never), "r-1").await;
    assert!(engine.routine().is_none());
    engine.complete_current_series();
    assert!(!engine.routine_finished());
}

#[test]
fn test_routine_without_exercises_is_unresolved() {
    let engine = engine(routine(vec![]), RpePolicy::Never);
    assert!(engine.routine().is_none());
    assert!(engine.state().is_none());
}

#[test]
fn test_pending_rpe_blocks_until_saved() {
    let mut engine = engine(
        routine(vec![Exercise::new(
            "Bench",
            "bench",
            vec![series("1:30"), series("")],
            0,
        )]),
        RpePolicy::Always,
    );

    engine.complete_current_series();
    let pending = engine.state().unwrap().pending_series().unwrap();
    assert_eq!((pending.exercise_idx, pending.series_idx), (0, 0));
    assert_eq!(engine.state().unwrap().rpe_input(), "7");

    // Blocked: neither another completion nor a tick moves on.
    engine.complete_current_series();
    engine.tick();
    assert_eq!(engine.state().unwrap().completed_series_count(), 1);
    assert!(!engine.is_resting());

    engine.save_rpe(12);
    let state = engine.state().unwrap();
    assert_eq!(state.completed_exercises()[0][0].series.rpe, 10);
    assert_eq!(state.rest_type(), Some(RestKind::Series));
    assert_eq!(state.rest_time(), 90);
}

#[test]
fn test_warm_ups_are_never_asked_for_rpe() {
    let mut engine = engine(
        routine(vec![Exercise::new(
            "Squat",
            "squat",
            vec![warm_up("0:30"), series("")],
            0,
        )]),
        RpePolicy::Always,
    );

    engine.complete_current_series();
    let state = engine.state().unwrap();
    assert!(state.pending_series().is_none());
    assert!(state.is_resting());
    assert_eq!(state.completed_exercises()[0][0].series.rpe, 0);
}

#[test]
fn test_conditional_policy_asks_after_last_working_set_only() {
    let mut engine = engine(
        routine(vec![Exercise::new(
            "Row",
            "row",
            vec![series(""), series(""), warm_up("")],
            0,
        )]),
        RpePolicy::Conditional,
    );

    engine.complete_current_series();
    assert!(engine.state().unwrap().pending_series().is_none());
    engine.complete_current_series();
    assert!(engine.state().unwrap().pending_series().is_some());
}

#[test]
fn test_never_policy_records_planned_rpe() {
    let mut engine = engine(
        routine(vec![Exercise::new("Row", "row", vec![series("")], 0)]),
        RpePolicy::Never,
    );
    engine.complete_current_series();
    assert_eq!(engine.summary().unwrap().exercises[0].series[0].rpe, 7);
}

#[test]
fn test_rpe_input_text_is_parsed_on_submit() {
    let mut engine = engine(
        routine(vec![Exercise::new("Row", "row", vec![series(""), series("")], 0)]),
        RpePolicy::Always,
    );
    engine.complete_current_series();

    engine.set_rpe_input("hard");
    engine.submit_rpe_input();
    assert!(engine.state().unwrap().pending_series().is_some());

    engine.set_rpe_input("8,6");
    engine.submit_rpe_input();
    let state = engine.state().unwrap();
    assert!(state.pending_series().is_none());
    assert_eq!(state.completed_exercises()[0][0].series.rpe, 8);
    assert_eq!(state.rpe_input(), "");
}

#[test]
fn test_exercise_rest_moves_to_next_exercise() {
    let mut engine = engine(
        routine(vec![
            Exercise::new("Bench", "bench", vec![series("")], 120),
            Exercise::new("Row", "row", vec![series("")], 0),
        ]),
        RpePolicy::Never,
    );

    engine.complete_current_series();
    assert_eq!(engine.state().unwrap().rest_type(), Some(RestKind::Exercise));
    assert_eq!(engine.rest_time(), 120);

    engine.complete_rest();
    let state = engine.state().unwrap();
    assert_eq!(state.phase(), &SessionPhase::Active);
    assert_eq!(state.current_exercise_index(), 1);
    assert_eq!(state.current_series_index(), 0);
    assert_eq!(state.timings().rest_between_exercises_seconds, 0);
}

#[test]
fn test_stale_ticks_are_ignored() {
    let mut engine = engine(
        routine(vec![Exercise::new(
            "Bench",
            "bench",
            vec![series("0:10"), series("0:10"), series("")],
            0,
        )]),
        RpePolicy::Never,
    );

    engine.complete_current_series();
    let first = engine.timer_token().unwrap();
    engine.complete_rest();
    assert!(engine.timer_token().is_none());

    engine.complete_current_series();
    let second = engine.timer_token().unwrap();
    assert_ne!(first, second);

    engine.tick_with(first);
    assert_eq!(engine.rest_time(), 10);
    engine.tick_with(second);
    assert_eq!(engine.rest_time(), 9);
}

#[test]
fn test_ticks_without_countdown_are_ignored() {
    let mut engine = engine(
        routine(vec![Exercise::new("Bench", "bench", vec![series(""), series("")], 0)]),
        RpePolicy::Never,
    );
    let before = engine.state().cloned();
    engine.tick();
    assert_eq!(engine.state().cloned(), before);
}

#[test]
fn test_rest_adjustments_use_the_configured_step() {
    let settings = SessionSettings {
        rpe_policy: RpePolicy::Never,
        vibration: false,
        rest_adjust_step_seconds: 15,
    };
    let deps = SessionDeps::new(Arc::new(MemoryStore::new())).with_settings(Arc::new(settings));
    let mut engine = SessionEngine::from_routine(
        deps,
        routine(vec![Exercise::new("Bench", "bench", vec![series("0:20"), series("")], 0)]),
    );

    engine.complete_current_series();
    engine.extend_rest();
    assert_eq!(engine.rest_time(), 35);
    engine.shorten_rest();
    engine.shorten_rest();
    engine.shorten_rest();
    assert_eq!(engine.rest_time(), 0);
    assert!(engine.is_resting());

    // A rest shortened to zero ends on the next tick.
    engine.tick();
    assert!(!engine.is_resting());
    assert_eq!(engine.state().unwrap().current_series_index(), 1);
}

#[test]
fn test_preparation_counts_down_to_active() {
    let mut engine = engine(
        routine(vec![Exercise::new("Bench", "bench", vec![series("")], 0)]).with_preparation(3),
        RpePolicy::Never,
    );
    assert!(engine.is_preparation());
    assert_eq!(engine.state().unwrap().preparation_remaining(), 3);

    engine.complete_current_series();
    assert_eq!(engine.state().unwrap().completed_series_count(), 0);

    run_down(&mut engine);
    assert!(!engine.is_preparation());
    assert_eq!(engine.state().unwrap().phase(), &SessionPhase::Active);

    engine.complete_current_series();
    assert_eq!(engine.summary().unwrap().totals.prep_seconds, 3);
}

#[test]
fn test_skip_preparation() {
    let mut engine = engine(
        routine(vec![Exercise::new("Bench", "bench", vec![series("")], 0)]).with_preparation(10),
        RpePolicy::Never,
    );
    engine.skip_preparation();
    assert!(!engine.is_preparation());
    assert!(engine.timer_token().is_none());
}

#[tokio::test]
async fn test_cancel_disarms_and_discards() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = SessionEngine::from_routine(
        deps(Arc::clone(&store), RpePolicy::Never),
        routine(vec![Exercise::new("Bench", "bench", vec![series("1:00"), series("")], 0)]),
    );

    engine.complete_current_series();
    assert!(engine.timer_token().is_some());

    engine.cancel();
    assert!(engine.timer_token().is_none());
    assert!(engine.state().is_none());
    assert!(engine.routine().is_some());

    engine.tick();
    engine.complete_current_series();
    assert!(!engine.routine_finished());
    assert!(engine.wait_for_persistence().await.is_none());
    assert!(store.get_routine_sessions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_finished_session_is_saved() {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let catalog = StaticCatalog::new()
        .with_entry("bench", "chest", &["triceps", "shoulders"])
        .with_entry("row", "back", &["biceps", "shoulders"]);
    let deps = deps(Arc::clone(&store), RpePolicy::Never)
        .with_catalog(Arc::new(catalog))
        .with_notifier(notifier.clone());
    let mut engine = SessionEngine::from_routine(
        deps,
        routine(vec![
            Exercise::new("Bench", "bench-1700000000000", vec![series("0:05"), series("")], 10),
            Exercise::new("Row", "row", vec![series("")], 0),
        ])
        .with_preparation(2),
    );

    run_down(&mut engine);
    engine.complete_current_series();
    run_down(&mut engine);
    engine.complete_current_series();
    engine.tick();
    engine.tick();
    engine.complete_rest();
    engine.complete_current_series();

    assert!(engine.routine_finished());
    assert!(engine.wait_for_persistence().await.unwrap().is_ok());

    let saved = store.get_routine_sessions().await.unwrap();
    assert_eq!(saved.len(), 1);
    let session = &saved[0];
    assert_eq!(session.routine_id, "r-1");
    assert_eq!(session.exercise_count, 2);
    assert_eq!(session.series_count, 3);
    assert_eq!(session.totals.prep_seconds, 2);
    assert_eq!(session.totals.rest_series_seconds, 5);
    assert_eq!(session.totals.rest_between_exercises_seconds, 2);
    assert_eq!(session.totals.work_seconds, 3 * ESTIMATED_WORK_SECONDS_PER_SERIES);
    assert_eq!(session.totals.total_seconds, 2 + 5 + 2 + 90);
    assert_eq!(
        session.muscles,
        vec!["chest", "triceps", "shoulders", "back", "biceps"]
    );

    let notices = notifier.0.lock().unwrap();
    assert_eq!(
        *notices,
        vec![Notice::SessionSaved {
            session_id: session.id.clone()
        }]
    );
}

#[tokio::test]
async fn test_save_failure_is_reported_and_session_stays_finished() {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let mut engine = SessionEngine::from_routine(
        deps(Arc::clone(&store), RpePolicy::Never).with_notifier(notifier.clone()),
        routine(vec![Exercise::new("Bench", "bench", vec![series("")], 0)]),
    );
    store.set_unavailable(true);

    engine.complete_current_series();
    let outcome = engine.wait_for_persistence().await.unwrap();

    assert!(outcome.is_err());
    assert!(engine.routine_finished());
    assert!(engine.summary().is_some());
    let notices = notifier.0.lock().unwrap();
    assert!(matches!(notices.as_slice(), [Notice::SaveFailed { .. }]));
}

#[test]
fn test_finish_without_runtime_is_queued() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = SessionEngine::from_routine(
        deps(Arc::clone(&store), RpePolicy::Never),
        routine(vec![Exercise::new("Bench", "bench", vec![series("")], 0)]),
    );
    engine.complete_current_series();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let outcome = runtime.block_on(engine.wait_for_persistence());
    assert!(outcome.unwrap().is_ok());
    let saved = runtime.block_on(store.get_routine_sessions()).unwrap();
    assert_eq!(saved.len(), 1);
}

fn arb_routine() -> impl Strategy<Value = Routine> {
    let exercise = (
        prop::collection::vec((0u32..20, any::<bool>()), 1..4),
        0u32..30,
    )
        .prop_map(|(series_specs, rest_between)| {
            let series = series_specs
                .into_iter()
                .map(|(rest, is_warm_up)| {
                    let rest = if rest == 0 { String::new() } else { format!("0:{rest:02}") };
                    if is_warm_up { warm_up(&rest) } else { series(&rest) }
                })
                .collect();
            Exercise::new("Lift", "lift", series, rest_between)
        });
    (prop::collection::vec(exercise, 1..4), 0u32..5)
        .prop_map(|(exercises, prep)| routine(exercises).with_preparation(prep))
}

proptest! {
    #[test]
    fn totals_are_always_the_sum_of_their_parts(
        routine in arb_routine(),
        ticks in prop::collection::vec(0usize..6, 0..40),
        policy in prop_oneof![
            Just(RpePolicy::Always),
            Just(RpePolicy::Never),
            Just(RpePolicy::Conditional),
        ],
    ) {
        let planned: usize = routine.exercises.iter().map(|e| e.series.len()).sum();
        let mut engine = engine(routine, policy);
        let mut ticks = ticks.into_iter().cycle();

        // Bounded: every step completes a series, a rest or a countdown.
        for _ in 0..500 {
            if engine.routine_finished() {
                break;
            }
            let state = engine.state().unwrap();
            if state.pending_series().is_some() {
                engine.save_rpe(8);
            } else if state.is_preparation() {
                run_down(&mut engine);
            } else if state.is_resting() {
                for _ in 0..ticks.next().unwrap_or(0) {
                    engine.tick();
                }
                engine.complete_rest();
            } else {
                engine.complete_current_series();
            }
        }

        prop_assert!(engine.routine_finished());
        let summary = engine.summary().unwrap();
        prop_assert!(summary.totals.verify().is_ok());
        prop_assert_eq!(summary.series_count, planned);
        prop_assert_eq!(
            summary.totals.work_seconds,
            planned as u64 * ESTIMATED_WORK_SECONDS_PER_SERIES
        );
    }
}

//! Derived counts and durations over exercises and routines.

use repset_model::{Exercise, Routine, UnitType};
use repset_normalization::parse_rest_seconds;

/// Work time credited per completed series.
///
/// A fixed estimate, not measured time: sessions do not time the sets
/// themselves.
pub const ESTIMATED_WORK_SECONDS_PER_SERIES: u64 = 30;

/// Number of series across all exercises.
pub fn total_series_count(exercises: &[Exercise]) -> usize {
    exercises.iter().map(|exercise| exercise.series.len()).sum()
}

/// Number of non-warm-up series across all exercises.
pub fn working_series_count(exercises: &[Exercise]) -> usize {
    exercises
        .iter()
        .flat_map(|exercise| exercise.series.iter())
        .filter(|series| !series.is_warm_up())
        .count()
}

/// Planned weight x reps over loaded rep series.
pub fn planned_volume(exercises: &[Exercise]) -> f64 {
    exercises
        .iter()
        .flat_map(|exercise| exercise.series.iter())
        .filter(|series| series.unit_type == UnitType::RepsAndWeight)
        .map(repset_model::Series::volume)
        .sum()
}

/// Expected session length in seconds if every rest runs to completion.
///
/// Counts the preparation lead-in, the per-series work estimate, the rest
/// after every series except the last of each exercise, and the rest after
/// every exercise except the last.
pub fn estimated_duration_seconds(routine: &Routine) -> u64 {
    let preparation = u64::from(routine.preparation_seconds().unwrap_or(0));
    let work = total_series_count(&routine.exercises) as u64 * ESTIMATED_WORK_SECONDS_PER_SERIES;

    let series_rest: u64 = routine
        .exercises
        .iter()
        .flat_map(|exercise| {
            let last = exercise.series.len().saturating_sub(1);
            exercise.series.iter().take(last)
        })
        .map(|series| u64::from(parse_rest_seconds(&series.rest)))
        .sum();

    let last_exercise = routine.exercises.len().saturating_sub(1);
    let exercise_rest: u64 = routine
        .exercises
        .iter()
        .take(last_exercise)
        .map(|exercise| u64::from(exercise.rest_between_exercises))
        .sum();

    preparation + work + series_rest + exercise_rest
}

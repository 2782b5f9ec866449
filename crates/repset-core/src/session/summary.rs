//! Building the persisted summary of a finished session.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use repset_model::{
    CompletedSeries, Exercise, Routine, RoutineSession, Series, SessionExercise, SessionTotals,
};

use super::state::SessionTimings;
use crate::aggregates::ESTIMATED_WORK_SECONDS_PER_SERIES;
use crate::collaborators::ExerciseCatalog;

/// Turns a routine and what was completed into a [`RoutineSession`].
pub struct SessionSummaryBuilder<'a> {
    catalog: &'a dyn ExerciseCatalog,
}

impl<'a> SessionSummaryBuilder<'a> {
    pub fn new(catalog: &'a dyn ExerciseCatalog) -> Self {
        Self { catalog }
    }

    /// Build a summary with a fresh id, dated now.
    pub fn build(
        &self,
        routine: &Routine,
        completed: &[Vec<CompletedSeries>],
        timings: SessionTimings,
    ) -> RoutineSession {
        self.build_at(
            routine,
            completed,
            timings,
            Uuid::new_v4().to_string(),
            Utc::now(),
        )
    }

    pub fn build_at(
        &self,
        routine: &Routine,
        completed: &[Vec<CompletedSeries>],
        timings: SessionTimings,
        id: String,
        date: DateTime<Utc>,
    ) -> RoutineSession {
        // Exercises the user never reached are left out.
        let performed: Vec<(&Exercise, Vec<Series>)> = routine
            .exercises
            .iter()
            .zip(completed)
            .filter(|(_, done)| !done.is_empty())
            .map(|(exercise, done)| (exercise, done.iter().map(|c| c.series.clone()).collect()))
            .collect();

        let muscles = self.muscles(performed.iter().map(|(exercise, _)| *exercise));
        let exercises: Vec<SessionExercise> = performed
            .into_iter()
            .map(|(exercise, series)| SessionExercise {
                name: exercise.name.clone(),
                key: exercise.key.clone(),
                translation_key: exercise.translation_key.clone(),
                series,
            })
            .collect();

        let series_count: usize = exercises.iter().map(|e| e.series.len()).sum();
        let work_seconds = series_count as u64 * ESTIMATED_WORK_SECONDS_PER_SERIES;
        let totals = SessionTotals::new(
            timings.prep_seconds,
            timings.rest_series_seconds,
            timings.rest_between_exercises_seconds,
            work_seconds,
        );

        let notes = exercises
            .iter()
            .flat_map(|e| e.series.iter())
            .map(|s| s.note.trim())
            .filter(|note| !note.is_empty())
            .map(str::to_string)
            .collect();

        RoutineSession {
            id,
            routine_id: routine.id.clone(),
            routine_title: routine.title.clone(),
            date,
            exercise_count: exercises.len(),
            series_count,
            muscles,
            notes,
            totals,
            exercises,
        }
    }

    /// Primary then secondary muscles of each exercise, first-seen order,
    /// without duplicates.
    fn muscles<'r>(&self, exercises: impl Iterator<Item = &'r Exercise>) -> Vec<String> {
        let mut muscles: Vec<String> = Vec::new();
        for exercise in exercises {
            let Some(info) = self
                .catalog
                .lookup(&exercise.translation_key)
                .or_else(|| self.catalog.lookup(&exercise.key))
            else {
                tracing::debug!(key = %exercise.key, "exercise not in catalog");
                continue;
            };
            for muscle in std::iter::once(info.primary_muscle).chain(info.secondary_muscles) {
                if !muscles.contains(&muscle) {
                    muscles.push(muscle);
                }
            }
        }
        muscles
    }
}

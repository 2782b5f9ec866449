//! Session records: what a running session captures and what it persists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::series::Series;

/// A series the user completed, with the RPE actually recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSeries {
    /// Position of the series within its exercise.
    pub series_index: usize,
    pub series: Series,
}

/// Time spent per category, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTotals {
    pub prep_seconds: u64,
    pub rest_series_seconds: u64,
    pub rest_between_exercises_seconds: u64,
    pub work_seconds: u64,
    pub total_seconds: u64,
}

impl SessionTotals {
    /// Build totals; `total_seconds` is always the sum of the four parts.
    #[must_use]
    pub fn new(
        prep_seconds: u64,
        rest_series_seconds: u64,
        rest_between_exercises_seconds: u64,
        work_seconds: u64,
    ) -> Self {
        Self {
            prep_seconds,
            rest_series_seconds,
            rest_between_exercises_seconds,
            work_seconds,
            total_seconds: prep_seconds
                + rest_series_seconds
                + rest_between_exercises_seconds
                + work_seconds,
        }
    }

    #[must_use]
    pub fn parts_sum(&self) -> u64 {
        self.prep_seconds
            + self.rest_series_seconds
            + self.rest_between_exercises_seconds
            + self.work_seconds
    }

    /// Check that `total_seconds` equals the sum of its parts.
    pub fn verify(&self) -> Result<()> {
        let sum = self.parts_sum();
        if sum == self.total_seconds {
            Ok(())
        } else {
            Err(ModelError::TotalsMismatch {
                total: self.total_seconds,
                sum,
            })
        }
    }

    #[must_use]
    pub fn rest_seconds(&self) -> u64 {
        self.rest_series_seconds + self.rest_between_exercises_seconds
    }
}

/// One exercise as performed in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExercise {
    pub name: String,
    pub key: String,
    pub translation_key: String,
    pub series: Vec<Series>,
}

/// Persisted summary of a finished session. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineSession {
    pub id: String,
    pub routine_id: String,
    pub routine_title: String,
    pub date: DateTime<Utc>,
    pub exercises: Vec<SessionExercise>,
    pub totals: SessionTotals,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub muscles: Vec<String>,
    pub exercise_count: usize,
    pub series_count: usize,
}

impl RoutineSession {
    /// Total lifted volume (weight x reps) over the recorded series.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.exercises
            .iter()
            .flat_map(|exercise| exercise.series.iter())
            .map(Series::volume)
            .sum()
    }
}

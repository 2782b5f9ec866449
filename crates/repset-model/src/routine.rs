//! Exercises and routines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::series::Series;

/// Separator between an exercise key and its creation timestamp.
const TIMESTAMP_SEPARATOR: char = '-';

/// Shortest digit run treated as a millisecond timestamp suffix.
const MIN_TIMESTAMP_DIGITS: usize = 10;

/// Append a creation timestamp (unix millis) to an exercise key.
pub fn timestamped_key(base: &str, created_at: DateTime<Utc>) -> String {
    format!(
        "{}{TIMESTAMP_SEPARATOR}{}",
        strip_timestamp_suffix(base),
        created_at.timestamp_millis()
    )
}

/// Remove a trailing `-<unix millis>` suffix, if any.
pub fn strip_timestamp_suffix(key: &str) -> &str {
    match key.rsplit_once(TIMESTAMP_SEPARATOR) {
        Some((base, suffix))
            if !base.is_empty()
                && suffix.len() >= MIN_TIMESTAMP_DIGITS
                && suffix.chars().all(|c| c.is_ascii_digit()) =>
        {
            base
        }
        _ => key,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    /// Stable identifier, optionally suffixed with a creation timestamp.
    pub key: String,
    /// `key` without the timestamp suffix.
    pub translation_key: String,
    pub series: Vec<Series>,
    /// Seconds of rest after the last series, before the next exercise.
    #[serde(default)]
    pub rest_between_exercises: u32,
}

impl Exercise {
    /// Build an exercise, deriving the translation key from `key`.
    pub fn new(
        name: impl Into<String>,
        key: impl Into<String>,
        series: Vec<Series>,
        rest_between_exercises: u32,
    ) -> Self {
        let key = key.into();
        let translation_key = strip_timestamp_suffix(&key).to_string();
        Self {
            name: name.into(),
            key,
            translation_key,
            series,
            rest_between_exercises,
        }
    }
}

/// How rest between exercises is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExerciseRestMode {
    #[default]
    Beginner,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub exercises: Vec<Exercise>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub exercise_rest_mode: ExerciseRestMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_preparation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation_time: Option<u32>,
}

impl Routine {
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            exercises: Vec::new(),
            created_at,
            exercise_rest_mode: ExerciseRestMode::default(),
            enable_preparation: None,
            preparation_time: None,
        }
    }

    /// Preparation lead-in in seconds, when enabled and positive.
    #[must_use]
    pub fn preparation_seconds(&self) -> Option<u32> {
        match (self.enable_preparation, self.preparation_time) {
            (Some(true), Some(seconds)) if seconds > 0 => Some(seconds),
            _ => None,
        }
    }

    pub fn with_exercise(mut self, exercise: Exercise) -> Self {
        self.exercises.push(exercise);
        self
    }

    pub fn with_preparation(mut self, seconds: u32) -> Self {
        self.enable_preparation = Some(true);
        self.preparation_time = Some(seconds);
        self
    }

    pub fn add_exercise(&mut self, exercise: Exercise) {
        self.exercises.push(exercise);
    }

    pub fn replace_exercise(&mut self, index: usize, exercise: Exercise) -> Result<Exercise> {
        let len = self.exercises.len();
        let slot = self
            .exercises
            .get_mut(index)
            .ok_or(ModelError::ExerciseIndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, exercise))
    }

    pub fn remove_exercise(&mut self, index: usize) -> Result<Exercise> {
        let len = self.exercises.len();
        if index >= len {
            return Err(ModelError::ExerciseIndexOutOfRange { index, len });
        }
        Ok(self.exercises.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn strips_only_timestamp_suffixes() {
        assert_eq!(strip_timestamp_suffix("bench-press-1700000000000"), "bench-press");
        assert_eq!(strip_timestamp_suffix("bench-press"), "bench-press");
        assert_eq!(strip_timestamp_suffix("squat-5"), "squat-5");
        assert_eq!(strip_timestamp_suffix("-1700000000000"), "-1700000000000");
    }

    #[test]
    fn timestamped_key_replaces_existing_suffix() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(timestamped_key("row", at), "row-1700000000123");
        assert_eq!(timestamped_key("row-1600000000000", at), "row-1700000000123");
    }

    #[test]
    fn preparation_requires_flag_and_positive_time() {
        let at = Utc.timestamp_millis_opt(0).unwrap();
        let routine = Routine::new("r", "Push", at);
        assert_eq!(routine.preparation_seconds(), None);
        assert_eq!(routine.clone().with_preparation(10).preparation_seconds(), Some(10));
        assert_eq!(routine.with_preparation(0).preparation_seconds(), None);
    }
}

//! Routine authoring: drafts become validated routines.
//!
//! Invalid series are dropped, the rest are normalized. An exercise left
//! with no valid series cannot be saved.

use chrono::{DateTime, Utc};
use thiserror::Error;

use repset_model::{
    Exercise, ExerciseDraft, ModelError, Routine, RoutineDraft, strip_timestamp_suffix,
    timestamped_key,
};
use repset_normalization::{normalize_series_list, parse_rest_seconds};
use repset_persistence::{PersistenceError, WorkoutStore, upsert_routine};
use repset_validate::get_valid_series;

#[derive(Debug, Error)]
pub enum AuthoringError {
    #[error("exercise name is empty")]
    MissingName,

    #[error("routine title is empty")]
    MissingTitle,

    #[error("exercise '{name}' has no valid series")]
    NoValidSeries { name: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type Result<T> = std::result::Result<T, AuthoringError>;

/// Build an exercise from a draft.
///
/// The key falls back to a slug of the name and is stamped with
/// `created_at` unless it already carries a timestamp suffix.
pub fn build_exercise(draft: &ExerciseDraft, created_at: DateTime<Utc>) -> Result<Exercise> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(AuthoringError::MissingName);
    }

    let valid = get_valid_series(&draft.series);
    if valid.is_empty() {
        return Err(AuthoringError::NoValidSeries {
            name: name.to_string(),
        });
    }
    let dropped = draft.series.len() - valid.len();
    if dropped > 0 {
        tracing::debug!(exercise = name, dropped, "dropped invalid series");
    }

    let base = match (draft.key.trim(), slugify(name)) {
        ("", slug) if slug.is_empty() => "exercise".to_string(),
        ("", slug) => slug,
        (key, _) => key.to_string(),
    };
    let key = if strip_timestamp_suffix(&base) == base {
        timestamped_key(&base, created_at)
    } else {
        base
    };

    Ok(Exercise::new(
        name,
        key,
        normalize_series_list(&valid, draft.apply_load),
        parse_rest_seconds(&draft.rest_between_exercises),
    ))
}

/// Build a routine from a draft. Fails on the first invalid exercise.
pub fn build_routine(
    draft: &RoutineDraft,
    id: impl Into<String>,
    created_at: DateTime<Utc>,
) -> Result<Routine> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(AuthoringError::MissingTitle);
    }

    let mut routine = Routine::new(id, title, created_at);
    routine.description = draft.description.trim().to_string();
    routine.exercise_rest_mode = draft.exercise_rest_mode;
    routine.enable_preparation = draft.enable_preparation;
    routine.preparation_time = draft.preparation_time;
    for exercise in &draft.exercises {
        routine.add_exercise(build_exercise(exercise, created_at)?);
    }
    Ok(routine)
}

/// Lowercase ASCII alphanumerics joined by single dashes.
fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Edits one routine. Every change yields a whole new document; nothing is
/// written until [`save`](Self::save).
#[derive(Debug, Clone)]
pub struct RoutineEditor {
    routine: Routine,
    dirty: bool,
}

impl RoutineEditor {
    pub fn new(routine: Routine) -> Self {
        Self {
            routine,
            dirty: false,
        }
    }

    pub fn routine(&self) -> &Routine {
        &self.routine
    }

    pub fn into_routine(self) -> Routine {
        self.routine
    }

    /// Whether there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn add_exercise(&mut self, draft: &ExerciseDraft, at: DateTime<Utc>) -> Result<&Exercise> {
        let exercise = build_exercise(draft, at)?;
        self.routine.add_exercise(exercise);
        self.dirty = true;
        let index = self.routine.exercises.len() - 1;
        Ok(&self.routine.exercises[index])
    }

    /// Replace the exercise at `index`, returning the old one.
    pub fn update_exercise(
        &mut self,
        index: usize,
        draft: &ExerciseDraft,
        at: DateTime<Utc>,
    ) -> Result<Exercise> {
        let len = self.routine.exercises.len();
        if index >= len {
            return Err(ModelError::ExerciseIndexOutOfRange { index, len }.into());
        }
        let exercise = build_exercise(draft, at)?;
        let old = self.routine.replace_exercise(index, exercise)?;
        self.dirty = true;
        Ok(old)
    }

    pub fn delete_exercise(&mut self, index: usize) -> Result<Exercise> {
        let removed = self.routine.remove_exercise(index)?;
        self.dirty = true;
        Ok(removed)
    }

    /// Write the routine into the stored list, replacing it by id.
    pub async fn save(&mut self, store: &dyn WorkoutStore) -> Result<()> {
        upsert_routine(store, self.routine.clone()).await?;
        self.dirty = false;
        tracing::info!(
            routine_id = %self.routine.id,
            exercises = self.routine.exercises.len(),
            "routine saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Bench Press"), "bench-press");
        assert_eq!(slugify("  Pull-up (wide)  "), "pull-up-wide");
        assert_eq!(slugify("!!!"), "");
    }
}

//! Authoring drafts: exercises and routines as entered, before validation.

use serde::{Deserialize, Serialize};

use crate::routine::ExerciseRestMode;
use crate::series::RawSeries;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExerciseDraft {
    pub name: String,
    pub key: String,
    pub series: Vec<RawSeries>,
    /// Rest before the next exercise, as typed (`m:ss`, seconds, ...).
    pub rest_between_exercises: String,
    /// Keep the load of `time`/`distance` series.
    pub apply_load: bool,
}

impl ExerciseDraft {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_series(mut self, series: RawSeries) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_rest(mut self, rest: impl Into<String>) -> Self {
        self.rest_between_exercises = rest.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutineDraft {
    pub title: String,
    pub description: String,
    pub exercises: Vec<ExerciseDraft>,
    pub exercise_rest_mode: ExerciseRestMode,
    pub enable_preparation: Option<bool>,
    pub preparation_time: Option<u32>,
}

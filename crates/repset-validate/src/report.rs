//! Per-draft validation reports.

use serde::Serialize;

use repset_model::{ExerciseDraft, RoutineDraft};

use crate::series::{InvalidReason, check_series};

/// Verdict on one raw series of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesVerdict {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<InvalidReason>,
}

impl SeriesVerdict {
    pub fn is_valid(&self) -> bool {
        self.issue.is_none()
    }
}

/// Validation outcome for one exercise draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftReport {
    pub exercise_name: String,
    pub exercise_key: String,
    pub verdicts: Vec<SeriesVerdict>,
}

impl DraftReport {
    pub fn valid_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.verdicts.len() - self.valid_count()
    }

    /// An exercise can be added to a routine only with a valid series.
    pub fn can_save(&self) -> bool {
        self.valid_count() > 0
    }

    pub fn issues(&self) -> impl Iterator<Item = (usize, &InvalidReason)> {
        self.verdicts
            .iter()
            .filter_map(|v| v.issue.as_ref().map(|issue| (v.index, issue)))
    }
}

pub fn validate_draft(draft: &ExerciseDraft) -> DraftReport {
    let verdicts = draft
        .series
        .iter()
        .enumerate()
        .map(|(index, series)| SeriesVerdict {
            index,
            issue: check_series(series).err(),
        })
        .collect();
    DraftReport {
        exercise_name: draft.name.clone(),
        exercise_key: draft.key.clone(),
        verdicts,
    }
}

pub fn validate_routine_draft(draft: &RoutineDraft) -> Vec<DraftReport> {
    draft.exercises.iter().map(validate_draft).collect()
}

/// Outcome of gating a routine draft for saving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatingDecision {
    pub block_save: bool,
    pub blocking_exercises: Vec<String>,
}

pub fn gate_routine_save(reports: &[DraftReport]) -> GatingDecision {
    let blocking: Vec<String> = reports
        .iter()
        .filter(|report| !report.can_save())
        .map(|report| report.exercise_key.clone())
        .collect();
    GatingDecision {
        block_save: !blocking.is_empty(),
        blocking_exercises: blocking,
    }
}

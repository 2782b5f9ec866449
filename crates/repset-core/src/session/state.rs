//! Session state: where the user is in the routine and what has been done.

use serde::Serialize;

use repset_model::{CompletedSeries, Routine};

/// Which kind of rest is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RestKind {
    /// Between two series of the same exercise.
    Series,
    /// Between two exercises.
    Exercise,
}

/// A completed series whose RPE has not been entered yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSeries {
    pub exercise_idx: usize,
    pub series_idx: usize,
}

/// Session phase. Exactly one is active at any time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum SessionPhase {
    /// Counting down the lead-in before the first series.
    Preparing { remaining: u32 },
    /// Waiting for the user to complete the current series.
    Active,
    /// Counting down a rest.
    Resting {
        kind: RestKind,
        remaining: u32,
        /// Seconds actually rested so far.
        elapsed: u32,
    },
    /// Waiting for the RPE of a just-completed series.
    PendingRpe(PendingSeries),
    /// All series done; terminal.
    Finished,
}

/// Time accumulated during the session, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTimings {
    pub prep_seconds: u64,
    pub rest_series_seconds: u64,
    pub rest_between_exercises_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub(crate) current_exercise_index: usize,
    pub(crate) current_series_index: usize,
    pub(crate) phase: SessionPhase,
    /// Configured lead-in, `0` when the routine has none.
    pub(crate) preparation_time: u32,
    /// Completed series per exercise, indexed like the routine.
    pub(crate) completed_exercises: Vec<Vec<CompletedSeries>>,
    /// RPE input text for the pending series.
    pub(crate) rpe: String,
    pub(crate) timings: SessionTimings,
}

impl SessionState {
    /// Initial state for a routine: preparing when a lead-in is configured,
    /// active otherwise.
    pub fn start(routine: &Routine) -> Self {
        let preparation_time = routine.preparation_seconds().unwrap_or(0);
        let (phase, prep_seconds) = if preparation_time > 0 {
            (
                SessionPhase::Preparing {
                    remaining: preparation_time,
                },
                u64::from(preparation_time),
            )
        } else {
            (SessionPhase::Active, 0)
        };

        Self {
            current_exercise_index: 0,
            current_series_index: 0,
            phase,
            preparation_time,
            completed_exercises: vec![Vec::new(); routine.exercises.len()],
            rpe: String::new(),
            timings: SessionTimings {
                prep_seconds,
                ..SessionTimings::default()
            },
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn current_exercise_index(&self) -> usize {
        self.current_exercise_index
    }

    pub fn current_series_index(&self) -> usize {
        self.current_series_index
    }

    pub fn is_resting(&self) -> bool {
        matches!(self.phase, SessionPhase::Resting { .. })
    }

    /// Seconds left in the running rest, `0` when not resting.
    pub fn rest_time(&self) -> u32 {
        match self.phase {
            SessionPhase::Resting { remaining, .. } => remaining,
            _ => 0,
        }
    }

    pub fn rest_type(&self) -> Option<RestKind> {
        match self.phase {
            SessionPhase::Resting { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn is_preparation(&self) -> bool {
        matches!(self.phase, SessionPhase::Preparing { .. })
    }

    /// Seconds left in the lead-in, `0` once it is over.
    pub fn preparation_remaining(&self) -> u32 {
        match self.phase {
            SessionPhase::Preparing { remaining } => remaining,
            _ => 0,
        }
    }

    pub fn preparation_time(&self) -> u32 {
        self.preparation_time
    }

    pub fn routine_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    pub fn pending_series(&self) -> Option<PendingSeries> {
        match self.phase {
            SessionPhase::PendingRpe(pending) => Some(pending),
            _ => None,
        }
    }

    pub fn rpe_input(&self) -> &str {
        &self.rpe
    }

    pub fn completed_exercises(&self) -> &[Vec<CompletedSeries>] {
        &self.completed_exercises
    }

    pub fn completed_series_count(&self) -> usize {
        self.completed_exercises.iter().map(Vec::len).sum()
    }

    pub fn timings(&self) -> SessionTimings {
        self.timings
    }
}

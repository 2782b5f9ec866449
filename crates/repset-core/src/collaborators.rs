//! Collaborators the session engine depends on.
//!
//! Each is injected through [`SessionDeps`](crate::session::SessionDeps);
//! nothing here is global.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use repset_model::{RpePolicy, SessionSettings};

/// Source of the settings read during a session.
pub trait SettingsProvider: Send + Sync {
    /// RPE capture policy, read once per series-completion decision.
    fn rpe_policy(&self) -> RpePolicy;

    /// Seconds added or removed by one rest adjustment.
    fn rest_adjust_step(&self) -> u32 {
        5
    }

    /// Whether feedback cues fire at all.
    fn vibration(&self) -> bool {
        true
    }
}

impl SettingsProvider for SessionSettings {
    fn rpe_policy(&self) -> RpePolicy {
        self.rpe_policy
    }

    fn rest_adjust_step(&self) -> u32 {
        self.rest_adjust_step_seconds
    }

    fn vibration(&self) -> bool {
        self.vibration
    }
}

/// Muscles worked by an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleInfo {
    pub primary_muscle: String,
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
}

/// Exercise metadata lookup, keyed by exercise key.
pub trait ExerciseCatalog: Send + Sync {
    fn lookup(&self, exercise_key: &str) -> Option<MuscleInfo>;
}

/// Catalog backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: HashMap<String, MuscleInfo>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `key -> { primaryMuscle, secondaryMuscles }`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let entries: HashMap<String, MuscleInfo> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    pub fn with_entry(
        mut self,
        key: impl Into<String>,
        primary: impl Into<String>,
        secondary: &[&str],
    ) -> Self {
        self.entries.insert(
            key.into(),
            MuscleInfo {
                primary_muscle: primary.into(),
                secondary_muscles: secondary.iter().map(|m| (*m).to_string()).collect(),
            },
        );
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ExerciseCatalog for StaticCatalog {
    fn lookup(&self, exercise_key: &str) -> Option<MuscleInfo> {
        self.entries.get(exercise_key).cloned()
    }
}

/// Notable transitions worth a haptic pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    SeriesComplete,
    RestComplete,
    SessionFinished,
}

#[derive(Debug, Error)]
#[error("feedback unavailable: {0}")]
pub struct FeedbackError(pub String);

/// Fire-and-forget haptic trigger. Failures are ignored by the engine.
pub trait Feedback: Send + Sync {
    fn trigger(&self, kind: FeedbackKind) -> Result<(), FeedbackError>;
}

/// Feedback sink that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl Feedback for NoFeedback {
    fn trigger(&self, _kind: FeedbackKind) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// User-visible, non-blocking messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    SessionSaved { session_id: String },
    SaveFailed { message: String },
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::SessionSaved { session_id } => {
                tracing::info!(%session_id, "session saved");
            }
            Notice::SaveFailed { message } => {
                tracing::warn!(%message, "session could not be saved");
            }
        }
    }
}

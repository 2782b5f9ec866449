//! User settings consumed by the session engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::series::SeriesType;

/// When the engine asks the user for an RPE after completing a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpePolicy {
    /// After every working set.
    #[default]
    Always,
    /// Never; the planned RPE is recorded as-is.
    Never,
    /// Only after the last working set of each exercise.
    Conditional,
}

impl RpePolicy {
    /// Decide whether a just-completed series must wait for an RPE.
    ///
    /// Warm-ups are never solicited.
    #[must_use]
    pub fn requires_capture(&self, series_type: SeriesType, is_last_working_set: bool) -> bool {
        if series_type.is_warm_up() {
            return false;
        }
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Conditional => is_last_working_set,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Never => "never",
            Self::Conditional => "conditional",
        }
    }
}

impl fmt::Display for RpePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Settings that shape a workout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub rpe_policy: RpePolicy,
    /// Trigger haptic feedback on notable transitions.
    pub vibration: bool,
    /// Seconds added or removed by one rest adjustment tap.
    pub rest_adjust_step_seconds: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            rpe_policy: RpePolicy::default(),
            vibration: true,
            rest_adjust_step_seconds: 5,
        }
    }
}

impl SessionSettings {
    #[must_use]
    pub fn with_rpe_policy(mut self, policy: RpePolicy) -> Self {
        self.rpe_policy = policy;
        self
    }
}

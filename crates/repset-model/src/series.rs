//! Series records.
//!
//! A [`RawSeries`] is what the authoring form hands over: every value is free
//! text and may be missing. A [`Series`] is the normalized, typed record that
//! routines store and sessions record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// RPE stored when the raw value is missing or out of range.
pub const DEFAULT_RPE: u8 = 5;

/// Upper bound of the RPE scale.
pub const MAX_RPE: u8 = 10;

/// How a series is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitType {
    /// Load moved for a number of repetitions.
    RepsAndWeight,
    /// Bodyweight repetitions.
    #[default]
    Reps,
    /// Timed hold or effort, in seconds.
    Time,
    /// Covered distance, in meters.
    Distance,
}

impl UnitType {
    pub const ALL: [UnitType; 4] = [Self::RepsAndWeight, Self::Reps, Self::Time, Self::Distance];

    /// Parse a unit type name, ignoring case and `_`/`-` separators.
    ///
    /// Returns `None` for anything that is not one of the four known units.
    pub fn parse(value: &str) -> Option<Self> {
        let key: String = value
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "repsandweight" => Some(Self::RepsAndWeight),
            "reps" => Some(Self::Reps),
            "time" => Some(Self::Time),
            "distance" => Some(Self::Distance),
            _ => None,
        }
    }

    /// Wire name used in persisted documents.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RepsAndWeight => "repsAndWeight",
            Self::Reps => "reps",
            Self::Time => "time",
            Self::Distance => "distance",
        }
    }

    /// Whether this unit counts repetitions.
    #[must_use]
    pub const fn counts_reps(&self) -> bool {
        matches!(self, Self::RepsAndWeight | Self::Reps)
    }

    /// Whether the load is kept without an explicit request.
    #[must_use]
    pub const fn carries_load(&self) -> bool {
        matches!(self, Self::RepsAndWeight)
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a series is a warm-up or counts toward the working volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesType {
    WarmUp,
    #[default]
    WorkingSet,
}

impl SeriesType {
    /// Parse a series type name. Unknown or missing names are working sets.
    pub fn parse(value: &str) -> Self {
        let key: String = value
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "warmup" => Self::WarmUp,
            _ => Self::WorkingSet,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WarmUp => "warmUp",
            Self::WorkingSet => "workingSet",
        }
    }

    #[must_use]
    pub const fn is_warm_up(&self) -> bool {
        matches!(self, Self::WarmUp)
    }
}

impl fmt::Display for SeriesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Series as typed into the authoring form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSeries {
    pub unit_type: Option<String>,
    pub weight: Option<String>,
    pub reps: Option<String>,
    pub duration: Option<String>,
    pub distance: Option<String>,
    pub rpe: Option<String>,
    pub note: Option<String>,
    pub rest: Option<String>,
    #[serde(rename = "type")]
    pub series_type: Option<String>,
}

impl RawSeries {
    /// Empty series of the given unit.
    pub fn new(unit_type: UnitType) -> Self {
        Self {
            unit_type: Some(unit_type.as_str().to_string()),
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, value: impl Into<String>) -> Self {
        self.weight = Some(value.into());
        self
    }

    pub fn with_reps(mut self, value: impl Into<String>) -> Self {
        self.reps = Some(value.into());
        self
    }

    pub fn with_duration(mut self, value: impl Into<String>) -> Self {
        self.duration = Some(value.into());
        self
    }

    pub fn with_distance(mut self, value: impl Into<String>) -> Self {
        self.distance = Some(value.into());
        self
    }

    pub fn with_rpe(mut self, value: impl Into<String>) -> Self {
        self.rpe = Some(value.into());
        self
    }

    pub fn with_rest(mut self, value: impl Into<String>) -> Self {
        self.rest = Some(value.into());
        self
    }

    pub fn with_note(mut self, value: impl Into<String>) -> Self {
        self.note = Some(value.into());
        self
    }

    pub fn with_type(mut self, series_type: SeriesType) -> Self {
        self.series_type = Some(series_type.as_str().to_string());
        self
    }

    /// Field values as text, for re-feeding a series through normalization.
    pub fn from_series(series: &Series) -> Self {
        Self {
            unit_type: Some(series.unit_type.as_str().to_string()),
            weight: Some(series.weight.to_string()),
            reps: series.reps.map(|v| v.to_string()),
            duration: series.duration.map(|v| v.to_string()),
            distance: series.distance.map(|v| v.to_string()),
            rpe: Some(series.rpe.to_string()),
            note: Some(series.note.clone()),
            rest: Some(series.rest.clone()),
            series_type: Some(series.series_type.as_str().to_string()),
        }
    }
}

/// A normalized series.
///
/// Only the measurement fields relevant to `unit_type` are `Some`; `weight`
/// is always present and is `0` when no load is tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub unit_type: UnitType,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default)]
    pub note: String,
    /// Rest after this series as `m:ss`, or empty.
    #[serde(default)]
    pub rest: String,
    pub rpe: u8,
    #[serde(rename = "type")]
    pub series_type: SeriesType,
}

impl Series {
    #[must_use]
    pub fn is_warm_up(&self) -> bool {
        self.series_type.is_warm_up()
    }

    /// Weight times reps for loaded rep work, `0` otherwise.
    #[must_use]
    pub fn volume(&self) -> f64 {
        match (self.unit_type, self.reps) {
            (UnitType::RepsAndWeight, Some(reps)) => self.weight * f64::from(reps),
            _ => 0.0,
        }
    }

    /// Copy of this series with a different RPE; warm-ups keep `0`.
    #[must_use]
    pub fn with_rpe(&self, rpe: u8) -> Self {
        let mut series = self.clone();
        series.rpe = if self.is_warm_up() { 0 } else { rpe.min(MAX_RPE) };
        series
    }
}

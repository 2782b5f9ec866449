//! Series validity predicate.
//!
//! A series may be saved when it carries some positive measurement: either a
//! load, or the value its unit type requires.

use std::fmt;

use serde::Serialize;

use repset_model::{RawSeries, UnitType};
use repset_normalization::is_positive;

/// Why a series cannot be saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InvalidReason {
    /// The unit type names none of the known units.
    UnknownUnitType { unit_type: String },
    /// Neither the load nor the required field is positive.
    MissingRequiredValue { field: &'static str },
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownUnitType { unit_type } => write!(f, "unknown unit type '{unit_type}'"),
            Self::MissingRequiredValue { field } => {
                write!(f, "needs a positive weight or {field}")
            }
        }
    }
}

/// Field that must be positive for a unit type when no load is given.
pub const fn required_field(unit_type: UnitType) -> &'static str {
    match unit_type {
        UnitType::RepsAndWeight | UnitType::Reps => "reps",
        UnitType::Time => "duration",
        UnitType::Distance => "distance",
    }
}

/// Check a raw series, reporting why it is invalid.
///
/// A missing unit type is read as `reps`, matching normalization.
pub fn check_series(series: &RawSeries) -> Result<UnitType, InvalidReason> {
    let unit_type = match series.unit_type.as_deref() {
        None => UnitType::default(),
        Some(name) => UnitType::parse(name).ok_or_else(|| InvalidReason::UnknownUnitType {
            unit_type: name.to_string(),
        })?,
    };

    let required = match unit_type {
        UnitType::RepsAndWeight | UnitType::Reps => series.reps.as_deref(),
        UnitType::Time => series.duration.as_deref(),
        UnitType::Distance => series.distance.as_deref(),
    };

    if is_positive(series.weight.as_deref()) || is_positive(required) {
        Ok(unit_type)
    } else {
        Err(InvalidReason::MissingRequiredValue {
            field: required_field(unit_type),
        })
    }
}

/// Whether a raw series has enough data to be persisted.
pub fn is_valid_series(series: &RawSeries) -> bool {
    check_series(series).is_ok()
}

/// Valid series in their original order. The input is not modified.
pub fn get_valid_series(series: &[RawSeries]) -> Vec<RawSeries> {
    series
        .iter()
        .filter(|s| is_valid_series(s))
        .cloned()
        .collect()
}

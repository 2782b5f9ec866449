//! Series normalization.
//!
//! Turns authoring text into typed [`Series`] records. The conversion is
//! total: malformed values fall back to `0` (measurements) or
//! [`DEFAULT_RPE`](repset_model::DEFAULT_RPE) (effort), never to an error.

use repset_model::{RawSeries, Series, SeriesType, UnitType};

use crate::numeric::{non_negative, parse_reps, parse_rpe};
use crate::rest::canonical_rest;

/// Unit type of a raw series; missing or unknown names fall back to `reps`.
pub fn resolve_unit_type(raw: &RawSeries) -> UnitType {
    match raw.unit_type.as_deref() {
        None => UnitType::default(),
        Some(name) => UnitType::parse(name).unwrap_or_else(|| {
            tracing::debug!(unit_type = name, "unknown unit type, normalizing as reps");
            UnitType::default()
        }),
    }
}

/// Normalize one raw series.
///
/// `apply_load` keeps the parsed weight for `time` and `distance` series;
/// without it their weight is `0`. `repsAndWeight` always keeps its load and
/// `reps` never does.
pub fn normalize_series(raw: &RawSeries, apply_load: bool) -> Series {
    let unit_type = resolve_unit_type(raw);
    let series_type = raw
        .series_type
        .as_deref()
        .map(SeriesType::parse)
        .unwrap_or_default();

    let weight = non_negative(raw.weight.as_deref());
    let reps = parse_reps(raw.reps.as_deref());
    let duration = non_negative(raw.duration.as_deref());
    let distance = non_negative(raw.distance.as_deref());

    let rpe = if series_type.is_warm_up() {
        0
    } else {
        parse_rpe(raw.rpe.as_deref())
    };

    let keeps_load = match unit_type {
        UnitType::RepsAndWeight => true,
        UnitType::Reps => false,
        UnitType::Time | UnitType::Distance => apply_load,
    };

    Series {
        unit_type,
        weight: if keeps_load { weight } else { 0.0 },
        reps: unit_type.counts_reps().then_some(reps),
        duration: (unit_type == UnitType::Time).then_some(duration),
        distance: (unit_type == UnitType::Distance).then_some(distance),
        note: raw.note.as_deref().map(str::trim).unwrap_or_default().to_string(),
        rest: raw.rest.as_deref().map(canonical_rest).unwrap_or_default(),
        rpe,
        series_type,
    }
}

/// Normalize a list of raw series, preserving order.
pub fn normalize_series_list(raw: &[RawSeries], apply_load: bool) -> Vec<Series> {
    raw.iter()
        .map(|series| normalize_series(series, apply_load))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_unit_type_defaults_to_reps() {
        let raw = RawSeries {
            reps: Some("12".to_string()),
            weight: Some("20".to_string()),
            ..RawSeries::default()
        };
        let series = normalize_series(&raw, false);
        assert_eq!(series.unit_type, UnitType::Reps);
        assert_eq!(series.reps, Some(12));
        assert_eq!(series.weight, 0.0);
    }

    #[test]
    fn load_is_kept_for_time_only_on_request() {
        let raw = RawSeries::new(UnitType::Time)
            .with_duration("60")
            .with_weight("16");
        assert_eq!(normalize_series(&raw, false).weight, 0.0);
        assert_eq!(normalize_series(&raw, true).weight, 16.0);
        assert_eq!(normalize_series(&raw, true).duration, Some(60.0));
    }

    #[test]
    fn distance_keeps_only_distance() {
        let raw = RawSeries::new(UnitType::Distance)
            .with_distance("400")
            .with_reps("3")
            .with_duration("90");
        let series = normalize_series(&raw, false);
        assert_eq!(series.distance, Some(400.0));
        assert_eq!(series.reps, None);
        assert_eq!(series.duration, None);
    }

    #[test]
    fn note_and_rest_are_cleaned() {
        let raw = RawSeries::new(UnitType::Reps)
            .with_reps("8")
            .with_note("  slow eccentric ")
            .with_rest("90");
        let series = normalize_series(&raw, false);
        assert_eq!(series.note, "slow eccentric");
        assert_eq!(series.rest, "1:30");
    }
}

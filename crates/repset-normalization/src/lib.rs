//! Normalization functions for repset series input.
//!
//! This crate converts authoring text into typed series records:
//! - **numeric**: tolerant number parsing with zero/default fallbacks
//! - **rest**: rest duration text (`m:ss`, seconds, unit suffixes)
//! - **series**: unit-aware normalization of whole series

pub mod numeric;
pub mod rest;
pub mod series;

// Re-export commonly used items
pub use numeric::{format_numeric, is_positive, non_negative, parse_f64, parse_reps, parse_rpe};
pub use rest::{canonical_rest, format_rest, parse_rest_seconds};
pub use series::{normalize_series, normalize_series_list, resolve_unit_type};

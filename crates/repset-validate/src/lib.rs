mod report;
mod series;

pub use report::{
    DraftReport, GatingDecision, SeriesVerdict, gate_routine_save, validate_draft,
    validate_routine_draft,
};
pub use series::{InvalidReason, check_series, get_valid_series, is_valid_series, required_field};

//! Routine authoring and the workout session engine.
//!
//! # Modules
//!
//! - [`authoring`] - drafts to validated routines, and routine editing
//! - [`session`] - the session state machine and its engine
//! - [`aggregates`] - counts and duration estimates over routines
//! - [`collaborators`] - settings, catalog, feedback and notice seams

pub mod aggregates;
pub mod authoring;
pub mod collaborators;
pub mod session;

pub use aggregates::{
    ESTIMATED_WORK_SECONDS_PER_SERIES, estimated_duration_seconds, planned_volume,
    total_series_count, working_series_count,
};
pub use authoring::{AuthoringError, RoutineEditor, build_exercise, build_routine};
pub use collaborators::{
    ExerciseCatalog, Feedback, FeedbackError, FeedbackKind, LogNotifier, MuscleInfo, NoFeedback,
    Notice, Notifier, SettingsProvider, StaticCatalog,
};
pub use session::{
    SessionDeps, SessionEngine, SessionPhase, SessionState, SessionSummaryBuilder, TimerToken,
};

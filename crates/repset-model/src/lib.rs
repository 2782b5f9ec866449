//! Data model for repset.
//!
//! - **draft**: authoring input before validation
//! - **series**: raw (text) and normalized (typed) series records
//! - **routine**: exercises and routines as authored and persisted
//! - **session**: the persisted summary of a finished workout session
//! - **settings**: user settings consumed by the session engine

pub mod draft;
pub mod error;
pub mod routine;
pub mod series;
pub mod session;
pub mod settings;

pub use draft::{ExerciseDraft, RoutineDraft};
pub use error::{ModelError, Result};
pub use routine::{Exercise, ExerciseRestMode, Routine, strip_timestamp_suffix, timestamped_key};
pub use series::{DEFAULT_RPE, MAX_RPE, RawSeries, Series, SeriesType, UnitType};
pub use session::{CompletedSeries, RoutineSession, SessionExercise, SessionTotals};
pub use settings::{RpePolicy, SessionSettings};

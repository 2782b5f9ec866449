//! Workout sessions.
//!
//! - `state.rs` - phases and accumulated progress
//! - `machine.rs` - pure transitions and the effects they request
//! - `timer.rs` - countdown generations
//! - `summary.rs` - the persisted record of a finished session
//! - `engine.rs` - ties the above to the injected collaborators

mod engine;
mod machine;
mod state;
mod summary;
mod timer;

pub use engine::{PersistOutcome, SessionDeps, SessionEngine};
pub use machine::{SessionEffect, SessionEvent, Transition, transition};
pub use state::{PendingSeries, RestKind, SessionPhase, SessionState, SessionTimings};
pub use summary::SessionSummaryBuilder;
pub use timer::{Countdown, TimerToken};

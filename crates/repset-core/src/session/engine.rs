//! The session engine: owns the state, feeds events through [`transition`]
//! and runs the resulting effects.

use std::sync::Arc;

use tokio::task::JoinHandle;

use repset_model::{Routine, RoutineSession, SessionSettings};
use repset_normalization::parse_f64;
use repset_persistence::{PersistenceError, WorkoutStore, find_routine};

use super::machine::{SessionEffect, SessionEvent, transition};
use super::state::SessionState;
use super::summary::SessionSummaryBuilder;
use super::timer::{Countdown, TimerToken};
use crate::collaborators::{
    ExerciseCatalog, Feedback, LogNotifier, NoFeedback, Notice, Notifier, SettingsProvider,
    StaticCatalog,
};

/// Collaborators a session needs.
#[derive(Clone)]
pub struct SessionDeps {
    pub store: Arc<dyn WorkoutStore>,
    pub settings: Arc<dyn SettingsProvider>,
    pub catalog: Arc<dyn ExerciseCatalog>,
    pub feedback: Arc<dyn Feedback>,
    pub notifier: Arc<dyn Notifier>,
}

impl SessionDeps {
    /// Default settings, an empty catalog, no feedback, log-only notices.
    pub fn new(store: Arc<dyn WorkoutStore>) -> Self {
        Self {
            store,
            settings: Arc::new(SessionSettings::default()),
            catalog: Arc::new(StaticCatalog::new()),
            feedback: Arc::new(NoFeedback),
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn with_settings(mut self, settings: Arc<dyn SettingsProvider>) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn ExerciseCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_feedback(mut self, feedback: Arc<dyn Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

/// Outcome of saving the summary.
pub type PersistOutcome = Result<(), PersistenceError>;

/// Saving of a finished session's summary.
enum Persistence {
    /// No runtime was available when the session finished.
    Queued(RoutineSession),
    Running(JoinHandle<PersistOutcome>),
}

/// A running workout session.
///
/// All operations are total: with no routine, after cancellation or in the
/// wrong phase they do nothing.
pub struct SessionEngine {
    deps: SessionDeps,
    routine: Option<Routine>,
    state: Option<SessionState>,
    countdown: Countdown,
    summary: Option<RoutineSession>,
    persistence: Option<Persistence>,
}

impl SessionEngine {
    /// Look up `routine_id` and start a session on it.
    ///
    /// A missing routine or a failed lookup leaves the engine without a
    /// routine.
    pub async fn load(deps: SessionDeps, routine_id: &str) -> Self {
        match find_routine(deps.store.as_ref(), routine_id).await {
            Ok(Some(routine)) => Self::from_routine(deps, routine),
            Ok(None) => {
                tracing::warn!(routine_id, "routine not found");
                Self::unresolved(deps)
            }
            Err(error) => {
                tracing::warn!(routine_id, %error, "routine lookup failed");
                Self::unresolved(deps)
            }
        }
    }

    /// Start a session on an already loaded routine.
    pub fn from_routine(deps: SessionDeps, mut routine: Routine) -> Self {
        let before = routine.exercises.len();
        routine.exercises.retain(|exercise| !exercise.series.is_empty());
        if routine.exercises.len() < before {
            tracing::warn!(
                routine_id = %routine.id,
                dropped = before - routine.exercises.len(),
                "skipping exercises without series"
            );
        }
        if routine.exercises.is_empty() {
            tracing::warn!(routine_id = %routine.id, "routine has no exercises");
            return Self::unresolved(deps);
        }

        let state = SessionState::start(&routine);
        let mut countdown = Countdown::new();
        if state.is_preparation() {
            countdown.arm();
        }
        tracing::info!(
            routine_id = %routine.id,
            exercises = routine.exercises.len(),
            preparation = state.preparation_time(),
            "session started"
        );

        Self {
            deps,
            routine: Some(routine),
            state: Some(state),
            countdown,
            summary: None,
            persistence: None,
        }
    }

    /// An engine with nothing to run.
    pub fn unresolved(deps: SessionDeps) -> Self {
        Self {
            deps,
            routine: None,
            state: None,
            countdown: Countdown::new(),
            summary: None,
            persistence: None,
        }
    }

    pub fn routine(&self) -> Option<&Routine> {
        self.routine.as_ref()
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    pub fn routine_finished(&self) -> bool {
        self.state.as_ref().is_some_and(SessionState::routine_finished)
    }

    pub fn is_resting(&self) -> bool {
        self.state.as_ref().is_some_and(SessionState::is_resting)
    }

    pub fn is_preparation(&self) -> bool {
        self.state.as_ref().is_some_and(SessionState::is_preparation)
    }

    pub fn rest_time(&self) -> u32 {
        self.state.as_ref().map_or(0, SessionState::rest_time)
    }

    /// Summary of the finished session.
    pub fn summary(&self) -> Option<&RoutineSession> {
        self.summary.as_ref()
    }

    /// Token a tick driver must present, while a countdown is armed.
    pub fn timer_token(&self) -> Option<TimerToken> {
        self.countdown.token()
    }

    pub fn complete_current_series(&mut self) {
        let rpe_policy = self.deps.settings.rpe_policy();
        self.dispatch(SessionEvent::CompleteSeries { rpe_policy });
    }

    /// One second on the armed countdown. Ignored when nothing is armed.
    pub fn tick(&mut self) {
        if !self.countdown.is_armed() {
            tracing::trace!("tick ignored: no countdown armed");
            return;
        }
        self.dispatch(SessionEvent::Tick);
    }

    /// One second on the countdown identified by `token`.
    ///
    /// Ticks from a countdown that has since been disarmed or replaced are
    /// dropped.
    pub fn tick_with(&mut self, token: TimerToken) {
        if !self.countdown.accepts(token) {
            tracing::trace!(?token, "stale tick ignored");
            return;
        }
        self.dispatch(SessionEvent::Tick);
    }

    pub fn complete_rest(&mut self) {
        self.dispatch(SessionEvent::CompleteRest);
    }

    pub fn skip_preparation(&mut self) {
        self.dispatch(SessionEvent::SkipPreparation);
    }

    pub fn save_rpe(&mut self, value: i64) {
        self.dispatch(SessionEvent::SaveRpe(value));
    }

    /// Replace the RPE input text of the pending series.
    pub fn set_rpe_input(&mut self, text: &str) {
        if let Some(state) = self.state.as_mut()
            && state.pending_series().is_some()
        {
            state.rpe = text.to_string();
        }
    }

    /// Save the RPE input text. Unparsable text keeps the series pending.
    pub fn submit_rpe_input(&mut self) {
        let Some(text) = self.state.as_ref().map(|state| state.rpe.clone()) else {
            return;
        };
        match parse_f64(&text) {
            Some(value) => self.save_rpe(value.trunc() as i64),
            None => tracing::debug!(input = %text, "rpe input is not a number"),
        }
    }

    pub fn adjust_rest(&mut self, delta_seconds: i64) {
        self.dispatch(SessionEvent::AdjustRest(delta_seconds));
    }

    /// Lengthen the running rest by one configured step.
    pub fn extend_rest(&mut self) {
        let step = i64::from(self.deps.settings.rest_adjust_step());
        self.adjust_rest(step);
    }

    /// Shorten the running rest by one configured step.
    pub fn shorten_rest(&mut self) {
        let step = i64::from(self.deps.settings.rest_adjust_step());
        self.adjust_rest(-step);
    }

    /// Abandon the session without saving anything.
    pub fn cancel(&mut self) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        if state.routine_finished() {
            tracing::debug!("cancel ignored: session already finished");
            return;
        }
        self.countdown.disarm();
        self.state = None;
        tracing::info!(
            routine_id = self.routine.as_ref().map(|r| r.id.as_str()),
            "session cancelled"
        );
    }

    /// Wait for the summary to be saved.
    ///
    /// Returns `None` when the session has not finished or the outcome was
    /// already collected.
    pub async fn wait_for_persistence(&mut self) -> Option<PersistOutcome> {
        match self.persistence.take()? {
            Persistence::Queued(summary) => Some(
                persist_summary(
                    Arc::clone(&self.deps.store),
                    Arc::clone(&self.deps.notifier),
                    summary,
                )
                .await,
            ),
            Persistence::Running(handle) => Some(handle.await.unwrap_or_else(|error| {
                Err(PersistenceError::Unavailable(format!(
                    "persistence task failed: {error}"
                )))
            })),
        }
    }

    fn dispatch(&mut self, event: SessionEvent) {
        let (Some(routine), Some(state)) = (self.routine.as_ref(), self.state.take()) else {
            tracing::debug!(?event, "ignored: no active session");
            return;
        };

        let step = transition(state, event, routine);
        tracing::debug!(?event, phase = ?step.state.phase(), "session transition");
        self.state = Some(step.state);

        for effect in step.effects {
            self.run(effect);
        }
    }

    fn run(&mut self, effect: SessionEffect) {
        match effect {
            SessionEffect::ArmTimer => {
                self.countdown.arm();
            }
            SessionEffect::DisarmTimer => self.countdown.disarm(),
            SessionEffect::Feedback(kind) => {
                if !self.deps.settings.vibration() {
                    tracing::trace!(?kind, "feedback off");
                } else if let Err(error) = self.deps.feedback.trigger(kind) {
                    tracing::debug!(?kind, %error, "feedback failed");
                }
            }
            SessionEffect::PersistSummary => self.finish(),
        }
    }

    fn finish(&mut self) {
        let (Some(routine), Some(state)) = (self.routine.as_ref(), self.state.as_ref()) else {
            return;
        };

        let summary = SessionSummaryBuilder::new(self.deps.catalog.as_ref()).build(
            routine,
            state.completed_exercises(),
            state.timings(),
        );
        if let Err(error) = summary.totals.verify() {
            tracing::error!(%error, "session totals are inconsistent");
        }
        tracing::info!(
            session_id = %summary.id,
            routine_id = %summary.routine_id,
            series = summary.series_count,
            total_seconds = summary.totals.total_seconds,
            "session finished"
        );

        self.summary = Some(summary.clone());
        self.persistence = Some(match tokio::runtime::Handle::try_current() {
            Ok(handle) => Persistence::Running(handle.spawn(persist_summary(
                Arc::clone(&self.deps.store),
                Arc::clone(&self.deps.notifier),
                summary,
            ))),
            Err(_) => Persistence::Queued(summary),
        });
    }
}

async fn persist_summary(
    store: Arc<dyn WorkoutStore>,
    notifier: Arc<dyn Notifier>,
    summary: RoutineSession,
) -> PersistOutcome {
    match store.save_routine_session(&summary).await {
        Ok(()) => {
            notifier.notify(Notice::SessionSaved {
                session_id: summary.id,
            });
            Ok(())
        }
        Err(error) => {
            tracing::warn!(session_id = %summary.id, %error, "failed to save session");
            notifier.notify(Notice::SaveFailed {
                message: error.user_message(),
            });
            Err(error)
        }
    }
}

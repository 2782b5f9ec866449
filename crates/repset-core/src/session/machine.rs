//! Pure session transitions.
//!
//! [`transition`] maps a state and an event to the next state plus the side
//! effects to run. It never touches timers, storage or feedback itself;
//! [`SessionEngine`](super::SessionEngine) interprets the effects.

use repset_model::{MAX_RPE, Routine, RpePolicy};
use repset_normalization::parse_rest_seconds;

use super::state::{PendingSeries, RestKind, SessionPhase, SessionState};
use crate::collaborators::FeedbackKind;

/// Something the user or the clock did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The user finished the current series.
    CompleteSeries { rpe_policy: RpePolicy },
    /// One second elapsed on the armed countdown.
    Tick,
    /// The user ended the rest early.
    CompleteRest,
    SkipPreparation,
    /// RPE for the pending series; clamped to `0..=10`.
    SaveRpe(i64),
    /// Add (or remove, when negative) seconds from the running rest.
    AdjustRest(i64),
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    /// Start a fresh one-second countdown, replacing any armed one.
    ArmTimer,
    DisarmTimer,
    Feedback(FeedbackKind),
    /// Build the summary and save it.
    PersistSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SessionState,
    pub effects: Vec<SessionEffect>,
}

/// Apply one event.
///
/// Events that make no sense in the current phase leave the state unchanged
/// and produce no effects.
pub fn transition(state: SessionState, event: SessionEvent, routine: &Routine) -> Transition {
    let mut step = Step {
        state,
        effects: Vec::new(),
        routine,
    };

    match event {
        SessionEvent::CompleteSeries { rpe_policy } => step.complete_series(rpe_policy),
        SessionEvent::Tick => step.tick(),
        SessionEvent::CompleteRest => step.complete_rest(),
        SessionEvent::SkipPreparation => step.skip_preparation(),
        SessionEvent::SaveRpe(value) => step.save_rpe(value),
        SessionEvent::AdjustRest(delta) => step.adjust_rest(delta),
    }

    Transition {
        state: step.state,
        effects: step.effects,
    }
}

struct Step<'a> {
    state: SessionState,
    effects: Vec<SessionEffect>,
    routine: &'a Routine,
}

impl Step<'_> {
    fn complete_series(&mut self, rpe_policy: RpePolicy) {
        if self.state.phase != SessionPhase::Active {
            tracing::debug!(phase = ?self.state.phase, "complete series ignored");
            return;
        }
        let routine = self.routine;
        let exercise_idx = self.state.current_exercise_index;
        let series_idx = self.state.current_series_index;
        let Some(exercise) = routine.exercises.get(exercise_idx) else {
            return;
        };
        let Some(planned) = exercise.series.get(series_idx) else {
            return;
        };

        let recorded = planned.with_rpe(planned.rpe);
        if let Some(completed) = self.state.completed_exercises.get_mut(exercise_idx) {
            completed.push(repset_model::CompletedSeries {
                series_index: series_idx,
                series: recorded,
            });
        }
        self.effects
            .push(SessionEffect::Feedback(FeedbackKind::SeriesComplete));

        let is_last_working_set = exercise.series[series_idx + 1..]
            .iter()
            .all(repset_model::Series::is_warm_up);
        if rpe_policy.requires_capture(planned.series_type, is_last_working_set) {
            self.state.rpe = planned.rpe.to_string();
            self.state.phase = SessionPhase::PendingRpe(PendingSeries {
                exercise_idx,
                series_idx,
            });
            return;
        }

        self.advance();
    }

    fn save_rpe(&mut self, value: i64) {
        let SessionPhase::PendingRpe(pending) = self.state.phase else {
            tracing::debug!(phase = ?self.state.phase, "save rpe ignored");
            return;
        };
        let rpe = value.clamp(0, i64::from(MAX_RPE)) as u8;
        let entry = self
            .state
            .completed_exercises
            .get_mut(pending.exercise_idx)
            .and_then(|completed| {
                completed
                    .iter_mut()
                    .rev()
                    .find(|c| c.series_index == pending.series_idx)
            });
        if let Some(entry) = entry {
            entry.series = entry.series.with_rpe(rpe);
        }

        self.state.rpe.clear();
        self.advance();
    }

    /// Move past the series just completed: rest, next series, next
    /// exercise, or finish.
    fn advance(&mut self) {
        let routine = self.routine;
        let exercise_idx = self.state.current_exercise_index;
        let series_idx = self.state.current_series_index;
        let Some(exercise) = routine.exercises.get(exercise_idx) else {
            self.finish();
            return;
        };

        if series_idx + 1 < exercise.series.len() {
            let rest = parse_rest_seconds(&exercise.series[series_idx].rest);
            if rest > 0 {
                self.rest(RestKind::Series, rest);
            } else {
                self.state.current_series_index += 1;
                self.state.phase = SessionPhase::Active;
            }
        } else if exercise_idx + 1 < routine.exercises.len() {
            let rest = exercise.rest_between_exercises;
            if rest > 0 {
                self.rest(RestKind::Exercise, rest);
            } else {
                self.next_exercise();
                self.state.phase = SessionPhase::Active;
            }
        } else {
            self.finish();
        }
    }

    fn rest(&mut self, kind: RestKind, seconds: u32) {
        self.state.phase = SessionPhase::Resting {
            kind,
            remaining: seconds,
            elapsed: 0,
        };
        self.effects.push(SessionEffect::ArmTimer);
    }

    fn next_exercise(&mut self) {
        self.state.current_exercise_index += 1;
        self.state.current_series_index = 0;
    }

    fn finish(&mut self) {
        self.state.phase = SessionPhase::Finished;
        self.effects.push(SessionEffect::DisarmTimer);
        self.effects
            .push(SessionEffect::Feedback(FeedbackKind::SessionFinished));
        self.effects.push(SessionEffect::PersistSummary);
    }

    fn tick(&mut self) {
        match self.state.phase {
            SessionPhase::Preparing { remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.end_preparation();
                } else {
                    self.state.phase = SessionPhase::Preparing { remaining };
                }
            }
            SessionPhase::Resting {
                kind,
                remaining,
                elapsed,
            } => {
                if remaining > 0 {
                    self.state.phase = SessionPhase::Resting {
                        kind,
                        remaining: remaining - 1,
                        elapsed: elapsed.saturating_add(1),
                    };
                }
                if self.state.rest_time() == 0 {
                    self.complete_rest();
                }
            }
            _ => {}
        }
    }

    fn complete_rest(&mut self) {
        let SessionPhase::Resting { kind, elapsed, .. } = self.state.phase else {
            tracing::debug!(phase = ?self.state.phase, "complete rest ignored");
            return;
        };

        let timings = &mut self.state.timings;
        match kind {
            RestKind::Series => {
                timings.rest_series_seconds += u64::from(elapsed);
                self.state.current_series_index += 1;
            }
            RestKind::Exercise => {
                timings.rest_between_exercises_seconds += u64::from(elapsed);
                self.next_exercise();
            }
        }
        self.effects.push(SessionEffect::DisarmTimer);
        self.effects
            .push(SessionEffect::Feedback(FeedbackKind::RestComplete));

        if self.state.current_exercise_index >= self.routine.exercises.len() {
            self.finish();
        } else {
            self.state.phase = SessionPhase::Active;
        }
    }

    fn skip_preparation(&mut self) {
        if self.state.is_preparation() {
            self.end_preparation();
        }
    }

    fn end_preparation(&mut self) {
        self.state.phase = SessionPhase::Active;
        self.effects.push(SessionEffect::DisarmTimer);
    }

    fn adjust_rest(&mut self, delta: i64) {
        if let SessionPhase::Resting {
            kind,
            remaining,
            elapsed,
        } = self.state.phase
        {
            let adjusted = i64::from(remaining)
                .saturating_add(delta)
                .clamp(0, i64::from(u32::MAX));
            let adjusted = u32::try_from(adjusted).unwrap_or(u32::MAX);
            self.state.phase = SessionPhase::Resting {
                kind,
                remaining: adjusted,
                elapsed,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use repset_model::{Exercise, Series, SeriesType, UnitType};

    fn series(rest: &str, series_type: SeriesType) -> Series {
        Series {
            unit_type: UnitType::Reps,
            weight: 0.0,
            reps: Some(10),
            duration: None,
            distance: None,
            note: String::new(),
            rest: rest.to_string(),
            rpe: 7,
            series_type,
        }
    }

    fn routine(exercises: Vec<Exercise>) -> Routine {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        exercises
            .into_iter()
            .fold(Routine::new("r", "Test", at), Routine::with_exercise)
    }

    fn apply(state: SessionState, event: SessionEvent, routine: &Routine) -> Transition {
        transition(state, event, routine)
    }

    const NEVER: SessionEvent = SessionEvent::CompleteSeries {
        rpe_policy: RpePolicy::Never,
    };

    #[test]
    fn series_with_rest_enters_series_rest() {
        let routine = routine(vec![Exercise::new(
            "Push-up",
            "push-up",
            vec![
                series("1:00", SeriesType::WorkingSet),
                series("", SeriesType::WorkingSet),
            ],
            0,
        )]);
        let next = apply(SessionState::start(&routine), NEVER, &routine);
        assert_eq!(next.state.rest_type(), Some(RestKind::Series));
        assert_eq!(next.state.rest_time(), 60);
        assert!(next.effects.contains(&SessionEffect::ArmTimer));
    }

    #[test]
    fn zero_rest_moves_straight_to_next_series() {
        let routine = routine(vec![Exercise::new(
            "Push-up",
            "push-up",
            vec![
                series("", SeriesType::WorkingSet),
                series("", SeriesType::WorkingSet),
            ],
            0,
        )]);
        let next = apply(SessionState::start(&routine), NEVER, &routine);
        assert_eq!(next.state.phase, SessionPhase::Active);
        assert_eq!(next.state.current_series_index, 1);
        assert!(!next.effects.contains(&SessionEffect::ArmTimer));
    }

    #[test]
    fn events_out_of_phase_are_ignored() {
        let routine = routine(vec![Exercise::new(
            "Plank",
            "plank",
            vec![series("", SeriesType::WorkingSet)],
            0,
        )]);
        let start = SessionState::start(&routine);
        for event in [
            SessionEvent::Tick,
            SessionEvent::CompleteRest,
            SessionEvent::SkipPreparation,
            SessionEvent::SaveRpe(8),
            SessionEvent::AdjustRest(30),
        ] {
            let next = apply(start.clone(), event, &routine);
            assert_eq!(next.state, start, "{event:?}");
            assert!(next.effects.is_empty(), "{event:?}");
        }
    }

    #[test]
    fn adjust_rest_clamps_at_zero() {
        let routine = routine(vec![Exercise::new(
            "Row",
            "row",
            vec![
                series("0:20", SeriesType::WorkingSet),
                series("", SeriesType::WorkingSet),
            ],
            0,
        )]);
        let resting = apply(SessionState::start(&routine), NEVER, &routine).state;
        let longer = apply(resting.clone(), SessionEvent::AdjustRest(15), &routine).state;
        assert_eq!(longer.rest_time(), 35);
        let shorter = apply(resting, SessionEvent::AdjustRest(-90), &routine).state;
        assert_eq!(shorter.rest_time(), 0);
        assert!(shorter.is_resting());
    }

    #[test]
    fn adjust_rest_saturates_on_extreme_deltas() {
        let routine = routine(vec![Exercise::new(
            "Row",
            "row",
            vec![
                series("0:30", SeriesType::WorkingSet),
                series("", SeriesType::WorkingSet),
            ],
            0,
        )]);
        let resting = apply(SessionState::start(&routine), NEVER, &routine).state;

        let longest = apply(resting.clone(), SessionEvent::AdjustRest(i64::MAX), &routine).state;
        assert_eq!(longest.rest_time(), u32::MAX);
        assert_eq!(longest.rest_type(), Some(RestKind::Series));

        let shortest = apply(resting, SessionEvent::AdjustRest(i64::MIN), &routine).state;
        assert_eq!(shortest.rest_time(), 0);
        assert!(shortest.is_resting());
    }

    #[test]
    fn rest_that_reaches_zero_completes_on_the_tick() {
        let routine = routine(vec![Exercise::new(
            "Row",
            "row",
            vec![
                series("0:02", SeriesType::WorkingSet),
                series("", SeriesType::WorkingSet),
            ],
            0,
        )]);
        let mut state = apply(SessionState::start(&routine), NEVER, &routine).state;
        state = apply(state, SessionEvent::Tick, &routine).state;
        assert_eq!(state.rest_time(), 1);
        let next = apply(state, SessionEvent::Tick, &routine);
        assert_eq!(next.state.phase, SessionPhase::Active);
        assert_eq!(next.state.current_series_index, 1);
        assert_eq!(next.state.timings.rest_series_seconds, 2);
        assert!(
            next.effects
                .contains(&SessionEffect::Feedback(FeedbackKind::RestComplete))
        );
    }
}

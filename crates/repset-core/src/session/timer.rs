//! Countdown bookkeeping.
//!
//! The engine never owns a real interval. A driver (a tokio interval, a UI
//! frame loop, a test) asks for the current [`TimerToken`] and feeds ticks
//! back with it. Re-arming bumps the generation, so ticks from an earlier
//! countdown are recognised as stale and dropped.

/// Identifies one armed countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// At most one countdown is armed at a time.
#[derive(Debug, Default)]
pub struct Countdown {
    generation: u64,
    armed: bool,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a fresh countdown, clearing any previous one first.
    pub fn arm(&mut self) -> TimerToken {
        if self.armed {
            self.disarm();
        }
        self.generation += 1;
        self.armed = true;
        tracing::trace!(generation = self.generation, "countdown armed");
        TimerToken(self.generation)
    }

    /// Idempotent.
    pub fn disarm(&mut self) {
        if self.armed {
            tracing::trace!(generation = self.generation, "countdown disarmed");
        }
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Token of the armed countdown, if any.
    pub fn token(&self) -> Option<TimerToken> {
        self.armed.then_some(TimerToken(self.generation))
    }

    /// Whether a tick carrying `token` belongs to the armed countdown.
    pub fn accepts(&self, token: TimerToken) -> bool {
        self.armed && token.0 == self.generation
    }
}

//! Tick throttling
//!
//! A transition of `transition` length is split into a mode specific number
//! of steps; a step may run only once more than `transition / steps` has
//! passed since the previous one.

use embassy_time::{Duration, Instant};

/// Transition length and the resulting wait between ticks
#[derive(Debug, Clone, Copy)]
pub struct TransitionTiming {
    /// Length of a whole transition
    transition: Duration,
    /// Minimum time between two executed ticks
    wait: Duration,
    /// Time of the last executed tick
    last_tick: Option<Instant>,
}

impl TransitionTiming {
    /// Create timing for a transition split into `steps` ticks
    pub fn new(transition: Duration, steps: u16) -> Self {
        Self {
            transition,
            wait: wait_for(transition, steps),
            last_tick: None,
        }
    }

    pub const fn transition(&self) -> Duration {
        self.transition
    }

    pub const fn wait(&self) -> Duration {
        self.wait
    }

    /// Change the transition length, keeping the step count
    pub fn set_transition(&mut self, transition: Duration, steps: u16) {
        self.transition = transition;
        self.wait = wait_for(transition, steps);
    }

    /// Recompute the wait for a different step count
    pub fn set_steps(&mut self, steps: u16) {
        self.wait = wait_for(self.transition, steps);
    }

    /// Forget the last tick so the next one runs immediately
    pub fn reset(&mut self) {
        self.last_tick = None;
    }

    /// Check if a tick may run at `now`
    ///
    /// Elapsed time uses wrapping millisecond subtraction.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_tick {
            None => true,
            Some(last) => elapsed_ms(last, now) > self.wait.as_millis(),
        }
    }

    /// Record an executed tick
    pub fn mark(&mut self, now: Instant) {
        self.last_tick = Some(now);
    }

    /// Time left until [`is_due`](Self::is_due) turns true
    pub fn time_until_due(&self, now: Instant) -> Duration {
        let Some(last) = self.last_tick else {
            return Duration::from_millis(0);
        };
        let elapsed = elapsed_ms(last, now);
        let wait = self.wait.as_millis();
        if elapsed > wait {
            Duration::from_millis(0)
        } else {
            Duration::from_millis(wait - elapsed + 1)
        }
    }
}

fn wait_for(transition: Duration, steps: u16) -> Duration {
    Duration::from_millis(transition.as_millis() / u64::from(steps.max(1)))
}

fn elapsed_ms(since: Instant, now: Instant) -> u64 {
    now.as_millis().wrapping_sub(since.as_millis())
}

#![forbid(unsafe_code)]

//! Countdown state shown next to the rotation controls.

use core::time::Duration;

/// Result of one countdown step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Remaining time was positive and has been decremented.
    Counted,
    /// Remaining time was already zero; nothing changed.
    Exhausted,
}

/// Time remaining until the next automatic rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    interval: Duration,
    remaining: Duration,
    step: Duration,
}

impl Countdown {
    /// Full countdown of `interval`, decremented by `step` per tick.
    #[must_use]
    pub const fn new(interval: Duration, step: Duration) -> Self {
        Self {
            interval,
            remaining: interval,
            step,
        }
    }

    /// Decrement by one step, clamping at zero.
    pub fn tick(&mut self) -> CountdownTick {
        if self.remaining.is_zero() {
            return CountdownTick::Exhausted;
        }
        self.remaining = self.remaining.saturating_sub(self.step);
        CountdownTick::Counted
    }

    /// Restore the full interval.
    pub fn reset(&mut self) {
        self.remaining = self.interval;
    }

    /// Time left before exhaustion.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Value restored by [`Countdown::reset`].
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Amount removed per tick.
    #[must_use]
    pub const fn step(&self) -> Duration {
        self.step
    }

    /// `mm:ss` rendering of the remaining time.
    #[must_use]
    pub fn display(&self) -> String {
        format_countdown(self.remaining)
    }
}

/// Format `remaining` as `mm:ss`.
///
/// Sub-second remainders are truncated. Minutes are not capped at 59.
#[must_use]
pub fn format_countdown(remaining: Duration) -> String {
    let total_seconds = remaining.as_secs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

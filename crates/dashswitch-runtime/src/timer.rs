#![forbid(unsafe_code)]

//! Restartable periodic tick source built on one-shot host timers.
//!
//! A [`TimerControl`] owns at most one pending host timer. Hosts only offer
//! one-shot firings, so repetition is implemented by re-arming inside
//! [`TimerControl::fire`]. Every (re)arm issues a fresh [`TimerId`]; firings
//! that arrive for a superseded id are ignored.

use core::time::Duration;

use dashswitch_backend::{HostTimers, TimerId};

/// Whether the control re-arms itself after a firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Fire once, then disarm.
    Once,
    /// Re-arm with the period after every firing.
    Repeat,
}

/// A restartable, pausable tick source.
#[derive(Debug, Clone)]
pub struct TimerControl {
    mode: TimerMode,
    period: Duration,
    armed: Option<TimerId>,
}

impl TimerControl {
    /// Create an unarmed control.
    #[must_use]
    pub const fn new(mode: TimerMode) -> Self {
        Self {
            mode,
            period: Duration::ZERO,
            armed: None,
        }
    }

    /// Repeating control, the common case.
    #[must_use]
    pub const fn repeating() -> Self {
        Self::new(TimerMode::Repeat)
    }

    /// Arm a firing after `interval`, cancelling any pending one.
    pub fn start<T: HostTimers + ?Sized>(&mut self, timers: &mut T, interval: Duration) {
        self.start_after(timers, interval, interval);
    }

    /// Arm the first firing after `first_delay`; later firings use `period`.
    pub fn start_after<T: HostTimers + ?Sized>(
        &mut self,
        timers: &mut T,
        first_delay: Duration,
        period: Duration,
    ) {
        self.stop(timers);
        self.period = period;
        let id = timers.schedule(first_delay);
        tracing::trace!(
            timer = id.as_raw(),
            delay_ms = first_delay.as_millis() as u64,
            period_ms = period.as_millis() as u64,
            "armed"
        );
        self.armed = Some(id);
    }

    /// Cancel the pending firing. Idempotent.
    pub fn stop<T: HostTimers + ?Sized>(&mut self, timers: &mut T) {
        if let Some(id) = self.armed.take() {
            timers.cancel(id);
            tracing::trace!(timer = id.as_raw(), "disarmed");
        }
    }

    /// Stop, then start with a (possibly new) interval.
    pub fn restart<T: HostTimers + ?Sized>(&mut self, timers: &mut T, interval: Duration) {
        self.stop(timers);
        self.start(timers, interval);
    }

    /// Handle a host firing.
    ///
    /// Returns `true` if `id` is the currently armed handle. In
    /// [`TimerMode::Repeat`] the control re-arms before returning.
    pub fn fire<T: HostTimers + ?Sized>(&mut self, timers: &mut T, id: TimerId) -> bool {
        if self.armed != Some(id) {
            return false;
        }
        self.armed = None;
        if self.mode == TimerMode::Repeat {
            self.armed = Some(timers.schedule(self.period));
        }
        true
    }

    /// Whether a firing is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Whether `id` is the pending handle.
    #[must_use]
    pub fn owns(&self, id: TimerId) -> bool {
        self.armed == Some(id)
    }

    /// Period used when re-arming.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Whether firings re-arm.
    #[must_use]
    pub const fn mode(&self) -> TimerMode {
        self.mode
    }
}

impl Default for TimerControl {
    fn default() -> Self {
        Self::repeating()
    }
}

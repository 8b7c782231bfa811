#![forbid(unsafe_code)]

//! Cycles the page through named views (dashboards) on a timer.
//!
//! # State machine
//!
//! ```text
//!            start (views non-empty, interval > 0)
//!   Idle ───────────────────────────────────────────▶ Running
//!     │                                                 │  ▲
//!     │ start_loop                            stop_loop │  │ start_loop / resume_loop
//!     └────────────────────────▶ Running      Stopped ◀─┘  │
//!                                                 └────────┘
//! ```
//!
//! Each firing advances the current index circularly and navigates the host
//! to `/<view>`. The timer re-arms with the same interval, so rotation
//! continues unattended until [`ViewRotator::stop_loop`].

use core::fmt;
use core::time::Duration;

use dashswitch_backend::{Host, HostNavigator, HostTimers, TimerId};

use crate::timer::TimerControl;

/// Identifier of one view, unique within a configured sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewName(String);

impl ViewName {
    /// Wrap a view identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The bare identifier, without the leading `/`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Navigation target for this view.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.0)
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ViewName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ViewName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ViewName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Lifecycle phase of a [`ViewRotator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationPhase {
    /// Never started, or permanently disabled (no views).
    Idle,
    /// Timer armed; rotation in progress.
    Running,
    /// Timer cancelled; position retained.
    Stopped,
}

/// Rotates through an ordered sequence of views.
#[derive(Debug, Clone)]
pub struct ViewRotator {
    views: Vec<ViewName>,
    current_index: usize,
    phase: RotationPhase,
    interval: Duration,
    timer: TimerControl,
}

impl ViewRotator {
    /// Create a rotator positioned at `current`.
    ///
    /// An unknown `current` falls back to the first view.
    #[must_use]
    pub fn new(views: Vec<ViewName>, current: &str) -> Self {
        let current_index = match views.iter().position(|v| v.as_str() == current) {
            Some(index) => index,
            None => {
                if let Some(first) = views.first() {
                    tracing::debug!(
                        requested = current,
                        fallback = first.as_str(),
                        "current view not configured; using first view"
                    );
                }
                0
            }
        };
        Self {
            views,
            current_index,
            phase: RotationPhase::Idle,
            interval: Duration::ZERO,
            timer: TimerControl::repeating(),
        }
    }

    /// Begin unattended rotation from Idle.
    ///
    /// No-op when there are no views, when `interval` is zero, or when the
    /// rotator already left Idle.
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H, interval: Duration) {
        if self.phase != RotationPhase::Idle {
            tracing::debug!(phase = ?self.phase, "start ignored; rotator already started");
            return;
        }
        if self.views.is_empty() {
            tracing::debug!("no views configured; rotation stays idle");
            return;
        }
        if interval.is_zero() {
            tracing::warn!("zero rotation interval; rotation stays idle");
            return;
        }
        tracing::debug!(
            views = self.views.len(),
            current = self.views[self.current_index].as_str(),
            interval_ms = interval.as_millis() as u64,
            "view rotation started"
        );
        self.start_loop(host.timers(), interval);
    }

    /// Cancel the pending firing, keeping the current position. Idempotent.
    pub fn stop_loop<T: HostTimers + ?Sized>(&mut self, timers: &mut T) {
        self.timer.stop(timers);
        if self.phase == RotationPhase::Running {
            self.phase = RotationPhase::Stopped;
            tracing::debug!(index = self.current_index, "view rotation stopped");
        }
    }

    /// Re-arm rotation with `interval` from Stopped or Idle.
    pub fn start_loop<T: HostTimers + ?Sized>(&mut self, timers: &mut T, interval: Duration) {
        if self.views.is_empty() || interval.is_zero() {
            return;
        }
        self.interval = interval;
        self.timer.start(timers, interval);
        self.phase = RotationPhase::Running;
    }

    /// Re-arm rotation with the first firing after `first_delay`.
    ///
    /// Later firings use the interval recorded by the last start. A zero
    /// delay is replaced by the full interval.
    pub fn resume_loop<T: HostTimers + ?Sized>(&mut self, timers: &mut T, first_delay: Duration) {
        if self.views.is_empty() || self.interval.is_zero() {
            return;
        }
        let delay = if first_delay.is_zero() {
            self.interval
        } else {
            first_delay
        };
        self.timer.start_after(timers, delay, self.interval);
        self.phase = RotationPhase::Running;
        tracing::debug!(
            delay_ms = delay.as_millis() as u64,
            interval_ms = self.interval.as_millis() as u64,
            "view rotation resumed"
        );
    }

    /// Handle a timer firing; returns the view navigated to when `id` was ours.
    pub fn on_timer<H: Host + ?Sized>(&mut self, host: &mut H, id: TimerId) -> Option<ViewName> {
        if !self.timer.fire(host.timers(), id) {
            return None;
        }
        self.current_index = (self.current_index + 1) % self.views.len();
        let target = self.views[self.current_index].clone();
        tracing::info!(view = target.as_str(), index = self.current_index, "rotating to view");
        host.navigator().navigate(&target.path());
        Some(target)
    }

    /// Move to the next view now and navigate there.
    ///
    /// While running, the pending firing is re-armed for a full interval
    /// from now. A stopped rotator stays stopped.
    pub fn skip_to_next<H: Host + ?Sized>(&mut self, host: &mut H) -> Option<ViewName> {
        if self.views.is_empty() {
            return None;
        }
        self.current_index = (self.current_index + 1) % self.views.len();
        let target = self.views[self.current_index].clone();
        if self.phase == RotationPhase::Running {
            self.timer.start(host.timers(), self.interval);
        }
        tracing::info!(view = target.as_str(), index = self.current_index, "skipping to view");
        host.navigator().navigate(&target.path());
        Some(target)
    }

    /// Whether `id` is this rotator's pending timer.
    #[must_use]
    pub fn owns_timer(&self, id: TimerId) -> bool {
        self.timer.owns(id)
    }

    /// View the page is currently on; `None` without views.
    #[must_use]
    pub fn current_name(&self) -> Option<&ViewName> {
        self.views.get(self.current_index)
    }

    /// View after the current one, wrapping past the last.
    #[must_use]
    pub fn next_name(&self) -> Option<&ViewName> {
        if self.views.is_empty() {
            return None;
        }
        self.views.get((self.current_index + 1) % self.views.len())
    }

    /// View before the current one, wrapping before the first.
    #[must_use]
    pub fn previous_name(&self) -> Option<&ViewName> {
        let len = self.views.len();
        if len == 0 {
            return None;
        }
        self.views.get((self.current_index + len - 1) % len)
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> RotationPhase {
        self.phase
    }

    /// Index of the current view in [`ViewRotator::views`].
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// Configured view sequence, empty when rotation is disabled.
    #[must_use]
    pub fn views(&self) -> &[ViewName] {
        &self.views
    }

    /// Interval recorded by the last start, zero if never started.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

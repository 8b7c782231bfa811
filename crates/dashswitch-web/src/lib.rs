#![forbid(unsafe_code)]

//! `dashswitch-web` provides a deterministic host for the dashswitch runtime.
//!
//! Design goals:
//! - **Host-driven time**: the embedding code advances a monotonic clock explicitly.
//! - **In-memory document**: elements, attributes, classes, and visibility without a browser.
//! - **No blocking / no threads**: timer firings are delivered in due order by [`SimPage`].
//!
//! The same types back the runtime's own unit tests and can replay a page
//! session without wall-clock waits.

pub mod document;
pub mod page;

use core::time::Duration;
use std::collections::{BTreeMap, HashMap, VecDeque};

use dashswitch_backend::{ElementId, Host, HostNavigator, HostTimers, TimerId};

pub use document::SimDocument;
pub use page::SimPage;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }
}

/// One-shot timer queue ordered by due time, then issue order.
#[derive(Debug, Default, Clone)]
pub struct SimTimers {
    clock: DeterministicClock,
    next_id: u64,
    queue: BTreeMap<(Duration, u64), TimerId>,
    due_by_id: HashMap<TimerId, Duration>,
}

impl SimTimers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Due time of the earliest pending timer.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Pop the earliest timer due at or before `deadline`.
    ///
    /// The clock moves forward to the timer's due time.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<TimerId> {
        let (&(due, seq), _) = self.queue.iter().next()?;
        if due > deadline {
            return None;
        }
        let id = self.queue.remove(&(due, seq))?;
        self.due_by_id.remove(&id);
        if due > self.clock.now() {
            self.clock.set(due);
        }
        Some(id)
    }

    /// Move the clock forward to `now` without firing anything.
    pub fn advance_to(&mut self, now: Duration) {
        if now > self.clock.now() {
            self.clock.set(now);
        }
    }

    /// Pending timer ids in firing order.
    #[must_use]
    pub fn pending_ids(&self) -> Vec<TimerId> {
        self.queue.values().copied().collect()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }
}

impl HostTimers for SimTimers {
    fn now_mono(&self) -> Duration {
        self.clock.now()
    }

    fn schedule(&mut self, delay: Duration) -> TimerId {
        let seq = self.next_id;
        self.next_id += 1;
        let id = TimerId::from_raw(seq);
        let due = self.clock.now().saturating_add(delay);
        self.queue.insert((due, seq), id);
        self.due_by_id.insert(id, due);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.due_by_id.remove(&id) {
            Some(due) => self.queue.remove(&(due, id.as_raw())).is_some(),
            None => false,
        }
    }
}

/// Current location plus every navigation performed.
#[derive(Debug, Clone)]
pub struct SimNavigator {
    path: String,
    history: Vec<String>,
}

impl SimNavigator {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            history: Vec::new(),
        }
    }

    /// Paths navigated to, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl HostNavigator for SimNavigator {
    fn location_path(&self) -> String {
        self.path.clone()
    }

    fn navigate(&mut self, path: &str) {
        #[cfg(feature = "tracing")]
        tracing::debug!(from = self.path.as_str(), to = path, "navigate");
        self.path = path.to_owned();
        self.history.push(path.to_owned());
    }
}

/// In-memory host: timers, document, navigator, and a click queue.
#[derive(Debug, Clone)]
pub struct SimHost {
    timers: SimTimers,
    document: SimDocument,
    navigator: SimNavigator,
    clicks: VecDeque<ElementId>,
}

impl SimHost {
    /// Host with an empty document at `location`.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self::with_document(location, SimDocument::new())
    }

    /// Host over a prepared document at `location`.
    #[must_use]
    pub fn with_document(location: impl Into<String>, document: SimDocument) -> Self {
        Self {
            timers: SimTimers::new(),
            document,
            navigator: SimNavigator::new(location),
            clicks: VecDeque::new(),
        }
    }

    pub fn timers_mut(&mut self) -> &mut SimTimers {
        &mut self.timers
    }

    #[must_use]
    pub fn timers_ref(&self) -> &SimTimers {
        &self.timers
    }

    pub fn document_mut(&mut self) -> &mut SimDocument {
        &mut self.document
    }

    /// Queue a click for delivery.
    pub fn push_click(&mut self, element: ElementId) {
        self.clicks.push_back(element);
    }

    /// Drain all queued clicks.
    pub fn drain_clicks(&mut self) -> impl Iterator<Item = ElementId> + '_ {
        self.clicks.drain(..)
    }
}

impl Host for SimHost {
    type Timers = SimTimers;
    type Document = SimDocument;
    type Navigator = SimNavigator;

    fn timers(&mut self) -> &mut Self::Timers {
        &mut self.timers
    }

    fn document(&mut self) -> &mut Self::Document {
        &mut self.document
    }

    fn document_ref(&self) -> &Self::Document {
        &self.document
    }

    fn navigator(&mut self) -> &mut Self::Navigator {
        &mut self.navigator
    }

    fn navigator_ref(&self) -> &Self::Navigator {
        &self.navigator
    }
}

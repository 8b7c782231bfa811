#![forbid(unsafe_code)]

//! Cycles visibility among stacked sibling panes inside one container.
//!
//! The rotator starts on the second pane so a multi-pane container is
//! visibly distinct from a static one, then advances one pane per firing.

use core::time::Duration;

use dashswitch_backend::{ElementId, Host, HostDocument, HostTimers, TimerId};

use crate::timer::TimerControl;

/// Shows exactly one of N >= 2 panes at a time.
#[derive(Debug, Clone)]
pub struct PaneRotator {
    container: ElementId,
    panes: Vec<ElementId>,
    visible: usize,
    timer: TimerControl,
}

impl PaneRotator {
    /// Create a rotator for `panes`, or `None` when there are fewer than two.
    #[must_use]
    pub fn new(container: ElementId, panes: Vec<ElementId>) -> Option<Self> {
        if panes.len() < 2 {
            return None;
        }
        Some(Self {
            container,
            panes,
            visible: 0,
            timer: TimerControl::repeating(),
        })
    }

    /// Show the initial pane and arm the rotation timer.
    ///
    /// A zero interval shows the initial pane without arming anything.
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H, interval: Duration) {
        self.show_static(host.document());
        if interval.is_zero() {
            tracing::warn!(container = %self.container, "zero pane interval; panes stay static");
            return;
        }
        self.timer.start(host.timers(), interval);
        tracing::debug!(
            container = %self.container,
            panes = self.panes.len(),
            interval_ms = interval.as_millis() as u64,
            "pane rotation started"
        );
    }

    /// Show the initial pane and hide the others, without a timer.
    pub fn show_static<D: HostDocument + ?Sized>(&mut self, document: &mut D) {
        self.visible = 1.min(self.panes.len() - 1);
        self.render(document);
    }

    /// Handle a timer firing; returns `true` when `id` was ours.
    pub fn on_timer<H: Host + ?Sized>(&mut self, host: &mut H, id: TimerId) -> bool {
        if !self.timer.fire(host.timers(), id) {
            return false;
        }
        self.visible = (self.visible + 1) % self.panes.len();
        self.render(host.document());
        tracing::trace!(container = %self.container, visible = self.visible, "pane advanced");
        true
    }

    /// Cancel the rotation timer. Safe to call repeatedly.
    pub fn stop<T: HostTimers + ?Sized>(&mut self, timers: &mut T) {
        self.timer.stop(timers);
    }

    fn render<D: HostDocument + ?Sized>(&self, document: &mut D) {
        for pane in &self.panes {
            document.set_visible(*pane, false);
        }
        document.set_visible(self.panes[self.visible], true);
    }

    /// Whether `id` is this rotator's pending timer.
    #[must_use]
    pub fn owns_timer(&self, id: TimerId) -> bool {
        self.timer.owns(id)
    }

    /// Index of the pane currently shown.
    #[must_use]
    pub const fn visible_index(&self) -> usize {
        self.visible
    }

    /// Element of the pane currently shown.
    #[must_use]
    pub fn visible_pane(&self) -> ElementId {
        self.panes[self.visible]
    }

    /// Panes in document order.
    #[must_use]
    pub fn panes(&self) -> &[ElementId] {
        &self.panes
    }

    /// Element holding the panes.
    #[must_use]
    pub const fn container(&self) -> ElementId {
        self.container
    }

    /// Whether a rotation firing is pending.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.timer.is_armed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashswitch_web::SimHost;

    const FIVE_SECONDS: Duration = Duration::from_secs(5);

    fn container_with_panes(host: &mut SimHost, count: usize) -> (ElementId, Vec<ElementId>) {
        let doc = host.document_mut();
        let root = doc.root();
        let container = doc.append(root, "li");
        let panes = (0..count).map(|_| doc.append(container, "div")).collect();
        (container, panes)
    }

    fn visible(host: &SimHost, panes: &[ElementId]) -> Vec<bool> {
        panes
            .iter()
            .map(|pane| host.document_ref().is_visible(*pane))
            .collect()
    }

    #[test]
    fn fewer_than_two_panes_is_rejected() {
        let mut host = SimHost::new("/");
        let (container, panes) = container_with_panes(&mut host, 1);
        assert!(PaneRotator::new(container, panes).is_none());
        assert!(PaneRotator::new(container, Vec::new()).is_none());
    }

    #[test]
    fn starts_on_second_pane() {
        let mut host = SimHost::new("/");
        let (container, panes) = container_with_panes(&mut host, 3);
        let mut rotator = PaneRotator::new(container, panes.clone()).expect("rotator");
        rotator.start(&mut host, FIVE_SECONDS);
        assert_eq!(rotator.visible_index(), 1);
        assert_eq!(visible(&host, &panes), [false, true, false]);
    }

    #[test]
    fn cycles_with_period_equal_to_pane_count() {
        let mut host = SimHost::new("/");
        let (container, panes) = container_with_panes(&mut host, 3);
        let mut rotator = PaneRotator::new(container, panes.clone()).expect("rotator");
        rotator.start(&mut host, FIVE_SECONDS);

        let mut seen = Vec::new();
        for _ in 0..3 {
            let id = host.timers_mut().pop_due(Duration::MAX).expect("due");
            assert!(rotator.on_timer(&mut host, id));
            seen.push(visible(&host, &panes));
        }
        assert_eq!(
            seen,
            [
                vec![false, false, true],
                vec![true, false, false],
                vec![false, true, false],
            ]
        );
    }

    #[test]
    fn zero_interval_shows_one_pane_without_timer() {
        let mut host = SimHost::new("/");
        let (container, panes) = container_with_panes(&mut host, 3);
        let mut rotator = PaneRotator::new(container, panes.clone()).expect("rotator");
        rotator.start(&mut host, Duration::ZERO);
        assert!(!rotator.is_running());
        assert_eq!(host.timers_mut().pending_count(), 0);
        assert_eq!(visible(&host, &panes), [false, true, false]);
    }

    #[test]
    fn stop_twice_is_harmless() {
        let mut host = SimHost::new("/");
        let (container, panes) = container_with_panes(&mut host, 2);
        let mut rotator = PaneRotator::new(container, panes).expect("rotator");
        rotator.stop(host.timers_mut());
        rotator.start(&mut host, FIVE_SECONDS);
        rotator.stop(host.timers_mut());
        rotator.stop(host.timers_mut());
        assert!(!rotator.is_running());
        assert_eq!(host.timers_mut().pending_count(), 0);
    }
}

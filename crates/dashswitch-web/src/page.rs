#![forbid(unsafe_code)]

//! Step-driven page: a [`SimHost`] plus the [`Switchboard`] mounted on it.
//!
//! [`SimPage::advance`] plays the host event loop forward: every timer due
//! within the window fires in order, including timers armed by earlier
//! firings in the same window.

use core::time::Duration;

use dashswitch_backend::{ElementId, Host, HostDocument, HostEvent};
use dashswitch_runtime::{Dispatch, SwitcherSettings, Switchboard};

use crate::{SimHost, SimNavigator};

/// A mounted page driven by explicit time steps and clicks.
#[derive(Debug, Clone)]
pub struct SimPage {
    host: SimHost,
    board: Switchboard,
}

impl SimPage {
    /// Mount the switchboard on `host` with default settings.
    #[must_use]
    pub fn mount(host: SimHost) -> Self {
        Self::mount_with(host, &SwitcherSettings::default())
    }

    /// Mount the switchboard on `host` with explicit settings.
    #[must_use]
    pub fn mount_with(mut host: SimHost, settings: &SwitcherSettings) -> Self {
        let board = Switchboard::mount(&mut host, settings);
        Self { host, board }
    }

    /// Fire every timer due within `dt`, then move the clock to the end of the window.
    ///
    /// Queued clicks are delivered before any timer.
    pub fn advance(&mut self, dt: Duration) -> Vec<Dispatch> {
        let mut dispatched = self.deliver_clicks();
        let deadline = self.host.timers_ref().now().saturating_add(dt);
        while let Some(id) = self.host.timers_mut().pop_due(deadline) {
            let outcome = self
                .board
                .handle_event(&mut self.host, HostEvent::TimerFired(id));
            #[cfg(feature = "tracing")]
            tracing::trace!(timer = id.as_raw(), ?outcome, "dispatched");
            dispatched.push(outcome);
        }
        self.host.timers_mut().advance_to(deadline);
        dispatched
    }

    /// Deliver a click on `element` immediately.
    pub fn click(&mut self, element: ElementId) -> Dispatch {
        self.board
            .handle_event(&mut self.host, HostEvent::Click(element))
    }

    /// Click the element with the given id attribute, if present.
    pub fn click_id(&mut self, id: &str) -> Option<Dispatch> {
        let element = self.host.document_ref().element_by_id(id)?;
        Some(self.click(element))
    }

    fn deliver_clicks(&mut self) -> Vec<Dispatch> {
        let clicks: Vec<ElementId> = self.host.drain_clicks().collect();
        clicks
            .into_iter()
            .map(|element| self.click(element))
            .collect()
    }

    /// Stop every timer.
    pub fn shutdown(&mut self) {
        self.board.shutdown(&mut self.host);
    }

    /// Current simulated time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.host.timers_ref().now()
    }

    #[must_use]
    pub fn host(&self) -> &SimHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut SimHost {
        &mut self.host
    }

    /// The mounted switchboard.
    #[must_use]
    pub fn board(&self) -> &Switchboard {
        &self.board
    }

    #[must_use]
    pub fn navigator(&self) -> &SimNavigator {
        self.host.navigator_ref()
    }

    /// Paths navigated to since mount.
    #[must_use]
    pub fn navigations(&self) -> &[String] {
        self.navigator().history()
    }

    /// Text of the element with the given id attribute.
    #[must_use]
    pub fn text_of(&self, id: &str) -> Option<String> {
        let document = self.host.document_ref();
        document
            .element_by_id(id)
            .map(|element| document.text(element))
    }
}

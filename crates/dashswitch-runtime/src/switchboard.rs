#![forbid(unsafe_code)]

//! Page-level wiring of pane rotators, the view rotator, and controls.
//!
//! The host constructs a [`Switchboard`] once the page is ready and feeds it
//! every [`HostEvent`]. Events are handled to completion one at a time.
//!
//! # Mount order
//!
//! 1. Resolve [`PageConfig`] from the document and location.
//! 2. Start a [`PaneRotator`] per multi-pane container.
//! 3. Create the [`ViewRotator`]; if the controls mount point exists, start
//!    the [`RotationControls`] first.
//! 4. Start the view rotation.

use dashswitch_backend::{ElementId, Host, HostEvent, TimerId};

use crate::config::{PageConfig, SwitcherSettings};
use crate::controls::RotationControls;
use crate::pane_rotator::PaneRotator;
use crate::view_rotator::{ViewName, ViewRotator};

/// What a dispatched event ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The view rotator navigated to a view.
    Rotated(ViewName),
    /// A pane container advanced.
    PaneAdvanced(ElementId),
    /// The countdown ticked.
    CountdownTicked,
    /// A control was clicked.
    ControlClicked(ElementId),
    /// No component claimed the event.
    Ignored,
}

/// Owns every rotation component on one page.
#[derive(Debug, Clone)]
pub struct Switchboard {
    config: PageConfig,
    view_rotator: ViewRotator,
    pane_rotators: Vec<PaneRotator>,
    controls: Option<RotationControls>,
}

impl Switchboard {
    /// Resolve configuration from the host and start every component.
    ///
    /// Invalid settings are replaced by [`SwitcherSettings::default`].
    pub fn mount<H: Host + ?Sized>(host: &mut H, settings: &SwitcherSettings) -> Self {
        let errors = settings.validate();
        let config = if errors.is_empty() {
            PageConfig::resolve(host, settings)
        } else {
            tracing::warn!(?errors, "invalid switcher settings; using defaults");
            PageConfig::resolve(host, &SwitcherSettings::default())
        };
        Self::with_config(host, config)
    }

    /// Start every component from an already resolved configuration.
    pub fn with_config<H: Host + ?Sized>(host: &mut H, config: PageConfig) -> Self {
        let mut pane_rotators = Vec::with_capacity(config.panes.len());
        for group in &config.panes {
            let Some(mut rotator) = PaneRotator::new(group.container, group.panes.clone()) else {
                continue;
            };
            match group.interval {
                Some(interval) => rotator.start(host, interval),
                None => {
                    tracing::debug!(container = %group.container, "pane rotation disabled");
                    rotator.show_static(host.document());
                }
            }
            pane_rotators.push(rotator);
        }

        let mut view_rotator =
            ViewRotator::new(config.rotation.views.clone(), &config.current_view);

        let mut controls = None;
        if let Some(interval) = config.rotation.interval {
            if !config.rotation.views.is_empty() {
                let mut candidate = RotationControls::from_config(
                    config.controls.as_ref(),
                    interval,
                    config.countdown_step,
                );
                if candidate.present() {
                    candidate.start(host);
                    controls = Some(candidate);
                }
            }
            view_rotator.start(host, interval);
        } else {
            tracing::debug!("view rotation disabled");
        }

        Self {
            config,
            view_rotator,
            pane_rotators,
            controls,
        }
    }

    /// Route one host event to the component that owns it.
    pub fn handle_event<H: Host + ?Sized>(&mut self, host: &mut H, event: HostEvent) -> Dispatch {
        match event {
            HostEvent::TimerFired(id) => self.on_timer(host, id),
            HostEvent::Click(element) => self.on_click(host, element),
        }
    }

    fn on_timer<H: Host + ?Sized>(&mut self, host: &mut H, id: TimerId) -> Dispatch {
        if let Some(view) = self.view_rotator.on_timer(host, id) {
            return Dispatch::Rotated(view);
        }
        if let Some(controls) = self.controls.as_mut() {
            if controls.on_timer(host, &self.view_rotator, id) {
                return Dispatch::CountdownTicked;
            }
        }
        for rotator in &mut self.pane_rotators {
            if rotator.on_timer(host, id) {
                return Dispatch::PaneAdvanced(rotator.container());
            }
        }
        tracing::trace!(timer = id.as_raw(), "stale timer ignored");
        Dispatch::Ignored
    }

    fn on_click<H: Host + ?Sized>(&mut self, host: &mut H, element: ElementId) -> Dispatch {
        if let Some(controls) = self.controls.as_mut() {
            if controls.on_click(host, &mut self.view_rotator, element) {
                return Dispatch::ControlClicked(element);
            }
        }
        Dispatch::Ignored
    }

    /// Stop every timer. Idempotent.
    pub fn shutdown<H: Host + ?Sized>(&mut self, host: &mut H) {
        let timers = host.timers();
        self.view_rotator.stop_loop(timers);
        if let Some(controls) = self.controls.as_mut() {
            controls.stop(timers);
        }
        for rotator in &mut self.pane_rotators {
            rotator.stop(timers);
        }
        tracing::debug!("switchboard shut down");
    }

    /// Configuration resolved at mount.
    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// The page's view rotator.
    #[must_use]
    pub fn view_rotator(&self) -> &ViewRotator {
        &self.view_rotator
    }

    /// One rotator per multi-pane container.
    #[must_use]
    pub fn pane_rotators(&self) -> &[PaneRotator] {
        &self.pane_rotators
    }

    /// Rotation controls, when the page has a mount point and rotation is enabled.
    #[must_use]
    pub fn controls(&self) -> Option<&RotationControls> {
        self.controls.as_ref()
    }
}

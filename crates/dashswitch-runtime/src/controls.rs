#![forbid(unsafe_code)]

//! Manual rotation controls: countdown, skip, and pause/resume.
//!
//! The controls render into a single mount point. Without one they are
//! inert: [`RotationControls::present`] is `false` and every other
//! operation is a no-op.
//!
//! The countdown runs on its own timer, independent of the
//! [`ViewRotator`]'s timer. Both start together and nominally agree, but
//! they may drift apart over many cycles.

use core::time::Duration;

use dashswitch_backend::{ElementId, Host, HostDocument, HostNavigator, HostTimers, TimerId};

use crate::config::{ControlLabels, ControlsConfig};
use crate::countdown::{Countdown, CountdownTick};
use crate::timer::TimerControl;
use crate::view_rotator::ViewRotator;

/// Id of the next-view label.
pub const NEXT_NAME_ID: &str = "dc-switcher-next-name";
/// Id of the `mm:ss` countdown.
pub const COUNTDOWN_ID: &str = "dc-switcher-countdown";
/// Id of the skip control.
pub const SKIP_ID: &str = "dc-switcher-next";
/// Id of the pause/resume control.
pub const PAUSE_ID: &str = "dc-switcher-pause-reset";

const ICON_CLASS: &str = "fa";
const SKIP_ICON: &str = "fa-forward";
const PAUSE_ICON: &str = "fa-pause";
const PLAY_ICON: &str = "fa-play";

#[derive(Debug, Clone, Copy)]
struct Rendered {
    next_name: ElementId,
    countdown: ElementId,
    skip: ElementId,
    pause: ElementId,
}

/// Countdown display and manual overrides bound to one [`ViewRotator`].
#[derive(Debug, Clone)]
pub struct RotationControls {
    mount: Option<ElementId>,
    labels: ControlLabels,
    countdown: Countdown,
    timer: TimerControl,
    running: bool,
    rendered: Option<Rendered>,
}

impl RotationControls {
    /// Create controls for `mount`; `None` yields inert controls.
    #[must_use]
    pub fn new(
        mount: Option<ElementId>,
        interval: Duration,
        step: Duration,
        labels: ControlLabels,
    ) -> Self {
        Self {
            mount,
            labels,
            countdown: Countdown::new(interval, step),
            timer: TimerControl::repeating(),
            running: false,
            rendered: None,
        }
    }

    /// Build from resolved page configuration.
    #[must_use]
    pub fn from_config(config: Option<&ControlsConfig>, interval: Duration, step: Duration) -> Self {
        match config {
            Some(config) => Self::new(Some(config.mount), interval, step, config.labels.clone()),
            None => Self::new(None, interval, step, ControlLabels::default()),
        }
    }

    /// Whether a mount point exists.
    #[must_use]
    pub const fn present(&self) -> bool {
        self.mount.is_some()
    }

    /// Render the controls and start the countdown tick.
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H) {
        let Some(mount) = self.mount else {
            return;
        };
        if self.rendered.is_none() {
            self.rendered = Some(self.render(host.document(), mount));
        }
        if self.countdown.step().is_zero() {
            tracing::warn!("zero countdown step; countdown stays static");
            self.render_pause_state(host.document());
            return;
        }
        self.running = true;
        self.timer.start(host.timers(), self.countdown.step());
        tracing::debug!(
            interval_ms = self.countdown.interval().as_millis() as u64,
            "rotation controls started"
        );
    }

    fn render<D: HostDocument + ?Sized>(&self, document: &mut D, mount: ElementId) -> Rendered {
        let next_name = document.create_element(mount, "span", Some(NEXT_NAME_ID));
        let countdown = document.create_element(mount, "span", Some(COUNTDOWN_ID));

        let skip = document.create_element(mount, "span", Some(SKIP_ID));
        document.add_class(skip, ICON_CLASS);
        document.add_class(skip, SKIP_ICON);
        document.set_text(skip, &self.labels.next_arrow);

        let pause = document.create_element(mount, "span", Some(PAUSE_ID));
        document.add_class(pause, ICON_CLASS);
        document.add_class(pause, PAUSE_ICON);
        document.set_text(pause, &self.labels.stop_label);

        Rendered {
            next_name,
            countdown,
            skip,
            pause,
        }
    }

    /// Handle a timer firing; returns `true` when `id` was the countdown tick.
    pub fn on_timer<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        rotator: &ViewRotator,
        id: TimerId,
    ) -> bool {
        if !self.timer.fire(host.timers(), id) {
            return false;
        }
        self.refresh(host.document(), rotator);
        match self.countdown.tick() {
            CountdownTick::Counted => {}
            CountdownTick::Exhausted => {
                // The rotator's own timer performs the view change.
                self.timer.stop(host.timers());
                self.countdown.reset();
                self.timer.start(host.timers(), self.countdown.step());
                tracing::debug!("countdown exhausted; restarted from full interval");
            }
        }
        true
    }

    fn refresh<D: HostDocument + ?Sized>(&self, document: &mut D, rotator: &ViewRotator) {
        let Some(rendered) = self.rendered else {
            return;
        };
        let next = rotator.next_name().map(|name| name.as_str()).unwrap_or_default();
        document.set_text(rendered.next_name, &self.labels.next_name_text(next));
        document.set_text(rendered.countdown, &self.countdown.display());
        tracing::trace!(next, remaining_ms = self.countdown.remaining().as_millis() as u64, "countdown refreshed");
    }

    /// Handle a click; returns `true` when it hit one of the controls.
    pub fn on_click<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        rotator: &mut ViewRotator,
        element: ElementId,
    ) -> bool {
        let Some(rendered) = self.rendered else {
            return false;
        };
        if element == rendered.skip {
            self.skip(host, rotator);
            true
        } else if element == rendered.pause {
            self.toggle_pause(host, rotator);
            true
        } else {
            false
        }
    }

    /// Navigate to the next view immediately, bypassing timers.
    ///
    /// The countdown restarts from the full interval. A paused page stays
    /// paused.
    pub fn skip<H: Host + ?Sized>(&mut self, host: &mut H, rotator: &mut ViewRotator) {
        let Some(next) = rotator.skip_to_next(host) else {
            return;
        };
        self.countdown.reset();
        if self.running {
            self.timer.start(host.timers(), self.countdown.step());
        }
        self.refresh(host.document(), rotator);
        tracing::info!(view = next.as_str(), "manual skip");
    }

    /// Pause when running, resume when paused.
    pub fn toggle_pause<H: Host + ?Sized>(&mut self, host: &mut H, rotator: &mut ViewRotator) {
        if !self.present() {
            return;
        }
        if self.running {
            self.timer.stop(host.timers());
            rotator.stop_loop(host.timers());
            self.running = false;
            tracing::info!(
                remaining_ms = self.countdown.remaining().as_millis() as u64,
                "rotation paused"
            );
        } else {
            if self.countdown.step().is_zero() {
                return;
            }
            rotator.resume_loop(host.timers(), self.countdown.remaining());
            self.timer.start(host.timers(), self.countdown.step());
            self.running = true;
            tracing::info!(
                remaining_ms = self.countdown.remaining().as_millis() as u64,
                "rotation resumed"
            );
        }
        self.render_pause_state(host.document());
    }

    fn render_pause_state<D: HostDocument + ?Sized>(&self, document: &mut D) {
        let Some(rendered) = self.rendered else {
            return;
        };
        let (remove, add, label) = if self.running {
            (PLAY_ICON, PAUSE_ICON, &self.labels.stop_label)
        } else {
            (PAUSE_ICON, PLAY_ICON, &self.labels.start_label)
        };
        document.remove_class(rendered.pause, remove);
        document.add_class(rendered.pause, add);
        document.set_text(rendered.pause, label);
    }

    /// Cancel the countdown tick. Idempotent.
    pub fn stop<T: HostTimers + ?Sized>(&mut self, timers: &mut T) {
        self.timer.stop(timers);
    }

    /// Whether the countdown and rotation are running (not paused).
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Time left on the countdown.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.countdown.remaining()
    }

    /// Countdown state.
    #[must_use]
    pub const fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Whether `id` is the pending countdown tick.
    #[must_use]
    pub fn owns_timer(&self, id: TimerId) -> bool {
        self.timer.owns(id)
    }

    /// Mount point, if the page has one.
    #[must_use]
    pub const fn mount(&self) -> Option<ElementId> {
        self.mount
    }

    /// Resolved control labels.
    #[must_use]
    pub fn labels(&self) -> &ControlLabels {
        &self.labels
    }

    /// Skip control element, once rendered.
    #[must_use]
    pub fn skip_element(&self) -> Option<ElementId> {
        self.rendered.map(|rendered| rendered.skip)
    }

    /// Pause control element, once rendered.
    #[must_use]
    pub fn pause_element(&self) -> Option<ElementId> {
        self.rendered.map(|rendered| rendered.pause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view_rotator::{RotationPhase, ViewName};
    use dashswitch_web::SimHost;

    const INTERVAL: Duration = Duration::from_secs(3);
    const STEP: Duration = Duration::from_secs(1);

    struct Fixture {
        host: SimHost,
        rotator: ViewRotator,
        controls: RotationControls,
    }

    fn fixture() -> Fixture {
        let mut host = SimHost::new("/a");
        let doc = host.document_mut();
        let root = doc.root();
        let mount = doc.append_with_id(root, "div", "dc-switcher-controls");
        let views = vec![ViewName::from("a"), ViewName::from("b")];
        let mut rotator = ViewRotator::new(views, "a");
        let mut controls =
            RotationControls::new(Some(mount), INTERVAL, STEP, ControlLabels::default());
        controls.start(&mut host);
        rotator.start(&mut host, INTERVAL);
        Fixture {
            host,
            rotator,
            controls,
        }
    }

    impl Fixture {
        fn fire_countdown(&mut self) {
            let id = self.host.timers_mut().pending_ids()
                .into_iter()
                .find(|id| self.controls.owns_timer(*id))
                .expect("countdown armed");
            assert!(self.controls.on_timer(&mut self.host, &self.rotator, id));
        }

        fn text_of(&self, id: &str) -> String {
            let doc = self.host.document_ref();
            doc.text(doc.element_by_id(id).expect("element"))
        }
    }

    #[test]
    fn absent_mount_is_inert() {
        let mut host = SimHost::new("/a");
        let mut rotator = ViewRotator::new(vec![ViewName::from("a"), ViewName::from("b")], "a");
        let mut controls = RotationControls::new(None, INTERVAL, STEP, ControlLabels::default());
        assert!(!controls.present());
        controls.start(&mut host);
        controls.toggle_pause(&mut host, &mut rotator);
        assert!(!controls.is_running());
        assert_eq!(host.timers_mut().pending_count(), 0);
        assert!(controls.skip_element().is_none());
    }

    #[test]
    fn start_renders_controls() {
        let fx = fixture();
        assert!(fx.controls.present());
        assert!(fx.controls.is_running());
        let doc = fx.host.document_ref();
        let pause = doc.element_by_id(PAUSE_ID).expect("pause");
        assert!(doc.has_class(pause, "fa"));
        assert!(doc.has_class(pause, PAUSE_ICON));
        assert_eq!(doc.text(pause), "stop timer");
        let skip = doc.element_by_id(SKIP_ID).expect("skip");
        assert!(doc.has_class(skip, SKIP_ICON));
    }

    #[test]
    fn tick_refreshes_label_and_countdown() {
        let mut fx = fixture();
        fx.fire_countdown();
        assert_eq!(fx.text_of(NEXT_NAME_ID), "Next dashboard: b in ");
        assert_eq!(fx.text_of(COUNTDOWN_ID), "00:03");
        assert_eq!(fx.controls.remaining(), Duration::from_secs(2));
    }

    #[test]
    fn exhaustion_resets_once_and_keeps_running() {
        let mut fx = fixture();
        for _ in 0..3 {
            fx.fire_countdown();
        }
        assert_eq!(fx.controls.remaining(), Duration::ZERO);

        fx.fire_countdown();
        assert_eq!(fx.text_of(COUNTDOWN_ID), "00:00");
        assert_eq!(fx.controls.remaining(), INTERVAL);
        assert!(fx.controls.is_running());
        assert!(fx.controls.timer.is_armed());
        assert_eq!(fx.rotator.phase(), RotationPhase::Running);
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let mut fx = fixture();
        fx.fire_countdown();
        let frozen = fx.controls.remaining();

        fx.controls.toggle_pause(&mut fx.host, &mut fx.rotator);
        assert!(!fx.controls.is_running());
        assert_eq!(fx.rotator.phase(), RotationPhase::Stopped);
        assert_eq!(fx.host.timers_mut().pending_count(), 0);
        assert_eq!(fx.controls.remaining(), frozen);
        let doc = fx.host.document_ref();
        let pause = doc.element_by_id(PAUSE_ID).expect("pause");
        assert!(doc.has_class(pause, PLAY_ICON));
        assert!(!doc.has_class(pause, PAUSE_ICON));
        assert_eq!(doc.text(pause), "start timer");

        fx.controls.toggle_pause(&mut fx.host, &mut fx.rotator);
        assert!(fx.controls.is_running());
        assert_eq!(fx.rotator.phase(), RotationPhase::Running);
        assert_eq!(fx.controls.remaining(), frozen);
        assert_eq!(fx.host.timers_mut().pending_count(), 2);
        let doc = fx.host.document_ref();
        let pause = doc.element_by_id(PAUSE_ID).expect("pause");
        assert!(doc.has_class(pause, PAUSE_ICON));
        assert_eq!(doc.text(pause), "stop timer");
    }

    #[test]
    fn skip_click_navigates_to_next() {
        let mut fx = fixture();
        let skip = fx.controls.skip_element().expect("rendered");
        assert!(fx.controls.on_click(&mut fx.host, &mut fx.rotator, skip));
        assert_eq!(fx.host.navigator_ref().history(), ["/b"]);
        assert_eq!(fx.rotator.current_index(), 1);
    }

    #[test]
    fn skip_restarts_countdown_and_refreshes_label() {
        let mut fx = fixture();
        fx.fire_countdown();
        assert_eq!(fx.controls.remaining(), Duration::from_secs(2));

        fx.controls.skip(&mut fx.host, &mut fx.rotator);
        assert_eq!(fx.controls.remaining(), INTERVAL);
        assert_eq!(fx.text_of(NEXT_NAME_ID), "Next dashboard: a in ");
        assert_eq!(fx.text_of(COUNTDOWN_ID), "00:03");
        assert_eq!(fx.host.timers_mut().pending_count(), 2);
    }

    #[test]
    fn zero_step_leaves_countdown_static() {
        let mut host = SimHost::new("/a");
        let doc = host.document_mut();
        let root = doc.root();
        let mount = doc.append_with_id(root, "div", "dc-switcher-controls");
        let mut rotator = ViewRotator::new(vec![ViewName::from("a"), ViewName::from("b")], "a");
        let mut controls =
            RotationControls::new(Some(mount), INTERVAL, Duration::ZERO, ControlLabels::default());
        controls.start(&mut host);
        assert!(!controls.is_running());
        assert_eq!(host.timers_mut().pending_count(), 0);

        controls.toggle_pause(&mut host, &mut rotator);
        assert!(!controls.is_running());
        assert_eq!(host.timers_mut().pending_count(), 0);
    }

    #[test]
    fn unrelated_click_is_ignored() {
        let mut fx = fixture();
        let mount = fx.controls.mount().expect("mount");
        assert!(!fx.controls.on_click(&mut fx.host, &mut fx.rotator, mount));
        assert!(fx.controls.is_running());
    }
}

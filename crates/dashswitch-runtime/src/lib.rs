#![forbid(unsafe_code)]

//! dashswitch runtime
//!
//! Rotation scheduler for dashboard pages: cycles the page through named
//! views, cycles stacked widget panes inside containers, and exposes a
//! countdown with skip and pause/resume controls.
//!
//! # Key Components
//!
//! - [`TimerControl`] - Restartable periodic tick source over one-shot host timers
//! - [`PaneRotator`] - Shows one of several stacked panes at a time
//! - [`ViewRotator`] - Cycles through views and navigates the host
//! - [`RotationControls`] - Countdown, manual skip, pause/resume
//! - [`Switchboard`] - Wires everything for one page and routes host events
//!
//! # How it fits in the system
//! All platform access goes through the traits in `dashswitch-backend`.
//! A browser binding implements them over the DOM; `dashswitch-web`
//! implements them deterministically for tests and replay.

pub mod config;
pub mod controls;
pub mod countdown;
pub mod pane_rotator;
pub mod switchboard;
pub mod timer;
pub mod view_rotator;

pub use config::{
    ConfigError, ControlLabels, ControlsConfig, PageConfig, PaneGroupConfig, RotationConfig,
    SwitcherSettings, parse_interval, parse_view_list, view_from_path,
};
pub use controls::RotationControls;
pub use countdown::{Countdown, CountdownTick, format_countdown};
pub use pane_rotator::PaneRotator;
pub use switchboard::{Dispatch, Switchboard};
pub use timer::{TimerControl, TimerMode};
pub use view_rotator::{RotationPhase, ViewName, ViewRotator};

pub use dashswitch_backend::{ElementId, Host, HostEvent, TimerId};

#![forbid(unsafe_code)]

//! Switcher configuration.
//!
//! Two layers:
//!
//! - [`SwitcherSettings`]: host-independent knobs (defaults, selectors,
//!   attribute names). Loadable from TOML or JSON with the `config-file`
//!   feature.
//! - [`PageConfig`]: the immutable per-page configuration, resolved once
//!   from the document and location at mount time.
//!
//! # Loading
//!
//! ```toml
//! # dashswitch.toml
//! default_view_interval_ms = 30000
//! pane_container_selector = ".grid li"
//! ```
//!
//! ```rust,ignore
//! let settings = SwitcherSettings::from_toml_file("dashswitch.toml")?;
//! ```

use core::time::Duration;
use std::collections::HashSet;
#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use dashswitch_backend::{ElementId, Host, HostDocument, HostNavigator};

use crate::view_rotator::ViewName;

/// Placeholder replaced by the upcoming view name in the label template.
pub const NEXT_NAME_PLACEHOLDER: &str = "$nextName";

// ---------------------------------------------------------------------------
// SwitcherSettings
// ---------------------------------------------------------------------------

/// Host-independent switcher settings.
///
/// Every field has a default matching the stock dashboard page markup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct SwitcherSettings {
    /// View rotation interval when the page does not set one.
    pub default_view_interval_ms: u64,
    /// Pane rotation interval when a container does not set one.
    pub default_pane_interval_ms: u64,
    /// Countdown granularity.
    pub countdown_step_ms: u64,
    /// Selector of the element carrying the view list.
    pub view_list_selector: String,
    /// Attribute holding the comma/whitespace separated view list.
    pub view_list_attribute: String,
    /// Id of the page container carrying the view interval.
    pub page_container_id: String,
    /// Attribute holding an interval in milliseconds.
    pub interval_attribute: String,
    /// Selector of containers whose children rotate as panes.
    pub pane_container_selector: String,
    /// Tag of the children that count as panes.
    pub pane_tag: String,
    /// Id of the controls mount point.
    pub controls_mount_id: String,
}

impl Default for SwitcherSettings {
    fn default() -> Self {
        Self {
            default_view_interval_ms: 60_000,
            default_pane_interval_ms: 5_000,
            countdown_step_ms: 1_000,
            view_list_selector: "[data-switcher-dashboards]".into(),
            view_list_attribute: "data-switcher-dashboards".into(),
            page_container_id: "container".into(),
            interval_attribute: "data-switcher-interval".into(),
            pane_container_selector: ".gridster li".into(),
            pane_tag: "div".into(),
            controls_mount_id: "dc-switcher-controls".into(),
        }
    }
}

impl SwitcherSettings {
    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        settings.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        settings.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems. An empty list means the settings are valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.countdown_step_ms == 0 {
            errors.push("countdown_step_ms must be > 0".into());
        }

        let required = [
            ("view_list_selector", &self.view_list_selector),
            ("view_list_attribute", &self.view_list_attribute),
            ("page_container_id", &self.page_container_id),
            ("interval_attribute", &self.interval_attribute),
            ("pane_container_selector", &self.pane_container_selector),
            ("pane_tag", &self.pane_tag),
            ("controls_mount_id", &self.controls_mount_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                errors.push(format!("{name} must not be empty"));
            }
        }

        errors
    }

    /// Return `self` if valid, otherwise a [`ConfigError::Validation`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// `countdown_step_ms` as a [`Duration`].
    #[must_use]
    pub const fn countdown_step(&self) -> Duration {
        Duration::from_millis(self.countdown_step_ms)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading [`SwitcherSettings`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-file")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-page configuration
// ---------------------------------------------------------------------------

/// View sequence plus interval. `interval == None` disables rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationConfig {
    pub views: Vec<ViewName>,
    pub interval: Option<Duration>,
}

impl RotationConfig {
    /// Whether the view rotation will ever fire.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.views.is_empty() && self.interval.is_some()
    }
}

/// One multi-pane container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneGroupConfig {
    pub container: ElementId,
    pub panes: Vec<ElementId>,
    pub interval: Option<Duration>,
}

/// Text shown by the rotation controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlLabels {
    /// Next-view label; `$nextName` is replaced by the upcoming view.
    pub next_name_template: String,
    /// Content of the skip control.
    pub next_arrow: String,
    /// Pause control content while rotation runs.
    pub stop_label: String,
    /// Pause control content while rotation is paused.
    pub start_label: String,
}

impl Default for ControlLabels {
    fn default() -> Self {
        Self {
            next_name_template: format!("Next dashboard: {NEXT_NAME_PLACEHOLDER} in "),
            next_arrow: "\u{FFEB}".into(),
            stop_label: "stop timer".into(),
            start_label: "start timer".into(),
        }
    }
}

impl ControlLabels {
    /// Tag of the optional template child inside the mount point.
    pub const TEMPLATE_TAG: &'static str = "dashboard-name-template";
    /// Mount attribute overriding the next-view template.
    pub const TEMPLATE_ATTRIBUTE: &'static str = "data-next-name-template";
    /// Mount attribute overriding the skip control content.
    pub const ARROW_ATTRIBUTE: &'static str = "data-next-dashboard-content";
    /// Mount attribute overriding the pause label.
    pub const STOP_ATTRIBUTE: &'static str = "data-stop-timer-content";
    /// Mount attribute overriding the resume label.
    pub const START_ATTRIBUTE: &'static str = "data-start-timer-content";

    /// Resolve labels from the mount point, falling back to defaults.
    ///
    /// A `dashboard-name-template` child is consumed: its text becomes the
    /// template and the element is removed from the document.
    pub fn from_mount<D: HostDocument + ?Sized>(document: &mut D, mount: ElementId) -> Self {
        let defaults = Self::default();
        let read = |document: &D, name: &str| {
            document
                .attribute(mount, name)
                .filter(|value| !value.is_empty())
        };

        let template_element = document
            .children(mount)
            .into_iter()
            .find(|child| document.tag(*child).as_deref() == Some(Self::TEMPLATE_TAG));
        let next_name_template = match template_element {
            Some(element) => {
                let text = document.text(element);
                document.remove(element);
                text
            }
            None => read(&*document, Self::TEMPLATE_ATTRIBUTE)
                .unwrap_or(defaults.next_name_template),
        };

        Self {
            next_name_template,
            next_arrow: read(&*document, Self::ARROW_ATTRIBUTE).unwrap_or(defaults.next_arrow),
            stop_label: read(&*document, Self::STOP_ATTRIBUTE).unwrap_or(defaults.stop_label),
            start_label: read(&*document, Self::START_ATTRIBUTE).unwrap_or(defaults.start_label),
        }
    }

    /// Render the next-view label for `next`.
    #[must_use]
    pub fn next_name_text(&self, next: &str) -> String {
        self.next_name_template
            .replacen(NEXT_NAME_PLACEHOLDER, next, 1)
    }
}

/// Controls mount point and its labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsConfig {
    pub mount: ElementId,
    pub labels: ControlLabels,
}

/// Immutable per-page configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    /// View identity derived from the location path.
    pub current_view: String,
    pub rotation: RotationConfig,
    pub panes: Vec<PaneGroupConfig>,
    pub controls: Option<ControlsConfig>,
    pub countdown_step: Duration,
}

impl PageConfig {
    /// Read the page configuration once from the host.
    pub fn resolve<H: Host + ?Sized>(host: &mut H, settings: &SwitcherSettings) -> Self {
        let current_view = view_from_path(&host.navigator_ref().location_path()).to_owned();
        let document = host.document();

        let views = document
            .query_all(&settings.view_list_selector)
            .first()
            .and_then(|element| document.attribute(*element, &settings.view_list_attribute))
            .map(|raw| parse_view_list(&raw))
            .unwrap_or_default();

        let view_interval = parse_interval(
            document
                .element_by_id(&settings.page_container_id)
                .and_then(|container| document.attribute(container, &settings.interval_attribute))
                .as_deref(),
            settings.default_view_interval_ms,
        );

        let mut panes = Vec::new();
        for container in document.query_all(&settings.pane_container_selector) {
            let children: Vec<ElementId> = document
                .children(container)
                .into_iter()
                .filter(|child| document.tag(*child).as_deref() == Some(settings.pane_tag.as_str()))
                .collect();
            if children.len() < 2 {
                continue;
            }
            let interval = parse_interval(
                document
                    .attribute(container, &settings.interval_attribute)
                    .as_deref(),
                settings.default_pane_interval_ms,
            );
            panes.push(PaneGroupConfig {
                container,
                panes: children,
                interval,
            });
        }

        let controls = document
            .element_by_id(&settings.controls_mount_id)
            .map(|mount| ControlsConfig {
                mount,
                labels: ControlLabels::from_mount(document, mount),
            });

        tracing::debug!(
            current = current_view.as_str(),
            views = views.len(),
            pane_groups = panes.len(),
            controls = controls.is_some(),
            "page configuration resolved"
        );

        Self {
            current_view,
            rotation: RotationConfig {
                views,
                interval: view_interval,
            },
            panes,
            controls,
            countdown_step: settings.countdown_step(),
        }
    }
}

/// Split a comma/whitespace separated view list.
///
/// Duplicates are dropped (first occurrence wins). A list with fewer than
/// two names yields an empty sequence, which disables rotation.
#[must_use]
pub fn parse_view_list(raw: &str) -> Vec<ViewName> {
    let mut seen = HashSet::new();
    let mut views = Vec::new();
    for token in raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|token| !token.is_empty())
    {
        if seen.insert(token) {
            views.push(ViewName::new(token));
        } else {
            tracing::warn!(view = token, "duplicate view in rotation list; ignored");
        }
    }
    if views.len() < 2 {
        if !views.is_empty() {
            tracing::debug!("single view configured; rotation disabled");
        }
        return Vec::new();
    }
    views
}

/// Parse an interval attribute in milliseconds.
///
/// Absent => `default_ms`. Unparsable => `default_ms` (logged).
/// Zero or negative => `None`, meaning rotation is disabled.
#[must_use]
pub fn parse_interval(raw: Option<&str>, default_ms: u64) -> Option<Duration> {
    let ms = match raw.map(str::trim) {
        None | Some("") => i64::try_from(default_ms).unwrap_or(i64::MAX),
        Some(text) => match text.parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(value = text, default_ms, "unparsable interval; using default");
                i64::try_from(default_ms).unwrap_or(i64::MAX)
            }
        },
    };
    if ms <= 0 {
        tracing::warn!(interval_ms = ms, "non-positive interval; rotation disabled");
        return None;
    }
    Some(Duration::from_millis(ms.unsigned_abs()))
}

/// Final `/`-separated segment of a location path.
#[must_use]
pub fn view_from_path(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

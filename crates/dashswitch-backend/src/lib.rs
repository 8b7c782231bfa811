#![forbid(unsafe_code)]
#![doc = "Host traits for dashswitch: platform abstraction for timers, document, and navigation."]
#![doc = ""]
#![doc = "This crate defines the boundary between the rotation runtime and the page that"]
#![doc = "embeds it (a browser binding, or the deterministic host in `dashswitch-web`)."]

use core::fmt;
use core::time::Duration;

/// Opaque handle to a pending one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Wrap a host-issued raw id.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id as issued by the host.
    #[must_use]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Opaque handle to a document element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u32);

impl ElementId {
    /// Wrap a host-issued raw id.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw id as issued by the host.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Events the host delivers to the runtime, one at a time.
///
/// Each event runs to completion before the next one is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// A timer previously returned by [`HostTimers::schedule`] elapsed.
    TimerFired(TimerId),
    /// The user clicked an element.
    Click(ElementId),
}

/// One-shot timers plus a monotonic clock.
///
/// Browser hosts map this onto `setTimeout`/`clearTimeout` and
/// `performance.now()`. The runtime never reads wall time directly.
pub trait HostTimers {
    /// Returns elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;

    /// Schedule a single firing after `delay`.
    ///
    /// The host later delivers [`HostEvent::TimerFired`] with the returned id.
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Cancel a pending firing.
    ///
    /// Returns `true` if the timer was still pending. Cancelling an unknown,
    /// already fired, or already cancelled id is a no-op.
    fn cancel(&mut self, id: TimerId) -> bool;
}

/// Minimal document surface: element lookup, attributes, text, visibility, classes.
pub trait HostDocument {
    /// Element carrying the given unique `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<ElementId>;

    /// All elements matching `selector`, in document order.
    ///
    /// The selector language is host-defined; browser hosts pass it to
    /// `querySelectorAll`.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// Direct children of `parent`, in document order.
    fn children(&self, parent: ElementId) -> Vec<ElementId>;

    /// Lower-case tag name.
    fn tag(&self, element: ElementId) -> Option<String>;

    /// Attribute value, if set.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Text content.
    fn text(&self, element: ElementId) -> String;

    /// Replace the text content.
    fn set_text(&mut self, element: ElementId, text: &str);

    /// Show or hide an element.
    fn set_visible(&mut self, element: ElementId, visible: bool);

    /// Whether the element is currently shown.
    fn is_visible(&self, element: ElementId) -> bool;

    /// Add a class (no-op if already present).
    fn add_class(&mut self, element: ElementId, class: &str);

    /// Remove a class (no-op if absent).
    fn remove_class(&mut self, element: ElementId, class: &str);

    /// Whether the element carries `class`.
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Create an element and append it as the last child of `parent`.
    fn create_element(&mut self, parent: ElementId, tag: &str, id: Option<&str>) -> ElementId;

    /// Detach an element (and its subtree) from the document.
    fn remove(&mut self, element: ElementId);
}

/// Page location and navigation.
pub trait HostNavigator {
    /// Path component of the current location (e.g. `/sales`).
    fn location_path(&self) -> String;

    /// Navigate to `path`. Failures are the host's concern.
    fn navigate(&mut self, path: &str);
}

/// Unified host combining timers, document, and navigator.
///
/// The rotation runtime is generic over this trait. Concrete implementations:
/// - a browser binding (timers via `setTimeout`, document via the DOM).
/// - `dashswitch-web`: deterministic in-memory host for tests and replay.
pub trait Host {
    /// Timer implementation.
    type Timers: HostTimers;

    /// Document implementation.
    type Document: HostDocument;

    /// Navigator implementation.
    type Navigator: HostNavigator;

    /// Access the timers (mutable for scheduling/cancelling).
    fn timers(&mut self) -> &mut Self::Timers;

    /// Access the document (mutable for updates).
    fn document(&mut self) -> &mut Self::Document;

    /// Read-only access to the document.
    fn document_ref(&self) -> &Self::Document;

    /// Access the navigator.
    fn navigator(&mut self) -> &mut Self::Navigator;

    /// Read-only access to the navigator.
    fn navigator_ref(&self) -> &Self::Navigator;
}

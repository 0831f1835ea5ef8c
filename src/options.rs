use crate::{Boundary, ScrollRoot};

/// Configuration for [`crate::SectionTracker`].
///
/// This is the explicit form of the attribute-driven surface a host exposes
/// (`boundary`, `universal`): each field can also be updated independently
/// after construction through the tracker's setters, where invalid updates
/// are no-ops rather than failures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackerOptions {
    /// The activation band used by active-range detection.
    pub boundary: Boundary,
    /// Which scrollable root geometry is measured against.
    pub scroll_root: ScrollRoot,
    /// Batching window for change notifications, in milliseconds.
    pub batch_window_ms: u64,
    /// How long a geometry request may stay unresolved before it is dropped
    /// so a fresh one can be issued.
    pub geometry_timeout_ms: u64,
}

impl TrackerOptions {
    pub fn new() -> Self {
        Self {
            boundary: Boundary::default(),
            scroll_root: ScrollRoot::default(),
            batch_window_ms: 0,
            geometry_timeout_ms: 1_000,
        }
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// `true` tracks against the global viewport, `false` against the
    /// tracker's own root.
    pub fn with_universal(mut self, universal: bool) -> Self {
        self.scroll_root = if universal {
            ScrollRoot::Viewport
        } else {
            ScrollRoot::SelfRoot
        };
        self
    }

    pub fn with_batch_window_ms(mut self, window_ms: u64) -> Self {
        self.batch_window_ms = window_ms;
        self
    }

    pub fn with_geometry_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.geometry_timeout_ms = timeout_ms;
        self
    }
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self::new()
    }
}

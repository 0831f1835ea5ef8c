use alloc::string::String;
use alloc::vec::Vec;

use crate::batch::ChangeBatcher;
use crate::{
    Boundary, Changes, Heading, OutlineNode, RootGeometry, ScrollRoot, TrackerOptions,
    active_headings, build_outline,
};

/// A single-shot geometry observation the host must fulfil.
///
/// `targets` is the snapshot of heading handles the request was issued for,
/// in document order; `epoch` keys the snapshot so a result arriving after a
/// mutation can be recognized as stale and discarded.
#[derive(Clone, Debug)]
pub struct GeometryRequest<H> {
    pub epoch: u64,
    pub root: ScrollRoot,
    pub targets: Vec<H>,
}

/// Result of [`SectionTracker::active_sections`].
#[derive(Debug)]
pub enum ActiveSections<'a, H> {
    /// The cached active set, in document order.
    Ready(&'a [H]),
    /// Geometry is needed first. The request is `Some` only for the caller
    /// that triggered it; overlapping callers observe the same in-flight
    /// request and get `None`.
    Pending(Option<GeometryRequest<H>>),
}

#[derive(Clone, Copy, Debug)]
struct PendingGeometry {
    epoch: u64,
    issued_at_ms: u64,
}

/// A per-instance section tracker.
///
/// Owns one root content area's heading sequence and derives two memoized
/// values from it: the nested outline and the currently active set. The host
/// pushes change signals in (`apply_mutation`, `on_scroll`, `on_resize`);
/// the tracker invalidates lazily-recomputed caches and coalesces the change
/// tags through its [`ChangeBatcher`]. Notification fan-out happens in
/// [`crate::Hub`], which polls the batcher on `tick`.
///
/// Outline construction is synchronous; only active-set computation suspends,
/// at the geometry observation: `active_sections` hands out at most one
/// [`GeometryRequest`] per invalidation epoch and the host completes it via
/// [`SectionTracker::resolve_geometry`].
#[derive(Clone, Debug)]
pub struct SectionTracker<H> {
    options: TrackerOptions,
    name: Option<String>,
    headings: Vec<Heading<H>>,
    /// Mutation counter; the staleness key for geometry requests.
    epoch: u64,
    outline: Option<Vec<OutlineNode<H>>>,
    active: Option<Vec<H>>,
    pending: Option<PendingGeometry>,
    batcher: ChangeBatcher,
}

impl<H: Clone> SectionTracker<H> {
    pub fn new(options: TrackerOptions) -> Self {
        sdebug!(window_ms = options.batch_window_ms, "SectionTracker::new");
        Self {
            name: None,
            headings: Vec::new(),
            epoch: 0,
            outline: None,
            active: None,
            pending: None,
            batcher: ChangeBatcher::new(options.batch_window_ms),
            options,
        }
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn headings(&self) -> &[Heading<H>] {
        &self.headings
    }

    pub fn boundary(&self) -> Boundary {
        self.options.boundary
    }

    pub fn scroll_root(&self) -> ScrollRoot {
        self.options.scroll_root
    }

    pub fn universal(&self) -> bool {
        self.options.scroll_root == ScrollRoot::Viewport
    }

    /// The current mutation epoch. Bumped by every `apply_mutation`.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Replaces the heading sequence after a structural mutation of the
    /// tracked content. Invalidates both caches and batch-signals `OUTLINE`.
    pub fn apply_mutation(&mut self, headings: Vec<Heading<H>>, now_ms: u64) {
        sdebug!(headings = headings.len(), "apply_mutation");
        self.headings = headings;
        self.epoch += 1;
        self.outline = None;
        self.active = None;
        self.batcher.signal(Changes::OUTLINE, now_ms);
    }

    /// Scroll-position change: invalidates the active set only.
    pub fn on_scroll(&mut self, now_ms: u64) {
        strace!(now_ms, "on_scroll");
        self.active = None;
        self.batcher.signal(Changes::ACTIVITY, now_ms);
    }

    /// Viewport resize: invalidates the active set only.
    pub fn on_resize(&mut self, now_ms: u64) {
        strace!(now_ms, "on_resize");
        self.active = None;
        self.batcher.signal(Changes::ACTIVITY, now_ms);
    }

    pub fn set_boundary(&mut self, boundary: Boundary) {
        if self.options.boundary == boundary {
            return;
        }
        self.options.boundary = boundary;
        self.active = None;
    }

    /// Applies a `"<v>"` or `"<a> <b>"` boundary specification.
    ///
    /// Malformed input (wrong token count, unparsable number) leaves the
    /// prior boundary in effect and returns `false`.
    pub fn set_boundary_spec(&mut self, spec: &str) -> bool {
        match Boundary::parse(spec) {
            Some(boundary) => {
                self.set_boundary(boundary);
                true
            }
            None => {
                swarn!(spec, "ignoring malformed boundary specification");
                false
            }
        }
    }

    /// Switches between global-viewport and own-root scroll tracking.
    ///
    /// Idempotent, so the host never re-attaches listeners for a mode it is
    /// already in. A mode change drops any in-flight geometry request (it was
    /// measured against the old root) and invalidates the active set.
    pub fn set_universal(&mut self, universal: bool) {
        let next = if universal {
            ScrollRoot::Viewport
        } else {
            ScrollRoot::SelfRoot
        };
        if self.options.scroll_root == next {
            return;
        }
        sdebug!(universal, "set_universal");
        self.options.scroll_root = next;
        self.pending = None;
        self.active = None;
    }

    /// Returns the outline, recomputing it if the cache was invalidated.
    pub fn outline(&mut self) -> &[OutlineNode<H>] {
        self.refresh_outline();
        self.outline.as_deref().unwrap_or_default()
    }

    /// The cached outline, if valid. Useful from subscriber callbacks, which
    /// hold a shared reference; the cache is always refreshed before an
    /// `OUTLINE` change is published.
    pub fn cached_outline(&self) -> Option<&[OutlineNode<H>]> {
        self.outline.as_deref()
    }

    pub(crate) fn refresh_outline(&mut self) {
        if self.outline.is_none() {
            sdebug!(headings = self.headings.len(), "rebuild outline");
            self.outline = Some(build_outline(&self.headings));
        }
    }

    /// Returns the active set, or arranges for the geometry it needs.
    ///
    /// With a valid cache this is `Ready`. Otherwise it is `Pending`: the
    /// first caller per invalidation epoch receives the [`GeometryRequest`]
    /// to forward to the host's observer; concurrent callers while that
    /// request is in flight get `Pending(None)` and observe the same
    /// eventual result.
    pub fn active_sections(&mut self, now_ms: u64) -> ActiveSections<'_, H> {
        if self.active.is_none() {
            if self
                .pending
                .is_some_and(|pending| pending.epoch == self.epoch)
            {
                return ActiveSections::Pending(None);
            }
            self.pending = Some(PendingGeometry {
                epoch: self.epoch,
                issued_at_ms: now_ms,
            });
            let request = GeometryRequest {
                epoch: self.epoch,
                root: self.options.scroll_root,
                targets: self.headings.iter().map(|h| h.handle.clone()).collect(),
            };
            strace!(
                epoch = request.epoch,
                targets = request.targets.len(),
                "geometry request issued"
            );
            return ActiveSections::Pending(Some(request));
        }
        ActiveSections::Ready(self.active.as_deref().unwrap_or_default())
    }

    /// The cached active set, if valid.
    pub fn cached_active(&self) -> Option<&[H]> {
        self.active.as_deref()
    }

    /// Completes a geometry request. `tops` are bounding tops for the
    /// request's targets, in the same order.
    ///
    /// A result for a superseded epoch, or with the wrong arity, is discarded
    /// rather than applied; returns whether the result was accepted.
    pub fn resolve_geometry(&mut self, epoch: u64, root: RootGeometry, tops: &[f64]) -> bool {
        let Some(pending) = self.pending else {
            swarn!(epoch, "geometry result with no request in flight");
            return false;
        };
        if epoch != pending.epoch || epoch != self.epoch {
            swarn!(
                epoch,
                current = self.epoch,
                "discarding stale geometry result"
            );
            if pending.epoch != self.epoch {
                self.pending = None;
            }
            return false;
        }
        if tops.len() != self.headings.len() {
            swarn!(
                tops = tops.len(),
                headings = self.headings.len(),
                "discarding geometry result with mismatched arity"
            );
            self.pending = None;
            return false;
        }

        let entries: Vec<(H, f64)> = self
            .headings
            .iter()
            .map(|h| h.handle.clone())
            .zip(tops.iter().copied())
            .collect();
        self.active = Some(active_headings(&entries, root, self.options.boundary));
        self.pending = None;
        true
    }

    /// Whether a geometry request is currently in flight.
    pub fn geometry_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn assign_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Expires a pending geometry request that was superseded by a mutation
    /// or that the host never resolved, so a fresh one can be issued.
    fn expire_pending(&mut self, now_ms: u64) {
        let Some(pending) = self.pending else { return };
        if pending.epoch != self.epoch {
            self.pending = None;
            return;
        }
        if now_ms.saturating_sub(pending.issued_at_ms) >= self.options.geometry_timeout_ms {
            swarn!(epoch = pending.epoch, "geometry request timed out");
            self.pending = None;
        }
    }

    pub(crate) fn poll(&mut self, now_ms: u64) -> Option<(u64, Changes)> {
        self.expire_pending(now_ms);
        self.batcher.poll(now_ms)
    }
}

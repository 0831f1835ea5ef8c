use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap as Map;
#[cfg(feature = "std")]
use std::collections::HashMap as Map;

use crate::{Changes, SectionTracker};

/// A change subscriber. Invoked synchronously with the tracker that flushed
/// and the unioned change tags for the batching window.
pub type Handler<H> = Arc<dyn Fn(&SectionTracker<H>, Changes) + Send + Sync>;

/// Stable handle to a tracker owned by a [`Hub`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TrackerId(usize);

/// The notification bus and tracker registry.
///
/// Owns the live trackers, the name → tracker index, and the name-keyed
/// subscriber lists. Everything is single-threaded and cooperative: hosts
/// push signals into individual trackers and call [`Hub::tick`] to let
/// batching windows expire and flushes fan out to subscribers.
///
/// Subscriptions and names are decoupled in time: a handler may subscribe
/// under a name before any tracker holds it, and receives one retroactive
/// snapshot when a tracker claims the name via [`Hub::set_name`].
pub struct Hub<H> {
    trackers: Vec<Option<SectionTracker<H>>>,
    names: Map<String, TrackerId>,
    subscribers: Map<String, Vec<Handler<H>>>,
}

impl<H: Clone> Hub<H> {
    pub fn new() -> Self {
        Self {
            trackers: Vec::new(),
            names: Map::new(),
            subscribers: Map::new(),
        }
    }

    /// Takes ownership of a tracker. The tracker starts unnamed; nothing is
    /// published until it claims a name.
    pub fn insert(&mut self, tracker: SectionTracker<H>) -> TrackerId {
        let id = TrackerId(self.trackers.len());
        sdebug!(id = id.0, "Hub::insert");
        self.trackers.push(Some(tracker));
        id
    }

    pub fn tracker(&self, id: TrackerId) -> Option<&SectionTracker<H>> {
        self.trackers.get(id.0).and_then(Option::as_ref)
    }

    pub fn tracker_mut(&mut self, id: TrackerId) -> Option<&mut SectionTracker<H>> {
        self.trackers.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn tracker_by_name(&self, name: &str) -> Option<TrackerId> {
        self.names.get(name).copied()
    }

    /// Disposal: the tracker is dropped, its name unindexed, and no further
    /// publishes occur for it.
    pub fn remove(&mut self, id: TrackerId) -> Option<SectionTracker<H>> {
        let tracker = self.trackers.get_mut(id.0).and_then(Option::take)?;
        self.names.retain(|_, held| *held != id);
        sdebug!(id = id.0, "Hub::remove");
        Some(tracker)
    }

    /// Registers a handler under `name`. Duplicates are independent entries.
    ///
    /// If a tracker already holds the name, the handler immediately receives
    /// one retroactive snapshot with all change tags set; otherwise it
    /// receives nothing until a tracker claims the name.
    pub fn subscribe(&mut self, name: &str, handler: Handler<H>) {
        self.subscribers
            .entry(String::from(name))
            .or_default()
            .push(Arc::clone(&handler));

        if let Some(id) = self.names.get(name).copied() {
            if let Some(tracker) = self.trackers.get_mut(id.0).and_then(Option::as_mut) {
                tracker.refresh_outline();
                Self::invoke(&handler, tracker, Changes::all());
            }
        }
    }

    /// Removes exactly one previously registered occurrence of `handler`
    /// (by `Arc` identity); no-op if it is not registered under `name`.
    pub fn unsubscribe(&mut self, name: &str, handler: &Handler<H>) -> bool {
        let Some(handlers) = self.subscribers.get_mut(name) else {
            return false;
        };
        let Some(index) = handlers.iter().position(|h| Arc::ptr_eq(h, handler)) else {
            return false;
        };
        handlers.remove(index);
        true
    }

    pub fn subscriber_count(&self, name: &str) -> usize {
        self.subscribers.get(name).map_or(0, Vec::len)
    }

    /// Claims `name` for a tracker.
    ///
    /// The tracker's previous name fully stops receiving it before the new
    /// name starts; a different tracker previously holding `name` is
    /// superseded for subscription purposes. Subscribers of the new name
    /// immediately receive an initial snapshot with all change tags set.
    pub fn set_name(&mut self, id: TrackerId, name: &str) -> bool {
        let Some(tracker) = self.trackers.get_mut(id.0).and_then(Option::as_mut) else {
            return false;
        };

        if let Some(old) = tracker.name().map(String::from) {
            if self.names.get(&old) == Some(&id) {
                self.names.remove(&old);
            }
        }
        if let Some(superseded) = self.names.insert(String::from(name), id) {
            sdebug!(name, superseded = superseded.0, "name superseded");
        }
        tracker.assign_name(Some(String::from(name)));

        tracker.refresh_outline();
        Self::dispatch(&self.subscribers, name, tracker, Changes::all());
        true
    }

    /// Attribute-driven configuration surface.
    ///
    /// Recognized keys: `"name"`, `"boundary"` (`"<v>"` or `"<a> <b>"`), and
    /// `"universal"` (presence toggles global-viewport tracking). Unknown
    /// keys and malformed values are ignored.
    pub fn apply_setting(&mut self, id: TrackerId, key: &str, value: Option<&str>) {
        match key {
            "name" => {
                if let Some(name) = value {
                    self.set_name(id, name);
                }
            }
            "boundary" => {
                if let (Some(tracker), Some(spec)) = (self.tracker_mut(id), value) {
                    tracker.set_boundary_spec(spec);
                }
            }
            "universal" => {
                if let Some(tracker) = self.tracker_mut(id) {
                    tracker.set_universal(value.is_some());
                }
            }
            _ => {
                strace!(key, "ignoring unknown setting");
            }
        }
    }

    /// Lets batching windows expire and publishes the resulting flushes.
    ///
    /// Flushes are published in window-expiry order (insertion order breaks
    /// ties), one publish per flushed tracker, under the tracker's current
    /// name. The outline cache is refreshed before an `OUTLINE` flush is
    /// published so subscribers can read it synchronously. Unnamed trackers
    /// flush silently.
    pub fn tick(&mut self, now_ms: u64) {
        let mut flushes: Vec<(u64, usize, Changes)> = Vec::new();
        for (slot, tracker) in self.trackers.iter_mut().enumerate() {
            let Some(tracker) = tracker else { continue };
            if let Some((deadline, changes)) = tracker.poll(now_ms) {
                flushes.push((deadline, slot, changes));
            }
        }
        flushes.sort_by_key(|&(deadline, slot, _)| (deadline, slot));

        for (_, slot, changes) in flushes {
            let Some(tracker) = self.trackers.get_mut(slot).and_then(Option::as_mut) else {
                continue;
            };
            if changes.contains(Changes::OUTLINE) {
                tracker.refresh_outline();
            }
            let tracker = &*tracker;
            let Some(name) = tracker.name() else {
                strace!(slot, "dropping flush from unnamed tracker");
                continue;
            };
            // A tracker superseded under this name no longer reaches its
            // subscribers, even though it still remembers the name.
            if self.names.get(name) != Some(&TrackerId(slot)) {
                strace!(name, slot, "dropping flush from superseded tracker");
                continue;
            }
            Self::dispatch(&self.subscribers, name, tracker, changes);
        }
    }

    fn dispatch(
        subscribers: &Map<String, Vec<Handler<H>>>,
        name: &str,
        tracker: &SectionTracker<H>,
        changes: Changes,
    ) {
        let Some(handlers) = subscribers.get(name) else {
            return;
        };
        strace!(name, handlers = handlers.len(), "publish");
        for handler in handlers {
            Self::invoke(handler, tracker, changes);
        }
    }

    // One faulty subscriber must not prevent delivery to the others.
    #[cfg(feature = "std")]
    fn invoke(handler: &Handler<H>, tracker: &SectionTracker<H>, changes: Changes) {
        let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            handler(tracker, changes);
        }));
        if caught.is_err() {
            swarn!("subscriber panicked during publish");
        }
    }

    #[cfg(not(feature = "std"))]
    fn invoke(handler: &Handler<H>, tracker: &SectionTracker<H>, changes: Changes) {
        handler(tracker, changes);
    }
}

impl<H: Clone> Default for Hub<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> core::fmt::Debug for Hub<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hub")
            .field("trackers", &self.trackers.len())
            .field("names", &self.names.len())
            .field("subscriptions", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

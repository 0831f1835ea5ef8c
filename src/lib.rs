//! A headless section tracker: document outlines and reading-position
//! detection for scrollable content.
//!
//! Given a flat, document-ordered sequence of leveled headings, this crate
//! (a) reconstructs their hierarchical outline and (b) tracks which headings
//! are currently "active" relative to a configurable activation band of the
//! viewport, coalescing change bursts and broadcasting both facts to
//! subscribers keyed by a tracker name.
//!
//! It is UI-agnostic. A host layer (DOM, TUI, anything scrollable) is
//! expected to provide:
//! - the heading sequence after each content mutation ([`SectionTracker::apply_mutation`])
//! - scroll and resize signals ([`SectionTracker::on_scroll`] / [`SectionTracker::on_resize`])
//! - single-shot element geometry, by fulfilling [`GeometryRequest`]s
//! - a monotonic `now_ms` clock, and periodic [`Hub::tick`] calls to let
//!   batching windows expire
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod active;
mod batch;
mod hub;
mod options;
mod outline;
mod sticky;
mod tracker;
mod types;


pub use active::active_headings;
pub use batch::ChangeBatcher;
pub use hub::{Handler, Hub, TrackerId};
pub use options::TrackerOptions;
pub use outline::{OutlineNode, build_outline};
pub use sticky::Sticky;
pub use tracker::{ActiveSections, GeometryRequest, SectionTracker};
pub use types::{Boundary, Changes, Heading, RootGeometry, ScrollRoot};

use alloc::vec::Vec;

use crate::{Boundary, RootGeometry};

/// Computes the set of headings currently active under an activation band.
///
/// `entries` are `(handle, bounding_top)` pairs in document order. The band's
/// two crossing lines are `root.top + boundary.{top,bottom} * root.height`.
/// A heading has *crossed the bottom line* when its bounding top is above it
/// (scrolled at or past the threshold), and *crossed the top line* when it is
/// additionally above the top line.
///
/// The active set is the last heading to have crossed the top line (the one
/// currently being read) plus every heading that has crossed the bottom line
/// but not yet the top one (sections that have begun appearing). This is a
/// reading-position indicator, not a pure viewport-intersection test.
///
/// Pure function; empty input yields an empty set. Output preserves document
/// order, which is also the only tie-break when headings share a position.
pub fn active_headings<H: Clone>(
    entries: &[(H, f64)],
    root: RootGeometry,
    boundary: Boundary,
) -> Vec<H> {
    let top_line = root.top + boundary.top * root.height;
    let bottom_line = root.top + boundary.bottom * root.height;

    let crossed_top = |top: f64| top < bottom_line && top < top_line;
    let current = entries.iter().rposition(|&(_, top)| crossed_top(top));

    let mut active = Vec::new();
    for (i, (handle, top)) in entries.iter().enumerate() {
        if *top >= bottom_line {
            continue;
        }
        if crossed_top(*top) {
            if Some(i) == current {
                active.push(handle.clone());
            }
        } else {
            active.push(handle.clone());
        }
    }
    active
}

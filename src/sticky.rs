/// Headless state for a sticky-positioned visual container.
///
/// Independent of the tracking core. The host observes the container's
/// anchor point (the pixel just above its sticky top) and feeds its bounding
/// top through [`Sticky::update`]; `stuck` is set exactly while the anchor
/// has scrolled above the top of the viewport, ready to be reflected as a
/// presence attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sticky {
    stuck: bool,
}

impl Sticky {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stuck(&self) -> bool {
        self.stuck
    }

    /// Feeds the anchor point's current bounding top.
    ///
    /// Returns the new `stuck` state on a transition, `None` when nothing
    /// changed.
    pub fn update(&mut self, anchor_top: f64) -> Option<bool> {
        let next = anchor_top < 0.0;
        if next == self.stuck {
            return None;
        }
        strace!(stuck = next, "sticky transition");
        self.stuck = next;
        Some(next)
    }
}

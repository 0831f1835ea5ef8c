use core::str::FromStr;

/// A single heading observed under a tracked root, in document order.
///
/// `H` is the host's opaque element handle. It is the heading's identity:
/// the tracker compares handles but never inspects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Heading<H> {
    pub handle: H,
    /// Nesting level, `1` = highest (e.g. `h1`..`h6`).
    pub level: u8,
}

impl<H> Heading<H> {
    pub fn new(handle: H, level: u8) -> Self {
        Self { handle, level }
    }
}

/// The activation band, expressed as fractions of the observed root's height.
///
/// The pair is deliberately not clamped to `[0, 1]`; hosts may reach outside
/// the viewport (e.g. a negative `top` to activate slightly early).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boundary {
    pub top: f64,
    pub bottom: f64,
}

impl Boundary {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Parses a one- or two-number boundary specification.
    ///
    /// - `"<v>"` ⇒ `(top = 1, bottom = v)`: a single value only says where
    ///   "past" begins, so the band degenerates to the bottom-of-viewport
    ///   crossing line extended down to `v`.
    /// - `"<a> <b>"` ⇒ `(top = a, bottom = b)`.
    /// - Any other token count ⇒ `None` (callers leave the prior boundary in
    ///   effect).
    pub fn parse(spec: &str) -> Option<Self> {
        let mut tokens = spec.split_whitespace();
        let first = f64::from_str(tokens.next()?).ok()?;
        match tokens.next() {
            None => Some(Self::new(1.0, first)),
            Some(second) => {
                let second = f64::from_str(second).ok()?;
                if tokens.next().is_some() {
                    return None;
                }
                Some(Self::new(first, second))
            }
        }
    }
}

impl Default for Boundary {
    /// The whole viewport.
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Geometry of the observed root, in the host's coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootGeometry {
    pub top: f64,
    pub height: f64,
}

impl RootGeometry {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// Which scrollable root a tracker measures geometry against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollRoot {
    /// The global viewport ("universal" tracking).
    Viewport,
    /// The tracker's own scrollable root element.
    #[default]
    SelfRoot,
}

/// A set of change tags carried through batching and notification.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Changes(u8);

impl Changes {
    /// The heading sequence (and therefore the outline) changed.
    pub const OUTLINE: Self = Self(1 << 0);
    /// The active set may have changed (scroll/resize).
    pub const ACTIVITY: Self = Self(1 << 1);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self(Self::OUTLINE.0 | Self::ACTIVITY.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl core::ops::BitOr for Changes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl core::ops::BitOrAssign for Changes {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl core::fmt::Debug for Changes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut set = f.debug_set();
        if self.contains(Self::OUTLINE) {
            set.entry(&"outline");
        }
        if self.contains(Self::ACTIVITY) {
            set.entry(&"activity");
        }
        set.finish()
    }
}

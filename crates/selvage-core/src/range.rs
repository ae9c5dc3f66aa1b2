#![forbid(unsafe_code)]

//! Order-normalized selection ranges over flattened content offsets.
//!
//! A [`Range`] is the value half of a selection: two offsets into a host's
//! flattened text, kept normalized so `start <= end` no matter which order
//! the endpoints were supplied in. Direction is deliberately not modeled;
//! hosts that track anchor/focus normalize when they report back.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A span of selected content, as a pair of flattened character offsets.
///
/// The endpoints are normalized on every write, so `start() <= end()` holds
/// for the lifetime of the value. Offsets count Unicode scalar values in the
/// host's flattened text, with each forced line break counting as one.
///
/// # Example
///
/// ```
/// use selvage_core::Range;
///
/// let range = Range::new(20, 5);
/// assert_eq!(range.get(), (5, 20));
/// assert_eq!(range.span(), 15);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Range {
    start: usize,
    end: usize,
}

impl Range {
    /// Create a range from two offsets, in either order.
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Create a collapsed range (a caret) at `offset`.
    #[must_use]
    pub const fn collapsed_at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Lower endpoint.
    #[inline]
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Upper endpoint.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Both endpoints as a `(start, end)` pair.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Replace both endpoints, re-normalizing order.
    pub fn set(&mut self, a: usize, b: usize) {
        *self = Self::new(a, b);
    }

    /// Number of positions covered.
    #[inline]
    #[must_use]
    pub const fn span(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the range selects nothing (a caret).
    #[inline]
    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Collapse to the lower endpoint. Idempotent.
    pub fn collapse(&mut self) {
        self.end = self.start;
    }

    /// Returns `true` if `offset` falls inside the half-open span `[start, end)`.
    ///
    /// A collapsed range contains nothing.
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Both endpoints limited to `max`, preserving normalization.
    ///
    /// Takes `self` by value so the single-argument form resolves here and
    /// not to [`Ord::clamp`].
    #[must_use]
    pub fn clamp(self, max: usize) -> Self {
        Self {
            start: self.start.min(max),
            end: self.end.min(max),
        }
    }
}

impl From<(usize, usize)> for Range {
    fn from((a, b): (usize, usize)) -> Self {
        Self::new(a, b)
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// Manual impl so deserialized pairs come back normalized even when the
// serialized form was produced by hand with `start > end`.
impl<'de> Deserialize<'de> for Range {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            start: usize,
            end: usize,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Self::new(raw.start, raw.end))
    }
}

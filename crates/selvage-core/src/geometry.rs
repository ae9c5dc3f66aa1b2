#![forbid(unsafe_code)]

//! Viewport-space geometry returned by selection hosts.
//!
//! Coordinates are `f32` pixels with the origin at the top-left of the
//! viewport, matching what client-rect style APIs hand out. A collapsed
//! selection still has geometry: a caret is a zero-width rect with the
//! line's full height.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a rect from its top-left corner and extent.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge. Alias for `x`.
    #[inline]
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Top edge. Alias for `y`.
    #[inline]
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Right edge (`x + width`).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns `true` if the rect covers no area.
    ///
    /// Caret rects are empty in this sense while still carrying a meaningful
    /// position and height.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Smallest rect containing both `self` and `other`.
    ///
    /// Zero-area rects still contribute their edges, so unioning a caret
    /// into a line box widens the box up to the caret position.
    #[must_use]
    pub fn union(&self, other: Rect) -> Rect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Returns `true` if the point lies inside the rect.
    #[must_use]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_derive_from_origin_and_extent() {
        let rect = Rect::new(8.0, 16.0, 80.0, 16.0);
        assert_eq!(rect.left(), 8.0);
        assert_eq!(rect.top(), 16.0);
        assert_eq!(rect.right(), 88.0);
        assert_eq!(rect.bottom(), 32.0);
    }

    #[test]
    fn caret_rect_is_empty_but_positioned() {
        let caret = Rect::new(48.0, 32.0, 0.0, 16.0);
        assert!(caret.is_empty());
        assert!(caret.left() > 0.0);
        assert!(caret.top() > 0.0);
        assert!(caret.height > 0.0);
    }

    #[test]
    fn union_covers_both_inputs() {
        let a = Rect::new(8.0, 16.0, 40.0, 16.0);
        let b = Rect::new(8.0, 32.0, 64.0, 16.0);
        let u = a.union(b);
        assert_eq!(u, Rect::new(8.0, 16.0, 64.0, 32.0));
    }

    #[test]
    fn union_with_caret_extends_edges() {
        let line = Rect::new(8.0, 16.0, 40.0, 16.0);
        let caret = Rect::new(96.0, 16.0, 0.0, 16.0);
        let u = line.union(caret);
        assert_eq!(u.right(), 96.0);
        assert_eq!(u.width, 88.0);
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(0.0, 0.0));
        assert!(rect.contains(9.9, 9.9));
        assert!(!rect.contains(10.0, 5.0));
        assert!(!rect.contains(5.0, 10.0));
    }

    #[test]
    fn serde_roundtrip() {
        let rect = Rect::new(8.0, 16.0, 80.0, 16.0);
        let json = serde_json::to_string(&rect).unwrap();
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rect);
    }
}

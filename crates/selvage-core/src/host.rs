#![forbid(unsafe_code)]

//! Traits connecting [`Range`] values to a concrete selection surface.
//!
//! The range type itself never touches a document. Everything stateful goes
//! through [`SelectionHost`], which a browser binding, a test double, or the
//! headless surface in `selvage-content` implements. Offset-to-anchor
//! translation sits behind [`AnchorCodec`] so it can be exercised without a
//! host at all.
//!
//! # Invariants
//!
//! | # | Invariant |
//! |---|-----------|
//! | 1 | `selection()` reports normalized ranges: `start <= end` even when the native focus precedes the anchor. |
//! | 2 | `set_selection` clamps out-of-bounds offsets to `content_len()` rather than failing. |
//! | 3 | `decode(encode(offset)) == offset` for every `offset <= content_len()`. |
//! | 4 | `selection_rect()` is `Some` exactly when `selection()` is. |

use crate::geometry::Rect;
use crate::range::Range;

/// A surface that owns a native selection over flattened content.
///
/// Implementors translate between the flattened offset space that [`Range`]
/// lives in and whatever the underlying platform keys selections on.
pub trait SelectionHost {
    /// Total length of the surface's content in flattened positions.
    fn content_len(&self) -> usize;

    /// Replace the native selection with `range`.
    ///
    /// Offsets past the end of content clamp to `content_len()`; setting a
    /// selection never fails.
    fn set_selection(&mut self, range: Range);

    /// The current native selection, normalized, or `None` when the surface
    /// holds no selection at all.
    fn selection(&self) -> Option<Range>;

    /// Drop the native selection entirely.
    ///
    /// Afterwards `selection()` returns `None` until the next
    /// `set_selection`.
    fn clear_selection(&mut self);

    /// Bounding geometry of the current selection in viewport coordinates.
    ///
    /// Collapsed selections yield a zero-width caret rect with positive
    /// height. `None` when there is no selection.
    fn selection_rect(&self) -> Option<Rect>;
}

/// Translation between flattened offsets and host-native selection anchors.
///
/// This is the swappable seam between range arithmetic and a document tree:
/// one implementation walks a DOM, the headless one walks a parsed fragment,
/// and both can be tested against invariant 3 above in isolation.
pub trait AnchorCodec {
    /// Host-native position, typically a node reference plus a node-local
    /// offset.
    type Anchor;

    /// Resolve a flattened offset to a native anchor.
    ///
    /// Offsets past the end of content resolve to the last addressable
    /// position.
    fn encode(&self, offset: usize) -> Self::Anchor;

    /// Resolve a native anchor back to a flattened offset.
    ///
    /// Total for every anchor this codec produced; node-local offsets past
    /// the node's extent clamp to it.
    fn decode(&self, anchor: &Self::Anchor) -> usize;
}

impl Range {
    /// Push this range onto `host` as the native selection.
    ///
    /// # Example
    ///
    /// ```
    /// use selvage_core::{Range, Rect, SelectionHost};
    ///
    /// struct Caret(Option<Range>);
    ///
    /// impl SelectionHost for Caret {
    ///     fn content_len(&self) -> usize { 100 }
    ///     fn set_selection(&mut self, range: Range) { self.0 = Some(range); }
    ///     fn selection(&self) -> Option<Range> { self.0 }
    ///     fn clear_selection(&mut self) { self.0 = None; }
    ///     fn selection_rect(&self) -> Option<Rect> { None }
    /// }
    ///
    /// let mut host = Caret(None);
    /// Range::new(20, 5).select(&mut host);
    /// assert_eq!(Range::query(&host).get(), (5, 20));
    /// ```
    pub fn select<H: SelectionHost + ?Sized>(&self, host: &mut H) {
        host.set_selection(*self);
    }

    /// Read the current selection from `host`.
    ///
    /// Returns a collapsed range at offset 0 when the host has no selection,
    /// so callers always get a usable value.
    #[must_use]
    pub fn query<H: SelectionHost + ?Sized>(host: &H) -> Self {
        host.selection().unwrap_or_default()
    }
}

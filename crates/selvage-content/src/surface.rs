#![forbid(unsafe_code)]

//! Headless selection surface for CI testing and host-free callers.
//!
//! [`Surface`] pairs a [`Fragment`] with a [`LineMap`] and a native
//! selection slot, implementing [`SelectionHost`] end to end without a
//! browser or renderer. It is designed for:
//!
//! - **CI environments** where a DOM is unavailable
//! - **Exercising range arithmetic** against a real anchor codec
//! - **Geometry checks** with deterministic monospace metrics
//!
//! The native slot stores anchor/focus in document terms, so backward
//! selections (focus before anchor) exist here exactly as they do in a
//! live host; they normalize when read back through `selection()`.
//!
//! # Example
//!
//! ```
//! use selvage_content::Surface;
//! use selvage_core::{Range, SelectionHost};
//!
//! let mut surface = Surface::from_markup("one<br>and <b>two</b>").unwrap();
//! Range::new(0, 5).select(&mut surface);
//! assert_eq!(Range::query(&surface).get(), (0, 5));
//! assert_eq!(surface.selected_text(), "one\na");
//! ```

use selvage_core::{AnchorCodec, Range, Rect, SelectionHost};

use crate::anchor::Anchor;
use crate::fragment::Fragment;
use crate::layout::{LineMap, Metrics};
use crate::markup::MarkupError;

/// The raw native selection: anchor and focus in document order of travel,
/// not normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeSelection {
    /// Where the selection started.
    pub anchor: Anchor,
    /// Where the selection ends; before the anchor for backward drags.
    pub focus: Anchor,
}

/// A fragment plus layout plus one native selection slot.
#[derive(Clone, Debug)]
pub struct Surface {
    fragment: Fragment,
    lines: LineMap,
    native: Option<NativeSelection>,
}

impl Surface {
    /// Surface over `fragment` with default [`Metrics`].
    #[must_use]
    pub fn new(fragment: Fragment) -> Self {
        Self::with_metrics(fragment, Metrics::new())
    }

    /// Surface over `fragment` laid out with `metrics`.
    ///
    /// # Panics
    ///
    /// Panics if `metrics.advance` or `metrics.line_height` is not strictly
    /// positive.
    #[must_use]
    pub fn with_metrics(fragment: Fragment, metrics: Metrics) -> Self {
        let lines = LineMap::new(&fragment.text(), metrics);
        Self {
            fragment,
            lines,
            native: None,
        }
    }

    /// Parse `source` as markup and build a surface with default metrics.
    pub fn from_markup(source: &str) -> Result<Self, MarkupError> {
        Ok(Self::new(Fragment::from_markup(source)?))
    }

    /// Surface over plain text, no markup interpretation.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::new(Fragment::from_text(text))
    }

    /// The underlying fragment.
    #[must_use]
    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    /// The layout this surface computes geometry with.
    #[must_use]
    pub fn line_map(&self) -> &LineMap {
        &self.lines
    }

    /// The grid metrics in effect.
    #[must_use]
    pub fn metrics(&self) -> Metrics {
        self.lines.metrics()
    }

    /// Set the native selection directly from anchors, the way a host-side
    /// pointer drag would.
    ///
    /// Node-local offsets past a node's extent clamp to it. The focus may
    /// precede the anchor; `selection()` normalizes on read.
    ///
    /// # Panics
    ///
    /// Panics if either anchor's node belongs to a different fragment.
    pub fn set_native(&mut self, anchor: Anchor, focus: Anchor) {
        self.native = Some(NativeSelection {
            anchor: self.clamp_anchor(anchor),
            focus: self.clamp_anchor(focus),
        });
    }

    /// The raw native selection, if any. Unlike `selection()` this keeps
    /// anchor/focus order.
    #[must_use]
    pub fn native(&self) -> Option<NativeSelection> {
        self.native
    }

    /// Flattened text covered by the current selection, or empty when there
    /// is none.
    #[must_use]
    pub fn selected_text(&self) -> String {
        match self.selection() {
            Some(range) => self.fragment.slice(range).into_owned(),
            None => String::new(),
        }
    }

    fn clamp_anchor(&self, anchor: Anchor) -> Anchor {
        let Some(extent) = self.fragment.node_range(anchor.node) else {
            panic!("anchor node {:?} does not belong to this surface", anchor.node);
        };
        Anchor::new(anchor.node, anchor.offset.min(extent.span()))
    }
}

impl SelectionHost for Surface {
    fn content_len(&self) -> usize {
        self.fragment.len()
    }

    fn set_selection(&mut self, range: Range) {
        let clamped = range.clamp(self.fragment.len());
        if clamped != range {
            tracing::debug!(
                start = range.start(),
                end = range.end(),
                len = self.fragment.len(),
                "selection clamped to content length"
            );
        }
        self.native = Some(NativeSelection {
            anchor: self.fragment.encode(clamped.start()),
            focus: self.fragment.encode(clamped.end()),
        });
    }

    fn selection(&self) -> Option<Range> {
        self.native.as_ref().map(|native| {
            Range::new(
                self.fragment.decode(&native.anchor),
                self.fragment.decode(&native.focus),
            )
        })
    }

    fn clear_selection(&mut self) {
        self.native = None;
    }

    fn selection_rect(&self) -> Option<Rect> {
        self.selection().map(|range| self.lines.rect_of(range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn sample() -> Surface {
        Surface::from_markup("ab<br><b>cd</b>").unwrap()
    }

    #[test]
    fn select_then_query_roundtrips() {
        let mut surface = sample();
        Range::new(1, 4).select(&mut surface);
        assert_eq!(Range::query(&surface).get(), (1, 4));
    }

    #[test]
    fn query_without_selection_is_collapsed_origin() {
        let surface = sample();
        assert_eq!(Range::query(&surface).get(), (0, 0));
        assert!(surface.selection().is_none());
        assert!(surface.native().is_none());
    }

    #[test]
    fn clear_selection_resets_to_none() {
        let mut surface = sample();
        Range::new(0, 3).select(&mut surface);
        surface.clear_selection();
        assert!(surface.selection().is_none());
        assert!(surface.selection_rect().is_none());
        assert_eq!(Range::query(&surface).get(), (0, 0));
    }

    #[test]
    fn backward_native_selection_normalizes_on_read() {
        let mut surface = Surface::from_text("hello world");
        let later = surface.fragment().encode(9);
        let earlier = surface.fragment().encode(2);
        surface.set_native(later, earlier);

        let native = surface.native().unwrap();
        assert_eq!(native.anchor, later);
        assert_eq!(native.focus, earlier);
        assert_eq!(surface.selection(), Some(Range::new(2, 9)));
    }

    #[test]
    fn set_native_clamps_node_local_offset() {
        let mut surface = Surface::from_text("hello world");
        let leaf = surface.fragment().encode(0).node;
        surface.set_native(Anchor::new(leaf, 999), Anchor::new(leaf, 999));
        assert_eq!(surface.selection(), Some(Range::collapsed_at(11)));
    }

    #[test]
    #[should_panic(expected = "does not belong to this surface")]
    fn foreign_anchor_panics() {
        let other = Fragment::from_markup("x<br>y<br>z").unwrap();
        let foreign = other.encode(4);

        let mut surface = Surface::from_text("ab");
        surface.set_native(foreign, foreign);
    }

    #[test]
    #[traced_test]
    fn out_of_bounds_selection_clamps_and_logs() {
        let mut surface = sample();
        Range::new(0, 999).select(&mut surface);
        assert_eq!(Range::query(&surface).get(), (0, 5));
        assert!(logs_contain("selection clamped to content length"));
    }

    #[test]
    fn selection_rect_tracks_selection_presence() {
        let mut surface = sample();
        assert!(surface.selection_rect().is_none());
        Range::new(0, 2).select(&mut surface);
        assert!(surface.selection_rect().is_some());
    }

    #[test]
    fn collapsed_selection_rect_is_a_caret() {
        let mut surface = sample();
        Range::collapsed_at(4).select(&mut surface);
        let rect = surface.selection_rect().unwrap();
        assert_eq!(rect.width, 0.0);
        assert!(rect.left() > 0.0);
        assert!(rect.top() > 0.0);
        assert!(rect.height > 0.0);
    }

    #[test]
    fn non_collapsed_selection_rect_has_width() {
        let mut surface = sample();
        Range::new(3, 5).select(&mut surface);
        let rect = surface.selection_rect().unwrap();
        assert!(rect.width > 0.0);
        assert!(rect.left() >= 0.0 && rect.top() >= 0.0);
    }

    #[test]
    fn selected_text_crosses_wrapper_and_break() {
        let mut surface = Surface::from_markup("one<br>two").unwrap();
        Range::new(0, 5).select(&mut surface);
        assert_eq!(surface.selected_text(), "one\nt");

        surface.clear_selection();
        assert_eq!(surface.selected_text(), "");
    }

    #[test]
    fn empty_surface_supports_collapsed_origin() {
        let mut surface = Surface::new(Fragment::new());
        assert_eq!(surface.content_len(), 0);
        Range::new(0, 0).select(&mut surface);
        assert_eq!(Range::query(&surface).get(), (0, 0));
        let rect = surface.selection_rect().unwrap();
        assert_eq!(rect.width, 0.0);
        assert!(rect.height > 0.0);
    }

    #[test]
    fn wrap_metrics_change_selection_geometry() {
        let fragment = Fragment::from_text("abcdefgh");
        let mut surface = Surface::with_metrics(fragment, Metrics::new().wrap_columns(4));
        Range::new(0, 8).select(&mut surface);
        let rect = surface.selection_rect().unwrap();
        // Two rows under a 4-column budget.
        assert_eq!(rect.top(), 16.0);
        assert_eq!(rect.bottom(), 48.0);
    }

    #[test]
    #[should_panic(expected = "advance must be positive")]
    fn bad_metrics_panic_at_construction() {
        let _ = Surface::with_metrics(Fragment::new(), Metrics::new().advance(0.0));
    }
}

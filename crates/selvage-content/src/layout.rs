#![forbid(unsafe_code)]

//! Monospace layout: visual lines, caret positions, selection rects.
//!
//! [`LineMap`] lays flattened text onto a fixed-advance grid described by
//! [`Metrics`]: equal column width, equal line height, optional wrapping at
//! a column budget. That is enough to give every offset a caret rect and
//! every range a bounding rect without a renderer in the picture.
//!
//! # Invariants
//!
//! 1. **Line spans tile the text**: visual lines cover `[0, len]` in order;
//!    hard-broken lines own the `\n` position at their end, wrapped lines
//!    hand the boundary offset to the caret of the earlier line.
//!
//! 2. **Carets resolve upstream**: an offset on a wrap boundary belongs to
//!    the end of the earlier line, matching where an insertion at that
//!    offset would appear.
//!
//! 3. **Selection starts resolve downstream**: the same boundary offset as
//!    the start of a highlighted range begins on the later line, so the
//!    highlight never claims a line it covers no content of.
//!
//! 4. **Grapheme clusters never split**: wrapping and measurement step by
//!    grapheme, so a cluster wider than the column budget still lands on a
//!    single line.

use selvage_core::{Range, Rect};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Grid metrics for headless layout.
///
/// Field units are pixels except `wrap_columns`, which counts display
/// columns. Defaults describe an 8x16 grid inset one cell from the viewport
/// corner, so even the caret at offset 0 sits at strictly positive
/// coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    /// Left edge of column 0.
    pub origin_x: f32,
    /// Top edge of row 0.
    pub origin_y: f32,
    /// Horizontal advance per display column.
    pub advance: f32,
    /// Vertical advance per visual line.
    pub line_height: f32,
    /// Wrap at this many display columns; `None` never wraps.
    pub wrap_columns: Option<usize>,
}

impl Metrics {
    /// Default grid: 8x16 cells, origin at (8, 16), no wrapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            origin_x: 8.0,
            origin_y: 16.0,
            advance: 8.0,
            line_height: 16.0,
            wrap_columns: None,
        }
    }

    /// Set the top-left corner of the text grid.
    #[must_use]
    pub const fn origin(mut self, x: f32, y: f32) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// Set the per-column advance.
    #[must_use]
    pub const fn advance(mut self, advance: f32) -> Self {
        self.advance = advance;
        self
    }

    /// Set the per-line height.
    #[must_use]
    pub const fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    /// Wrap lines at `columns` display columns. Zero disables wrapping.
    #[must_use]
    pub const fn wrap_columns(mut self, columns: usize) -> Self {
        self.wrap_columns = if columns == 0 { None } else { Some(columns) };
        self
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// One visual line: a flattened char span plus the matching byte span.
#[derive(Clone, Copy, Debug)]
struct VisualLine {
    start_char: usize,
    end_char: usize,
    start_byte: usize,
    end_byte: usize,
    /// `true` when the line ends at a `\n` (or the end of text), `false`
    /// when it ends at a wrap boundary.
    hard: bool,
}

/// Flattened text laid out as visual lines on a [`Metrics`] grid.
#[derive(Clone, Debug)]
pub struct LineMap {
    text: String,
    lines: Vec<VisualLine>,
    metrics: Metrics,
    len_chars: usize,
}

impl LineMap {
    /// Lay out `text` on the grid described by `metrics`.
    ///
    /// # Panics
    ///
    /// Panics if `metrics.advance` or `metrics.line_height` is not strictly
    /// positive.
    #[must_use]
    pub fn new(text: &str, metrics: Metrics) -> Self {
        assert!(metrics.advance > 0.0, "metrics.advance must be positive");
        assert!(
            metrics.line_height > 0.0,
            "metrics.line_height must be positive"
        );

        let mut lines = Vec::new();
        let mut start_char = 0;
        let mut start_byte = 0;
        let mut char_pos = 0;
        let mut cols = 0;

        for (byte_idx, grapheme) in text.grapheme_indices(true) {
            if grapheme == "\n" || grapheme == "\r\n" {
                lines.push(VisualLine {
                    start_char,
                    end_char: char_pos,
                    start_byte,
                    end_byte: byte_idx,
                    hard: true,
                });
                char_pos += grapheme.chars().count();
                start_char = char_pos;
                start_byte = byte_idx + grapheme.len();
                cols = 0;
                continue;
            }

            let width = grapheme_width(grapheme);
            if let Some(budget) = metrics.wrap_columns {
                if cols + width > budget && cols > 0 {
                    lines.push(VisualLine {
                        start_char,
                        end_char: char_pos,
                        start_byte,
                        end_byte: byte_idx,
                        hard: false,
                    });
                    start_char = char_pos;
                    start_byte = byte_idx;
                    cols = 0;
                }
            }
            cols += width;
            char_pos += grapheme.chars().count();
        }

        lines.push(VisualLine {
            start_char,
            end_char: char_pos,
            start_byte,
            end_byte: text.len(),
            hard: true,
        });

        tracing::trace!(lines = lines.len(), chars = char_pos, "line map built");

        Self {
            text: text.to_string(),
            lines,
            metrics,
            len_chars: char_pos,
        }
    }

    /// Number of visual lines. At least 1, even for empty text.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total text length in flattened positions.
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.len_chars
    }

    /// The grid this map was built with.
    #[inline]
    #[must_use]
    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Text of one visual line, without any trailing `\n`.
    #[must_use]
    pub fn line_text(&self, idx: usize) -> Option<&str> {
        let line = self.lines.get(idx)?;
        Some(&self.text[line.start_byte..line.end_byte])
    }

    /// Flattened char span of one visual line, `\n` excluded.
    #[must_use]
    pub fn line_span(&self, idx: usize) -> Option<Range> {
        let line = self.lines.get(idx)?;
        Some(Range::new(line.start_char, line.end_char))
    }

    /// Caret rect for `offset`: zero width, one line height.
    ///
    /// Offsets past the end of text clamp to the end. An offset on a wrap
    /// boundary resolves upstream, to the end of the earlier line.
    #[must_use]
    pub fn caret(&self, offset: usize) -> Rect {
        let offset = offset.min(self.len_chars);
        let idx = self.line_for_caret(offset);
        Rect::new(
            self.x_at(idx, offset),
            self.y_of(idx),
            0.0,
            self.metrics.line_height,
        )
    }

    /// Bounding rect of `range`'s per-line highlight segments.
    ///
    /// Collapsed ranges yield the caret rect. A range covering a `\n` keeps
    /// the zero-width end-of-line segment on the broken line, so the
    /// bounding box includes that row.
    #[must_use]
    pub fn rect_of(&self, range: Range) -> Rect {
        let clamped = range.clamp(self.len_chars);
        if clamped.is_collapsed() {
            return self.caret(clamped.start());
        }

        let first = self.line_for_start(clamped.start());
        let last = self.line_for_caret(clamped.end());
        let mut bounds: Option<Rect> = None;
        for idx in first..=last {
            let line = self.lines[idx];
            let seg_start = clamped.start().max(line.start_char);
            let seg_end = clamped.end().min(line.end_char);
            if seg_start > seg_end {
                continue;
            }
            let x1 = self.x_at(idx, seg_start);
            let x2 = self.x_at(idx, seg_end);
            let rect = Rect::new(x1, self.y_of(idx), x2 - x1, self.metrics.line_height);
            bounds = Some(match bounds {
                Some(acc) => acc.union(rect),
                None => rect,
            });
        }
        bounds.unwrap_or_else(|| self.caret(clamped.start()))
    }

    /// Line owning `offset` as a caret position: the first line whose end
    /// is at or past the offset.
    fn line_for_caret(&self, offset: usize) -> usize {
        let offset = offset.min(self.len_chars);
        let idx = self.lines.partition_point(|line| line.end_char < offset);
        idx.min(self.lines.len() - 1)
    }

    /// Line owning `offset` as the start of a highlight: wrap boundaries go
    /// to the later line, `\n` positions stay on the broken line.
    fn line_for_start(&self, offset: usize) -> usize {
        let offset = offset.min(self.len_chars);
        let idx = self.lines.partition_point(|line| {
            if line.hard {
                line.end_char < offset
            } else {
                line.end_char <= offset
            }
        });
        idx.min(self.lines.len() - 1)
    }

    /// X coordinate of `offset` measured within line `idx`.
    ///
    /// Offsets inside a grapheme cluster measure to the cluster's trailing
    /// edge; offsets outside the line clamp to its edges.
    fn x_at(&self, idx: usize, offset: usize) -> f32 {
        let line = self.lines[idx];
        let slice = &self.text[line.start_byte..line.end_byte];
        let target = offset.saturating_sub(line.start_char);

        let mut cols = 0;
        let mut consumed = 0;
        for grapheme in slice.graphemes(true) {
            if consumed >= target {
                break;
            }
            consumed += grapheme.chars().count();
            cols += grapheme_width(grapheme);
        }
        self.metrics.origin_x + cols as f32 * self.metrics.advance
    }

    fn y_of(&self, idx: usize) -> f32 {
        self.metrics.origin_y + idx as f32 * self.metrics.line_height
    }
}

/// Display width of a single grapheme cluster in columns.
///
/// Widths come straight from `unicode-width`: combining marks measure 0,
/// CJK measures 2, ZWJ sequences measure as the sum of their parts.
#[inline]
fn grapheme_width(grapheme: &str) -> usize {
    UnicodeWidthStr::width(grapheme)
}

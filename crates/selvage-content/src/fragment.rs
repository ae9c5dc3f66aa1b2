#![forbid(unsafe_code)]

//! Parsed content fragments with a flattened offset index.
//!
//! A [`Fragment`] is an immutable tree of text runs, line breaks, and inline
//! wrappers, plus the flattened view selection offsets address: every text
//! character is one position, every line break is one position (rendered as
//! `\n`), and wrappers contribute nothing of their own.
//!
//! Fragments are built through [`FragmentBuilder`] (directly or via markup)
//! and normalized on build: adjacent text runs merge, empty runs and empty
//! wrappers disappear. Normalization keeps anchor resolution simple; offset
//! arithmetic never has to reason about zero-length leaves.
//!
//! # Invariants
//!
//! 1. **Leaf spans tile the content**: walking leaves in document order
//!    yields contiguous, non-empty flattened spans covering `[0, len)`.
//!
//! 2. **Every non-root node has flattened extent**: normalization removes
//!    anything that would flatten to nothing.
//!
//! 3. **The flattened rope matches the tree**: `text()` equals the
//!    concatenation of leaf contents with `\n` for each line break.

use std::borrow::Cow;

use ropey::Rope;
use selvage_core::Range;

use crate::markup::{self, MarkupError};
use crate::node::{NodeData, NodeId, NodeKind};

/// Flattened extent of one leaf, in document order.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LeafSpan {
    pub(crate) start: usize,
    pub(crate) len: usize,
    pub(crate) node: NodeId,
}

/// An immutable content tree with its flattened text.
///
/// # Example
///
/// ```
/// use selvage_content::Fragment;
///
/// let frag = Fragment::from_markup("one<br>and <b>two</b>").unwrap();
/// assert_eq!(frag.text(), "one\nand two");
/// assert_eq!(frag.len(), 11);
/// ```
#[derive(Clone, Debug)]
pub struct Fragment {
    pub(crate) nodes: Vec<NodeData>,
    flat: Rope,
    pub(crate) spans: Vec<LeafSpan>,
}

impl Fragment {
    /// An empty fragment: a lone root, zero flattened length.
    #[must_use]
    pub fn new() -> Self {
        FragmentBuilder::new().build()
    }

    /// Build a fragment holding `text` as a single run.
    ///
    /// No markup interpretation happens; `<`, `&`, and newlines are taken
    /// literally. Newlines still act as hard line breaks in layout.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut builder = FragmentBuilder::new();
        builder.text(text);
        builder.build()
    }

    /// Parse `source` as inline markup and build the fragment.
    pub fn from_markup(source: &str) -> Result<Self, MarkupError> {
        let mut builder = FragmentBuilder::new();
        markup::parse_into(source, &mut builder)?;
        Ok(builder.build())
    }

    /// The flattened text, with `\n` for each line break.
    #[must_use]
    pub fn text(&self) -> String {
        self.flat.to_string()
    }

    /// Total flattened length in Unicode scalar values.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.flat.len_chars()
    }

    /// Returns `true` if the fragment has no content.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flat.len_chars() == 0
    }

    /// Flattened text covered by `range`, clamped to the content.
    #[must_use]
    pub fn slice(&self, range: Range) -> Cow<'_, str> {
        let clamped = range.clamp(self.len());
        let (start, end) = clamped.get();
        let slice = self.flat.slice(start..end);
        match slice.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(slice.to_string()),
        }
    }

    /// Number of nodes in the fragment, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The kind of `id`, or `None` for an id from another fragment.
    #[must_use]
    pub fn node_kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.index()).map(|n| &n.kind)
    }

    /// Flattened extent of `id`'s subtree, or `None` for a foreign id.
    ///
    /// The root's extent is the whole content; a line break's extent has
    /// span 1.
    #[must_use]
    pub fn node_range(&self, id: NodeId) -> Option<Range> {
        self.nodes
            .get(id.index())
            .map(|n| Range::new(n.flat_start, n.flat_start + n.flat_len))
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Self::new()
    }
}

/// Incrementally builds a [`Fragment`] tree.
///
/// Methods chain; `open`/`close` must balance by the time [`build`] is
/// called.
///
/// # Example
///
/// ```
/// use selvage_content::FragmentBuilder;
///
/// let mut builder = FragmentBuilder::new();
/// builder.text("plain ").open("b").text("bold").close().line_break();
/// let frag = builder.build();
/// assert_eq!(frag.text(), "plain bold\n");
/// ```
///
/// [`build`]: FragmentBuilder::build
#[derive(Debug, Default)]
pub struct FragmentBuilder {
    nodes: Vec<NodeData>,
    /// Chain of open elements; the root is always at the bottom.
    stack: Vec<NodeId>,
}

impl FragmentBuilder {
    /// Start a fragment with an empty root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Root)],
            stack: vec![NodeId::ROOT],
        }
    }

    /// Append a text run under the innermost open element.
    ///
    /// Empty text is ignored.
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if !text.is_empty() {
            self.append(NodeKind::Text(text));
        }
        self
    }

    /// Append a forced line break under the innermost open element.
    pub fn line_break(&mut self) -> &mut Self {
        self.append(NodeKind::LineBreak);
        self
    }

    /// Open an inline wrapper; subsequent content nests inside it until the
    /// matching [`close`](FragmentBuilder::close).
    pub fn open(&mut self, tag: impl Into<String>) -> &mut Self {
        let id = self.append(NodeKind::Inline(tag.into()));
        self.stack.push(id);
        self
    }

    /// Close the innermost open wrapper.
    ///
    /// # Panics
    ///
    /// Panics if no wrapper is open.
    pub fn close(&mut self) -> &mut Self {
        assert!(self.stack.len() > 1, "close() with no element open");
        self.stack.pop();
        self
    }

    /// Normalize and finish the fragment.
    ///
    /// # Panics
    ///
    /// Panics if any wrapper is still open.
    #[must_use]
    pub fn build(self) -> Fragment {
        assert!(
            self.stack.len() == 1,
            "build() with {} unclosed element(s)",
            self.stack.len() - 1
        );

        let mut nodes = vec![NodeData::new(NodeKind::Root)];
        normalize_children(&self.nodes, NodeId::ROOT, &mut nodes, NodeId::ROOT);

        let mut buf = String::new();
        let mut cur = 0;
        let mut spans = Vec::new();
        flatten(&mut nodes, NodeId::ROOT, &mut buf, &mut cur, &mut spans);

        Fragment {
            nodes,
            flat: Rope::from_str(&buf),
            spans,
        }
    }

    fn append(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData::new(kind));
        let parent = *self.stack.last().unwrap_or(&NodeId::ROOT);
        self.nodes[parent.index()].children.push(id);
        id
    }
}

/// Returns `true` if the subtree at `id` flattens to at least one position.
fn subtree_has_content(nodes: &[NodeData], id: NodeId) -> bool {
    let node = &nodes[id.index()];
    match &node.kind {
        NodeKind::Text(s) => !s.is_empty(),
        NodeKind::LineBreak => true,
        NodeKind::Root | NodeKind::Inline(_) => node
            .children
            .iter()
            .any(|&child| subtree_has_content(nodes, child)),
    }
}

/// Copy `src_parent`'s children into `dst` under `dst_parent`, merging
/// adjacent text runs and dropping anything without content. Text on either
/// side of a dropped wrapper merges into one run.
fn normalize_children(
    src: &[NodeData],
    src_parent: NodeId,
    dst: &mut Vec<NodeData>,
    dst_parent: NodeId,
) {
    let mut pending = String::new();
    for &child in &src[src_parent.index()].children {
        match &src[child.index()].kind {
            NodeKind::Text(s) => pending.push_str(s),
            NodeKind::LineBreak => {
                flush_text(&mut pending, dst, dst_parent);
                alloc(dst, dst_parent, NodeKind::LineBreak);
            }
            NodeKind::Inline(tag) => {
                if subtree_has_content(src, child) {
                    flush_text(&mut pending, dst, dst_parent);
                    let id = alloc(dst, dst_parent, NodeKind::Inline(tag.clone()));
                    normalize_children(src, child, dst, id);
                }
            }
            NodeKind::Root => unreachable!("root is never a child"),
        }
    }
    flush_text(&mut pending, dst, dst_parent);
}

fn flush_text(pending: &mut String, dst: &mut Vec<NodeData>, parent: NodeId) {
    if !pending.is_empty() {
        alloc(dst, parent, NodeKind::Text(std::mem::take(pending)));
    }
}

fn alloc(dst: &mut Vec<NodeData>, parent: NodeId, kind: NodeKind) -> NodeId {
    let id = NodeId(dst.len() as u32);
    dst.push(NodeData::new(kind));
    dst[parent.index()].children.push(id);
    id
}

/// Fill in flattened extents and collect leaf spans, depth first.
fn flatten(
    nodes: &mut [NodeData],
    id: NodeId,
    buf: &mut String,
    cur: &mut usize,
    spans: &mut Vec<LeafSpan>,
) {
    let start = *cur;
    match &nodes[id.index()].kind {
        NodeKind::Text(s) => {
            *cur += s.chars().count();
            buf.push_str(s);
        }
        NodeKind::LineBreak => {
            buf.push('\n');
            *cur += 1;
        }
        NodeKind::Root | NodeKind::Inline(_) => {
            let children = nodes[id.index()].children.clone();
            for child in children {
                flatten(nodes, child, buf, cur, spans);
            }
        }
    }
    let node = &mut nodes[id.index()];
    node.flat_start = start;
    node.flat_len = *cur - start;
    if node.kind.is_leaf() {
        spans.push(LeafSpan {
            start,
            len: *cur - start,
            node: id,
        });
    }
}

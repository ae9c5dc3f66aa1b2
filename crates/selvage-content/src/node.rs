#![forbid(unsafe_code)]

//! Node identifiers and node kinds for content fragments.

use smallvec::SmallVec;

/// Identifier of a node within one fragment's arena.
///
/// Ids are only meaningful against the fragment that produced them; handing
/// one to a different fragment's surface is a contract violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The fragment root. Present in every fragment, never a leaf.
    pub const ROOT: NodeId = NodeId(0);

    /// Arena index of this id.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Content carried by a single node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// The fragment root.
    Root,
    /// A run of text. Never empty after fragment normalization.
    Text(String),
    /// A forced line break. Occupies exactly one flattened position.
    LineBreak,
    /// A transparent inline wrapper such as `b`, `i`, or `a`. Contributes
    /// nothing to the flattened text beyond its children.
    Inline(String),
}

impl NodeKind {
    /// Returns `true` for kinds that contribute flattened positions directly.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, NodeKind::Text(_) | NodeKind::LineBreak)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) children: SmallVec<[NodeId; 4]>,
    /// Flattened extent of this node's subtree, filled in when the fragment
    /// is built.
    pub(crate) flat_start: usize,
    pub(crate) flat_len: usize,
}

impl NodeData {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: SmallVec::new(),
            flat_start: 0,
            flat_len: 0,
        }
    }
}

#![forbid(unsafe_code)]

//! Flattened-offset to node-anchor translation for fragments.
//!
//! This is the [`AnchorCodec`] seam from `selvage-core`, implemented over
//! [`Fragment`]'s leaf span table. Encoding picks the leaf whose span holds
//! the offset; decoding adds the node-local offset back onto the node's
//! flattened start, clamping node-local overflow to the node's extent.

use selvage_core::AnchorCodec;

use crate::fragment::Fragment;
use crate::node::NodeId;

/// A native selection endpoint: a node plus a node-local offset.
///
/// For text leaves the offset counts Unicode scalar values into the run;
/// for line breaks position 0 is the break itself; for the root the offset
/// is a flattened offset directly. Anchors are only meaningful against the
/// fragment that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub node: NodeId,
    pub offset: usize,
}

impl Anchor {
    /// Anchor `offset` positions into `node`.
    #[must_use]
    pub const fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

impl AnchorCodec for Fragment {
    type Anchor = Anchor;

    /// Resolve a flattened offset to the leaf holding it.
    ///
    /// Offsets exactly between two leaves resolve to the start of the later
    /// leaf; the end of content resolves to the end of the final leaf. Out
    /// of bounds offsets clamp to the end of content. An empty fragment
    /// anchors at its root.
    fn encode(&self, offset: usize) -> Anchor {
        let offset = offset.min(self.len());
        if self.spans.is_empty() {
            return Anchor::new(NodeId::ROOT, 0);
        }
        // Spans tile [0, len), so the last span starting at or before
        // `offset` holds it; at `offset == len` that is the final leaf.
        let idx = self.spans.partition_point(|span| span.start <= offset) - 1;
        let span = self.spans[idx];
        Anchor::new(span.node, offset - span.start)
    }

    /// Resolve an anchor back to a flattened offset.
    ///
    /// Node-local offsets past the node's extent clamp to it, so every
    /// anchor built from a node of this fragment decodes.
    ///
    /// # Panics
    ///
    /// Panics if the anchor's node belongs to a different fragment.
    fn decode(&self, anchor: &Anchor) -> usize {
        let node = &self.nodes[anchor.node.index()];
        node.flat_start + anchor.offset.min(node.flat_len)
    }
}

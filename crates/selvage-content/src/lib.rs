#![forbid(unsafe_code)]

//! Content: parsed fragments, anchor translation, layout, and the headless
//! selection surface.
//!
//! # Role in Selvage
//! `selvage-content` is the document layer. It turns markup or plain text
//! into an immutable [`Fragment`] with a flattened offset index, translates
//! offsets to node anchors and back, lays text onto a monospace grid, and
//! wires it all into [`Surface`], a complete [`SelectionHost`] that works
//! without a browser.
//!
//! # Primary responsibilities
//! - **Fragment**: normalized content trees with flattened text.
//! - **Markup parsing**: the inline subset editable regions contain.
//! - **Anchor codec**: flattened offsets to node-local anchors and back.
//! - **LineMap**: caret and selection geometry on fixed metrics.
//! - **Surface**: the headless host, native slot included.
//!
//! # How it fits in the system
//! Everything selection-shaped comes from `selvage-core`; this crate never
//! defines its own range or rect types. A DOM binding would replace this
//! crate wholesale while every `Range` call site stays put.
//!
//! [`SelectionHost`]: selvage_core::SelectionHost

pub mod anchor;
pub mod fragment;
pub mod layout;
pub mod markup;
pub mod node;
pub mod surface;

pub use anchor::Anchor;
pub use fragment::{Fragment, FragmentBuilder};
pub use layout::{LineMap, Metrics};
pub use markup::MarkupError;
pub use node::{NodeId, NodeKind};
pub use surface::{NativeSelection, Surface};

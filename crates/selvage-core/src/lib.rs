#![forbid(unsafe_code)]

//! Core: selection ranges, viewport geometry, and the host traits.
//!
//! # Role in Selvage
//! `selvage-core` is the value layer. It owns the normalized [`Range`] type,
//! the [`Rect`] geometry selections report, and the traits a concrete
//! selection surface implements. Nothing here depends on a document model.
//!
//! # Primary responsibilities
//! - **Range**: order-normalized offset pairs with span/collapse arithmetic.
//! - **Rect**: viewport-space geometry for selections and carets.
//! - **SelectionHost**: the stateful surface a range selects against.
//! - **AnchorCodec**: the offset-to-anchor translation seam.
//!
//! # How it fits in the system
//! `selvage-content` implements both traits over a parsed markup fragment,
//! giving a fully headless surface. A DOM-backed binding would implement the
//! same traits against a live document; range arithmetic and every caller of
//! it stay identical across the two.

pub mod geometry;
pub mod host;
pub mod range;

pub use geometry::Rect;
pub use host::{AnchorCodec, SelectionHost};
pub use range::Range;

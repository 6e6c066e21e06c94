//! # ODT Document Model
//!
//! The addressable content tree that operations read and mutate.
//!
//! ```text
//! office:text (Body)
//!  ├─ text:p ── #text, draw:frame, ...
//!  └─ text:list (style, counter id)
//!      └─ text:list-item
//!          └─ text:p
//! ```
//!
//! Alongside the tree a [`Document`] holds the common and automatic style
//! containers, the blob store, member cursors and the derived presentation
//! [`StyleSheet`]. Cloning a document snapshots all of it, which is what the
//! editing session relies on for all-or-nothing batches.

mod document;
mod error;
mod names;
mod node;
mod signal;
mod styles;
mod stylesheet;
pub mod visitor;

pub use document::{Blob, Cursor, Document, PositionRef};
pub use error::{DocumentError, DocumentResult};
pub use names::{member_seed, ObjectNameGenerator};
pub use node::{Frame, Node, NodeId, NodeKind};
pub use signal::DocumentSignal;
pub use styles::{
    StyleContainer, StyleDef, StyleFamily, StyleProperties, StyleProperty,
    LIST_LEVEL_STYLE_PREFIX,
};
pub use stylesheet::{CssRule, StyleSheet};
pub use visitor::Visitor;

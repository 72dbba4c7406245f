//! Edition trees: the parser's output, structured for interactive editing.
//!
//! An [`EditionTree`] mirrors the grammar shape consumed from the text. The
//! [`build_skeleton`] function expands that shape from the catalog before any
//! text is read; the parser then fills skeletons in node by node. [`render`]
//! writes a tree back to formula text.

mod builder;
mod render;
mod tree;

pub use builder::{argument_type, build_skeleton, default_subtree};
pub use render::render;
pub use tree::{Content, EditionNode, EditionTree, EditionType};

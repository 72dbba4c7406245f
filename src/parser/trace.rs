//! Observation hooks for the parser.
//!
//! A [`ParseTrace`] sees every resolution step. Hooks cannot influence the
//! result; the default [`NoTrace`] does nothing.

use crate::edition::{EditionTree, EditionType};

/// Callbacks invoked while parsing.
pub trait ParseTrace {
    /// A node of the given kind is about to be resolved at `offset`.
    fn enter(&mut self, _edition_type: &EditionType, _offset: usize) {}

    /// A node was resolved; the cursor is now at `offset`.
    fn resolved(&mut self, _tree: &EditionTree, _offset: usize) {}

    /// An alternative failed and the cursor went back to `offset`.
    fn backtrack(&mut self, _offset: usize) {}
}

/// Hook that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl ParseTrace for NoTrace {}

/// Hook that emits every event as a `tracing` event at TRACE level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrace;

impl ParseTrace for LogTrace {
    fn enter(&mut self, edition_type: &EditionType, offset: usize) {
        tracing::trace!(node = %edition_type, offset, "resolving");
    }

    fn resolved(&mut self, tree: &EditionTree, offset: usize) {
        tracing::trace!(
            node = %tree.edition_type(),
            nodes = tree.size(),
            offset,
            "resolved"
        );
    }

    fn backtrack(&mut self, offset: usize) {
        tracing::trace!(offset, "backtracking");
    }
}

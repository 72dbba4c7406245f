//! Edition tree types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::spec::{BaseType, ExpType, InputType, OptArg, Operator, Value};

/// What a node of the edition tree stands for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of")]
pub enum EditionType {
    /// Root of a formula of the given type
    ReturnType(BaseType),
    /// Slot filled by one operator application producing the base type
    BaseType(BaseType),
    /// Slot filled by a literal or an operator producing the input type
    InputSelector(InputType),
    /// Literal, union or list position
    ExpType(ExpType),
    /// Optional keyword arguments of an operator
    OptArgs(Arc<[OptArg]>),
    /// A chosen operator; children are its arguments
    Operator(Arc<Operator>),
    /// One optional keyword argument; its child is the value
    OptArg(OptArg),
}

impl fmt::Display for EditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReturnType(base) => write!(f, "return {}", base),
            Self::BaseType(base) => write!(f, "base {}", base),
            Self::InputSelector(input) => write!(f, "input {}", input),
            Self::ExpType(exp) => write!(f, "type {}", exp),
            Self::OptArgs(opts) => write!(f, "{} optional args", opts.len()),
            Self::Operator(op) => write!(f, "operator {}", op.name),
            Self::OptArg(opt) => write!(f, "optional arg {}", opt.keyword()),
        }
    }
}

/// The content slot of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Content {
    /// Nothing read yet
    #[default]
    Placeholder,
    /// A literal, either read from text or a compiled-in default
    Literal(Value),
}

/// One node of the edition tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditionNode {
    pub edition_type: EditionType,
    pub content: Content,
}

impl EditionNode {
    /// Create a node with an empty content slot.
    pub fn new(edition_type: EditionType) -> Self {
        Self {
            edition_type,
            content: Content::Placeholder,
        }
    }

    /// Create a node holding a literal.
    pub fn with_value(edition_type: EditionType, value: Value) -> Self {
        Self {
            edition_type,
            content: Content::Literal(value),
        }
    }
}

/// An ordered tree of [`EditionNode`]s.
///
/// Child order is argument order for operators, declared order for optional
/// arguments and element order for lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditionTree {
    pub node: EditionNode,
    pub children: Vec<EditionTree>,
}

impl EditionTree {
    /// Create a tree from a node and its children.
    pub fn new(node: EditionNode, children: Vec<EditionTree>) -> Self {
        Self { node, children }
    }

    /// Create a childless tree.
    pub fn leaf(node: EditionNode) -> Self {
        Self::new(node, Vec::new())
    }

    pub fn edition_type(&self) -> &EditionType {
        &self.node.edition_type
    }

    /// The literal held by this node, if any.
    pub fn value(&self) -> Option<&Value> {
        match &self.node.content {
            Content::Literal(value) => Some(value),
            Content::Placeholder => None,
        }
    }

    /// The operator chosen at this node, if it is an operator node.
    pub fn operator(&self) -> Option<&Operator> {
        match &self.node.edition_type {
            EditionType::Operator(op) => Some(op),
            _ => None,
        }
    }

    /// Whether the node was filled from formula text rather than left as a
    /// skeleton (possibly carrying a default).
    pub fn is_resolved(&self) -> bool {
        match &self.node.edition_type {
            EditionType::ReturnType(_)
            | EditionType::BaseType(_)
            | EditionType::InputSelector(_) => !self.children.is_empty(),
            EditionType::ExpType(ExpType::Input(_)) => self.value().is_some(),
            EditionType::ExpType(ExpType::Series) => false,
            EditionType::ExpType(ExpType::Union(_)) | EditionType::ExpType(ExpType::List(_)) => {
                !self.children.is_empty()
            }
            EditionType::OptArgs(_) | EditionType::Operator(_) | EditionType::OptArg(_) => true,
        }
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(EditionTree::size).sum::<usize>()
    }

    /// Follow structural wrappers down to the first operator or literal.
    ///
    /// Return roots, base-type slots, input selectors, unions and optional
    /// arguments each hold a single meaningful child; this skips them.
    pub fn unwrap_slots(&self) -> &EditionTree {
        let mut tree = self;
        loop {
            match &tree.node.edition_type {
                EditionType::ReturnType(_)
                | EditionType::BaseType(_)
                | EditionType::InputSelector(_)
                | EditionType::OptArg(_)
                | EditionType::ExpType(ExpType::Union(_))
                    if tree.children.len() == 1 =>
                {
                    tree = &tree.children[0];
                }
                _ => return tree,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_slots() {
        let leaf = EditionTree::leaf(EditionNode::with_value(
            EditionType::ExpType(ExpType::Input(InputType::Int)),
            Value::Int(7),
        ));
        let selector = EditionTree::new(
            EditionNode::new(EditionType::InputSelector(InputType::Int)),
            vec![leaf.clone()],
        );
        assert_eq!(selector.unwrap_slots(), &leaf);
        assert_eq!(selector.size(), 2);
        assert!(selector.is_resolved());
    }

    #[test]
    fn test_default_is_not_resolved() {
        let default = EditionTree::leaf(EditionNode::with_value(
            EditionType::InputSelector(InputType::Number),
            Value::Number(0.0),
        ));
        assert!(!default.is_resolved());
        assert_eq!(default.value(), Some(&Value::Number(0.0)));
    }

    #[test]
    fn test_tree_serializes_for_the_editor() {
        let tree = EditionTree::leaf(EditionNode::with_value(
            EditionType::ExpType(ExpType::Input(InputType::Bool)),
            Value::Bool(true),
        ));
        let json = serde_json::to_string(&tree).unwrap();
        let back: EditionTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}

//! Skeleton construction.
//!
//! A skeleton is the grammar shape of one node, expanded from the catalog before
//! any text is read. The parser builds a fresh skeleton for every resolution
//! step and throws it away when the step backtracks.

use super::tree::{Content, EditionNode, EditionTree, EditionType};
use crate::spec::{BaseType, ExpType, OptArg};

/// Expand one grammar node into its skeleton with its immediate children.
///
/// Never fails: the shape depends only on the node's own type information.
pub fn build_skeleton(edition_type: EditionType) -> EditionTree {
    let children = match &edition_type {
        EditionType::ReturnType(base) => vec![build_skeleton(EditionType::BaseType(*base))],
        EditionType::BaseType(_) | EditionType::InputSelector(_) | EditionType::ExpType(_) => {
            Vec::new()
        }
        EditionType::Operator(op) => {
            let mut children: Vec<_> = op
                .args
                .iter()
                .map(|arg| build_skeleton(argument_type(arg)))
                .collect();
            if !op.opt_args.is_empty() {
                children.push(build_skeleton(EditionType::OptArgs(op.opt_args.clone())));
            }
            children
        }
        EditionType::OptArgs(opts) => opts
            .iter()
            .map(|opt| build_skeleton(EditionType::OptArg(opt.clone())))
            .collect(),
        EditionType::OptArg(opt) => vec![default_subtree(opt)],
    };
    EditionTree::new(EditionNode::new(edition_type), children)
}

/// The node kind that holds an argument of type `exp_type`.
pub fn argument_type(exp_type: &ExpType) -> EditionType {
    match exp_type {
        ExpType::Series => EditionType::BaseType(BaseType::Series),
        ExpType::Input(input) => EditionType::InputSelector(*input),
        ExpType::Union(_) | ExpType::List(_) => EditionType::ExpType(exp_type.clone()),
    }
}

/// The subtree standing for an optional argument absent from the text.
pub fn default_subtree(opt: &OptArg) -> EditionTree {
    let mut tree = build_skeleton(argument_type(&opt.exp_type));
    if let Some(default) = &opt.default {
        tree.node.content = Content::Literal(default.clone());
    }
    tree
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::spec::{InputType, Operator, Value};

    fn resample() -> Arc<Operator> {
        Arc::new(
            Operator::new("resample", BaseType::Series)
                .arg(ExpType::Series)
                .arg(ExpType::list(ExpType::Input(InputType::Int)))
                .opt_arg("freq", ExpType::Input(InputType::String), None)
                .opt_arg("fill", ExpType::Input(InputType::Number), Some(Value::Number(0.0))),
        )
    }

    #[test]
    fn test_return_root_wraps_series_slot() {
        let tree = build_skeleton(EditionType::ReturnType(BaseType::Series));
        assert_eq!(tree.children.len(), 1);
        assert_eq!(
            tree.children[0].edition_type(),
            &EditionType::BaseType(BaseType::Series)
        );
    }

    #[test]
    fn test_operator_skeleton() {
        let tree = build_skeleton(EditionType::Operator(resample()));
        let kinds: Vec<_> = tree.children.iter().map(|c| c.edition_type().clone()).collect();
        assert_eq!(kinds.len(), 3);
        assert_eq!(kinds[0], EditionType::BaseType(BaseType::Series));
        assert_eq!(
            kinds[1],
            EditionType::ExpType(ExpType::list(ExpType::Input(InputType::Int)))
        );
        assert!(matches!(kinds[2], EditionType::OptArgs(_)));
    }

    #[test]
    fn test_opt_args_prepopulated_with_defaults() {
        let op = resample();
        let tree = build_skeleton(EditionType::OptArgs(op.opt_args.clone()));
        assert_eq!(tree.children.len(), 2);

        let freq = &tree.children[0].children[0];
        assert_eq!(freq.edition_type(), &EditionType::InputSelector(InputType::String));
        assert_eq!(freq.value(), None);

        let fill = &tree.children[1].children[0];
        assert_eq!(fill.value(), Some(&Value::Number(0.0)));
        assert!(!fill.is_resolved());
    }

    #[test]
    fn test_operator_without_opt_args_has_no_group() {
        let op = Arc::new(Operator::new("today", BaseType::Input(InputType::Timestamp)));
        let tree = build_skeleton(EditionType::Operator(op));
        assert!(tree.children.is_empty());
    }
}

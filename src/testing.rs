//! Shared spec fixture for unit tests.

use crate::edition::{EditionTree, EditionType};
use crate::spec::{BaseType, ExpType, InputType, Operator, Spec, Value};

fn input(input: InputType) -> ExpType {
    ExpType::Input(input)
}

/// A small catalog exercising every kind of argument type.
pub(crate) fn sample_spec() -> Spec {
    Spec::new()
        .with_operator(
            Operator::new("series", BaseType::Series)
                .arg(input(InputType::String))
                .opt_arg("fill", ExpType::union([input(InputType::Int), input(InputType::String)]), None)
                .opt_arg("from", input(InputType::Timestamp), None),
        )
        .with_operator(
            Operator::new("add", BaseType::Series)
                .arg(input(InputType::Number))
                .arg(input(InputType::Number)),
        )
        .with_operator(
            Operator::new("op", BaseType::Series)
                .opt_arg("a", input(InputType::Int), Some(Value::Int(10)))
                .opt_arg("b", input(InputType::Int), Some(Value::Int(20))),
        )
        .with_operator(
            Operator::new("pick", BaseType::Series)
                .arg(ExpType::union([input(InputType::Int), input(InputType::Number)])),
        )
        .with_operator(Operator::new("ints", BaseType::Series).arg(ExpType::list(input(InputType::Int))))
        .with_operator(Operator::new("sum", BaseType::Series).arg(ExpType::list(ExpType::Series)))
        .with_operator(
            Operator::new("shift", BaseType::Series)
                .arg(ExpType::Series)
                .arg(input(InputType::Timestamp))
                .opt_arg("strict", input(InputType::Bool), Some(Value::Bool(false))),
        )
        .with_operator(Operator::new("dup", BaseType::Series).arg(input(InputType::Int)))
        .with_operator(Operator::new("dup", BaseType::Series).arg(input(InputType::String)))
        .with_operator(
            Operator::new("mul", BaseType::Input(InputType::Number))
                .arg(input(InputType::Number))
                .arg(input(InputType::Number)),
        )
        .with_operator(Operator::new("today", BaseType::Input(InputType::Timestamp)))
}

/// The operator application under a top-level root.
pub(crate) fn top_operator(tree: &EditionTree) -> &EditionTree {
    let op = tree.unwrap_slots();
    assert!(
        matches!(op.edition_type(), EditionType::Operator(_)),
        "expected an operator, got {}",
        op.edition_type()
    );
    op
}

/// The literal under an argument slot.
pub(crate) fn literal(arg: &EditionTree) -> Option<&Value> {
    arg.unwrap_slots().value()
}

//! Operators and the [`Spec`] catalog that groups them by base type.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::types::{BaseType, ExpType, Value};
use crate::error::Result;

/// An optional keyword argument of an operator, written `#:name value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptArg {
    /// Keyword name, without the `#:` prefix
    pub name: String,
    /// Accepted type of the value
    pub exp_type: ExpType,
    /// Value used when the argument is absent, if any
    pub default: Option<Value>,
}

impl OptArg {
    /// Create an optional argument.
    pub fn new(name: impl Into<String>, exp_type: ExpType, default: Option<Value>) -> Self {
        Self {
            name: name.into(),
            exp_type,
            default,
        }
    }

    /// The keyword as written in formula text.
    pub fn keyword(&self) -> String {
        format!("#:{}", self.name)
    }
}

/// A named, parenthesized function-call form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    /// Keyword following the opening parenthesis
    pub name: String,
    /// Base type of the value the operator produces
    pub return_type: BaseType,
    /// Required positional arguments, in order
    pub args: Vec<ExpType>,
    /// Optional keyword arguments, in declared order
    pub opt_args: Arc<[OptArg]>,
}

impl Operator {
    /// Create an operator with no arguments.
    pub fn new(name: impl Into<String>, return_type: BaseType) -> Self {
        Self {
            name: name.into(),
            return_type,
            args: Vec::new(),
            opt_args: Arc::new([]),
        }
    }

    /// Append a required argument.
    pub fn arg(mut self, exp_type: ExpType) -> Self {
        self.args.push(exp_type);
        self
    }

    /// Append an optional keyword argument.
    pub fn opt_arg(mut self, name: impl Into<String>, exp_type: ExpType, default: Option<Value>) -> Self {
        let mut opt_args = self.opt_args.to_vec();
        opt_args.push(OptArg::new(name, exp_type, default));
        self.opt_args = opt_args.into();
        self
    }
}

/// The catalog of operators that defines the formula grammar.
///
/// Operators are grouped by the base type they return and kept in declaration
/// order, which is also the order in which the parser tries them.
#[derive(Debug, Clone, Default)]
pub struct Spec {
    operators: HashMap<BaseType, Vec<Arc<Operator>>>,
    /// Every operator, in declaration order across all base types.
    declared: Vec<Arc<Operator>>,
}

impl Spec {
    /// Create an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operator after those already declared for its return type.
    pub fn add_operator(&mut self, operator: Operator) {
        let operator = Arc::new(operator);
        self.operators
            .entry(operator.return_type)
            .or_default()
            .push(operator.clone());
        self.declared.push(operator);
    }

    /// Builder form of [`Spec::add_operator`].
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.add_operator(operator);
        self
    }

    /// Operators producing `base`, in declaration order. Empty if none.
    pub fn operators(&self, base: &BaseType) -> &[Arc<Operator>] {
        self.operators.get(base).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over every operator in declaration order.
    pub fn all_operators(&self) -> impl Iterator<Item = &Arc<Operator>> {
        self.declared.iter()
    }

    /// Total number of declared operators.
    pub fn len(&self) -> usize {
        self.declared.len()
    }

    /// Whether no operator is declared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that the catalog is well formed.
    pub fn validate(&self) -> Result<()> {
        super::validate::validate_spec(self)
    }
}

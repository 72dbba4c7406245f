//! The typed operator catalog that defines the grammar.
//!
//! A [`Spec`] lists, for each [`BaseType`], the operators producing it. Each
//! [`Operator`] declares required argument types and optional keyword
//! arguments. Argument types are [`ExpType`]s, which nest through unions and
//! lists and may refer back to any base type, including the operator's own.
//!
//! Specs are built once, either in code or from a JSON catalog, and are only
//! read while parsing.

mod catalog;
mod operator;
mod types;
mod validate;

pub use operator::{OptArg, Operator, Spec};
pub use types::{BaseType, ExpType, InputType, Value};
pub use validate::validate_spec;

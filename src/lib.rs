//! # Formula Editor Core
//!
//! A catalog-driven parser for s-expression formulas.
//!
//! This library provides:
//! - A typed operator catalog ([`Spec`]) that fully determines the grammar
//! - A recursive-descent parser producing editable trees ([`EditionTree`])
//! - Readable error reports pointing at the furthest point reached
//! - A renderer writing trees back to formula text
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`spec`] - Base types, expression types, operators and JSON catalogs
//! - [`edition`] - Edition trees, skeleton construction and rendering
//! - [`parser`] - Cursor, recursive-descent engine and error reporting
//! - [`error`] - Unified error type
//!
//! ## Usage
//!
//! ```
//! use formula_editor_core::{parse, BaseType, ExpType, InputType, Operator, Spec};
//!
//! let spec = Spec::new().with_operator(
//!     Operator::new("series", BaseType::Series)
//!         .arg(ExpType::Input(InputType::String))
//!         .opt_arg("fill", ExpType::Input(InputType::Number), None),
//! );
//!
//! let tree = parse(&spec, r#"(series "gas.fr" #:fill 0.5)"#).unwrap();
//! assert_eq!(tree.to_string(), r#"(series "gas.fr" #:fill 0.5)"#);
//!
//! let err = parse(&spec, r#"(series "gas.fr""#).unwrap_err();
//! assert!(err.to_string().starts_with("Expecting"));
//! ```
//!
//! ## Parsing Method
//!
//! Parsing starts from a skeleton built from the catalog before any text is
//! read. Each skeleton node is resolved against the text in turn:
//!
//! 1. Operator slots read `(`, try each operator keyword of the base type in
//!    declaration order, then read `)`
//! 2. Unions try their alternatives in order; the first that parses wins
//! 3. Failed alternatives put the cursor back where they started
//!
//! When nothing matches, the problems recorded furthest into the text form
//! the error report.

pub mod edition;
pub mod error;
pub mod parser;
pub mod spec;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use edition::{render, EditionNode, EditionTree, EditionType};
pub use error::{FormulaError, Result};
pub use parser::{parse, parse_with, ParseOptions};
pub use spec::{BaseType, ExpType, InputType, OptArg, Operator, Spec, Value};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmFormulaParser;

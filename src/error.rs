//! Error types for the formula editor core.
//!
//! This module provides a unified error type [`FormulaError`] that covers
//! all error conditions that can occur while loading a spec catalog and
//! while parsing formula text against it.

use thiserror::Error;

use crate::parser::ParseFailure;

/// Result type alias using [`FormulaError`].
pub type Result<T> = std::result::Result<T, FormulaError>;

/// Unified error type for all formula editor operations.
#[derive(Error, Debug)]
pub enum FormulaError {
    // ============ Formula Parsing Errors ============
    /// The formula text does not match the grammar derived from the catalog.
    ///
    /// Displays as the formatted dead-end report, one line per dead end.
    #[error("{0}")]
    Syntax(ParseFailure),

    // ============ Spec Errors ============
    /// Unknown type name in a type expression
    #[error("Unknown type '{name}' in type expression '{expr}'")]
    UnknownType { name: String, expr: String },

    /// Malformed type expression
    #[error("Invalid type expression '{expr}': {message}")]
    InvalidTypeExpr { expr: String, message: String },

    /// Union declared without any alternative
    #[error("Empty union in {context}")]
    EmptyUnion { context: String },

    /// Optional argument default incompatible with its declared type
    #[error("Invalid default for optional argument '{arg}' of operator '{operator}': {message}")]
    InvalidDefault {
        operator: String,
        arg: String,
        message: String,
    },

    /// A spec with nothing able to produce a top-level series
    #[error("Spec declares no operator returning Series")]
    MissingSeriesOperators,

    // ============ I/O Errors ============
    /// Malformed catalog document
    #[error("Invalid spec catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reading a catalog file
    #[error("Failed to read spec catalog '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FormulaError {
    /// Create an invalid type expression error
    pub fn invalid_type_expr(expr: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTypeExpr {
            expr: expr.into(),
            message: message.into(),
        }
    }

    /// Create an invalid default error
    pub fn invalid_default(
        operator: impl Into<String>,
        arg: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidDefault {
            operator: operator.into(),
            arg: arg.into(),
            message: message.into(),
        }
    }

    /// The dead ends of a syntax error, if this is one.
    pub fn parse_failure(&self) -> Option<&ParseFailure> {
        match self {
            Self::Syntax(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<ParseFailure> for FormulaError {
    fn from(failure: ParseFailure) -> Self {
        Self::Syntax(failure)
    }
}

//! Formula parser.
//!
//! Formulas are s-expressions whose shape is fixed by a [`Spec`]: every
//! formula is one operator application producing a Series, and each argument
//! position accepts what its declared type allows.
//!
//! # Grammar Overview
//!
//! ```text
//! formula      = application(Series) end
//! application  = '(' operator-name argument* opt-argument* ')'
//! argument     = literal | application | list | union member
//! list         = '(' element* ')'
//! opt-argument = '#:' name argument
//!
//! literal      = int | number | string | bool | timestamp
//! int          = ['-'] digit+
//! number       = ['-'] digit+ ['.' digit*] [('e'|'E') ['-'|'+'] digit+]
//! string       = '"' { char | '\' ('"' | '\' | 'n' | 't' | 'r') } '"'
//! bool         = "#t" | "#f"
//! timestamp    = '"' YYYY-MM-DD [('T'|' ') HH:MM:SS] '"'
//! ```
//!
//! Whitespace separates tokens; `;` starts a comment running to the end of
//! the line. Operator keywords are matched in declaration order and the first
//! operator whose name matches reads the arguments, so a later operator with
//! the same name is never reached. Union members are tried in order and the
//! first that parses wins. Optional arguments may come in any order but at
//! most once each.
//!
//! # Example
//!
//! ```text
//! ; weekly average of two summed series
//! (resample (add ((series "gas.fr") (series "gas.de"))) "W" #:method "mean")
//! ```

mod cursor;
mod engine;
mod problem;
mod trace;

pub use problem::{report, DeadEnd, ParseFailure, Problem};
pub use trace::{LogTrace, NoTrace, ParseTrace};

use crate::edition::EditionTree;
use crate::error::Result;
use crate::spec::Spec;
use engine::Engine;

/// Parser settings.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Maximum number of nested resolution steps; unbounded when `None`.
    pub max_depth: Option<usize>,
}

impl ParseOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how deeply a formula may nest.
    ///
    /// The parser recurses once per tree node, so untrusted input should be
    /// parsed with a limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Parse a formula into an edition tree.
pub fn parse(spec: &Spec, source: &str) -> Result<EditionTree> {
    parse_with(spec, source, &ParseOptions::default(), &mut NoTrace)
}

/// Parse a formula with explicit options and a trace hook.
pub fn parse_with(
    spec: &Spec,
    source: &str,
    options: &ParseOptions,
    trace: &mut dyn ParseTrace,
) -> Result<EditionTree> {
    let tree = Engine::new(spec, source, options, trace).run()?;
    Ok(tree)
}

//! Parse problems, dead ends and the error report.

use std::fmt;

use thiserror::Error;

use crate::spec::BaseType;

/// Why a parse attempt failed at a given position.
#[derive(Debug, Clone, PartialEq)]
pub enum Problem {
    /// A literal of the named kind (string, boolean, ...)
    Expecting(String),
    ExpectingInt,
    /// A malformed fraction or exponent
    ExpectingFloat,
    ExpectingNumber,
    ExpectingSymbol(String),
    ExpectingKeyword(String),
    ExpectingEnd,
    UnexpectedChar,
    /// The catalog declares no operator producing this base type
    NoOperator(BaseType),
    /// The same optional argument keyword appears twice
    DuplicateKeyword(String),
    /// A Series position reached as a literal
    SeriesLiteral,
    InvalidTimestamp(String),
    /// Nesting deeper than the configured limit
    TooDeep(usize),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expecting(what) => write!(f, "Expecting {}", what),
            Self::ExpectingInt => f.write_str("Expecting int"),
            Self::ExpectingFloat => f.write_str("Expecting float"),
            Self::ExpectingNumber => f.write_str("Expecting number"),
            Self::ExpectingSymbol(symbol) => write!(f, "Expecting symbol '{}'", symbol),
            Self::ExpectingKeyword(keyword) => write!(f, "Expecting keyword '{}'", keyword),
            Self::ExpectingEnd => f.write_str("Expecting end"),
            Self::UnexpectedChar => f.write_str("Unexpected char"),
            Self::NoOperator(base) => write!(f, "Problem: no operator for base type {}", base),
            Self::DuplicateKeyword(keyword) => {
                write!(f, "Problem: duplicate keyword '{}'", keyword)
            }
            Self::SeriesLiteral => f.write_str("Problem: a Series cannot be written as a literal"),
            Self::InvalidTimestamp(text) => write!(f, "Problem: invalid timestamp \"{}\"", text),
            Self::TooDeep(limit) => write!(f, "Problem: formula nested deeper than {}", limit),
        }
    }
}

/// A failure recorded at the furthest point the parser reached.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadEnd {
    /// Line number (1-indexed)
    pub row: usize,
    /// Column number in characters (1-indexed)
    pub col: usize,
    pub problem: Problem,
}

impl fmt::Display for DeadEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at row:{} col:{}", self.problem, self.row, self.col)
    }
}

/// Format dead ends as one line each, in order.
pub fn report(dead_ends: &[DeadEnd]) -> String {
    dead_ends
        .iter()
        .map(DeadEnd::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Terminal failure of a parse.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", report(.dead_ends))]
pub struct ParseFailure {
    pub dead_ends: Vec<DeadEnd>,
}

/// Failures collected while exploring alternatives.
///
/// Only the furthest offset is kept: a failure further into the text replaces
/// everything recorded so far, one at the same offset is appended.
#[derive(Debug, Default)]
pub(crate) struct Failures {
    offset: usize,
    problems: Vec<Problem>,
}

impl Failures {
    pub(crate) fn record(&mut self, offset: usize, problem: Problem) {
        if self.problems.is_empty() || offset > self.offset {
            self.offset = offset;
            self.problems.clear();
        }
        if offset == self.offset {
            self.problems.push(problem);
        }
    }

    pub(crate) fn into_failure(self, input: &str) -> ParseFailure {
        let (row, col) = position(input, self.offset);
        ParseFailure {
            dead_ends: self
                .problems
                .into_iter()
                .map(|problem| DeadEnd { row, col, problem })
                .collect(),
        }
    }
}

/// Row and column (1-indexed, columns in characters) of a byte offset.
pub(crate) fn position(input: &str, offset: usize) -> (usize, usize) {
    let before = &input[..offset.min(input.len())];
    let row = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let col = before[line_start..].chars().count() + 1;
    (row, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_one_line_per_dead_end() {
        let dead_ends = vec![
            DeadEnd {
                row: 1,
                col: 9,
                problem: Problem::ExpectingSymbol(")".to_string()),
            },
            DeadEnd {
                row: 1,
                col: 9,
                problem: Problem::ExpectingKeyword("#:fill".to_string()),
            },
            DeadEnd {
                row: 1,
                col: 9,
                problem: Problem::ExpectingSymbol(")".to_string()),
            },
        ];
        assert_eq!(
            report(&dead_ends),
            "Expecting symbol ')' at row:1 col:9\n\
             Expecting keyword '#:fill' at row:1 col:9\n\
             Expecting symbol ')' at row:1 col:9"
        );
    }

    #[test]
    fn test_furthest_failure_wins() {
        let mut failures = Failures::default();
        failures.record(3, Problem::ExpectingInt);
        failures.record(7, Problem::ExpectingNumber);
        failures.record(5, Problem::ExpectingEnd);
        failures.record(7, Problem::UnexpectedChar);

        let failure = failures.into_failure("(add 1 2)");
        assert_eq!(failure.dead_ends.len(), 2);
        assert_eq!(failure.dead_ends[0].problem, Problem::ExpectingNumber);
        assert_eq!(failure.dead_ends[1].problem, Problem::UnexpectedChar);
        assert_eq!(failure.dead_ends[0].col, 8);
    }

    #[test]
    fn test_position_counts_rows_and_chars() {
        assert_eq!(position("abc", 0), (1, 1));
        assert_eq!(position("(a\n  b", 5), (2, 3));
        assert_eq!(position("\"é\" x", 5), (1, 5));
    }
}

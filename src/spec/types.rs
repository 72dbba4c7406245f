//! Core types of the formula grammar: literal inputs, base types and
//! expression types.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{FormulaError, Result};

/// Accepted textual forms of a timestamp literal.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// How a literal token is read into a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputType {
    /// Signed integer, e.g. `42`
    Int,
    /// Integer or decimal number, e.g. `1.5e3`
    Number,
    /// Double-quoted string, e.g. `"gas.fr"`
    String,
    /// `#t` or `#f`
    Bool,
    /// Double-quoted date or date-time, e.g. `"2020-01-01"`
    Timestamp,
}

impl InputType {
    /// Parse an input type from its catalog name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Int" | "int" => Some(Self::Int),
            "Number" => Some(Self::Number),
            "String" | "str" => Some(Self::String),
            "Bool" | "bool" => Some(Self::Bool),
            "Timestamp" => Some(Self::Timestamp),
            _ => None,
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "Int",
            Self::Number => "Number",
            Self::String => "String",
            Self::Bool => "Bool",
            Self::Timestamp => "Timestamp",
        };
        f.write_str(name)
    }
}

/// A literal value read from formula text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Int(i64),
    Number(f64),
    String(String),
    Bool(bool),
    Timestamp(NaiveDateTime),
}

impl Value {
    /// The input type this value was read as.
    pub fn input_type(&self) -> InputType {
        match self {
            Self::Int(_) => InputType::Int,
            Self::Number(_) => InputType::Number,
            Self::String(_) => InputType::String,
            Self::Bool(_) => InputType::Bool,
            Self::Timestamp(_) => InputType::Timestamp,
        }
    }

    /// Parse the body of a timestamp literal (without quotes).
    ///
    /// A bare date is read as midnight.
    pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
        TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }
}

/// Writes the value in formula source syntax.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Number(x) => {
                let text = x.to_string();
                // Keep a fraction so the text never reads back as an Int.
                if text.contains(|c| matches!(c, '.' | 'e' | 'E')) || !x.is_finite() {
                    f.write_str(&text)
                } else {
                    write!(f, "{}.0", text)
                }
            }
            Self::String(s) => {
                f.write_str("\"")?;
                for ch in s.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        _ => write!(f, "{}", ch)?,
                    }
                }
                f.write_str("\"")
            }
            Self::Bool(true) => f.write_str("#t"),
            Self::Bool(false) => f.write_str("#f"),
            Self::Timestamp(ts) => {
                if ts.time() == chrono::NaiveTime::MIN {
                    write!(f, "\"{}\"", ts.format("%Y-%m-%d"))
                } else {
                    write!(f, "\"{}\"", ts.format("%Y-%m-%dT%H:%M:%S"))
                }
            }
        }
    }
}

/// A fundamental value category for which operators are declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseType {
    /// A time series; every formula is a series expression at top level.
    Series,
    /// A scalar that may also be written as a literal.
    Input(InputType),
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Series => f.write_str("Series"),
            Self::Input(input) => write!(f, "{}", input),
        }
    }
}

/// The type of an operator argument.
///
/// Type expressions read and print as `Series`, `Int`, `Number`, `String`,
/// `Bool`, `Timestamp`, `Union[t, ...]` and `List[t]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpType {
    /// A literal, or an operator returning that input type
    Input(InputType),
    /// A series expression; never a literal
    Series,
    /// Ordered alternatives, the first one that parses wins
    Union(Arc<[ExpType]>),
    /// Zero or more elements between parentheses
    List(Arc<ExpType>),
}

impl ExpType {
    /// Build a union from its alternatives, in priority order.
    pub fn union(alternatives: impl IntoIterator<Item = ExpType>) -> Self {
        Self::Union(alternatives.into_iter().collect())
    }

    /// Build a list of `element`.
    pub fn list(element: ExpType) -> Self {
        Self::List(Arc::new(element))
    }

    /// Whether a literal of `input` can appear in this position.
    pub fn admits(&self, input: InputType) -> bool {
        match self {
            Self::Input(t) => *t == input,
            Self::Union(alternatives) => alternatives.iter().any(|alt| alt.admits(input)),
            Self::Series | Self::List(_) => false,
        }
    }

    /// Whether `value` is a valid literal for this type.
    pub fn accepts(&self, value: &Value) -> bool {
        self.admits(value.input_type())
    }

    /// Whether a union anywhere inside this type has no alternative.
    pub fn has_empty_union(&self) -> bool {
        match self {
            Self::Input(_) | Self::Series => false,
            Self::Union(alternatives) => {
                alternatives.is_empty() || alternatives.iter().any(ExpType::has_empty_union)
            }
            Self::List(element) => element.has_empty_union(),
        }
    }
}

impl From<BaseType> for ExpType {
    fn from(base: BaseType) -> Self {
        match base {
            BaseType::Series => Self::Series,
            BaseType::Input(input) => Self::Input(input),
        }
    }
}

impl fmt::Display for ExpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(input) => write!(f, "{}", input),
            Self::Series => f.write_str("Series"),
            Self::Union(alternatives) => {
                f.write_str("Union[")?;
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", alt)?;
                }
                f.write_str("]")
            }
            Self::List(element) => write!(f, "List[{}]", element),
        }
    }
}

impl FromStr for ExpType {
    type Err = FormulaError;

    fn from_str(expr: &str) -> Result<Self> {
        let mut reader = TypeExprReader { expr, pos: 0 };
        let exp_type = reader.read_type()?;
        reader.skip_spaces();
        if reader.pos != expr.len() {
            return Err(FormulaError::invalid_type_expr(
                expr,
                format!("unexpected trailing text at offset {}", reader.pos),
            ));
        }
        Ok(exp_type)
    }
}

/// Recursive reader for type expressions such as `Union[Int, List[Series]]`.
struct TypeExprReader<'a> {
    expr: &'a str,
    pos: usize,
}

impl<'a> TypeExprReader<'a> {
    fn read_type(&mut self) -> Result<ExpType> {
        self.skip_spaces();
        let name = self.read_name();
        if name.is_empty() {
            return Err(FormulaError::invalid_type_expr(
                self.expr,
                format!("expected a type name at offset {}", self.pos),
            ));
        }

        match name {
            "Union" => {
                let alternatives = self.read_parameters()?;
                if alternatives.is_empty() {
                    return Err(FormulaError::EmptyUnion {
                        context: format!("type expression '{}'", self.expr),
                    });
                }
                Ok(ExpType::Union(alternatives.into()))
            }
            "List" => {
                let mut parameters = self.read_parameters()?;
                if parameters.len() != 1 {
                    return Err(FormulaError::invalid_type_expr(
                        self.expr,
                        format!("List takes one parameter, got {}", parameters.len()),
                    ));
                }
                Ok(ExpType::list(parameters.remove(0)))
            }
            "Series" => Ok(ExpType::Series),
            _ => InputType::from_name(name)
                .map(ExpType::Input)
                .ok_or_else(|| FormulaError::UnknownType {
                    name: name.to_string(),
                    expr: self.expr.to_string(),
                }),
        }
    }

    fn read_parameters(&mut self) -> Result<Vec<ExpType>> {
        self.skip_spaces();
        self.expect('[')?;
        let mut parameters = Vec::new();
        self.skip_spaces();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(parameters);
        }
        loop {
            parameters.push(self.read_type()?);
            self.skip_spaces();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    return Ok(parameters);
                }
                _ => {
                    return Err(FormulaError::invalid_type_expr(
                        self.expr,
                        format!("expected ',' or ']' at offset {}", self.pos),
                    ))
                }
            }
        }
    }

    fn read_name(&mut self) -> &'a str {
        let expr = self.expr;
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        &expr[start..self.pos]
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(FormulaError::invalid_type_expr(
                self.expr,
                format!("expected '{}' at offset {}", expected, self.pos),
            ))
        }
    }

    fn peek(&self) -> Option<char> {
        self.expr[self.pos..].chars().next()
    }

    fn skip_spaces(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }
}

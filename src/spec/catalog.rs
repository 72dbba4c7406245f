//! JSON operator catalogs.
//!
//! The editor receives its spec as a JSON document listing every operator:
//!
//! ```json
//! { "operators": [
//!   { "name": "series", "return": "Series", "args": ["String"],
//!     "optional": [ { "name": "fill", "type": "Number", "default": 0 } ] } ] }
//! ```
//!
//! Types are written as type expressions (see [`ExpType`]). Defaults are
//! JSON scalars read according to the declared type; `null` means no default.

use std::path::Path;

use serde::Deserialize;

use super::types::{BaseType, ExpType, InputType, Value};
use super::{Operator, Spec};
use crate::error::{FormulaError, Result};

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    operators: Vec<CatalogOperator>,
}

#[derive(Debug, Deserialize)]
struct CatalogOperator {
    name: String,
    #[serde(rename = "return")]
    return_type: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    optional: Vec<CatalogOptArg>,
}

#[derive(Debug, Deserialize)]
struct CatalogOptArg {
    name: String,
    #[serde(rename = "type")]
    type_expr: String,
    #[serde(default)]
    default: serde_json::Value,
}

impl Spec {
    /// Build and validate a spec from a JSON catalog document.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;

        let mut spec = Spec::new();
        for entry in document.operators {
            spec.add_operator(entry.into_operator()?);
        }
        spec.validate()?;

        tracing::debug!(operators = spec.len(), "loaded formula spec catalog");
        Ok(spec)
    }

    /// Build and validate a spec from a JSON catalog file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FormulaError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&content)
    }
}

impl CatalogOperator {
    fn into_operator(self) -> Result<Operator> {
        let return_type = match self.return_type.parse::<ExpType>()? {
            ExpType::Series => BaseType::Series,
            ExpType::Input(input) => BaseType::Input(input),
            other => {
                return Err(FormulaError::invalid_type_expr(
                    self.return_type,
                    format!("operator '{}' must return a base type, not {}", self.name, other),
                ))
            }
        };

        let mut operator = Operator::new(&self.name, return_type);
        for arg in &self.args {
            operator = operator.arg(arg.parse()?);
        }
        for opt in self.optional {
            let exp_type: ExpType = opt.type_expr.parse()?;
            let default = default_value(&opt.default, &exp_type)
                .map_err(|message| FormulaError::invalid_default(&self.name, &opt.name, message))?;
            operator = operator.opt_arg(opt.name, exp_type, default);
        }
        Ok(operator)
    }
}

/// Read a JSON default according to the type it must fit.
fn default_value(json: &serde_json::Value, exp_type: &ExpType) -> std::result::Result<Option<Value>, String> {
    use serde_json::Value as Json;

    let value = match json {
        Json::Null => return Ok(None),
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) if exp_type.admits(InputType::Int) => Value::Int(i),
            _ => n
                .as_f64()
                .map(Value::Number)
                .ok_or_else(|| format!("{} is not representable", n))?,
        },
        Json::String(s) => match Value::parse_timestamp(s) {
            Some(ts) if exp_type.admits(InputType::Timestamp) => Value::Timestamp(ts),
            _ => Value::String(s.clone()),
        },
        Json::Array(_) | Json::Object(_) => {
            return Err(format!("{} is not a scalar", json));
        }
    };
    Ok(Some(value))
}

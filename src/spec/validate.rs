//! Spec validation.

use crate::error::{FormulaError, Result};

use super::{BaseType, Spec};

/// Validate a spec before parsing with it.
///
/// Checks:
/// - At least one operator produces a top-level Series
/// - No argument type contains an empty union
/// - Every optional argument default fits its declared type
pub fn validate_spec(spec: &Spec) -> Result<()> {
    if spec.operators(&BaseType::Series).is_empty() {
        return Err(FormulaError::MissingSeriesOperators);
    }

    for operator in spec.all_operators() {
        for (i, arg) in operator.args.iter().enumerate() {
            if arg.has_empty_union() {
                return Err(FormulaError::EmptyUnion {
                    context: format!("argument {} of operator '{}'", i + 1, operator.name),
                });
            }
        }

        for opt in operator.opt_args.iter() {
            if opt.exp_type.has_empty_union() {
                return Err(FormulaError::EmptyUnion {
                    context: format!(
                        "optional argument '{}' of operator '{}'",
                        opt.name, operator.name
                    ),
                });
            }
            if let Some(default) = &opt.default {
                if !opt.exp_type.accepts(default) {
                    return Err(FormulaError::invalid_default(
                        &operator.name,
                        &opt.name,
                        format!("{} is not a {}", default, opt.exp_type),
                    ));
                }
            }
        }
    }

    Ok(())
}

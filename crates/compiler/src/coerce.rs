//! Numeric coercion of user-typed literals.

use crate::error::CoercionError;
use model::{Expression, Literal};
use serde_json::Number;
use tracing::debug;

/// Parses `literal` as a number. Integers stay integers.
pub fn coerce_number(literal: &Literal) -> Result<Number, CoercionError> {
    match literal {
        Literal::Number(n) => Ok(n.clone()),
        Literal::Text(raw) => {
            let raw = raw.trim();
            if let Ok(n) = raw.parse::<i64>() {
                return Ok(Number::from(n));
            }
            raw.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .ok_or_else(|| CoercionError::NotNumeric(literal.clone()))
        }
        _ => Err(CoercionError::NotNumeric(literal.clone())),
    }
}

/// Parses `literal` as an integer; fractional values are truncated.
pub fn coerce_integer(literal: &Literal) -> Result<i64, CoercionError> {
    let number = coerce_number(literal).map_err(|_| CoercionError::NotInteger(literal.clone()))?;

    if let Some(n) = number.as_i64() {
        return Ok(n);
    }

    number
        .as_f64()
        .map(f64::trunc)
        .filter(|n| *n >= i64::MIN as f64 && *n <= i64::MAX as f64)
        .map(|n| n as i64)
        .ok_or(CoercionError::NotInteger(literal.clone()))
}

/// Numeric operand, or the raw literal when it does not parse.
pub(crate) fn number_or_raw(literal: &Literal) -> Expression {
    match coerce_number(literal) {
        Ok(n) => Expression::Literal(Literal::Number(n)),
        Err(err) => {
            debug!("{}; passing it through unchanged", err);
            Expression::Literal(literal.clone())
        }
    }
}

/// Integer operand, or the raw literal when it does not parse.
pub(crate) fn integer_or_raw(literal: &Literal) -> Expression {
    match coerce_integer(literal) {
        Ok(n) => Expression::literal(n),
        Err(err) => {
            debug!("{}; passing it through unchanged", err);
            Expression::Literal(literal.clone())
        }
    }
}

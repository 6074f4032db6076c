//! Integer helpers: random ranges and the `int` conversion.

use rand::Rng;

use crate::eval::{EvalContext, HelperError};
use crate::types::Value;

/// The `random_number` helper: a uniform random integer with inclusive
/// bounds. An inverted range is a data error.
pub fn random_number(ctx: &mut EvalContext, min: &Value, max: &Value) -> Result<Value, HelperError> {
    let min = to_int(min)?;
    let max = to_int(max)?;
    if min > max {
        return Err(HelperError::InvertedRange { min, max });
    }
    Ok(Value::Number(ctx.rng_mut().gen_range(min..=max)))
}

/// The `int` helper: convert a value to an integer.
pub fn int(value: &Value) -> Result<Value, HelperError> {
    Ok(Value::Number(to_int(value)?))
}

/// Convert a value to `i64`, accepting integer-like strings, floats
/// (truncated toward zero), and booleans.
pub fn to_int(value: &Value) -> Result<i64, HelperError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Float(f) => Ok(f.trunc() as i64),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| HelperError::NotAnInteger { value: s.clone() }),
        other => Err(HelperError::NotAnInteger { value: other.to_string() }),
    }
}

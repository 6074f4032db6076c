//! The `reference` helper: resolve a value to an identified object row.

use crate::eval::{EvalContext, HelperError};
use crate::types::Value;

/// Resolve `x` to an object row carrying an identifier.
///
/// - A row that already has an id is returned unchanged.
/// - A string names a field variable; the name must be in scope and the
///   bound value must be a row with an id.
/// - Anything else cannot be referenced.
pub fn reference(ctx: &EvalContext, x: &Value) -> Result<Value, HelperError> {
    match x {
        Value::Row(row) if row.has_id() => Ok(Value::Row(row.clone())),
        Value::String(name) => {
            let bound = ctx
                .field_var(name)
                .ok_or_else(|| HelperError::UnknownFieldVar { name: name.clone() })?;
            match bound {
                Value::Row(row) if row.has_id() => Ok(Value::Row(row.clone())),
                other => Err(HelperError::NotReferenceable { value: other.to_string() }),
            }
        }
        other => Err(HelperError::NotReferenceable { value: other.to_string() }),
    }
}

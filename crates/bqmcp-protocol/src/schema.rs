//! Presence checks of tool arguments against a descriptor's `inputSchema`.
//!
//! Only the `required` list is enforced. Value types are left to the
//! warehouse, which rejects what it cannot use.

use serde_json::Value;
use thiserror::Error;

/// Argument validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A required argument is absent (or explicitly `null`).
    #[error("argomento obbligatorio mancante: {field}")]
    MissingField { field: String },
    /// The arguments are not a JSON object.
    #[error("gli argomenti devono essere un oggetto JSON")]
    NotAnObject,
    /// The schema itself is malformed.
    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },
}

/// Checks that `input` carries every property listed in `schema.required`.
///
/// A `null` value counts as missing. Schemas without a `required` array
/// accept any object.
pub fn validate_required_fields(schema: &Value, input: &Value) -> Result<(), SchemaError> {
    let input_obj = input.as_object().ok_or(SchemaError::NotAnObject)?;

    let required = match schema.get("required") {
        Some(Value::Array(arr)) => arr,
        _ => return Ok(()),
    };

    for field in required {
        let field_name = field.as_str().ok_or_else(|| SchemaError::InvalidSchema {
            message: "required field names must be strings".to_string(),
        })?;
        if input_obj.get(field_name).map_or(true, Value::is_null) {
            return Err(SchemaError::MissingField {
                field: field_name.to_string(),
            });
        }
    }

    Ok(())
}

//! UUIDs and embedded documents

use base64::{engine::general_purpose::STANDARD, Engine as _};
use uuid::Uuid;

use crate::error::{Result, ValidationError};
use crate::evaluate::Evaluator;
use crate::schema::Schema;
use crate::value::{Value, ValueType};

/// Parse a standard UUID string.
///
/// Structural problems are a [`ParseFailure`](crate::error::ErrorKind::ParseFailure),
/// never a schema violation. The version selects how the value is
/// interpreted and must be in `1..=8`; the version nibble of the input
/// itself is not enforced.
pub(super) fn check_uuid(text: &str, version: u8) -> Result<()> {
    if !(1..=8).contains(&version) {
        return Err(ValidationError::parse(format!("illegal UUID version number {}", version)));
    }
    Uuid::parse_str(text)
        .map(|_| ())
        .map_err(|e| ValidationError::parse(format!("badly formed UUID {:?}: {}", text, e)))
}

pub(super) fn check_json(text: &str) -> Result<()> {
    Value::parse_json(text).map(|_| ())
}

/// Decode a base64 JSON identity and validate it against `schema`.
///
/// A wrong input type is reported as is; every later stage collapses into
/// one format violation.
pub(super) fn check_b64_identity(schema: &Schema, value: &Value) -> Result<()> {
    let Value::Str(encoded) = value else {
        return Err(ValidationError::type_mismatch(ValueType::Str, value.value_type()));
    };
    decode_identity(encoded)
        .and_then(|identity| Evaluator::default().evaluate(schema, &identity))
        .map_err(|cause| ValidationError::format(format!("invalid base64 identity: {}", cause)))
}

fn decode_identity(encoded: &str) -> Result<Value> {
    let raw = STANDARD
        .decode(encoded)
        .map_err(|e| ValidationError::parse(format!("invalid base64: {}", e)))?;
    let text = String::from_utf8(raw)
        .map_err(|e| ValidationError::parse(format!("invalid UTF-8 in identity: {}", e)))?;
    Value::parse_json(&text)
}

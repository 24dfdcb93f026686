//! Predicate library
//!
//! Each predicate checks one scalar property of a value and either
//! succeeds or returns a [`ValidationError`]. Predicates are pure: the
//! outcome depends on the input value only.
//!
//! Text grammars are written once and parameterized by an [`Encoding`]:
//! `Encoding::Text` expects a string value, `Encoding::Bytes` expects a
//! byte string that is decoded as UTF-8 before the same grammar applies.

mod format;
mod identity;
mod numeric;
mod time;

use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::{Result, ValidationError};
use crate::schema::Schema;
use crate::value::{Value, ValueType};

pub use format::{Digest, Format};
pub use time::TimestampFormat;

/// How a textual value is carried by the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// A decoded string (JSON payloads)
    Text,
    /// A raw byte string (Parquet rows)
    Bytes,
}

impl Encoding {
    /// Borrow the textual content of the value, decoding bytes as UTF-8
    pub fn decode<'a>(&self, value: &'a Value) -> Result<&'a str> {
        match (self, value) {
            (Encoding::Text, Value::Str(s)) => Ok(s),
            (Encoding::Bytes, Value::Bytes(b)) => std::str::from_utf8(b)
                .map_err(|e| ValidationError::parse(format!("invalid UTF-8 in byte string: {}", e))),
            (Encoding::Text, other) => Err(ValidationError::type_mismatch(
                ValueType::Str,
                other.value_type(),
            )),
            (Encoding::Bytes, other) => Err(ValidationError::type_mismatch(
                ValueType::Bytes,
                other.value_type(),
            )),
        }
    }
}

/// Comparison against zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    PositiveOrZero,
    Negative,
    NegativeOrZero,
}

impl Sign {
    pub fn accepts(&self, against_zero: Ordering) -> bool {
        match self {
            Sign::Positive => against_zero == Ordering::Greater,
            Sign::PositiveOrZero => against_zero != Ordering::Less,
            Sign::Negative => against_zero == Ordering::Less,
            Sign::NegativeOrZero => against_zero != Ordering::Greater,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Sign::Positive => "positive",
            Sign::PositiveOrZero => "positive or zero",
            Sign::Negative => "negative",
            Sign::NegativeOrZero => "negative or zero",
        }
    }
}

/// The closed set of scalar checks
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Exact runtime type; a boolean never satisfies `Int`
    Type(ValueType),
    /// Integer compared against zero
    Int(Sign),
    /// Float compared against zero; NaN never satisfies
    Float(Sign),
    IsNaN,
    IsNotNaN,
    EmptyText(Encoding),
    NotEmptyText(Encoding),
    /// Integer literal carried as text, optionally compared against zero
    IntIn(Encoding, Option<Sign>),
    /// Float literal carried as text, optionally compared against zero
    FloatIn(Encoding, Option<Sign>),
    /// Textual grammar
    Format(Encoding, Format),
    /// Standard UUID string interpreted with the given version
    Uuid { encoding: Encoding, version: u8 },
    /// Any JSON document embedded as text
    Json(Encoding),
    /// Base64 encoded JSON identity validated against a nested schema
    Base64Identity(Arc<Schema>),
}

impl Predicate {
    pub fn check(&self, value: &Value) -> Result<()> {
        match self {
            Predicate::Type(expected) => check_type(*expected, value),
            Predicate::Int(sign) => numeric::check_int(value, Some(*sign)),
            Predicate::Float(sign) => numeric::check_float(value, Some(*sign)),
            Predicate::IsNaN => numeric::check_nan(value, true),
            Predicate::IsNotNaN => numeric::check_nan(value, false),
            Predicate::EmptyText(encoding) => {
                let text = encoding.decode(value)?;
                if !text.is_empty() {
                    return Err(ValidationError::format(format!(
                        "empty string expected, but got {:?}",
                        text
                    )));
                }
                Ok(())
            }
            Predicate::NotEmptyText(encoding) => {
                if encoding.decode(value)?.is_empty() {
                    return Err(ValidationError::format("empty string should not be used there"));
                }
                Ok(())
            }
            Predicate::IntIn(encoding, sign) => {
                numeric::check_int_literal(encoding.decode(value)?, *sign)
            }
            Predicate::FloatIn(encoding, sign) => {
                numeric::check_float_literal(encoding.decode(value)?, *sign)
            }
            Predicate::Format(encoding, format) => format.check(encoding.decode(value)?),
            Predicate::Uuid { encoding, version } => {
                identity::check_uuid(encoding.decode(value)?, *version)
            }
            Predicate::Json(encoding) => identity::check_json(encoding.decode(value)?),
            Predicate::Base64Identity(schema) => identity::check_b64_identity(schema, value),
        }
    }

    /// Same predicate with UUIDs interpreted as `version`
    pub fn with_uuid_version(self, version: u8) -> Self {
        match self {
            Predicate::Uuid { encoding, .. } => Predicate::Uuid { encoding, version },
            Predicate::Base64Identity(schema) => {
                Predicate::Base64Identity(Arc::new(schema.as_ref().clone().with_uuid_version(version)))
            }
            other => other,
        }
    }

    pub fn int() -> Self {
        Predicate::Type(ValueType::Int)
    }

    pub fn float() -> Self {
        Predicate::Type(ValueType::Float)
    }

    pub fn string() -> Self {
        Predicate::Type(ValueType::Str)
    }

    pub fn bytes() -> Self {
        Predicate::Type(ValueType::Bytes)
    }

    pub fn bool() -> Self {
        Predicate::Type(ValueType::Bool)
    }

    pub fn timestamp_value() -> Self {
        Predicate::Type(ValueType::Timestamp)
    }

    pub fn map() -> Self {
        Predicate::Type(ValueType::Map)
    }

    pub fn pos_int() -> Self {
        Predicate::Int(Sign::Positive)
    }

    pub fn pos_int_or_zero() -> Self {
        Predicate::Int(Sign::PositiveOrZero)
    }

    pub fn not_empty_string() -> Self {
        Predicate::NotEmptyText(Encoding::Text)
    }

    pub fn not_empty_bytes() -> Self {
        Predicate::NotEmptyText(Encoding::Bytes)
    }

    pub fn int_in_string() -> Self {
        Predicate::IntIn(Encoding::Text, None)
    }

    pub fn pos_int_in_string() -> Self {
        Predicate::IntIn(Encoding::Text, Some(Sign::Positive))
    }

    pub fn pos_int_in_bytes() -> Self {
        Predicate::IntIn(Encoding::Bytes, Some(Sign::Positive))
    }

    pub fn pos_float_in_string() -> Self {
        Predicate::FloatIn(Encoding::Text, Some(Sign::Positive))
    }

    pub fn format(format: Format) -> Self {
        Predicate::Format(Encoding::Text, format)
    }

    pub fn format_in_bytes(format: Format) -> Self {
        Predicate::Format(Encoding::Bytes, format)
    }

    pub fn timestamp(format: TimestampFormat) -> Self {
        Predicate::Format(Encoding::Text, Format::Timestamp(format))
    }

    pub fn json_in_string() -> Self {
        Predicate::Json(Encoding::Text)
    }

    pub fn json_in_bytes() -> Self {
        Predicate::Json(Encoding::Bytes)
    }

    /// Version 4 UUID carried as a string
    pub fn uuid() -> Self {
        Predicate::Uuid {
            encoding: Encoding::Text,
            version: 4,
        }
    }

    pub fn uuid_in_bytes() -> Self {
        Predicate::Uuid {
            encoding: Encoding::Bytes,
            version: 4,
        }
    }

    pub fn b64_identity(schema: impl Into<Arc<Schema>>) -> Self {
        Predicate::Base64Identity(schema.into())
    }
}

fn check_type(expected: ValueType, value: &Value) -> Result<()> {
    let actual = value.value_type();
    if actual != expected {
        return Err(ValidationError::type_mismatch(expected, actual));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_int_type_rejects_booleans() {
        assert!(Predicate::int().check(&Value::Int(42)).is_ok());
        for value in [Value::Bool(true), Value::Bool(false), Value::Float(2.5), Value::from("1")] {
            let err = Predicate::int().check(&value).unwrap_err();
            assert_eq!(err.kind, ErrorKind::TypeMismatch);
        }
    }

    #[test]
    fn test_string_and_bytes_are_not_interchangeable() {
        let text = Value::from("non-empty");
        let bytes = Value::from(b"non-empty".as_slice());

        assert!(Predicate::not_empty_string().check(&text).is_ok());
        assert!(Predicate::not_empty_bytes().check(&bytes).is_ok());
        assert_eq!(
            Predicate::not_empty_string().check(&bytes).unwrap_err().kind,
            ErrorKind::TypeMismatch
        );
        assert_eq!(
            Predicate::not_empty_bytes().check(&text).unwrap_err().kind,
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_empty_text_predicates() {
        let empty = Predicate::EmptyText(Encoding::Text);
        assert!(empty.check(&Value::from("")).is_ok());
        assert!(empty.check(&Value::from(" ")).is_err());
        assert!(Predicate::not_empty_string().check(&Value::from("ěščř")).is_ok());
        assert_eq!(
            Predicate::not_empty_string().check(&Value::from("")).unwrap_err().kind,
            ErrorKind::FormatViolation
        );
        assert!(Predicate::not_empty_bytes().check(&Value::Bytes(Vec::new())).is_err());
    }

    #[test]
    fn test_invalid_utf8_bytes() {
        let bytes = Value::Bytes(vec![0xff, 0xfe]);
        let err = Predicate::not_empty_bytes().check(&bytes).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseFailure);
    }

    #[test]
    fn test_sign_table() {
        use Ordering::*;
        assert!(Sign::Positive.accepts(Greater));
        assert!(!Sign::Positive.accepts(Equal));
        assert!(Sign::PositiveOrZero.accepts(Equal));
        assert!(!Sign::PositiveOrZero.accepts(Less));
        assert!(Sign::Negative.accepts(Less));
        assert!(!Sign::Negative.accepts(Equal));
        assert!(Sign::NegativeOrZero.accepts(Equal));
        assert!(!Sign::NegativeOrZero.accepts(Greater));
    }
}

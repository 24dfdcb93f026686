//! Error types for schema validation

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Result type for predicate and evaluator operations
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Value has the wrong runtime representation
    TypeMismatch,
    /// Numeric value outside the accepted range (includes NaN rejection)
    RangeViolation,
    /// Grammar, length or literal mismatch
    FormatViolation,
    /// A required key is absent
    MissingField,
    /// A key the object schema does not declare
    UnexpectedField,
    /// Numeric, JSON, base64 or UUID decoding failed
    ParseFailure,
    /// Nothing to validate
    EmptyPayload,
    /// The record source could not be opened or read
    SourceReadFailure,
}

impl ErrorKind {
    /// Whether this kind belongs to the schema-violation family.
    ///
    /// Decode failures (malformed UUIDs among them) are reported as a
    /// separate class, as are empty payloads and source failures.
    pub fn is_schema_violation(&self) -> bool {
        !matches!(
            self,
            ErrorKind::ParseFailure | ErrorKind::EmptyPayload | ErrorKind::SourceReadFailure
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::RangeViolation => "range violation",
            ErrorKind::FormatViolation => "format violation",
            ErrorKind::MissingField => "missing field",
            ErrorKind::UnexpectedField => "unexpected field",
            ErrorKind::ParseFailure => "parse failure",
            ErrorKind::EmptyPayload => "empty payload",
            ErrorKind::SourceReadFailure => "source read failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step on the way from the record root to the offending node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Location of a node inside a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    fn prepend(&mut self, segment: PathSegment) {
        self.0.insert(0, segment);
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// A single validation failure
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{kind} at {path}: {message}")]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub message: String,
    pub path: FieldPath,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: FieldPath::default(),
        }
    }

    pub fn type_mismatch(expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("{} value expected, but got {} instead", expected, actual),
        )
    }

    pub fn range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RangeViolation, message)
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FormatViolation, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseFailure, message)
    }

    pub fn empty_payload() -> Self {
        Self::new(ErrorKind::EmptyPayload, "Empty payload")
    }

    /// Prefix the path with the segment of the enclosing node
    pub fn at(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.prepend(segment.into());
        self
    }

    pub fn is_schema_violation(&self) -> bool {
        self.kind.is_schema_violation()
    }
}

/// Failures raised by record sources
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("cannot open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read error: {0}")]
    Read(#[from] std::io::Error),

    #[error("cannot decode record: {0}")]
    Decode(String),

    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl SourceError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::SourceReadFailure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let err = ValidationError::format("bad")
            .at("type")
            .at(0usize)
            .at("reports")
            .at("report");
        assert_eq!(err.path.to_string(), "report.reports[0].type");
        assert_eq!(err.to_string(), "format violation at report.reports[0].type: bad");
    }

    #[test]
    fn test_root_path_display() {
        let err = ValidationError::empty_payload();
        assert!(err.path.is_root());
        assert_eq!(err.path.to_string(), "<root>");
    }

    #[test]
    fn test_schema_violation_family() {
        assert!(ErrorKind::TypeMismatch.is_schema_violation());
        assert!(ErrorKind::MissingField.is_schema_violation());
        assert!(!ErrorKind::ParseFailure.is_schema_violation());
        assert!(!ErrorKind::EmptyPayload.is_schema_violation());
        assert!(!ErrorKind::SourceReadFailure.is_schema_violation());
    }
}

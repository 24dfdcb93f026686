//! Batch validation driver
//!
//! Applies one schema to every record of a source and counts the
//! outcomes. A bad record never stops the batch; only a source that cannot
//! be opened ends it early.
//!
//! | outcome                                   | counted as         |
//! |-------------------------------------------|--------------------|
//! | record passes the schema                  | processed, valid   |
//! | any evaluator error, empty payload        | processed, invalid |
//! | line is not JSON, line or row read error  | processed, error   |
//! | source cannot be opened                   | error (run ends)   |
//!
//! Single-message mode differs in one point: an undecodable document is
//! never processed, so it is counted as an error only.

use std::ops::AddAssign;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::{Result, ValidationError};
use crate::evaluate::Evaluator;
use crate::schema::Schema;
use crate::source::{DocumentSource, LineSource, RowSource};
use crate::value::Value;

/// Outcome counters of one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Tally {
    pub processed: u64,
    pub valid: u64,
    pub invalid: u64,
    pub error: u64,
}

impl Tally {
    /// Tally of a run that could not start
    pub fn source_failure() -> Self {
        Self {
            error: 1,
            ..Self::default()
        }
    }

    /// No errors and no invalid records
    pub fn is_clean(&self) -> bool {
        self.error == 0 && self.invalid == 0 && self.processed == self.valid
    }

    /// Process exit status: non-zero only when errors were detected
    pub fn exit_code(&self) -> i32 {
        if self.error > 0 {
            1
        } else {
            0
        }
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Self) {
        self.processed += other.processed;
        self.valid += other.valid;
        self.invalid += other.invalid;
        self.error += other.error;
    }
}

/// Validate one payload, rejecting a missing or null payload before the
/// schema is consulted.
pub fn validate(schema: &Schema, payload: Option<&Value>) -> Result<()> {
    Evaluator::default().evaluate(schema, non_empty(payload)?)
}

fn non_empty(payload: Option<&Value>) -> Result<&Value> {
    match payload {
        None | Some(Value::Null) => Err(ValidationError::empty_payload()),
        Some(value) => Ok(value),
    }
}

enum Outcome {
    Valid,
    /// Every failure the evaluation mode reports, never empty
    Invalid(Vec<ValidationError>),
    Error(String),
}

/// Applies one schema to records from any source
#[derive(Debug, Clone)]
pub struct Validator {
    schema: Arc<Schema>,
    evaluator: Evaluator,
}

impl Validator {
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        Self::with_evaluator(schema, Evaluator::default())
    }

    pub fn with_evaluator(schema: impl Into<Arc<Schema>>, evaluator: Evaluator) -> Self {
        Self {
            schema: schema.into(),
            evaluator,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validate a decoded record
    pub fn validate_record(&self, payload: Option<&Value>) -> Result<()> {
        let value = non_empty(payload)?;
        self.evaluator.evaluate(&self.schema, value)
    }

    /// Validate a decoded record, returning every failure the evaluation
    /// mode reports. An empty result means the record is valid.
    pub fn record_errors(&self, payload: Option<&Value>) -> Vec<ValidationError> {
        match non_empty(payload) {
            Ok(value) => self.evaluator.evaluate_all(&self.schema, value),
            Err(err) => vec![err],
        }
    }

    /// Validate a source holding exactly one JSON document
    pub fn validate_single_message(&self, source: &impl DocumentSource) -> Tally {
        let text = match source.read_document() {
            Ok(text) => text,
            Err(e) => {
                error!(kind = %e.kind(), "File-related problem: {}", e);
                return Tally::source_failure();
            }
        };
        let payload = match Value::parse_json(&text) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Other problem: {}", e.message);
                return Tally::source_failure();
            }
        };

        let mut tally = Tally {
            processed: 1,
            ..Tally::default()
        };
        count(&mut tally, self.judge(&payload));
        tally
    }

    /// Validate a source holding one JSON document per line
    pub fn validate_multiple_messages(&self, source: &impl LineSource) -> Tally {
        let lines = match source.lines() {
            Ok(lines) => lines,
            Err(e) => {
                error!(kind = %e.kind(), "File-related problem: {}", e);
                return Tally::source_failure();
            }
        };

        let mut tally = Tally::default();
        for line in lines {
            tally.processed += 1;
            debug!("Reading message #{}", tally.processed);
            let outcome = match line {
                Ok(line) => match Value::parse_json(&line) {
                    Ok(payload) => self.judge(&payload),
                    Err(e) => Outcome::Error(e.message),
                },
                Err(e) => Outcome::Error(e.to_string()),
            };
            count(&mut tally, outcome);
        }
        tally
    }

    /// Validate pre-decoded rows, e.g. the rows of a Parquet file
    pub fn validate_rows(&self, source: &impl RowSource) -> Tally {
        let rows = match source.rows() {
            Ok(rows) => rows,
            Err(e) => {
                error!(kind = %e.kind(), "File-related problem: {}", e);
                return Tally::source_failure();
            }
        };

        let mut tally = Tally::default();
        for row in rows {
            tally.processed += 1;
            debug!("Reading message #{}", tally.processed);
            let outcome = match row {
                Ok(row) => self.judge(&row),
                Err(e) => Outcome::Error(e.to_string()),
            };
            count(&mut tally, outcome);
        }
        tally
    }

    fn judge(&self, payload: &Value) -> Outcome {
        let errors = self.record_errors(Some(payload));
        if errors.is_empty() {
            Outcome::Valid
        } else {
            Outcome::Invalid(errors)
        }
    }
}

fn count(tally: &mut Tally, outcome: Outcome) {
    match outcome {
        Outcome::Valid => tally.valid += 1,
        Outcome::Invalid(errors) => {
            for e in &errors {
                warn!(kind = %e.kind, path = %e.path, "Validation error: {}", e.message);
            }
            tally.invalid += 1;
        }
        Outcome::Error(message) => {
            error!("Other problem: {}", message);
            tally.error += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, SourceError};
    use crate::evaluate::EvaluationMode;
    use crate::predicate::Predicate;
    use crate::source::{MemoryRows, MemorySource};

    fn schema() -> Schema {
        Schema::object()
            .required("id", Predicate::pos_int())
            .optional("name", Predicate::not_empty_string())
            .into()
    }

    #[test]
    fn test_validate_rejects_empty_payload() {
        for payload in [None, Some(&Value::Null)] {
            let err = validate(&schema(), payload).unwrap_err();
            assert_eq!(err.kind, ErrorKind::EmptyPayload);
        }
        // raised before the schema is consulted, even for a schema accepting null
        let err = validate(&Schema::constant(Value::Null), None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmptyPayload);
        assert!(validate(&schema(), Some(&Value::map([("id", Value::Int(1))]))).is_ok());
    }

    #[test]
    fn test_tally_merge() {
        let mut total = Tally {
            processed: 2,
            valid: 1,
            invalid: 1,
            error: 0,
        };
        total += Tally::source_failure();
        assert_eq!(
            total,
            Tally {
                processed: 2,
                valid: 1,
                invalid: 1,
                error: 1
            }
        );
        assert_eq!(total.exit_code(), 1);
        assert!(!total.is_clean());
    }

    #[test]
    fn test_exit_code_ignores_invalid_records() {
        let tally = Tally {
            processed: 3,
            valid: 1,
            invalid: 2,
            error: 0,
        };
        assert_eq!(tally.exit_code(), 0);
        assert!(!tally.is_clean());
    }

    #[test]
    fn test_single_message() {
        let validator = Validator::new(schema());
        let tally = validator.validate_single_message(&MemorySource::new(r#"{"id": 1}"#));
        assert_eq!(tally, Tally { processed: 1, valid: 1, invalid: 0, error: 0 });

        let tally = validator.validate_single_message(&MemorySource::new(r#"{"id": 0}"#));
        assert_eq!(tally, Tally { processed: 1, valid: 0, invalid: 1, error: 0 });

        let tally = validator.validate_single_message(&MemorySource::new("null"));
        assert_eq!(tally, Tally { processed: 1, valid: 0, invalid: 1, error: 0 });

        let tally = validator.validate_single_message(&MemorySource::new("{xyzzy}"));
        assert_eq!(tally, Tally { processed: 0, valid: 0, invalid: 0, error: 1 });
    }

    #[test]
    fn test_multiple_messages() {
        let validator = Validator::new(schema());
        let source = MemorySource::new(
            [r#"{"id": 1}"#, r#"{"id": -1}"#, "{xyzzy}", "null", r#"{"id": 2, "name": "x"}"#].join("\n"),
        );
        let tally = validator.validate_multiple_messages(&source);
        assert_eq!(tally, Tally { processed: 5, valid: 2, invalid: 2, error: 1 });
        assert_eq!(tally.processed, tally.valid + tally.invalid + tally.error);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let validator = Validator::new(schema());
        let source = MemorySource::new("{\"id\": 1}\n{\"id\": \"1\"}");
        assert_eq!(
            validator.validate_multiple_messages(&source),
            validator.validate_multiple_messages(&source)
        );
    }

    #[test]
    fn test_rows() {
        let rows: MemoryRows = vec![
            Value::map([("id", Value::Int(1))]),
            Value::map([("id", Value::Int(1)), ("extra", Value::Bool(true))]),
            Value::Null,
        ]
        .into_iter()
        .collect();
        let tally = Validator::new(schema()).validate_rows(&rows);
        assert_eq!(tally, Tally { processed: 3, valid: 1, invalid: 2, error: 0 });
    }

    #[test]
    fn test_collect_all_reports_every_failure() {
        let schema: Schema = Schema::object()
            .required("a", Predicate::int())
            .required("b", Predicate::int())
            .into();
        let record = Value::map([("c", Value::Null)]);

        let fail_fast = Validator::new(schema.clone());
        assert_eq!(fail_fast.record_errors(Some(&record)).len(), 1);

        let collect_all = Validator::with_evaluator(schema, Evaluator::new(EvaluationMode::CollectAll));
        let found: Vec<_> = collect_all
            .record_errors(Some(&record))
            .into_iter()
            .map(|e| (e.kind, e.path.to_string()))
            .collect();
        assert_eq!(
            found,
            [
                (ErrorKind::MissingField, "a".to_string()),
                (ErrorKind::MissingField, "b".to_string()),
                (ErrorKind::UnexpectedField, "c".to_string()),
            ]
        );
        // the first failure is still what validate_record reports
        assert_eq!(
            collect_all.validate_record(Some(&record)).unwrap_err().path.to_string(),
            "a"
        );

        let tally = collect_all.validate_multiple_messages(&MemorySource::new(r#"{"c": null}"#));
        assert_eq!(tally, Tally { processed: 1, valid: 0, invalid: 1, error: 0 });
    }

    #[test]
    fn test_record_errors_for_empty_payload() {
        let errors = Validator::new(schema()).record_errors(None);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::EmptyPayload);
        assert!(Validator::new(schema())
            .record_errors(Some(&Value::map([("id", Value::Int(1))])))
            .is_empty());
    }

    struct FailingRows;

    impl RowSource for FailingRows {
        fn rows(&self) -> crate::source::SourceResult<crate::source::Records<'_, Value>> {
            let broken = std::io::Error::new(std::io::ErrorKind::InvalidData, "corrupt page");
            Ok(Box::new(
                vec![Ok(Value::map([("id", Value::Int(7))])), Err(SourceError::Read(broken))].into_iter(),
            ))
        }
    }

    #[test]
    fn test_row_read_error_is_isolated() {
        let tally = Validator::new(schema()).validate_rows(&FailingRows);
        assert_eq!(tally, Tally { processed: 2, valid: 1, invalid: 0, error: 1 });
    }
}

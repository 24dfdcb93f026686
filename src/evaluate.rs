//! Schema evaluation

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, Result, ValidationError};
use crate::schema::{ObjectSchema, Schema};
use crate::value::{Value, ValueType};

/// How many failures an evaluation reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluationMode {
    /// Stop at the first failing node
    #[default]
    FailFast,
    /// Walk the whole tree and report every failing node
    CollectAll,
}

/// Walks a schema tree against a value
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    mode: EvaluationMode,
}

impl Evaluator {
    pub fn new(mode: EvaluationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// Validate `value`, returning the first failure
    pub fn evaluate(&self, schema: &Schema, value: &Value) -> Result<()> {
        match self.evaluate_all(schema, value).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Validate `value`, returning every failure the mode allows.
    ///
    /// In fail-fast mode the result holds at most one error. An empty
    /// result means the value is valid.
    pub fn evaluate_all(&self, schema: &Schema, value: &Value) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        self.walk(schema, value, &mut errors);
        errors
    }

    fn done(&self, errors: &[ValidationError]) -> bool {
        self.mode == EvaluationMode::FailFast && !errors.is_empty()
    }

    fn walk(&self, schema: &Schema, value: &Value, errors: &mut Vec<ValidationError>) {
        match schema {
            Schema::Leaf(predicate) => {
                if let Err(err) = predicate.check(value) {
                    errors.push(err);
                }
            }
            Schema::Const(expected) => {
                if expected != value {
                    errors.push(ValidationError::format(format!(
                        "{} expected, but got {} instead",
                        expected, value
                    )));
                }
            }
            Schema::OneOf(alternatives) => {
                let probe = Evaluator::new(EvaluationMode::FailFast);
                if !alternatives.iter().any(|alt| probe.evaluate(alt, value).is_ok()) {
                    errors.push(ValidationError::format(format!(
                        "{} matches none of the alternatives: {}",
                        value,
                        schema.describe()
                    )));
                }
            }
            Schema::List(item) => {
                let Value::List(items) = value else {
                    errors.push(ValidationError::type_mismatch(ValueType::List, value.value_type()));
                    return;
                };
                for (index, element) in items.iter().enumerate() {
                    let mut nested = Vec::new();
                    self.walk(item, element, &mut nested);
                    errors.extend(nested.into_iter().map(|err| err.at(index)));
                    if self.done(errors) {
                        return;
                    }
                }
            }
            Schema::Object(object) => self.walk_object(object, value, errors),
            Schema::Shared(inner) => self.walk(inner, value, errors),
        }
    }

    // missing keys, then declared keys in order, then unexpected keys
    fn walk_object(&self, object: &ObjectSchema, value: &Value, errors: &mut Vec<ValidationError>) {
        let Value::Map(map) = value else {
            errors.push(ValidationError::type_mismatch(ValueType::Map, value.value_type()));
            return;
        };

        for field in object.fields.iter().filter(|f| f.required) {
            if !map.contains_key(&field.key) {
                errors.push(
                    ValidationError::new(ErrorKind::MissingField, "required key not provided")
                        .at(field.key.as_str()),
                );
                if self.done(errors) {
                    return;
                }
            }
        }

        for field in &object.fields {
            let Some(child) = map.get(&field.key) else { continue };
            let mut nested = Vec::new();
            self.walk(&field.schema, child, &mut nested);
            errors.extend(nested.into_iter().map(|err| err.at(field.key.as_str())));
            if self.done(errors) {
                return;
            }
        }

        if object.allow_extra {
            return;
        }
        for key in map.keys() {
            if object.field_named(key).is_none() {
                errors.push(
                    ValidationError::new(ErrorKind::UnexpectedField, "extra keys not allowed")
                        .at(key.as_str()),
                );
                if self.done(errors) {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{Format, Predicate};

    fn report_schema() -> Schema {
        Schema::object()
            .required("version", Predicate::pos_int())
            .required(
                "report",
                Schema::object().required(
                    "reports",
                    Schema::list_of(
                        Schema::object()
                            .required("type", Schema::constant("rule"))
                            .required("rule_id", Predicate::format(Format::RuleFqdn))
                            .optional("details", Predicate::map()),
                    ),
                ),
            )
            .into()
    }

    fn valid_report() -> Value {
        Value::parse_json(
            r#"{
                "version": 2,
                "report": {
                    "reports": [
                        {"type": "rule", "rule_id": "ccx_rules_ocp.external.rules.check"},
                        {"type": "rule", "rule_id": "ccx_rules_ocp.ocs.check", "details": {}}
                    ]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_record() {
        let evaluator = Evaluator::default();
        assert!(evaluator.evaluate(&report_schema(), &valid_report()).is_ok());
        assert!(evaluator.evaluate_all(&report_schema(), &valid_report()).is_empty());
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let mut record = valid_report();
        record.insert("version", Value::Int(-1));
        let evaluator = Evaluator::default();
        let first = evaluator.evaluate(&report_schema(), &record);
        let second = evaluator.evaluate(&report_schema(), &record);
        assert_eq!(first, second);
    }

    #[test]
    fn test_removing_required_key_fails() {
        for key in ["version", "report"] {
            let mut record = valid_report();
            record.remove(key);
            let err = Evaluator::default().evaluate(&report_schema(), &record).unwrap_err();
            assert_eq!(err.kind, ErrorKind::MissingField);
            assert_eq!(err.path.to_string(), key);
        }
    }

    #[test]
    fn test_missing_key_takes_precedence() {
        let schema: Schema = Schema::object()
            .required("a", Predicate::int())
            .required("b", Predicate::int())
            .into();
        let record = Value::map([("a", Value::from("not an int"))]);
        let err = Evaluator::default().evaluate(&schema, &record).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingField);
        assert_eq!(err.path.to_string(), "b");
    }

    #[test]
    fn test_type_mismatch_masks_range_violation() {
        let schema: Schema = Schema::object().required("n", Predicate::pos_int()).into();
        let err = Evaluator::default()
            .evaluate(&schema, &Value::map([("n", Value::from("-1"))]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_nested_error_path() {
        let mut record = valid_report();
        let Some(Value::Map(report)) = record.remove("report") else { panic!() };
        let mut report = Value::Map(report);
        let reports = Value::List(vec![
            Value::map([("type", Value::from("rule")), ("rule_id", Value::from("a.b"))]),
            Value::map([("type", Value::from("other")), ("rule_id", Value::from("a.b"))]),
        ]);
        report.insert("reports", reports);
        record.insert("report", report);

        let err = Evaluator::default().evaluate(&report_schema(), &record).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FormatViolation);
        assert_eq!(err.path.to_string(), "report.reports[1].type");
    }

    #[test]
    fn test_unexpected_keys() {
        let mut record = valid_report();
        record.insert("zzz", Value::Null);
        let err = Evaluator::default().evaluate(&report_schema(), &record).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedField);
        assert_eq!(err.path.to_string(), "zzz");

        let open: Schema = Schema::object().required("version", Predicate::int()).allow_extra().into();
        assert!(Evaluator::default().evaluate(&open, &record).is_ok());
    }

    #[test]
    fn test_empty_list_is_valid() {
        let schema = Schema::list_of(Predicate::pos_int());
        assert!(Evaluator::default().evaluate(&schema, &Value::List(Vec::new())).is_ok());
        let err = Evaluator::default()
            .evaluate(&schema, &Value::map([("a", Value::Int(1))]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_one_of() {
        let schema = Schema::nullable(Predicate::string());
        let evaluator = Evaluator::default();
        assert!(evaluator.evaluate(&schema, &Value::Null).is_ok());
        assert!(evaluator.evaluate(&schema, &Value::from("host")).is_ok());
        let err = evaluator.evaluate(&schema, &Value::Int(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FormatViolation);

        let tokens = Schema::any_bytes_of(&["True", "False"]);
        assert!(evaluator.evaluate(&tokens, &Value::from(b"True".as_slice())).is_ok());
        assert!(evaluator.evaluate(&tokens, &Value::from("True")).is_err());
    }

    #[test]
    fn test_collect_all() {
        let schema: Schema = Schema::object()
            .required("a", Predicate::int())
            .required("b", Predicate::int())
            .required("c", Predicate::int())
            .into();
        let record = Value::map([("b", Value::from("x")), ("d", Value::Null)]);

        let errors = Evaluator::new(EvaluationMode::CollectAll).evaluate_all(&schema, &record);
        let found: Vec<_> = errors.iter().map(|e| (e.kind, e.path.to_string())).collect();
        assert_eq!(
            found,
            [
                (ErrorKind::MissingField, "a".to_string()),
                (ErrorKind::MissingField, "c".to_string()),
                (ErrorKind::TypeMismatch, "b".to_string()),
                (ErrorKind::UnexpectedField, "d".to_string()),
            ]
        );

        let errors = Evaluator::default().evaluate_all(&schema, &record);
        assert_eq!(errors.len(), 1);
    }
}

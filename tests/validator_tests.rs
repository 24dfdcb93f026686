//! End-to-end validation of fixture files
//!
//! Runs the topic schemas over files on disk the same way the
//! `message-validator` binary does.

use std::path::{Path, PathBuf};

use message_schemas::source::{FileSource, MemorySource};
use message_schemas::{
    render_report, EvaluationMode, Evaluator, ErrorKind, Tally, Topic, Validator, Value,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn tally(processed: u64, valid: u64, invalid: u64, error: u64) -> Tally {
    Tally {
        processed,
        valid,
        invalid,
        error,
    }
}

// =============================================================================
// Single Message Tests
// =============================================================================

#[test]
fn test_single_announce_message() {
    let validator = Validator::new(Topic::Announce.schema());
    let result = validator.validate_single_message(&FileSource::new(fixture("announce.json")));
    assert_eq!(result, tally(1, 1, 0, 0));
    assert!(result.is_clean());
    assert_eq!(result.exit_code(), 0);
}

#[test]
fn test_single_ocp_results_message() {
    let validator = Validator::new(Topic::OcpResults.schema());
    let result = validator.validate_single_message(&FileSource::new(fixture("ocp_results.json")));
    assert_eq!(result, tally(1, 1, 0, 0));
}

#[test]
fn test_single_message_against_wrong_topic() {
    let validator = Validator::new(Topic::OcpResults.schema());
    let result = validator.validate_single_message(&FileSource::new(fixture("announce.json")));
    assert_eq!(result, tally(1, 0, 1, 0));
    // invalid messages alone do not fail the run
    assert_eq!(result.exit_code(), 0);
}

#[test]
fn test_missing_input_file() {
    let validator = Validator::new(Topic::Announce.schema());
    let missing = FileSource::new(fixture("does_not_exist.json"));

    assert_eq!(validator.validate_single_message(&missing), tally(0, 0, 0, 1));
    assert_eq!(validator.validate_multiple_messages(&missing), tally(0, 0, 0, 1));
    assert_eq!(validator.validate_single_message(&missing).exit_code(), 1);
}

#[test]
fn test_single_message_that_is_not_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{xyzzy}").unwrap();

    let validator = Validator::new(Topic::Announce.schema());
    assert_eq!(
        validator.validate_single_message(&FileSource::new(&path)),
        tally(0, 0, 0, 1)
    );
}

// =============================================================================
// Multiple Message Tests
// =============================================================================

#[test]
fn test_multiple_announce_messages() {
    // valid, negative size, not JSON, bad request id, empty identity, null
    let validator = Validator::new(Topic::Announce.schema());
    let result =
        validator.validate_multiple_messages(&FileSource::new(fixture("announce_multiple.jsonl")));
    assert_eq!(result, tally(6, 1, 4, 1));
    assert_eq!(result.exit_code(), 1);
}

#[test]
fn test_multiple_messages_from_temp_file() {
    let text = std::fs::read_to_string(fixture("ocp_results.json")).unwrap();
    let valid: serde_json::Value = serde_json::from_str(&text).unwrap();
    let mut invalid = valid.clone();
    invalid["OrgID"] = serde_json::json!(-1);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messages.jsonl");
    std::fs::write(&path, format!("{}\n{}\n", valid, invalid)).unwrap();

    let validator = Validator::new(Topic::OcpResults.schema());
    let result = validator.validate_multiple_messages(&FileSource::new(&path));
    assert_eq!(result, tally(2, 1, 1, 0));
}

#[test]
fn test_empty_file_has_nothing_to_process() {
    let validator = Validator::new(Topic::Sqs.schema());
    let result = validator.validate_multiple_messages(&MemorySource::new(""));
    assert_eq!(result, tally(0, 0, 0, 0));
    assert!(result.is_clean());
}

#[test]
fn test_directory_as_input() {
    let dir = tempfile::tempdir().unwrap();
    let validator = Validator::new(Topic::Announce.schema());
    let source = FileSource::new(dir.path());

    assert_eq!(validator.validate_multiple_messages(&source), tally(0, 0, 0, 1));
    assert_eq!(validator.validate_single_message(&source), tally(0, 0, 0, 1));
}

#[test]
fn test_collect_all_counts_each_record_once() {
    let source = FileSource::new(fixture("announce_multiple.jsonl"));
    let fail_fast = Validator::new(Topic::Announce.schema()).validate_multiple_messages(&source);
    let collect_all = Validator::with_evaluator(
        Topic::Announce.schema(),
        Evaluator::new(EvaluationMode::CollectAll),
    )
    .validate_multiple_messages(&source);
    assert_eq!(fail_fast, collect_all);
}

#[test]
fn test_collect_all_lists_every_failure_of_a_record() {
    let text = std::fs::read_to_string(fixture("announce.json")).unwrap();
    let mut json: serde_json::Value = serde_json::from_str(&text).unwrap();
    json["size"] = serde_json::json!(-1);
    json["request_id"] = serde_json::json!("not-a-hash");
    let message = Value::parse_json(&json.to_string()).unwrap();

    let fail_fast = Validator::new(Topic::Announce.schema());
    assert_eq!(fail_fast.record_errors(Some(&message)).len(), 1);

    let collect_all = Validator::with_evaluator(
        Topic::Announce.schema(),
        Evaluator::new(EvaluationMode::CollectAll),
    );
    let paths: Vec<String> = collect_all
        .record_errors(Some(&message))
        .iter()
        .map(|e| e.path.to_string())
        .collect();
    assert_eq!(paths, ["request_id", "size"]);
}

// =============================================================================
// Error Detail Tests
// =============================================================================

#[test]
fn test_error_points_at_nested_value() {
    let text = std::fs::read_to_string(fixture("ocp_results.json")).unwrap();
    let mut json: serde_json::Value = serde_json::from_str(&text).unwrap();
    json["Report"]["skips"] = serde_json::json!(["skip"]);
    let message = Value::parse_json(&json.to_string()).unwrap();

    let err = Validator::new(Topic::OcpResults.schema())
        .validate_record(Some(&message))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TypeMismatch);
    assert_eq!(err.path.to_string(), "Report.skips[0]");
}

#[test]
fn test_report_for_batch() {
    let validator = Validator::new(Topic::Announce.schema());
    let result =
        validator.validate_multiple_messages(&FileSource::new(fixture("announce_multiple.jsonl")));

    let mut out = Vec::new();
    render_report(&result, false, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Processed messages: 6\n"));
    assert!(text.contains("Errors detected:    1\n"));
    assert!(text.contains("[FAIL]: invalid JSON(s) detected"));
}

#[test]
fn test_one_validator_shared_across_threads() {
    let validator = std::sync::Arc::new(Validator::new(Topic::Announce.schema()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let validator = validator.clone();
            std::thread::spawn(move || {
                validator.validate_multiple_messages(&FileSource::new(fixture("announce_multiple.jsonl")))
            })
        })
        .collect();

    let mut total = Tally::default();
    for handle in handles {
        let result = handle.join().unwrap();
        assert_eq!(result, tally(6, 1, 4, 1));
        total += result;
    }
    assert_eq!(total, tally(24, 4, 16, 4));
}

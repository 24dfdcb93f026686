//! Rows of the Parquet files written by the Parquet factory

use crate::predicate::{Format, Predicate};
use crate::schema::{ObjectSchema, Schema};

fn version() -> Predicate {
    Predicate::format_in_bytes(Format::Version)
}

fn archive_path() -> Predicate {
    Predicate::format_in_bytes(Format::CephPath)
}

/// Keys every output row starts with
fn row() -> ObjectSchema {
    Schema::object().required("cluster_id", Predicate::uuid_in_bytes())
}

pub fn cluster_info() -> Schema {
    let platform = Schema::any_bytes_of(&[
        "VSphere",
        "BareMetal",
        "OpenStack",
        "Azure",
        "AWS",
        "None",
        "Libvirt",
        "oVirt",
        "GCP",
        "KubeVirt",
    ]);
    row()
        .required("cluster_version", version())
        .required("platform", platform)
        .required("collected_at", Predicate::timestamp_value())
        .required("desired_version", version())
        .required("network_type", Predicate::not_empty_bytes())
        .required("channel", Predicate::not_empty_bytes())
        .required("archive_path", archive_path())
        .required("initial_version", version())
        .into()
}

pub fn rule_hits() -> Schema {
    row()
        .required("rule_id", Predicate::format_in_bytes(Format::RuleId))
        .required("collected_at", Predicate::timestamp_value())
        .required("archive_path", archive_path())
        .into()
}

pub fn alerts() -> Schema {
    let state = Schema::any_bytes_of(&["pending", "firing"]);
    let severity = Schema::any_bytes_of(&[
        "", "none", "page", "warning", "critical", "high", "info", "alert",
    ]);
    row()
        .required("name", Predicate::not_empty_bytes())
        .required("state", state)
        .required("severity", severity)
        .required("labels", Predicate::json_in_bytes())
        .required("archive_path", archive_path())
        .into()
}

pub fn available_updates() -> Schema {
    row()
        .required("current_version", version())
        .required("release", version())
        .required("collected_at", Predicate::timestamp_value())
        .required("archive_path", archive_path())
        .into()
}

pub fn thanos_info() -> Schema {
    let support = Schema::any_bytes_of(&["None", "Eval", "Standard", "Premium", "Self-Support"]);
    row()
        .required("ebs_account", Predicate::pos_int_in_bytes())
        .required("email_domain", Predicate::format_in_bytes(Format::Domain))
        .required("support", support)
        .required("collected_at", Predicate::timestamp_value())
        .into()
}

pub fn operator_condition() -> Schema {
    let condition_type =
        Schema::any_bytes_of(&["Available", "Degraded", "Progressing", "Upgradeable", "Failing"]);
    row()
        .required("operator", Predicate::not_empty_bytes())
        .required("condition_type", condition_type)
        .required("reason", Predicate::bytes())
        .required("raw_message", Predicate::bytes())
        .required("archive_path", archive_path())
        .required("last_transition_time", Predicate::timestamp_value())
        .required("collected_at", Predicate::timestamp_value())
        .into()
}

pub fn conditional_updates() -> Schema {
    row()
        .required("current_version", version())
        .required("recommended", Schema::any_bytes_of(&["True", "False", "Unknown"]))
        .required("reason", Predicate::not_empty_bytes())
        .required("collected_at", Predicate::timestamp_value())
        .required("archive_path", archive_path())
        .into()
}

pub fn gatherers_info() -> Schema {
    row()
        .required("name", Predicate::not_empty_bytes())
        .required("duration_in_ms", Predicate::int())
        .required("archive_path", archive_path())
        .required("collected_at", Predicate::timestamp_value())
        .into()
}

pub fn workload_image_layers() -> Schema {
    row()
        .required("image_id", Predicate::not_empty_bytes())
        .required("layer_image_id", Predicate::not_empty_bytes())
        .required("layer_image_level", Predicate::pos_int_or_zero())
        .required("first_command", Predicate::bytes())
        .required("first_arg", Predicate::bytes())
        .required("archive_path", archive_path())
        .required("collected_at", Predicate::timestamp_value())
        .into()
}

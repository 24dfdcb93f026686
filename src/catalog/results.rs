//! Rule engine results and archive features

use crate::predicate::{Format, Predicate, TimestampFormat};
use crate::schema::{ObjectSchema, Schema};

/// Producers of rule results differ in how strict some nodes are
#[derive(Clone, Copy, PartialEq, Eq)]
enum Producer {
    /// ccx.ocp.results
    Aggregator,
    /// insights-operator-archive-rules-results
    Archive,
}

fn list_of_maps() -> Schema {
    Schema::list_of(Predicate::map())
}

fn tags() -> Schema {
    Schema::list_of(Predicate::string())
}

fn report_details(producer: Producer) -> ObjectSchema {
    let details = Schema::object()
        .optional("current", Predicate::string())
        .optional("desired", Predicate::string())
        .optional("nodes", list_of_maps())
        .optional("nodes_with_different_version", list_of_maps())
        .optional("link", Predicate::string())
        .optional("info", Predicate::map())
        .optional("kcs", Predicate::string())
        .optional("kcs_link", Predicate::string())
        .optional("op", Predicate::map())
        .required("error_key", Predicate::format(Format::KeyValue))
        .required("type", Schema::constant("rule"));
    match producer {
        Producer::Aggregator => details,
        Producer::Archive => details.optional("forced_versions", list_of_maps()).allow_extra(),
    }
}

fn info_details(producer: Producer) -> ObjectSchema {
    let details = Schema::object()
        .optional("current", Predicate::string())
        .optional("desired", Predicate::string())
        .optional("cluster_id", Predicate::uuid())
        .optional("grafana_link", Predicate::string())
        .required("info_key", Predicate::string())
        .required("type", Schema::constant("info"))
        .optional("update_time", Predicate::string());
    match producer {
        Producer::Aggregator => details,
        Producer::Archive => details.optional("nodes", list_of_maps()).allow_extra(),
    }
}

fn rule_report(producer: Producer) -> ObjectSchema {
    Schema::object()
        .required("component", Predicate::format(Format::RuleFqdn))
        .required("details", report_details(producer))
        .required("key", Predicate::format(Format::KeyValue))
        .required("links", Predicate::map())
        .required("rule_id", Predicate::format(Format::RuleId))
        .required("tags", tags())
        .required("type", Schema::constant("rule"))
}

fn skip() -> ObjectSchema {
    Schema::object()
        .required("rule_fqdn", Predicate::format(Format::RuleFqdn))
        .required("reason", Predicate::format(Format::KeyValue))
        .required("details", Predicate::string())
        .required("type", Schema::constant("skip"))
}

fn info(producer: Producer) -> ObjectSchema {
    Schema::object()
        .required("component", Predicate::format(Format::RuleFqdn))
        .required("details", info_details(producer))
        .required("info_id", Predicate::string())
        .required("key", Predicate::format(Format::KeyValue))
        .required("links", Predicate::map())
        .required("tags", tags())
        .required("type", Schema::constant("info"))
}

fn pass() -> ObjectSchema {
    Schema::object()
        .required("pass_id", Predicate::string())
        .required("component", Predicate::format(Format::RuleFqdn))
        .required("type", Schema::constant("pass"))
        .required("key", Predicate::format(Format::KeyValue))
        .required("details", Predicate::map())
        .required("links", Predicate::map())
        .required("tags", tags())
}

fn system() -> ObjectSchema {
    Schema::object()
        .required("metadata", Predicate::map())
        .required("hostname", Schema::nullable(Predicate::string()))
        .allow_extra()
}

/// Cluster identification shared by archive topics
fn archive_metadata() -> ObjectSchema {
    Schema::object()
        .required("cluster_id", Predicate::uuid())
        .required("external_organization", Predicate::pos_int_in_string())
}

/// ccx.ocp.results
pub fn ocp_results() -> Schema {
    let report = Schema::object()
        .required("system", system())
        .required("reports", Schema::list_of(rule_report(Producer::Aggregator)))
        .required("fingerprints", Schema::list_of(Schema::object()))
        .required("skips", Schema::list_of(skip()))
        .required("info", Schema::list_of(info(Producer::Aggregator)))
        // passes carry no keys here
        .optional("pass", Schema::list_of(Schema::object()));

    Schema::object()
        .required("OrgID", Predicate::pos_int())
        .required("ClusterName", Predicate::uuid())
        .required("LastChecked", Predicate::timestamp(TimestampFormat::Fractional))
        .required("Report", report)
        .into()
}

/// insights-operator-archive-rules-results
pub fn rules_results() -> Schema {
    let version_commit = Schema::object()
        .required("version", Predicate::string())
        .required("commit", Schema::nullable(Predicate::string()));

    let plugin_sets = Schema::object()
        .required("insights-core", version_commit.clone())
        .required("ccx_rules_ocp", version_commit.clone())
        .required("ccx_ocp_core", version_commit);

    let analysis_metadata = Schema::object()
        .required("start", Predicate::timestamp(TimestampFormat::FractionalOffset))
        .required("finish", Predicate::timestamp(TimestampFormat::FractionalOffset))
        .required("execution_context", Predicate::string())
        .required("plugin_sets", plugin_sets);

    let report = Schema::object()
        .required("system", system())
        .required("reports", Schema::list_of(rule_report(Producer::Archive)))
        .required("fingerprints", Schema::list_of(Schema::object()))
        .required("skips", Schema::list_of(skip()))
        .required("info", Schema::list_of(info(Producer::Archive)))
        .required("pass", Schema::list_of(pass()))
        .required("analysis_metadata", analysis_metadata);

    Schema::object()
        .required("path", Predicate::format(Format::CephPath))
        .required("metadata", archive_metadata())
        .required("report", report)
        .into()
}

/// insights-operator-archive-features
pub fn features() -> Schema {
    let report_metadata = Schema::object()
        .required("feature_id", Predicate::string())
        .required("component", Predicate::string());

    let field = Schema::object()
        .required("name", Predicate::string())
        .required("type", Predicate::string());

    let report_schema = Schema::object()
        .required("version", Predicate::pos_float_in_string())
        .required("fields", Schema::list_of(field));

    let data = Schema::object()
        .required("cluster_id", Predicate::uuid())
        .optional(
            "value",
            Schema::one_of([Predicate::int(), Predicate::float(), Predicate::string()]),
        )
        .optional("last_transition_time", Predicate::timestamp(TimestampFormat::Naive))
        .optional("path", Predicate::format(Format::CephPath))
        .allow_extra();

    let report = Schema::object()
        .required("metadata", report_metadata)
        .required("schema", report_schema)
        .required("data", Schema::list_of(data));

    Schema::object()
        .required("path", Predicate::format(Format::CephPath))
        .required("metadata", archive_metadata())
        .required("report", Schema::list_of(report))
        .into()
}

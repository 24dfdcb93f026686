//! Concrete message schemas
//!
//! One [`Topic`] per message format handled by the validator. Kafka and
//! SQS payloads are JSON documents; the `*-info`, `rule-hits` and similar
//! topics describe rows of the Parquet files written by the Parquet
//! factory, where text columns are byte strings.

mod messages;
mod outputs;
mod results;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::schema::Schema;

pub use messages::identity_schema;

/// A known message format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    /// platform.upload.announce
    Announce,
    /// ccx.ocp.results
    OcpResults,
    /// Responses of the SQS ReceiveMessage call
    Sqs,
    /// insights-operator-archive-rules-results
    RulesResults,
    /// insights-operator-archive-features
    Features,
    /// cluster_info.parquet
    ClusterInfo,
    /// rule_hits.parquet
    RuleHits,
    /// alerts.parquet
    Alerts,
    /// available_updates.parquet
    AvailableUpdates,
    /// cluster_thanos_info.parquet
    ThanosInfo,
    /// operator_condition.parquet
    OperatorCondition,
    /// conditional_update_conditions.parquet
    ConditionalUpdates,
    /// gatherers_info.parquet
    GatherersInfo,
    /// workload_image_layers.parquet
    WorkloadImageLayers,
}

impl Topic {
    pub fn all() -> &'static [Topic] {
        Topic::value_variants()
    }

    /// Build the schema for this topic
    pub fn schema(&self) -> Schema {
        match self {
            Topic::Announce => messages::announce(),
            Topic::OcpResults => results::ocp_results(),
            Topic::Sqs => messages::sqs(),
            Topic::RulesResults => results::rules_results(),
            Topic::Features => results::features(),
            Topic::ClusterInfo => outputs::cluster_info(),
            Topic::RuleHits => outputs::rule_hits(),
            Topic::Alerts => outputs::alerts(),
            Topic::AvailableUpdates => outputs::available_updates(),
            Topic::ThanosInfo => outputs::thanos_info(),
            Topic::OperatorCondition => outputs::operator_condition(),
            Topic::ConditionalUpdates => outputs::conditional_updates(),
            Topic::GatherersInfo => outputs::gatherers_info(),
            Topic::WorkloadImageLayers => outputs::workload_image_layers(),
        }
    }

    /// Whether records of this topic are Parquet rows
    pub fn is_parquet(&self) -> bool {
        matches!(
            self,
            Topic::ClusterInfo
                | Topic::RuleHits
                | Topic::Alerts
                | Topic::AvailableUpdates
                | Topic::ThanosInfo
                | Topic::OperatorCondition
                | Topic::ConditionalUpdates
                | Topic::GatherersInfo
                | Topic::WorkloadImageLayers
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Topic::Announce => "platform.upload.announce",
            Topic::OcpResults => "ccx.ocp.results",
            Topic::Sqs => "sqs",
            Topic::RulesResults => "archive-rules-results",
            Topic::Features => "archive-features",
            Topic::ClusterInfo => "cluster_info",
            Topic::RuleHits => "rule_hits",
            Topic::Alerts => "alerts",
            Topic::AvailableUpdates => "available_updates",
            Topic::ThanosInfo => "cluster_thanos_info",
            Topic::OperatorCondition => "operator_condition",
            Topic::ConditionalUpdates => "conditional_update_conditions",
            Topic::GatherersInfo => "gatherers_info",
            Topic::WorkloadImageLayers => "workload_image_layers",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

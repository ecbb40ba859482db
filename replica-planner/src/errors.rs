use thiserror::Error;

use crate::model::{BrokerId, PartitionId};

pub type Result<T> = std::result::Result<T, PlannerError>;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Partition {topic}-{partition} references unknown broker {broker_id}")]
    Reference {
        topic: String,
        partition: PartitionId,
        broker_id: BrokerId,
    },

    #[error("No log dir size report for partition {topic}-{partition}{}", broker_suffix(.broker_id))]
    MissingData {
        topic: String,
        partition: PartitionId,
        broker_id: Option<BrokerId>,
    },

    #[error(
        "Cluster metadata unavailable while tracking broker {broker_id}{}",
        topic_suffix(.topic)
    )]
    DataUnavailable {
        topic: Option<String>,
        broker_id: BrokerId,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn broker_suffix(broker_id: &Option<BrokerId>) -> String {
    match broker_id {
        Some(id) => format!(" on broker {}", id),
        None => String::new(),
    }
}

fn topic_suffix(topic: &Option<String>) -> String {
    match topic {
        Some(name) => format!(" (partitions of topic {} not described)", name),
        None => " (snapshot not available)".to_string(),
    }
}

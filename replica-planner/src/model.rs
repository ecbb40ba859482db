use serde::{Deserialize, Serialize};

use crate::errors::Result;

pub type BrokerId = i32;
pub type PartitionId = i32;

/// A cluster member able to host partition replicas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Broker {
    pub id: BrokerId,
    /// Host:port the broker advertises
    pub address: String,
    /// Rack label, `None` when the broker is not rack aware
    #[serde(default)]
    pub rack: Option<String>,
    /// Disk usage in bytes as reported by the cluster
    #[serde(default)]
    pub reported_disk_usage: u64,
}

impl Broker {
    pub fn new(id: BrokerId, address: impl Into<String>, rack: Option<&str>) -> Self {
        Self {
            id,
            address: address.into(),
            rack: rack.map(str::to_string),
            reported_disk_usage: 0,
        }
    }

    pub fn with_reported_disk_usage(mut self, bytes: u64) -> Self {
        self.reported_disk_usage = bytes;
        self
    }
}

/// Size of one partition's log directory on one broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDirReport {
    pub broker_id: BrokerId,
    /// Size in bytes
    pub size: u64,
    /// Set when the broker failed to describe the log dir; the size is then unusable
    #[serde(default)]
    pub error: Option<String>,
}

impl LogDirReport {
    pub fn new(broker_id: BrokerId, size: u64) -> Self {
        Self {
            broker_id,
            size,
            error: None,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.error.is_none()
    }
}

/// Current state of one partition: where its replicas live and how large they are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSnapshot {
    pub id: PartitionId,
    /// Ordered replica list, the first entry is the preferred leader
    pub replicas: Vec<BrokerId>,
    #[serde(default)]
    pub log_dirs: Vec<LogDirReport>,
}

impl PartitionSnapshot {
    pub fn new(id: PartitionId, replicas: Vec<BrokerId>, log_dirs: Vec<LogDirReport>) -> Self {
        Self {
            id,
            replicas,
            log_dirs,
        }
    }

    pub fn is_hosted_by(&self, broker_id: BrokerId) -> bool {
        self.replicas.contains(&broker_id)
    }

    /// Any report for the broker, usable or not.
    pub fn log_dir_for(&self, broker_id: BrokerId) -> Option<&LogDirReport> {
        self.log_dirs.iter().find(|report| report.broker_id == broker_id)
    }

    pub fn usable_log_dir_for(&self, broker_id: BrokerId) -> Option<&LogDirReport> {
        self.log_dirs
            .iter()
            .find(|report| report.broker_id == broker_id && report.is_usable())
    }

    /// Largest usable size across all brokers reporting this partition.
    ///
    /// A freshly added replica may still be catching up and under-report its size,
    /// so the largest observed copy is the safer estimate for a new replica.
    pub fn max_reported_size(&self) -> Option<u64> {
        self.log_dirs
            .iter()
            .filter(|report| report.is_usable())
            .map(|report| report.size)
            .max()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSnapshot {
    pub name: String,
    /// `None` when the partitions could not be described (e.g. missing describe ACL)
    #[serde(default)]
    pub partitions: Option<Vec<PartitionSnapshot>>,
}

/// Full-cluster view supplied by the metadata collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    /// `None` when the topic listing itself was not available
    #[serde(default)]
    pub topics: Option<Vec<TopicSnapshot>>,
}

impl ClusterSnapshot {
    pub fn new(topics: Vec<TopicSnapshot>) -> Self {
        Self {
            topics: Some(topics),
        }
    }

    /// A snapshot whose metadata could not be fetched.
    pub fn unavailable() -> Self {
        Self { topics: None }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Partitions of one topic picked for reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSelection {
    pub topic: String,
    pub replication_factor: i32,
    /// Processed in this order
    pub partitions: Vec<PartitionSnapshot>,
}

impl TopicSelection {
    pub fn new(
        topic: impl Into<String>,
        replication_factor: i32,
        partitions: Vec<PartitionSnapshot>,
    ) -> Self {
        Self {
            topic: topic.into(),
            replication_factor,
            partitions,
        }
    }

    pub fn from_json_str(content: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(content)?)
    }
}

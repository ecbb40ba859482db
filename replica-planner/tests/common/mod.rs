//! Shared fixtures for `replica-planner` integration tests.
//!
//! [`ClusterFixture`] builds the brokers and the cluster snapshot together, so the
//! selections handed to the planner always match what the snapshot says.

#![allow(dead_code)]

use replica_planner::{
    Broker, BrokerId, ClusterSnapshot, LogDirReport, PartitionId, PartitionSnapshot,
    TopicSelection, TopicSnapshot,
};

/// Install a test subscriber once; `RUST_LOG=replica_planner=debug` shows every decision.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Partition hosted by `replicas`, every replica reporting `size` bytes.
pub fn hosted(id: PartitionId, replicas: &[BrokerId], size: u64) -> PartitionSnapshot {
    PartitionSnapshot::new(
        id,
        replicas.to_vec(),
        replicas
            .iter()
            .map(|&broker_id| LogDirReport::new(broker_id, size))
            .collect(),
    )
}

#[derive(Debug, Clone, Default)]
pub struct ClusterFixture {
    pub brokers: Vec<Broker>,
    topics: Vec<TopicSnapshot>,
}

impl ClusterFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn broker(mut self, id: BrokerId, rack: Option<&str>) -> Self {
        self.brokers
            .push(Broker::new(id, format!("broker-{}:9092", id), rack));
        self
    }

    /// Sets the disk usage the last added broker reports about itself
    pub fn reporting(mut self, reported_disk_usage: u64) -> Self {
        if let Some(broker) = self.brokers.pop() {
            self.brokers
                .push(broker.with_reported_disk_usage(reported_disk_usage));
        }
        self
    }

    pub fn topic(mut self, name: &str, partitions: Vec<PartitionSnapshot>) -> Self {
        self.topics.push(TopicSnapshot {
            name: name.to_string(),
            partitions: Some(partitions),
        });
        self
    }

    /// `count` single-replica partitions of `size` bytes on `broker_id`
    pub fn load(self, name: &str, broker_id: BrokerId, count: i32, size: u64) -> Self {
        let partitions = (0..count).map(|id| hosted(id, &[broker_id], size)).collect();
        self.topic(name, partitions)
    }

    pub fn snapshot(&self) -> ClusterSnapshot {
        ClusterSnapshot::new(self.topics.clone())
    }

    pub fn broker_ids(&self) -> Vec<BrokerId> {
        self.brokers.iter().map(|b| b.id).collect()
    }

    /// Selects `partitions` of `topic` as they appear in the snapshot
    pub fn select(
        &self,
        topic: &str,
        replication_factor: i32,
        partitions: &[PartitionId],
    ) -> TopicSelection {
        let selected = self
            .topics
            .iter()
            .find(|t| t.name == topic)
            .and_then(|t| t.partitions.as_ref())
            .map(|all| {
                all.iter()
                    .filter(|p| partitions.contains(&p.id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        TopicSelection::new(topic, replication_factor, selected)
    }

    /// Selects every partition of `topic`
    pub fn select_all(&self, topic: &str, replication_factor: i32) -> TopicSelection {
        let ids: Vec<PartitionId> = self
            .topics
            .iter()
            .find(|t| t.name == topic)
            .and_then(|t| t.partitions.as_ref())
            .map(|all| all.iter().map(|p| p.id).collect())
            .unwrap_or_default();
        self.select(topic, replication_factor, &ids)
    }
}

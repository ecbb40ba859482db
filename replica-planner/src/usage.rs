use tracing::debug;

use crate::config::ResetPolicy;
use crate::errors::{PlannerError, Result};
use crate::model::{Broker, ClusterSnapshot, PartitionSnapshot};

/// Replica and disk usage tracked for one broker during a single planning call.
///
/// The counters come in three layers:
/// - **actual**: what the broker hosts today, computed once from the cluster snapshot
/// - **initial**: actual minus the partitions being replanned (see [`ResetPolicy`])
/// - **assigned**: replicas committed to this broker by the current plan
///
/// `initial + assigned` is the load used to compare brokers. The counters are only
/// mutated through [`BrokerUsage::subtract`] and [`BrokerUsage::record_assignment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerUsage {
    broker: Broker,
    actual_replicas: u64,
    actual_size: u64,
    initial_replicas: u64,
    initial_size: u64,
    assigned_replicas: u64,
    assigned_size: u64,
}

impl BrokerUsage {
    /// Computes the actual usage of `broker` by scanning every partition of the snapshot
    pub fn initialize(broker: &Broker, snapshot: &ClusterSnapshot) -> Result<Self> {
        let topics = snapshot
            .topics
            .as_ref()
            .ok_or_else(|| PlannerError::DataUnavailable {
                topic: None,
                broker_id: broker.id,
            })?;

        let mut replicas = 0;
        let mut size = 0;

        for topic in topics {
            let partitions =
                topic
                    .partitions
                    .as_ref()
                    .ok_or_else(|| PlannerError::DataUnavailable {
                        topic: Some(topic.name.clone()),
                        broker_id: broker.id,
                    })?;

            for partition in partitions {
                replicas += partition
                    .replicas
                    .iter()
                    .filter(|&&id| id == broker.id)
                    .count() as u64;

                if let Some(report) = partition.usable_log_dir_for(broker.id) {
                    size += report.size;
                }
            }
        }

        debug!(
            broker_id = %broker.id,
            replicas,
            size,
            "computed actual broker usage"
        );

        Ok(Self {
            broker: broker.clone(),
            actual_replicas: replicas,
            actual_size: size,
            initial_replicas: replicas,
            initial_size: size,
            assigned_replicas: 0,
            assigned_size: 0,
        })
    }

    /// Removes the footprint of `partitions` (all of `topic`) from the initial counters.
    ///
    /// Only partitions currently hosted by this broker contribute. Each of them must carry a
    /// log dir report for this broker, otherwise the size contribution is unknown and the
    /// call fails. An errored report never counted towards the actual size, so it subtracts
    /// a replica but no bytes.
    pub fn subtract(
        &mut self,
        topic: &str,
        partitions: &[PartitionSnapshot],
        policy: ResetPolicy,
    ) -> Result<()> {
        let mut replicas = 0u64;
        let mut size = 0u64;

        for partition in partitions.iter().filter(|p| p.is_hosted_by(self.broker.id)) {
            let report =
                partition
                    .log_dir_for(self.broker.id)
                    .ok_or_else(|| PlannerError::MissingData {
                        topic: topic.to_string(),
                        partition: partition.id,
                        broker_id: Some(self.broker.id),
                    })?;

            replicas += 1;
            if report.is_usable() {
                size += report.size;
            }
        }

        if policy == ResetPolicy::Preserve || replicas == 0 {
            return Ok(());
        }

        self.initial_replicas = self.initial_replicas.saturating_sub(replicas);
        self.initial_size = self.initial_size.saturating_sub(size);

        debug!(
            broker_id = %self.broker.id,
            topic = %topic,
            replicas,
            size,
            "removed replanned partitions from broker usage"
        );

        Ok(())
    }

    /// Commits one new replica of `size_estimate` bytes to this broker
    pub fn record_assignment(&mut self, size_estimate: u64) {
        self.assigned_replicas += 1;
        self.assigned_size += size_estimate;
    }

    pub fn broker(&self) -> &Broker {
        &self.broker
    }

    pub fn actual_replicas(&self) -> u64 {
        self.actual_replicas
    }

    pub fn actual_size(&self) -> u64 {
        self.actual_size
    }

    pub fn initial_replicas(&self) -> u64 {
        self.initial_replicas
    }

    pub fn initial_size(&self) -> u64 {
        self.initial_size
    }

    pub fn assigned_replicas(&self) -> u64 {
        self.assigned_replicas
    }

    pub fn assigned_size(&self) -> u64 {
        self.assigned_size
    }

    /// Replica load used for comparisons: initial plus assigned
    pub fn total_replicas(&self) -> u64 {
        self.initial_replicas + self.assigned_replicas
    }

    /// Disk load used for comparisons: initial plus assigned
    pub fn total_size(&self) -> u64 {
        self.initial_size + self.assigned_size
    }
}

#[cfg(test)]
#[path = "usage_test.rs"]
mod tests;

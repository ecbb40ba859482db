use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::errors::Result;
use crate::model::{Broker, BrokerId, PartitionId, TopicSelection};
use crate::placer::ReplicaPlacer;
use crate::usage::BrokerUsage;

/// Replicas of the topic being planned, per target broker (indexed like the target set)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicReplicaCount {
    counts: Vec<u32>,
}

impl TopicReplicaCount {
    pub fn new(targets: usize) -> Self {
        Self {
            counts: vec![0; targets],
        }
    }

    pub fn get(&self, target: usize) -> u32 {
        self.counts.get(target).copied().unwrap_or(0)
    }

    pub(crate) fn increment(&mut self, target: usize) {
        if let Some(count) = self.counts.get_mut(target) {
            *count += 1;
        }
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Difference between the most and the least loaded target
    pub fn spread(&self) -> u32 {
        let max = self.counts.iter().max().copied().unwrap_or(0);
        let min = self.counts.iter().min().copied().unwrap_or(0);
        max - min
    }
}

/// Plans every selected partition of one topic.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicPlanner {
    placer: ReplicaPlacer,
}

impl TopicPlanner {
    pub fn new(placer: ReplicaPlacer) -> Self {
        Self { placer }
    }

    /// Returns the new replica list of each selected partition.
    ///
    /// A topic with a non-positive replication factor or no selected partitions has nothing
    /// to plan and yields an empty map.
    pub fn plan_topic(
        &self,
        selection: &TopicSelection,
        targets: &mut [BrokerUsage],
        all_brokers: &[Broker],
    ) -> Result<BTreeMap<PartitionId, Vec<BrokerId>>> {
        let mut assignments = BTreeMap::new();

        if selection.replication_factor <= 0 {
            warn!(
                topic = %selection.topic,
                replication_factor = selection.replication_factor,
                "skipping topic with invalid replication factor"
            );
            return Ok(assignments);
        }
        if selection.partitions.is_empty() {
            debug!(topic = %selection.topic, "no partitions selected, skipping topic");
            return Ok(assignments);
        }

        let mut topic_counts = TopicReplicaCount::new(targets.len());

        for partition in &selection.partitions {
            let replicas = self.placer.place(
                &selection.topic,
                partition,
                selection.replication_factor,
                &mut topic_counts,
                targets,
                all_brokers,
            )?;
            assignments.insert(partition.id, replicas);
        }

        debug!(
            topic = %selection.topic,
            partitions = assignments.len(),
            spread = topic_counts.spread(),
            "topic planned"
        );

        Ok(assignments)
    }
}

#[cfg(test)]
#[path = "topic_planner_test.rs"]
mod tests;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{BrokerId, PartitionId, TopicSelection};

/// New replica lists, topic name -> partition id -> ordered brokers.
///
/// Every selected partition has an entry. A partition of a skipped topic keeps an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReassignmentPlan {
    topics: BTreeMap<String, BTreeMap<PartitionId, Vec<BrokerId>>>,
}

impl ReassignmentPlan {
    /// One empty entry per topic and selected partition
    pub(crate) fn allocate(selections: &[TopicSelection]) -> Self {
        let mut plan = Self::default();
        for selection in selections {
            let partitions = plan.topics.entry(selection.topic.clone()).or_default();
            for partition in &selection.partitions {
                partitions.entry(partition.id).or_default();
            }
        }
        plan
    }

    pub(crate) fn set(&mut self, topic: &str, partition: PartitionId, replicas: Vec<BrokerId>) {
        self.topics
            .entry(topic.to_string())
            .or_default()
            .insert(partition, replicas);
    }

    pub fn get(&self, topic: &str, partition: PartitionId) -> Option<&[BrokerId]> {
        self.topics
            .get(topic)
            .and_then(|partitions| partitions.get(&partition))
            .map(Vec::as_slice)
    }

    pub fn topic(&self, topic: &str) -> Option<&BTreeMap<PartitionId, Vec<BrokerId>>> {
        self.topics.get(topic)
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    /// Number of entries, planned or not
    pub fn partition_count(&self) -> usize {
        self.topics.values().map(BTreeMap::len).sum()
    }

    /// Number of partitions that received a replica list
    pub fn planned_count(&self) -> usize {
        self.topics
            .values()
            .flat_map(BTreeMap::values)
            .filter(|replicas| !replicas.is_empty())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.planned_count() == 0
    }

    pub fn into_inner(self) -> BTreeMap<String, BTreeMap<PartitionId, Vec<BrokerId>>> {
        self.topics
    }

    /// Replica movements implied by the plan, compared with the replica lists in `selections`.
    ///
    /// Partitions whose replica set is unchanged, or that were not planned, produce no move.
    pub fn moves(&self, selections: &[TopicSelection]) -> Vec<ReplicaMove> {
        let mut moves = Vec::new();

        for selection in selections {
            for partition in &selection.partitions {
                let Some(replicas) = self.get(&selection.topic, partition.id) else {
                    continue;
                };
                if replicas.is_empty() {
                    continue;
                }

                let added: Vec<BrokerId> = replicas
                    .iter()
                    .copied()
                    .filter(|id| !partition.replicas.contains(id))
                    .collect();
                let removed: Vec<BrokerId> = partition
                    .replicas
                    .iter()
                    .copied()
                    .filter(|id| !replicas.contains(id))
                    .collect();

                if added.is_empty() && removed.is_empty() {
                    continue;
                }

                moves.push(ReplicaMove {
                    topic: selection.topic.clone(),
                    partition: partition.id,
                    from: removed,
                    to: added,
                    replicas: replicas.to_vec(),
                });
            }
        }

        moves
    }

    pub fn summary(&self, selections: &[TopicSelection]) -> PlanSummary {
        let moves = self.moves(selections);
        let mut replicas_per_broker: BTreeMap<BrokerId, usize> = BTreeMap::new();

        for replicas in self.topics.values().flat_map(BTreeMap::values) {
            for &broker_id in replicas {
                *replicas_per_broker.entry(broker_id).or_insert(0) += 1;
            }
        }

        let planned = self.planned_count();

        PlanSummary {
            partitions_planned: planned,
            partitions_skipped: self.partition_count() - planned,
            partitions_moved: moves.len(),
            replicas_added: moves.iter().map(|mv| mv.to.len()).sum(),
            replicas_removed: moves.iter().map(|mv| mv.from.len()).sum(),
            replicas_per_broker,
        }
    }
}

/// Brokers gaining and losing a replica of one partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaMove {
    pub topic: String,
    pub partition: PartitionId,
    /// Brokers that drop their replica
    pub from: Vec<BrokerId>,
    /// Brokers that receive a new replica
    pub to: Vec<BrokerId>,
    /// Full replica list after the move
    pub replicas: Vec<BrokerId>,
}

/// Aggregate view of a plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub partitions_planned: usize,
    pub partitions_skipped: usize,
    pub partitions_moved: usize,
    pub replicas_added: usize,
    pub replicas_removed: usize,
    /// Replicas of the planned partitions per broker
    pub replicas_per_broker: BTreeMap<BrokerId, usize>,
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;

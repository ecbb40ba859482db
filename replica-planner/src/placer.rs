use std::fmt;

use tracing::debug;

use crate::config::DiskTieBreak;
use crate::errors::{PlannerError, Result};
use crate::model::{Broker, BrokerId, PartitionSnapshot};
use crate::topic_planner::TopicReplicaCount;
use crate::usage::BrokerUsage;

/// Ordering key used to choose among brokers holding the same number of the topic's replicas.
///
/// Fields compare lexicographically in declaration order, lowest wins:
/// 1. brokers already hosting the partition (no data movement)
/// 2. brokers sharing a rack with a current replica (intra-rack copy)
/// 3. lower replica load (`initial + assigned`)
/// 4. lower disk load
/// 5. lower disk usage reported by the broker itself
///
/// Remaining ties go to the first broker in target order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlacementKey {
    pub moves_data: bool,
    pub leaves_rack: bool,
    pub replica_load: u64,
    pub disk_load: u64,
    pub reported_disk_usage: u64,
}

impl PlacementKey {
    pub fn for_broker(
        usage: &BrokerUsage,
        current: &CurrentPlacement,
        tie_break: DiskTieBreak,
    ) -> Self {
        let broker = usage.broker();
        let disk_load = match tie_break {
            DiskTieBreak::Symmetric => usage.total_size(),
            // the legacy comparator added the same base size to both sides
            DiskTieBreak::Reference => usage.assigned_size(),
        };

        Self {
            moves_data: !current.is_holder(broker.id),
            leaves_rack: !current.shares_rack(broker),
            replica_load: usage.total_replicas(),
            disk_load,
            reported_disk_usage: broker.reported_disk_usage,
        }
    }

    /// First criterion on which this key beats `other`
    pub fn criterion_against(&self, other: &PlacementKey) -> PlacementCriterion {
        if self.moves_data != other.moves_data {
            PlacementCriterion::CurrentHolder
        } else if self.leaves_rack != other.leaves_rack {
            PlacementCriterion::RackAffinity
        } else if self.replica_load != other.replica_load {
            PlacementCriterion::ReplicaLoad
        } else if self.disk_load != other.disk_load {
            PlacementCriterion::DiskLoad
        } else if self.reported_disk_usage != other.reported_disk_usage {
            PlacementCriterion::ReportedDiskUsage
        } else {
            PlacementCriterion::Order
        }
    }
}

/// Why a broker won a replica slot, logged with every decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementCriterion {
    /// Only one broker had the minimum topic replica count
    SoleCandidate,
    CurrentHolder,
    RackAffinity,
    ReplicaLoad,
    DiskLoad,
    ReportedDiskUsage,
    /// Fully tied, first in target order
    Order,
}

impl fmt::Display for PlacementCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SoleCandidate => "sole_candidate",
            Self::CurrentHolder => "current_holder",
            Self::RackAffinity => "rack_affinity",
            Self::ReplicaLoad => "replica_load",
            Self::DiskLoad => "disk_load",
            Self::ReportedDiskUsage => "reported_disk_usage",
            Self::Order => "order",
        };
        f.write_str(name)
    }
}

/// Where a partition lives before reassignment, resolved against the full broker list
#[derive(Debug, Clone, Default)]
pub struct CurrentPlacement {
    holders: Vec<BrokerId>,
    racks: Vec<String>,
}

impl CurrentPlacement {
    pub fn resolve(
        topic: &str,
        partition: &PartitionSnapshot,
        all_brokers: &[Broker],
    ) -> Result<Self> {
        let mut placement = Self::default();

        for &broker_id in &partition.replicas {
            let broker = all_brokers
                .iter()
                .find(|b| b.id == broker_id)
                .ok_or_else(|| PlannerError::Reference {
                    topic: topic.to_string(),
                    partition: partition.id,
                    broker_id,
                })?;

            placement.holders.push(broker_id);
            if let Some(rack) = &broker.rack {
                if !placement.racks.contains(rack) {
                    placement.racks.push(rack.clone());
                }
            }
        }

        Ok(placement)
    }

    pub fn is_holder(&self, broker_id: BrokerId) -> bool {
        self.holders.contains(&broker_id)
    }

    /// Brokers without a rack never share one
    pub fn shares_rack(&self, broker: &Broker) -> bool {
        broker
            .rack
            .as_ref()
            .is_some_and(|rack| self.racks.contains(rack))
    }
}

/// Greedy per-replica broker selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplicaPlacer {
    disk_tie_break: DiskTieBreak,
}

impl ReplicaPlacer {
    pub fn new(disk_tie_break: DiskTieBreak) -> Self {
        Self { disk_tie_break }
    }

    /// Chooses `replication_factor` brokers out of `targets` for one partition.
    ///
    /// Every slot goes to a broker holding the fewest replicas of the topic so far, which
    /// keeps the topic evenly spread. Among those, the [`PlacementKey`] decides. The winner's
    /// topic count and usage are updated before the next slot, so later slots and later
    /// partitions see the commitment.
    ///
    /// Brokers are not repeated within a partition unless the replication factor exceeds
    /// the number of targets.
    pub fn place(
        &self,
        topic: &str,
        partition: &PartitionSnapshot,
        replication_factor: i32,
        topic_counts: &mut TopicReplicaCount,
        targets: &mut [BrokerUsage],
        all_brokers: &[Broker],
    ) -> Result<Vec<BrokerId>> {
        if replication_factor <= 0 {
            return Err(PlannerError::Validation(format!(
                "replication factor {} of topic {} must be positive",
                replication_factor, topic
            )));
        }
        if targets.is_empty() {
            return Err(PlannerError::Validation(format!(
                "no target brokers to place partition {}-{}",
                topic, partition.id
            )));
        }

        let current = CurrentPlacement::resolve(topic, partition, all_brokers)?;
        let size_estimate =
            partition
                .max_reported_size()
                .ok_or_else(|| PlannerError::MissingData {
                    topic: topic.to_string(),
                    partition: partition.id,
                    broker_id: None,
                })?;

        let mut chosen: Vec<usize> = Vec::with_capacity(replication_factor as usize);

        for slot in 0..replication_factor {
            let mut eligible: Vec<usize> = (0..targets.len())
                .filter(|idx| !chosen.contains(idx))
                .collect();
            if eligible.is_empty() {
                eligible = (0..targets.len()).collect();
            }

            let min_count = eligible
                .iter()
                .map(|&idx| topic_counts.get(idx))
                .min()
                .unwrap_or(0);

            let candidates: Vec<(usize, PlacementKey)> = eligible
                .into_iter()
                .filter(|&idx| topic_counts.get(idx) == min_count)
                .map(|idx| {
                    let key = PlacementKey::for_broker(&targets[idx], &current, self.disk_tie_break);
                    (idx, key)
                })
                .collect();

            // min_by_key keeps the first of equal keys, so ties resolve in target order
            let Some(&(winner, key)) = candidates.iter().min_by_key(|(_, key)| *key) else {
                return Err(PlannerError::Validation(format!(
                    "no eligible broker for partition {}-{}",
                    topic, partition.id
                )));
            };

            let criterion = candidates
                .iter()
                .filter(|(idx, _)| *idx != winner)
                .map(|(_, other)| *other)
                .min()
                .map(|runner_up| key.criterion_against(&runner_up))
                .unwrap_or(PlacementCriterion::SoleCandidate);

            topic_counts.increment(winner);
            targets[winner].record_assignment(size_estimate);
            chosen.push(winner);

            debug!(
                topic = %topic,
                partition = %partition.id,
                slot,
                broker_id = %targets[winner].broker().id,
                criterion = %criterion,
                candidates = candidates.len(),
                "replica slot assigned"
            );
        }

        Ok(chosen
            .into_iter()
            .map(|idx| targets[idx].broker().id)
            .collect())
    }
}

#[cfg(test)]
#[path = "placer_test.rs"]
mod tests;

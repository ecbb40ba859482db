use tracing::{debug, info, warn};

use crate::config::PlannerConfig;
use crate::errors::{PlannerError, Result};
use crate::model::{Broker, BrokerId, ClusterSnapshot, TopicSelection};
use crate::placer::ReplicaPlacer;
use crate::plan::ReassignmentPlan;
use crate::topic_planner::TopicPlanner;
use crate::usage::BrokerUsage;

/// Entry point of the planner: computes the new replica lists of the selected partitions.
///
/// ## Phases:
/// 1. **Track**: a [`BrokerUsage`] is built for every broker from the cluster snapshot
/// 2. **Reset**: the selected partitions are removed from the usage of the target brokers
///    hosting them, so brokers are compared on the load they keep
/// 3. **Distribute**: each topic is handed to the [`TopicPlanner`] in selection order
///
/// The coordinator only holds its configuration. All counters are created per call, so
/// concurrent calls on the same coordinator never share state.
#[derive(Debug, Clone, Default)]
pub struct ReassignmentCoordinator {
    config: PlannerConfig,
}

impl ReassignmentCoordinator {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans `selections` onto the brokers of `all_brokers` listed in `target_brokers`.
    ///
    /// Targets keep the order of `all_brokers`, which is the final tie-break. Any error
    /// aborts the whole computation; no partial plan is returned. Every target id must name
    /// a broker of `all_brokers` and each topic may be selected only once.
    pub fn compute_reassignments(
        &self,
        selections: &[TopicSelection],
        all_brokers: &[Broker],
        target_brokers: &[BrokerId],
        snapshot: &ClusterSnapshot,
    ) -> Result<ReassignmentPlan> {
        info!(
            topics = selections.len(),
            brokers = all_brokers.len(),
            targets = target_brokers.len(),
            "computing partition reassignments"
        );

        validate_request(selections, all_brokers, target_brokers)?;

        let usages = all_brokers
            .iter()
            .map(|broker| BrokerUsage::initialize(broker, snapshot))
            .collect::<Result<Vec<_>>>()?;

        let mut targets: Vec<BrokerUsage> = usages
            .into_iter()
            .filter(|usage| target_brokers.contains(&usage.broker().id))
            .collect();

        let mut plan = ReassignmentPlan::allocate(selections);

        for target in targets.iter_mut() {
            for selection in selections {
                target.subtract(
                    &selection.topic,
                    &selection.partitions,
                    self.config.reset_policy,
                )?;
            }
        }
        debug!(
            targets = targets.len(),
            policy = ?self.config.reset_policy,
            "reset phase completed"
        );

        let planner = TopicPlanner::new(ReplicaPlacer::new(self.config.disk_tie_break));
        for selection in selections {
            let assignments = planner.plan_topic(selection, &mut targets, all_brokers)?;
            for (partition, replicas) in assignments {
                plan.set(&selection.topic, partition, replicas);
            }
        }

        let summary = plan.summary(selections);
        info!(
            planned = summary.partitions_planned,
            skipped = summary.partitions_skipped,
            moved = summary.partitions_moved,
            replicas_added = summary.replicas_added,
            "partition reassignment plan computed"
        );

        Ok(plan)
    }
}

/// Rejects target ids unknown to the cluster and topics selected more than once
fn validate_request(
    selections: &[TopicSelection],
    all_brokers: &[Broker],
    target_brokers: &[BrokerId],
) -> Result<()> {
    if let Some(unknown) = target_brokers
        .iter()
        .find(|&&id| !all_brokers.iter().any(|broker| broker.id == id))
    {
        warn!(broker_id = %unknown, "target broker is not part of the cluster");
        return Err(PlannerError::Validation(format!(
            "target broker {} is not a known broker",
            unknown
        )));
    }

    for (idx, selection) in selections.iter().enumerate() {
        if selections[..idx].iter().any(|s| s.topic == selection.topic) {
            return Err(PlannerError::Validation(format!(
                "topic {} is selected more than once",
                selection.topic
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod tests;

//! # Replica Planner
//!
//! Computes where the replicas of a set of selected partitions should live, given the
//! brokers allowed to receive them.
//!
//! ## Placement rules
//!
//! - **Even spread**: each replica goes to a target broker holding the fewest replicas of
//!   the topic planned so far
//! - **Minimal movement**: brokers already hosting the partition are preferred
//! - **Rack affinity**: then brokers sharing a rack with a current replica
//! - **Cluster balance**: then the lower replica count, then the lower disk usage
//!
//! The computation is a synchronous, deterministic function of its inputs: the selected
//! partitions, the brokers, the target broker ids and a [`ClusterSnapshot`] supplied by
//! the caller. Nothing is fetched from the cluster and nothing is submitted back.
//!
//! ```no_run
//! use replica_planner::{ClusterSnapshot, PlannerConfig, ReassignmentCoordinator};
//!
//! # fn run(snapshot: ClusterSnapshot) -> replica_planner::Result<()> {
//! let coordinator = ReassignmentCoordinator::new(PlannerConfig::default());
//! let plan = coordinator.compute_reassignments(&[], &[], &[], &snapshot)?;
//! assert!(plan.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod model;
pub mod placer;
pub mod plan;
pub mod topic_planner;
pub mod usage;
mod coordinator;

// Re-export main types
pub use config::{DiskTieBreak, PlannerConfig, ResetPolicy};
pub use coordinator::ReassignmentCoordinator;
pub use errors::{PlannerError, Result};
pub use model::{
    Broker, BrokerId, ClusterSnapshot, LogDirReport, PartitionId, PartitionSnapshot,
    TopicSelection, TopicSnapshot,
};
pub use placer::{CurrentPlacement, PlacementCriterion, PlacementKey, ReplicaPlacer};
pub use plan::{PlanSummary, ReassignmentPlan, ReplicaMove};
pub use topic_planner::{TopicPlanner, TopicReplicaCount};
pub use usage::BrokerUsage;

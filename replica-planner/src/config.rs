use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{PlannerError, Result};

/// How the reset phase treats the footprint of the partitions being replanned
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Remove the selected partitions' replicas and sizes from the brokers that host them
    /// (default). Brokers are then compared on the load they keep after the move.
    Subtract,

    /// Validate the reports but leave the counters untouched, so the initial load equals
    /// the actual load. Matches the planners that never applied the decrement.
    Preserve,
}

impl Default for ResetPolicy {
    fn default() -> Self {
        Self::Subtract
    }
}

/// Comparison used for the disk-load tie-break
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiskTieBreak {
    /// Each broker's own `initial_size + assigned_size` (default)
    Symmetric,

    /// Bit-for-bit parity with the legacy comparator, which added the same base size
    /// to both sides. Only the sizes assigned during this computation are compared.
    Reference,
}

impl Default for DiskTieBreak {
    fn default() -> Self {
        Self::Symmetric
    }
}

/// Replica planner configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PlannerConfig {
    #[serde(default)]
    pub reset_policy: ResetPolicy,

    #[serde(default)]
    pub disk_tie_break: DiskTieBreak,
}

impl PlannerConfig {
    pub fn with_reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    pub fn with_disk_tie_break(mut self, tie_break: DiskTieBreak) -> Self {
        self.disk_tie_break = tie_break;
        self
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| PlannerError::Config(format!("invalid planner config: {}", e)))
    }

    /// Loads the configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_to_string(path).map_err(|e| {
            PlannerError::Config(format!("unable to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

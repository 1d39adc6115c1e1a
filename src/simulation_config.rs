//! Simulation configuration.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::time_series::Minute;

/// Approximate node memory in MB taken by system pods.
pub const SYSTEM_PODS_MEMORY: f64 = 216.0;

/// Holds raw simulation config parsed from YAML file.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
struct RawSimulationConfig {
    pub node_memory: Option<f64>,
    pub user_pod_memory: Option<f64>,
    pub node_capacity: Option<u32>,
    pub min_nodes: Option<u32>,
    pub max_nodes: Option<u32>,
    pub node_stop_time: Option<Minute>,
    pub node_start_delay: Option<Minute>,
    pub pod_inactivity_time: Option<Minute>,
    pub pod_max_lifetime: Option<Minute>,
}

/// Represents simulation configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Node memory in GB.
    pub node_memory: f64,
    /// Memory of a single user pod in MB.
    pub user_pod_memory: f64,
    /// Pods per node, overrides the value derived from memory sizes.
    pub node_capacity: Option<u32>,
    /// Number of nodes kept running regardless of idleness.
    pub min_nodes: u32,
    /// Size of the node pool, the `min_nodes` floor included. A config written for a pool of
    /// `max_nodes - min_nodes` nodes keeps its pool size with `max_nodes` lowered by `min_nodes`.
    pub max_nodes: u32,
    /// Minutes a running node must stay empty before it is stopped.
    pub node_stop_time: Minute,
    /// Minutes a node spends starting before it is running.
    pub node_start_delay: Minute,
    /// Minutes of user inactivity before the pod is culled, 0 disables.
    pub pod_inactivity_time: Minute,
    /// Minutes a pod may live before it is culled, 0 means unlimited.
    pub pod_max_lifetime: Minute,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            node_memory: 16.0,
            user_pod_memory: 1024.0,
            node_capacity: None,
            min_nodes: 1,
            max_nodes: 10,
            node_stop_time: 10,
            node_start_delay: 5,
            pod_inactivity_time: 60,
            pod_max_lifetime: 0,
        }
    }
}

impl SimulationConfig {
    pub fn new(
        node_capacity: u32,
        min_nodes: u32,
        max_nodes: u32,
        node_stop_time: Minute,
        pod_inactivity_time: Minute,
        pod_max_lifetime: Minute,
    ) -> Self {
        Self {
            node_capacity: Some(node_capacity),
            min_nodes,
            max_nodes,
            node_stop_time,
            pod_inactivity_time,
            pod_max_lifetime,
            ..Default::default()
        }
    }

    pub fn from_file(file_name: &str) -> Result<Self, Error> {
        let raw: RawSimulationConfig = serde_yaml::from_str(&std::fs::read_to_string(file_name)?)?;
        let default = Self::default();

        let config = Self {
            node_memory: raw.node_memory.unwrap_or(default.node_memory),
            user_pod_memory: raw.user_pod_memory.unwrap_or(default.user_pod_memory),
            node_capacity: raw.node_capacity,
            min_nodes: raw.min_nodes.unwrap_or(default.min_nodes),
            max_nodes: raw.max_nodes.unwrap_or(default.max_nodes),
            node_stop_time: raw.node_stop_time.unwrap_or(default.node_stop_time),
            node_start_delay: raw.node_start_delay.unwrap_or(default.node_start_delay),
            pod_inactivity_time: raw.pod_inactivity_time.unwrap_or(default.pod_inactivity_time),
            pod_max_lifetime: raw.pod_max_lifetime.unwrap_or(default.pod_max_lifetime),
        };
        config.validate()?;
        Ok(config)
    }

    /// Number of user pods fitting on one node.
    pub fn node_capacity(&self) -> u32 {
        self.node_capacity.unwrap_or_else(|| {
            let available_memory = self.node_memory * 1024.0 - SYSTEM_PODS_MEMORY;
            (available_memory / self.user_pod_memory).round().max(0.0) as u32
        })
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.node_capacity.is_none() && (self.user_pod_memory.is_nan() || self.user_pod_memory <= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "user_pod_memory must be positive, got {}",
                self.user_pod_memory
            )));
        }
        if self.node_capacity() == 0 {
            return Err(Error::InvalidConfig("a node must fit at least one user pod".to_string()));
        }
        if self.max_nodes == 0 {
            return Err(Error::InvalidConfig("max_nodes must be positive".to_string()));
        }
        if self.min_nodes > self.max_nodes {
            return Err(Error::InvalidConfig(format!(
                "min_nodes ({}) exceeds max_nodes ({})",
                self.min_nodes, self.max_nodes
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_from_memory() {
        let config = SimulationConfig {
            node_memory: 8.0,
            user_pod_memory: 512.0,
            ..Default::default()
        };
        // (8192 - 216) / 512 = 15.58
        assert_eq!(config.node_capacity(), 16);
        assert_eq!(SimulationConfig::default().node_capacity(), 16);
    }

    #[test]
    fn test_capacity_override() {
        let config = SimulationConfig::new(3, 1, 2, 10, 0, 0);
        assert_eq!(config.node_capacity(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_node_bounds() {
        let config = SimulationConfig::new(3, 4, 2, 10, 0, 0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}

use crate::node::{Node, NodeId};
use crate::scheduler_algorithm::{nodes_with_room, SchedulerAlgorithm};
use crate::time_series::Minute;

/// Least requested priority: pods are spread onto the emptiest nodes.
#[derive(Default)]
pub struct LRPAlgorithm;

impl LRPAlgorithm {
    pub fn new() -> Self {
        Default::default()
    }
}

impl SchedulerAlgorithm for LRPAlgorithm {
    fn filter(&self, nodes: &[Node], t: Minute) -> Vec<NodeId> {
        nodes_with_room(nodes, t)
    }

    fn score(&self, nodes: &[Node], filtered_node_ids: &[NodeId], t: Minute) -> Vec<f64> {
        filtered_node_ids
            .iter()
            .map(|node_id| 10.0 * (1.0 - nodes[*node_id].utilization_rate_at(t)))
            .collect()
    }
}

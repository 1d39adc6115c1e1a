use crate::node::{Node, NodeId};
use crate::scheduler_algorithm::{nodes_with_room, SchedulerAlgorithm};
use crate::time_series::Minute;

/// Most requested priority: the fullest node that still has room wins.
///
/// Packing pods onto busy nodes leaves the others empty long enough for the cluster
/// autoscaler to stop them.
#[derive(Default)]
pub struct MRPAlgorithm;

impl MRPAlgorithm {
    pub fn new() -> Self {
        Default::default()
    }
}

impl SchedulerAlgorithm for MRPAlgorithm {
    fn filter(&self, nodes: &[Node], t: Minute) -> Vec<NodeId> {
        nodes_with_room(nodes, t)
    }

    fn score(&self, nodes: &[Node], filtered_node_ids: &[NodeId], t: Minute) -> Vec<f64> {
        filtered_node_ids
            .iter()
            .map(|node_id| nodes[*node_id].utilization_at(t) as f64)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_fuller_node() {
        let mut nodes = vec![Node::new(0, 3), Node::new(1, 3), Node::new(2, 3)];
        nodes[0].add_pod(0, 0);
        nodes[1].add_pod(1, 0);
        nodes[1].add_pod(2, 0);
        nodes[2].add_pod(3, 0);
        nodes[2].add_pod(4, 0);
        nodes[2].add_pod(5, 0);

        let algorithm = MRPAlgorithm::new();
        let filtered = algorithm.filter(&nodes, 0);
        assert_eq!(filtered, vec![0, 1]);
        assert_eq!(algorithm.score(&nodes, &filtered, 0), vec![1.0, 2.0]);
    }
}

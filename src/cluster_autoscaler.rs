use log::debug;

use crate::cluster_autoscaler_algorithm::ClusterAutoscalerAlgorithm;
use crate::node::{Node, NodeState};
use crate::time_series::Minute;

/// Drives node lifecycle transitions from the decisions of its algorithm.
///
/// A started node is `Starting` for `node_start_delay` minutes and `Running` afterwards. A stopped
/// node is `Stopping` for the current minute and `Stopped` afterwards. Both are forward fills,
/// a later transition overwrites them.
pub struct ClusterAutoscaler {
    cluster_autoscaler_algorithm: Box<dyn ClusterAutoscalerAlgorithm>,
    node_start_delay: Minute,
}

impl ClusterAutoscaler {
    pub fn new(cluster_autoscaler_algorithm: Box<dyn ClusterAutoscalerAlgorithm>, node_start_delay: Minute) -> Self {
        Self {
            cluster_autoscaler_algorithm,
            node_start_delay,
        }
    }

    /// Returns the number of nodes started.
    pub fn try_to_scale_up(&mut self, nodes: &mut [Node], t: Minute) -> usize {
        let nodes_to_start = self.cluster_autoscaler_algorithm.nodes_to_start(nodes, t);
        for &node_id in &nodes_to_start {
            let node = &mut nodes[node_id];
            assert!(node.has_pods(), "node {} started at minute {} without pods", node_id, t);
            assert_eq!(node.state_at(t), NodeState::Stopped, "node {} started twice", node_id);
            node.set_state_from(t, NodeState::Starting);
            node.set_state_from(t + self.node_start_delay, NodeState::Running);
            debug!("minute {}: node {} starting with {} pods", t, node_id, node.pods().len());
        }
        nodes_to_start.len()
    }

    /// Returns the number of nodes stopped.
    pub fn try_to_scale_down(&mut self, nodes: &mut [Node], t: Minute) -> usize {
        let nodes_to_stop = self.cluster_autoscaler_algorithm.nodes_to_stop(nodes, t);
        for &node_id in &nodes_to_stop {
            let node = &mut nodes[node_id];
            assert_eq!(node.state_at(t), NodeState::Running, "node {} stopped while not running", node_id);
            node.set_state_from(t, NodeState::Stopping);
            node.set_state_from(t + 1, NodeState::Stopped);
            debug!("minute {}: node {} stopping after idle period", t, node_id);
        }
        nodes_to_stop.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeId;

    /// Starts the first node every minute, whatever it holds.
    struct StartFirstNode {}

    impl ClusterAutoscalerAlgorithm for StartFirstNode {
        fn nodes_to_start(&mut self, _nodes: &[Node], _t: Minute) -> Vec<NodeId> {
            vec![0]
        }

        fn nodes_to_stop(&mut self, _nodes: &[Node], _t: Minute) -> Vec<NodeId> {
            Vec::new()
        }
    }

    #[test]
    fn test_start_delay() {
        let mut nodes = vec![Node::new(0, 2)];
        nodes[0].add_pod(0, 2);
        let mut autoscaler = ClusterAutoscaler::new(Box::new(StartFirstNode {}), 3);
        assert_eq!(autoscaler.try_to_scale_up(&mut nodes, 2), 1);
        assert_eq!(nodes[0].state_at(1), NodeState::Stopped);
        assert_eq!(nodes[0].state_at(4), NodeState::Starting);
        assert_eq!(nodes[0].state_at(5), NodeState::Running);
    }

    #[test]
    #[should_panic(expected = "started at minute 0 without pods")]
    fn test_start_of_empty_node() {
        let mut nodes = vec![Node::new(0, 2)];
        let mut autoscaler = ClusterAutoscaler::new(Box::new(StartFirstNode {}), 5);
        autoscaler.try_to_scale_up(&mut nodes, 0);
    }
}

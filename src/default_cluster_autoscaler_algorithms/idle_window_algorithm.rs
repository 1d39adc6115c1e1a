use log::debug;

use crate::cluster_autoscaler_algorithm::ClusterAutoscalerAlgorithm;
use crate::node::{Node, NodeId, NodeState};
use crate::time_series::Minute;

/// Starts every stopped node that got pods, and stops running nodes which stayed empty for
/// `node_stop_time` minutes while more than `min_nodes` nodes are running.
pub struct IdleWindowAutoscalerAlgorithm {
    min_nodes: u32,
    node_stop_time: Minute,
}

impl IdleWindowAutoscalerAlgorithm {
    pub fn new(min_nodes: u32, node_stop_time: Minute) -> Self {
        Self {
            min_nodes,
            node_stop_time,
        }
    }
}

impl ClusterAutoscalerAlgorithm for IdleWindowAutoscalerAlgorithm {
    fn nodes_to_start(&mut self, nodes: &[Node], t: Minute) -> Vec<NodeId> {
        nodes
            .iter()
            .filter(|node| node.state_at(t) == NodeState::Stopped && node.has_pods())
            .map(|node| node.id)
            .collect()
    }

    fn nodes_to_stop(&mut self, nodes: &[Node], t: Minute) -> Vec<NodeId> {
        let mut nodes_to_scale_down = Vec::<NodeId>::default();
        if t < self.node_stop_time {
            return nodes_to_scale_down;
        }

        let window = t - self.node_stop_time..=t;
        let mut running_nodes = nodes.iter().filter(|node| node.state_at(t) == NodeState::Running).count();
        for node in nodes.iter().filter(|node| node.state_at(t) == NodeState::Running) {
            if running_nodes <= self.min_nodes as usize {
                debug!("minute {}: {} nodes running, scale down floor reached", t, running_nodes);
                break;
            }
            if node.is_idle_over(window.clone()) {
                nodes_to_scale_down.push(node.id);
                running_nodes -= 1;
            }
        }
        nodes_to_scale_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_node(id: NodeId) -> Node {
        let mut node = Node::new(id, 4);
        node.set_state_from(0, NodeState::Running);
        node
    }

    #[test]
    fn test_no_scale_down_before_first_window() {
        let nodes = vec![running_node(0), running_node(1)];
        let mut algorithm = IdleWindowAutoscalerAlgorithm::new(0, 10);
        assert!(algorithm.nodes_to_stop(&nodes, 9).is_empty());
        assert_eq!(algorithm.nodes_to_stop(&nodes, 10), vec![0, 1]);
    }

    #[test]
    fn test_floor_stops_scan_in_pool_order() {
        let nodes = vec![running_node(0), running_node(1), running_node(2)];
        let mut algorithm = IdleWindowAutoscalerAlgorithm::new(1, 3);
        assert_eq!(algorithm.nodes_to_stop(&nodes, 5), vec![0, 1]);
    }

    #[test]
    fn test_busy_node_within_window_is_kept() {
        let mut nodes = vec![running_node(0), running_node(1)];
        nodes[0].add_pod(7, 2);
        nodes[0].remove_pod(7, 4);
        let mut algorithm = IdleWindowAutoscalerAlgorithm::new(0, 3);
        assert_eq!(algorithm.nodes_to_stop(&nodes, 6), vec![1]);
        assert_eq!(algorithm.nodes_to_stop(&nodes, 7), vec![0, 1]);
    }

    #[test]
    fn test_starts_stopped_nodes_with_pods() {
        let mut nodes = vec![Node::new(0, 2), Node::new(1, 2), running_node(2)];
        nodes[1].add_pod(0, 3);
        nodes[2].add_pod(1, 3);
        let mut algorithm = IdleWindowAutoscalerAlgorithm::new(1, 10);
        assert_eq!(algorithm.nodes_to_start(&nodes, 3), vec![1]);
    }
}

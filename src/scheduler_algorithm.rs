use crate::node::{Node, NodeId};
use crate::time_series::Minute;

pub trait SchedulerAlgorithm {
    /// Filter nodes that can accept one more pod at minute `t`, returns their ids in pool order.
    fn filter(&self, nodes: &[Node], t: Minute) -> Vec<NodeId>;

    /// Score filtered nodes for the next pod, returns scores for nodes from filtered_node_ids.
    fn score(&self, nodes: &[Node], filtered_node_ids: &[NodeId], t: Minute) -> Vec<f64>;
}

/// Nodes with spare capacity at minute `t`, in pool order.
pub fn nodes_with_room(nodes: &[Node], t: Minute) -> Vec<NodeId> {
    nodes.iter().filter(|node| node.has_room_at(t)).map(|node| node.id).collect()
}

use crate::node::{Node, NodeId};
use crate::time_series::Minute;

pub trait ClusterAutoscalerAlgorithm {
    /// Checks which stopped nodes must be brought up at minute `t`, returns their ids
    fn nodes_to_start(&mut self, nodes: &[Node], t: Minute) -> Vec<NodeId>;

    /// Checks the need for scaling down at minute `t`, returns ids of nodes to be stopped
    fn nodes_to_stop(&mut self, nodes: &[Node], t: Minute) -> Vec<NodeId>;
}

use log::debug;

use crate::node::{Node, NodeId};
use crate::scheduler_algorithm::SchedulerAlgorithm;
use crate::time_series::Minute;
use crate::user::User;

pub struct Scheduler {
    scheduler_algorithm: Box<dyn SchedulerAlgorithm>,
}

impl Scheduler {
    pub fn new(scheduler_algorithm: Box<dyn SchedulerAlgorithm>) -> Self {
        Self { scheduler_algorithm }
    }

    /// Places pending pods in user pool order, returns how many are left pending.
    ///
    /// Nodes are re-scored before every placement, so a pod placed earlier in the same minute
    /// counts towards its node's utilization for the next one.
    pub fn schedule_pending_pods(&self, nodes: &mut [Node], users: &mut [User], t: Minute) -> usize {
        let mut unschedulable = 0;
        for user in users.iter_mut().filter(|user| user.is_pending()) {
            match self.select_node(nodes, t) {
                Some(node_id) => {
                    nodes[node_id].add_pod(user.id, t);
                    user.assign(node_id, t);
                    debug!(
                        "minute {}: pod of user {} placed on node {} ({}/{})",
                        t,
                        user.id,
                        node_id,
                        nodes[node_id].utilization_at(t),
                        nodes[node_id].capacity
                    );
                }
                None => unschedulable += 1,
            }
        }
        if unschedulable > 0 {
            debug!("minute {}: {} pods left pending, all nodes are full", t, unschedulable);
        }
        unschedulable
    }

    /// Picks the highest scored node with room at minute `t`; ties go to the earliest node.
    pub fn select_node(&self, nodes: &[Node], t: Minute) -> Option<NodeId> {
        let filtered_nodes = self.scheduler_algorithm.filter(nodes, t);
        if filtered_nodes.is_empty() {
            return None;
        }
        let node_scores = self.scheduler_algorithm.score(nodes, &filtered_nodes, t);
        let mut max_score_ind = 0;
        for i in 0..filtered_nodes.len() {
            if node_scores[i] > node_scores[max_score_ind] {
                max_score_ind = i;
            }
        }
        Some(filtered_nodes[max_score_ind])
    }
}

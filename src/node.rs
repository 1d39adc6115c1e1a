//! Representation of a cluster node hosting user pods

use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::time_series::{Minute, TimeSeries};
use crate::user::UserId;

/// Index of the node in the simulation's node pool.
pub type NodeId = usize;

/// Node lifecycle state, driven by the cluster autoscaler
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum NodeState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl NodeState {
    /// Whether the node is billed in this state.
    pub fn is_provisioned(&self) -> bool {
        !matches!(self, NodeState::Stopped)
    }
}

impl Display for NodeState {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            NodeState::Stopped => write!(f, "stopped"),
            NodeState::Starting => write!(f, "starting"),
            NodeState::Running => write!(f, "running"),
            NodeState::Stopping => write!(f, "stopping"),
        }
    }
}

pub struct Node {
    pub id: NodeId,
    /// Maximum number of pods placed at the same time.
    pub capacity: u32,
    utilization: TimeSeries<u32>,
    state: TimeSeries<NodeState>,
    /// Users whose pods are placed here, in placement order.
    pods: Vec<UserId>,
}

impl Node {
    pub fn new(id: NodeId, capacity: u32) -> Self {
        assert!(capacity > 0, "node {} must hold at least one pod", id);
        Self {
            id,
            capacity,
            utilization: TimeSeries::new(0),
            state: TimeSeries::new(NodeState::Stopped),
            pods: Vec::new(),
        }
    }

    pub fn pods(&self) -> &[UserId] {
        &self.pods
    }

    pub fn has_pods(&self) -> bool {
        !self.pods.is_empty()
    }

    pub fn utilization_at(&self, t: Minute) -> u32 {
        *self.utilization.value_at(t)
    }

    pub fn utilization(&self) -> &TimeSeries<u32> {
        &self.utilization
    }

    /// Share of the capacity used at minute `t`, in `[0, 1]`.
    pub fn utilization_rate_at(&self, t: Minute) -> f64 {
        self.utilization_at(t) as f64 / self.capacity as f64
    }

    pub fn has_room_at(&self, t: Minute) -> bool {
        self.utilization_at(t) < self.capacity
    }

    /// Returns true if no pod was placed on the node at any minute of `range`.
    pub fn is_idle_over(&self, range: RangeInclusive<Minute>) -> bool {
        self.utilization.is_constant_over(range, &0)
    }

    pub fn state_at(&self, t: Minute) -> NodeState {
        *self.state.value_at(t)
    }

    pub fn states(&self) -> &TimeSeries<NodeState> {
        &self.state
    }

    pub fn set_state_from(&mut self, t: Minute, state: NodeState) {
        self.state.set_from(t, state);
    }

    pub fn add_pod(&mut self, user_id: UserId, t: Minute) {
        assert!(
            self.has_room_at(t),
            "node {} is full ({} pods) at minute {}",
            self.id,
            self.capacity,
            t
        );
        assert!(!self.pods.contains(&user_id), "pod of user {} is already on node {}", user_id, self.id);
        self.pods.push(user_id);
        self.sync_utilization(t);
    }

    pub fn remove_pod(&mut self, user_id: UserId, t: Minute) {
        let Some(position) = self.pods.iter().position(|id| *id == user_id) else {
            panic!("pod of user {} is not placed on node {}", user_id, self.id);
        };
        self.pods.remove(position);
        self.sync_utilization(t);
    }

    // utilization[t..] == number of placed pods
    fn sync_utilization(&mut self, t: Minute) {
        self.utilization.set_from(t, self.pods.len() as u32);
    }
}

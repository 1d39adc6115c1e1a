//! Representation of a hub user and its single-user pod

use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::node::NodeId;
use crate::time_series::Minute;

pub type UserId = usize;

/// Where the user's pod currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PodStatus {
    /// No pod exists for the user.
    Absent,
    /// The pod exists but no node had room for it yet.
    Pending,
    /// The pod is placed on a node.
    Assigned,
}

impl Display for PodStatus {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            PodStatus::Absent => write!(f, "absent"),
            PodStatus::Pending => write!(f, "pending"),
            PodStatus::Assigned => write!(f, "assigned"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct User {
    pub id: UserId,
    activity: Vec<bool>,

    pub has_pod: bool,
    /// Back reference to the node holding the pod. The node's pod list is authoritative.
    pub assigned_node: Option<NodeId>,
    /// Minute at which the current pod was placed.
    pub pod_start_time: Option<Minute>,
}

impl User {
    pub fn new(id: UserId, activity: Vec<bool>) -> Self {
        Self {
            id,
            activity,
            has_pod: false,
            assigned_node: None,
            pod_start_time: None,
        }
    }

    pub fn activity(&self) -> &[bool] {
        &self.activity
    }

    pub fn is_active_at(&self, t: Minute) -> bool {
        self.activity[t]
    }

    /// Returns true if the user had no activity at any minute of `range`.
    pub fn inactive_over(&self, range: RangeInclusive<Minute>) -> bool {
        self.activity[range].iter().all(|active| !active)
    }

    pub fn is_pending(&self) -> bool {
        self.has_pod && self.assigned_node.is_none()
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_node.is_some()
    }

    pub fn pod_status(&self) -> PodStatus {
        if !self.has_pod {
            PodStatus::Absent
        } else if self.is_assigned() {
            PodStatus::Assigned
        } else {
            PodStatus::Pending
        }
    }

    /// Records placement of the pending pod on `node_id` at minute `t`.
    pub fn assign(&mut self, node_id: NodeId, t: Minute) {
        assert!(self.is_pending(), "user {} has no pending pod to assign", self.id);
        self.assigned_node = Some(node_id);
        self.pod_start_time = Some(t);
    }

    /// Drops the pod entirely. The user may spawn a new one on its next active minute.
    pub fn release_pod(&mut self) {
        self.has_pod = false;
        self.assigned_node = None;
        self.pod_start_time = None;
    }
}

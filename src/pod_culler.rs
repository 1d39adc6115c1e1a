//! Eviction of idle and long-lived user pods.

use std::fmt::{Display, Formatter};

use log::debug;

use crate::node::Node;
use crate::time_series::Minute;
use crate::user::User;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CullReason {
    Inactivity,
    MaxLifetime,
}

impl Display for CullReason {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            CullReason::Inactivity => write!(f, "inactivity"),
            CullReason::MaxLifetime => write!(f, "max lifetime"),
        }
    }
}

/// Removes pods of users idle for longer than `inactivity_time` minutes, and pods placed at least
/// `max_lifetime` minutes ago. A zero threshold disables the rule.
pub struct PodCuller {
    inactivity_time: Minute,
    max_lifetime: Minute,
}

impl PodCuller {
    pub fn new(inactivity_time: Minute, max_lifetime: Minute) -> Self {
        Self {
            inactivity_time,
            max_lifetime,
        }
    }

    /// Inactivity is checked first; a pod matching both rules is reported as idle.
    pub fn cull_reason(&self, user: &User, t: Minute) -> Option<CullReason> {
        if self.inactivity_time > 0
            && t >= self.inactivity_time
            && user.inactive_over(t - self.inactivity_time..=t)
        {
            return Some(CullReason::Inactivity);
        }
        if self.max_lifetime > 0 {
            if let Some(start) = user.pod_start_time {
                if t - start >= self.max_lifetime {
                    return Some(CullReason::MaxLifetime);
                }
            }
        }
        None
    }

    /// Culls qualifying pods node by node, returns the number of pods removed.
    pub fn cull_pods(&self, nodes: &mut [Node], users: &mut [User], t: Minute) -> usize {
        let mut culled = 0;
        for node in nodes.iter_mut() {
            let placed: Vec<_> = node.pods().to_vec();
            for user_id in placed {
                let user = &mut users[user_id];
                assert_eq!(
                    user.assigned_node,
                    Some(node.id),
                    "user {} is listed on node {} but assigned elsewhere",
                    user_id,
                    node.id
                );
                if let Some(reason) = self.cull_reason(user, t) {
                    node.remove_pod(user_id, t);
                    user.release_pod();
                    culled += 1;
                    debug!("minute {}: culled pod of user {} on node {} ({})", t, user_id, node.id, reason);
                }
            }
        }
        culled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed_user(activity: &[u8], start: Minute) -> User {
        let mut user = User::new(0, activity.iter().map(|a| *a == 1).collect());
        user.has_pod = true;
        user.assign(0, start);
        user
    }

    #[test]
    fn test_inactivity_window_is_inclusive() {
        let user = placed_user(&[0, 0, 1, 1, 0, 0, 0, 0, 0, 0], 2);
        let culler = PodCuller::new(3, 0);
        assert_eq!(culler.cull_reason(&user, 6), None);
        assert_eq!(culler.cull_reason(&user, 7), Some(CullReason::Inactivity));
    }

    #[test]
    fn test_lifetime() {
        let user = placed_user(&[1; 10], 1);
        let culler = PodCuller::new(0, 7);
        assert_eq!(culler.cull_reason(&user, 7), None);
        assert_eq!(culler.cull_reason(&user, 8), Some(CullReason::MaxLifetime));
    }

    #[test]
    fn test_disabled_rules() {
        let user = placed_user(&[0; 10], 0);
        let culler = PodCuller::new(0, 0);
        assert_eq!(culler.cull_reason(&user, 9), None);
    }

    #[test]
    fn test_simultaneous_culls_on_one_node() {
        let mut users = vec![placed_user(&[1, 0, 0, 0], 0), placed_user(&[1, 0, 0, 0], 0)];
        users[1].id = 1;
        let mut nodes = vec![Node::new(0, 2)];
        nodes[0].add_pod(0, 0);
        nodes[0].add_pod(1, 0);

        let culler = PodCuller::new(2, 0);
        assert_eq!(culler.cull_pods(&mut nodes, &mut users, 3), 2);
        assert!(!nodes[0].has_pods());
        assert_eq!(nodes[0].utilization_at(2), 2);
        assert_eq!(nodes[0].utilization_at(3), 0);
        assert!(!users[0].has_pod && !users[1].has_pod);
    }

    #[test]
    fn test_both_rules_on_one_node() {
        // user 0 idles from minute 2, user 1 stays active but its pod is older
        let mut users = vec![placed_user(&[1, 1, 0, 0, 0, 0, 0], 1), placed_user(&[1; 7], 0)];
        users[1].id = 1;
        let mut nodes = vec![Node::new(0, 2)];
        nodes[0].add_pod(1, 0);
        nodes[0].add_pod(0, 1);

        let culler = PodCuller::new(3, 5);
        assert_eq!(culler.cull_pods(&mut nodes, &mut users, 4), 0);
        assert_eq!(culler.cull_reason(&users[0], 5), Some(CullReason::Inactivity));
        assert_eq!(culler.cull_reason(&users[1], 5), Some(CullReason::MaxLifetime));

        assert_eq!(culler.cull_pods(&mut nodes, &mut users, 5), 2);
        assert!(!nodes[0].has_pods());
        assert_eq!(nodes[0].utilization_at(4), 2);
        assert_eq!(nodes[0].utilization_at(5), 0);
        assert_eq!(users[0].pod_status(), crate::user::PodStatus::Absent);
        assert_eq!(users[1].pod_status(), crate::user::PodStatus::Absent);
    }
}

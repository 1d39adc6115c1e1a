use log::{info, warn};

use crate::cluster_autoscaler::ClusterAutoscaler;
use crate::default_cluster_autoscaler_algorithms::idle_window_algorithm::IdleWindowAutoscalerAlgorithm;
use crate::node::{Node, NodeId, NodeState};
use crate::pod_culler::PodCuller;
use crate::scheduler::Scheduler;
use crate::scheduler_algorithm::SchedulerAlgorithm;
use crate::simulation_config::SimulationConfig;
use crate::simulation_metrics::{Metrics, MetricsLogger};
use crate::time_series::Minute;
use crate::user::{User, UserId};
use crate::utilization_report::{NodeUsageSummary, UtilizationReport};

/// Minute-stepped simulation of a single-user-pod cluster.
///
/// Every minute runs, in order: pod creation for active users, scheduling of pending pods,
/// node start-up, node scale down and pod culling. Each stage sees the complete result of the
/// previous ones for the same minute.
pub struct ClusterSimulation {
    nodes: Vec<Node>,
    users: Vec<User>,

    scheduler: Scheduler,
    cluster_autoscaler: ClusterAutoscaler,
    pod_culler: PodCuller,
    metrics_logger: Box<dyn MetricsLogger>,

    sim_config: SimulationConfig,
    /// First minute not simulated yet.
    cursor: Minute,
    horizon: Minute,
}

impl ClusterSimulation {
    /// Creates a simulation with specified config and one user per activity trace.
    ///
    /// Traces hold one 0/1 value per minute and must all have the same length, which becomes the
    /// simulation horizon.
    pub fn new(
        sim_config: SimulationConfig,
        user_activity: Vec<Vec<u8>>,
        metrics_logger: Box<dyn MetricsLogger>,
        scheduler_algorithm: Box<dyn SchedulerAlgorithm>,
    ) -> Self {
        if let Err(e) = sim_config.validate() {
            panic!("{}", e);
        }
        assert!(!user_activity.is_empty(), "at least one activity trace is required");
        let horizon = user_activity[0].len();

        let users = user_activity
            .into_iter()
            .enumerate()
            .map(|(id, trace)| {
                assert_eq!(trace.len(), horizon, "activity trace of user {} has a different length", id);
                let activity = trace
                    .into_iter()
                    .map(|value| match value {
                        0 => false,
                        1 => true,
                        other => panic!("activity of user {} holds {}, expected 0 or 1", id, other),
                    })
                    .collect();
                User::new(id, activity)
            })
            .collect();

        let capacity = sim_config.node_capacity();
        let nodes = (0..sim_config.max_nodes as NodeId).map(|id| Node::new(id, capacity)).collect();

        Self {
            nodes,
            users,
            scheduler: Scheduler::new(scheduler_algorithm),
            cluster_autoscaler: ClusterAutoscaler::new(
                Box::new(IdleWindowAutoscalerAlgorithm::new(sim_config.min_nodes, sim_config.node_stop_time)),
                sim_config.node_start_delay,
            ),
            pod_culler: PodCuller::new(sim_config.pod_inactivity_time, sim_config.pod_max_lifetime),
            metrics_logger,
            sim_config,
            cursor: 0,
            horizon,
        }
    }

    /// Simulates every minute from the cursor up to `stop` (exclusive).
    ///
    /// Calling it again with a later `stop` continues where the previous call ended. A `stop` at
    /// or before the cursor does nothing, one past the horizon is clamped to it.
    pub fn run(&mut self, stop: Minute) {
        let stop = if stop > self.horizon {
            warn!("stop minute {} is past the horizon, clamped to {}", stop, self.horizon);
            self.horizon
        } else {
            stop
        };
        if stop <= self.cursor {
            return;
        }

        let start = self.cursor;
        for t in start..stop {
            self.simulate_minute(t);
        }
        info!(
            "simulated minutes {}..{}: {} nodes provisioned, {} pods placed, {} pending",
            start,
            stop,
            self.provisioned_nodes_at(stop - 1),
            self.placed_pods(),
            self.pending_pods()
        );
    }

    /// Runs the simulation to the end of the activity traces.
    pub fn run_to_end(&mut self) {
        self.run(self.horizon);
    }

    /// Simulates the next minute, returns false if the horizon was already reached.
    pub fn step(&mut self) -> bool {
        if self.cursor >= self.horizon {
            return false;
        }
        self.simulate_minute(self.cursor);
        true
    }

    fn simulate_minute(&mut self, t: Minute) {
        for user in self.users.iter_mut() {
            if user.is_active_at(t) && !user.has_pod {
                user.has_pod = true;
            }
        }

        self.scheduler.schedule_pending_pods(&mut self.nodes, &mut self.users, t);
        self.cluster_autoscaler.try_to_scale_up(&mut self.nodes, t);
        self.cluster_autoscaler.try_to_scale_down(&mut self.nodes, t);
        let culled = self.pod_culler.cull_pods(&mut self.nodes, &mut self.users, t);

        self.cursor = t + 1;

        let period = self.metrics_logger.snapshot_period();
        if period > 0 && t % period == 0 {
            let metrics = self.snapshot(t, culled);
            self.metrics_logger.log_metrics(metrics);
        }
    }

    fn snapshot(&self, t: Minute, culled: usize) -> Metrics {
        let count_in = |state: NodeState| self.nodes.iter().filter(|node| node.state_at(t) == state).count() as u32;
        Metrics {
            minute: t,
            starting_nodes: count_in(NodeState::Starting),
            running_nodes: count_in(NodeState::Running),
            placed_pods: self.placed_pods() as u32,
            pending_pods: self.pending_pods() as u32,
            culled_pods: culled as u32,
        }
    }

    pub fn node(&self, node_id: NodeId) -> &Node {
        &self.nodes[node_id]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn user(&self, user_id: UserId) -> &User {
        &self.users[user_id]
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.sim_config
    }

    /// Returns the first minute not simulated yet.
    pub fn current_time(&self) -> Minute {
        self.cursor
    }

    /// Returns the length of the activity traces in minutes.
    pub fn horizon(&self) -> Minute {
        self.horizon
    }

    pub fn pending_pods(&self) -> usize {
        self.users.iter().filter(|user| user.is_pending()).count()
    }

    pub fn placed_pods(&self) -> usize {
        self.nodes.iter().map(|node| node.pods().len()).sum()
    }

    pub fn provisioned_nodes_at(&self, t: Minute) -> usize {
        self.nodes.iter().filter(|node| node.state_at(t).is_provisioned()).count()
    }

    /// Builds the per-minute utilization table over the whole horizon.
    pub fn utilization_report(&self) -> UtilizationReport {
        UtilizationReport::from_nodes(&self.nodes, self.horizon)
    }

    pub fn usage_summary(&self) -> Vec<NodeUsageSummary> {
        self.nodes
            .iter()
            .map(|node| NodeUsageSummary::from_node(node, self.horizon))
            .collect()
    }

    /// Saves collected metrics snapshots.
    pub fn finish_simulation(&mut self, metrics_path: &str) -> Result<(), std::io::Error> {
        self.metrics_logger.save_log(metrics_path)
    }
}

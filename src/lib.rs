//! Minute-stepped cost simulator for a JupyterHub-style cluster where every active user gets a
//! single pod.
//!
//! Activity traces drive pod creation, a scheduler packs pods onto nodes, a cluster autoscaler
//! starts and stops nodes, and a pod culler evicts idle or long-lived pods. The resulting
//! per-minute node utilization feeds cost estimation.

pub mod cluster_autoscaler;
pub mod cluster_autoscaler_algorithm;
pub mod dataset_reader;
pub mod default_cluster_autoscaler_algorithms;
pub mod default_scheduler_algorithms;
pub mod error;
pub mod node;
pub mod pod_culler;
pub mod scheduler;
pub mod scheduler_algorithm;
pub mod simulation;
pub mod simulation_config;
pub mod simulation_metrics;
pub mod time_series;
pub mod user;
pub mod utilization_report;

use std::fs::File;
use std::io::{BufWriter, Error, Write};

use log::info;
use serde::Serialize;

use crate::time_series::Minute;

/// Cluster snapshot taken at the end of a simulated minute.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Metrics {
    pub minute: Minute,
    pub starting_nodes: u32,
    pub running_nodes: u32,
    pub placed_pods: u32,
    pub pending_pods: u32,
    pub culled_pods: u32,
}

pub trait MetricsLogger {
    /// Minutes between snapshots, 0 disables logging.
    fn snapshot_period(&self) -> Minute;
    fn log_metrics(&mut self, metrics: Metrics);
    fn save_log(&mut self, path: &str) -> Result<(), Error>;
}

pub struct EmptyMetricsLogger {}

impl MetricsLogger for EmptyMetricsLogger {
    fn snapshot_period(&self) -> Minute {
        0
    }

    fn log_metrics(&mut self, _metrics: Metrics) {}

    fn save_log(&mut self, _path: &str) -> Result<(), Error> {
        Ok(())
    }
}

pub struct StdoutMetricsLogger {
    snapshot_period: Minute,
}

impl StdoutMetricsLogger {
    pub fn new(snapshot_period: Minute) -> Self {
        Self { snapshot_period }
    }
}

impl MetricsLogger for StdoutMetricsLogger {
    fn snapshot_period(&self) -> Minute {
        self.snapshot_period
    }

    fn log_metrics(&mut self, metrics: Metrics) {
        info!(
            "Minute: {}, starting nodes: {}, running nodes: {}, placed pods: {}, \
             pending pods: {}, culled pods: {}",
            metrics.minute,
            metrics.starting_nodes,
            metrics.running_nodes,
            metrics.placed_pods,
            metrics.pending_pods,
            metrics.culled_pods
        )
    }

    fn save_log(&mut self, _path: &str) -> Result<(), Error> {
        Ok(())
    }
}

pub struct FileMetricsLogger {
    snapshot_period: Minute,
    metrics_history: Vec<Metrics>,
}

impl FileMetricsLogger {
    pub fn new(snapshot_period: Minute) -> Self {
        Self {
            snapshot_period,
            metrics_history: Vec::default(),
        }
    }

    pub fn history(&self) -> &[Metrics] {
        &self.metrics_history
    }
}

impl MetricsLogger for FileMetricsLogger {
    fn snapshot_period(&self) -> Minute {
        self.snapshot_period
    }

    fn log_metrics(&mut self, metrics: Metrics) {
        self.metrics_history.push(metrics);
    }

    fn save_log(&mut self, path: &str) -> Result<(), Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &self.metrics_history)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_at(minute: Minute, placed_pods: u32) -> Metrics {
        Metrics {
            minute,
            starting_nodes: 0,
            running_nodes: 1,
            placed_pods,
            pending_pods: 0,
            culled_pods: 0,
        }
    }

    #[test]
    fn test_file_logger_keeps_history() {
        let mut logger = FileMetricsLogger::new(10);
        assert_eq!(logger.snapshot_period(), 10);
        logger.log_metrics(metrics_at(0, 1));
        logger.log_metrics(metrics_at(10, 3));
        assert_eq!(logger.history().len(), 2);
        assert_eq!(logger.history()[1], metrics_at(10, 3));
    }
}

//! Per-minute node utilization table used for cost estimation.

use std::fs::File;
use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::node::{Node, NodeId};
use crate::time_series::Minute;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NodeUtilization {
    pub utilized_capacity: u32,
    /// Fraction of the node capacity in use.
    pub utilized_percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UtilizationRow {
    pub time: Minute,
    pub nodes: Vec<NodeUtilization>,
}

/// One row per simulated minute, one column pair per node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UtilizationReport {
    pub rows: Vec<UtilizationRow>,
    node_count: usize,
}

impl UtilizationReport {
    pub fn from_nodes(nodes: &[Node], horizon: Minute) -> Self {
        let columns: Vec<Vec<u32>> = nodes.iter().map(|node| node.utilization().to_dense(horizon)).collect();
        let rows = (0..horizon)
            .map(|t| UtilizationRow {
                time: t,
                nodes: nodes
                    .iter()
                    .zip(&columns)
                    .map(|(node, column)| NodeUtilization {
                        utilized_capacity: column[t],
                        utilized_percent: column[t] as f64 / node.capacity as f64,
                    })
                    .collect(),
            })
            .collect();
        Self {
            rows,
            node_count: nodes.len(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec!["time".to_string()];
        for node_id in 0..self.node_count {
            headers.push(format!("node{}_utilized_capacity", node_id));
            headers.push(format!("node{}_utilized_percent", node_id));
        }
        headers
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.headers())?;
        for row in &self.rows {
            let mut record = Vec::with_capacity(1 + 2 * row.nodes.len());
            record.push(row.time.to_string());
            for node in &row.nodes {
                record.push(node.utilized_capacity.to_string());
                record.push(node.utilized_percent.to_string());
            }
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn save_csv(&self, path: &str) -> Result<()> {
        self.write_csv(File::create(path)?)
    }
}

/// Usage of a single node over the horizon.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeUsageSummary {
    pub node_id: NodeId,
    /// Minutes spent in any state but stopped.
    pub provisioned_minutes: usize,
    pub peak_utilization: u32,
    /// Mean share of capacity in use over provisioned minutes.
    pub mean_utilized_percent: f64,
}

impl NodeUsageSummary {
    pub fn from_node(node: &Node, horizon: Minute) -> Self {
        let states = node.states().to_dense(horizon);
        let utilization = node.utilization().to_dense(horizon);

        let mut provisioned_minutes = 0;
        let mut utilized_sum = 0u64;
        for (state, pods) in states.iter().zip(&utilization) {
            if state.is_provisioned() {
                provisioned_minutes += 1;
                utilized_sum += *pods as u64;
            }
        }
        let mean_utilized_percent = if provisioned_minutes == 0 {
            0.0
        } else {
            utilized_sum as f64 / (provisioned_minutes as f64 * node.capacity as f64)
        };

        Self {
            node_id: node.id,
            provisioned_minutes,
            peak_utilization: utilization.iter().copied().max().unwrap_or(0),
            mean_utilized_percent,
        }
    }
}

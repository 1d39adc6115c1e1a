use std::io::Write;

use clap::Parser;
use env_logger::Builder;
use log::info;

use z2jh_cost_simulator::dataset_reader::DatasetReader;
use z2jh_cost_simulator::default_scheduler_algorithms::lrp_algorithm::LRPAlgorithm;
use z2jh_cost_simulator::default_scheduler_algorithms::mrp_algorithm::MRPAlgorithm;
use z2jh_cost_simulator::error::Error;
use z2jh_cost_simulator::scheduler_algorithm::SchedulerAlgorithm;
use z2jh_cost_simulator::simulation::ClusterSimulation;
use z2jh_cost_simulator::simulation_config::SimulationConfig;
use z2jh_cost_simulator::simulation_metrics::{FileMetricsLogger, MetricsLogger, StdoutMetricsLogger};

#[derive(Parser, Debug)]
#[command(about = "Simulates node utilization of a single-user-pod cluster")]
struct Args {
    /// Simulation config in YAML, defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// User activity traces (.json array of arrays, or CSV with one user per row)
    #[arg(short, long)]
    activity: String,

    /// Minute to stop at, the end of the traces by default
    #[arg(short, long)]
    stop: Option<usize>,

    /// Spread pods over the emptiest nodes instead of packing them
    #[arg(long)]
    spread: bool,

    /// Where to write the per-minute utilization table
    #[arg(short, long, default_value = "utilization.csv")]
    output: String,

    /// Where to write cluster metrics snapshots in JSON, they are logged otherwise
    #[arg(long)]
    metrics: Option<String>,

    /// Minutes between metrics snapshots
    #[arg(long, default_value_t = 60)]
    metrics_period: usize,
}

fn init_logger() {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn main() -> Result<(), Error> {
    init_logger();
    let args = Args::parse();

    let sim_config = match &args.config {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };
    let mut dataset = DatasetReader::new();
    dataset.parse(&args.activity)?;
    if dataset.user_activity.is_empty() {
        return Err(Error::InvalidTrace {
            user: 0,
            reason: format!("no users in {}", args.activity),
        });
    }

    let metrics_logger: Box<dyn MetricsLogger> = match &args.metrics {
        Some(_) => Box::new(FileMetricsLogger::new(args.metrics_period)),
        None => Box::new(StdoutMetricsLogger::new(args.metrics_period)),
    };
    let scheduler_algorithm: Box<dyn SchedulerAlgorithm> = if args.spread {
        Box::new(LRPAlgorithm::new())
    } else {
        Box::new(MRPAlgorithm::new())
    };

    info!(
        "{} users over {} minutes, {} nodes of {} pods",
        dataset.user_activity.len(),
        dataset.user_activity[0].len(),
        sim_config.max_nodes,
        sim_config.node_capacity()
    );
    let mut sim = ClusterSimulation::new(sim_config, dataset.user_activity, metrics_logger, scheduler_algorithm);
    match args.stop {
        Some(stop) => sim.run(stop),
        None => sim.run_to_end(),
    }

    sim.utilization_report().save_csv(&args.output)?;
    if let Some(path) = &args.metrics {
        sim.finish_simulation(path)?;
    }
    for summary in sim.usage_summary() {
        info!(
            "node {}: {} provisioned minutes, peak {} pods, mean utilization {:.1}%",
            summary.node_id,
            summary.provisioned_minutes,
            summary.peak_utilization,
            summary.mean_utilized_percent * 100.0
        );
    }
    let node_minutes: usize = sim.usage_summary().iter().map(|summary| summary.provisioned_minutes).sum();
    info!("total provisioned node minutes: {}", node_minutes);
    Ok(())
}

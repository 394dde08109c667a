//! sioux — exact vs private routing sweep.
//!
//! Runs every configured demand/capacity scenario at every epsilon, writing
//! one output directory per run plus `sweep_summary.csv` with the run-level
//! comparison.  With no argument the built-in grid network is used:
//!
//! ```text
//! cargo run --release -p sioux                  # built-in grid, default sweep
//! cargo run --release -p sioux -- config.json   # JSON config (see DemoConfig)
//! ```

mod network;

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::Deserialize;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

use dprt_core::{CapacityScenario, DemandScenario, LatencyModelKind, SimConfig};
use dprt_demand::DemandTable;
use dprt_network::{FlowTable, Topology, load_topology_csv};
use dprt_output::{CsvWriter, OutputWriter, RunSummary, SimOutputObserver};
use dprt_sim::SimBuilder;

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct FlowTableConfig {
    y_max:      f64,
    dy:         f64,
    /// Solved table is cached here and reused while `y_max`/`dy` match.
    cache_path: PathBuf,
}

impl Default for FlowTableConfig {
    fn default() -> Self {
        Self { y_max: 200.0, dy: 0.001, cache_path: PathBuf::from("flow_table.bin") }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct InputFiles {
    edges:          PathBuf,
    vertices:       PathBuf,
    od:             PathBuf,
    /// Unit conversion applied to raw capacities (e.g. veh/h to veh per edge).
    #[serde(default = "unit_scale")]
    capacity_scale: f64,
}

fn unit_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
enum Backend {
    #[default]
    Csv,
    #[cfg(feature = "sqlite")]
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct DemoConfig {
    sim:              SimConfig,
    flow_table:       FlowTableConfig,
    /// Built-in grid when absent.
    inputs:           Option<InputFiles>,
    output_dir:       PathBuf,
    backend:          Backend,
    /// `[demand, capacity]` pairs.
    scenarios:        Vec<(DemandScenario, CapacityScenario)>,
    epsilons:         Vec<f64>,
    edge_utilization: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig { latency_model: LatencyModelKind::Table, ..SimConfig::default() },
            flow_table: FlowTableConfig::default(),
            inputs: None,
            output_dir: PathBuf::from("output/sioux"),
            backend: Backend::Csv,
            scenarios: vec![
                (DemandScenario::Baseline, CapacityScenario::Baseline),
                (DemandScenario::Low, CapacityScenario::High),
                (DemandScenario::Low, CapacityScenario::Low),
                (DemandScenario::High, CapacityScenario::Low),
                (DemandScenario::High, CapacityScenario::High),
            ],
            epsilons: vec![0.01],
            edge_utilization: true,
        }
    }
}

fn load_config(path: &Path) -> Result<DemoConfig> {
    let file = File::open(path).with_context(|| format!("cannot open config {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("invalid config {}", path.display()))
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn initialize_logging(output: &Path) -> Result<()> {
    let log_path = output.join("log.txt");
    let log_file = File::create(&log_path)
        .with_context(|| format!("cannot create log file {}", log_path.display()))?;
    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Debug, Config::default(), log_file),
    ];
    CombinedLogger::init(loggers).context("failed to initialize logging")
}

// ── Runs ──────────────────────────────────────────────────────────────────────

struct Shared {
    topology:   Arc<Topology>,
    flow_table: Option<Arc<FlowTable>>,
}

fn load_topology(config: &DemoConfig) -> Result<Topology> {
    match &config.inputs {
        Some(inputs) => load_topology_csv(&inputs.edges, &inputs.vertices, inputs.capacity_scale)
            .with_context(|| format!("cannot load network from {}", inputs.edges.display())),
        None => network::grid_network().context("cannot build the built-in grid"),
    }
}

fn load_demand(config: &DemoConfig, sim: &SimConfig) -> Result<DemandTable> {
    let table = match &config.inputs {
        Some(inputs) => DemandTable::load_csv(
            &inputs.od,
            sim.delta_t_secs,
            sim.demand_scenario,
            sim.demand_calibration,
        )
        .with_context(|| format!("cannot load OD table {}", inputs.od.display()))?,
        None => DemandTable::from_rows(
            network::grid_demand(),
            sim.delta_t_secs,
            sim.demand_scenario,
            sim.demand_calibration,
        )?,
    };
    Ok(table)
}

fn simulate<W: OutputWriter>(
    config: &DemoConfig,
    sim_config: SimConfig,
    shared: &Shared,
    writer: W,
) -> Result<RunSummary> {
    let demand = load_demand(config, &sim_config)?;
    let mut builder = SimBuilder::new(sim_config.clone(), Arc::clone(&shared.topology), demand);
    if let Some(table) = &shared.flow_table {
        builder = builder.flow_table(Arc::clone(table));
    }
    let mut sim = builder.build()?;

    let mut obs = SimOutputObserver::new(writer, &sim_config);
    if !config.edge_utilization {
        obs = obs.without_edge_utilization();
    }
    sim.run(&mut obs)?;

    if let Some(e) = obs.take_error() {
        return Err(e).context("writing output");
    }
    Ok(obs.summary().copied().unwrap_or_default())
}

fn run_one(config: &DemoConfig, sim_config: SimConfig, shared: &Shared, dir: &Path) -> Result<RunSummary> {
    fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
    match config.backend {
        Backend::Csv => simulate(config, sim_config, shared, CsvWriter::new(dir)?),
        #[cfg(feature = "sqlite")]
        Backend::Sqlite => simulate(config, sim_config, shared, dprt_output::SqliteWriter::new(dir)?),
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => DemoConfig::default(),
    };
    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("cannot create {}", config.output_dir.display()))?;
    initialize_logging(&config.output_dir)?;

    let flow_table = match config.sim.latency_model {
        LatencyModelKind::Table => {
            let ft = &config.flow_table;
            Some(Arc::new(FlowTable::load_or_solve(&ft.cache_path, ft.y_max, ft.dy)?))
        }
        _ => None,
    };
    let topology = Arc::new(load_topology(&config)?);
    log::info!(
        "network: {} vertices, {} edges",
        topology.vertex_count(),
        topology.edge_count()
    );
    let shared = Shared { topology, flow_table };

    let mut sweep = csv::Writer::from_path(config.output_dir.join("sweep_summary.csv"))?;
    sweep.write_record([
        "demand",
        "capacity",
        "epsilon",
        "trips",
        "mean_travel_time_secs",
        "mean_private_travel_time_secs",
        "travel_time_increase",
        "mean_abs_estimation_error_secs",
        "mean_abs_private_estimation_error_secs",
        "mean_path_similarity",
        "identical_path_fraction",
    ])?;

    for &(demand, capacity) in &config.scenarios {
        for &epsilon in &config.epsilons {
            let name = format!("{demand}_demand_{capacity}_capacity_eps{epsilon}");
            log::info!("----- {name} -----");

            let sim_config = SimConfig {
                demand_scenario: demand,
                capacity_scenario: capacity,
                epsilon,
                ..config.sim.clone()
            };
            let t0 = Instant::now();
            let s = run_one(&config, sim_config, &shared, &config.output_dir.join(&name))
                .with_context(|| format!("run {name} failed"))?;
            log::info!("{name} done in {:.2} s", t0.elapsed().as_secs_f64());

            sweep.write_record(&[
                demand.to_string(),
                capacity.to_string(),
                epsilon.to_string(),
                s.trips.to_string(),
                s.mean_travel_time_secs.to_string(),
                s.mean_private_travel_time_secs.to_string(),
                s.travel_time_increase.to_string(),
                s.mean_abs_estimation_error_secs.to_string(),
                s.mean_abs_private_estimation_error_secs.to_string(),
                s.mean_path_similarity.to_string(),
                s.identical_path_fraction.to_string(),
            ])?;
        }
    }
    sweep.flush()?;

    log::info!("sweep summary written to {}", config.output_dir.join("sweep_summary.csv").display());
    Ok(())
}

//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use dprt_core::{Regime, SimConfig, SimRng};
use dprt_demand::{DemandGenerator, DemandTable};
use dprt_network::{CountObservation, FlowTable, LatencyModel, NetworkState, Topology};

use crate::{RegimeRun, Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: step length, horizon, seed, epsilon, scenarios, …
/// - `Arc<Topology>` at **baseline** capacity
/// - [`DemandTable`] with rates for the configured step and demand scenario
///
/// # Optional inputs
///
/// | Method           | Default | Needed when                          |
/// |------------------|---------|--------------------------------------|
/// | `.flow_table(t)` | none    | `latency_model` is `Table`           |
///
/// The capacity scenario multiplier is applied here, once.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, topology, demand)
///     .flow_table(table)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:     SimConfig,
    topology:   Arc<Topology>,
    demand:     DemandTable,
    flow_table: Option<Arc<FlowTable>>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, topology: Arc<Topology>, demand: DemandTable) -> Self {
        Self { config, topology, demand, flow_table: None }
    }

    /// Supply the counts-to-flow table for the table latency model.
    pub fn flow_table(mut self, table: Arc<FlowTable>) -> Self {
        self.flow_table = Some(table);
        self
    }

    /// Validate inputs, build both regimes, and return a ready-to-run
    /// [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;

        if self.topology.vertex_count() == 0 {
            return Err(SimError::Config("topology has no vertices".into()));
        }
        self.demand.check_vertices(self.topology.vertex_count())?;
        if (self.demand.delta_t_secs() - self.config.delta_t_secs).abs() > 1e-12 {
            return Err(SimError::Config(format!(
                "demand rates were built for {} s steps but the config uses {} s",
                self.demand.delta_t_secs(),
                self.config.delta_t_secs
            )));
        }
        let expected = self.config.demand_scenario.multiplier(self.config.demand_calibration);
        if (self.demand.multiplier() - expected).abs() > 1e-12 {
            return Err(SimError::Config(format!(
                "demand rates were scaled ×{} but the config asks for {} demand ({:?}, ×{expected})",
                self.demand.multiplier(),
                self.config.demand_scenario,
                self.config.demand_calibration
            )));
        }

        let factor = self.config.capacity_scenario.multiplier();
        let topology = if factor == 1.0 {
            self.topology
        } else {
            Arc::new(self.topology.with_capacity_scale(factor)?)
        };

        let model = LatencyModel::from_kind(self.config.latency_model, self.flow_table)?;
        let seed = self.config.seed;

        let exact = NetworkState::new(
            Regime::Exact,
            Arc::clone(&topology),
            model.clone(),
            CountObservation::Exact,
        );
        let private = NetworkState::new(
            Regime::Private,
            topology,
            model,
            CountObservation::laplace(self.config.epsilon, SimRng::derived(seed, Regime::Private.stream()))?,
        );

        log::info!(
            "built simulation: {} vertices, {} edges, {} OD rows, {} latency, {} capacity",
            exact.topology().vertex_count(),
            exact.topology().edge_count(),
            self.demand.len(),
            exact.model().name(),
            self.config.capacity_scenario
        );

        Ok(Sim::new(
            self.config,
            DemandGenerator::new(self.demand, seed),
            RegimeRun::new(exact),
            RegimeRun::new(private),
        ))
    }
}

//! The `Sim` struct and its step loop.

use dprt_core::{Regime, SimConfig, StepClock, Tick, VertexId};
use dprt_demand::{DemandDraw, DemandGenerator};
use dprt_network::{NetworkResult, NetworkState, RefreshReport};
use dprt_vehicle::{Fleet, Spawn};

use crate::{Phase, RegimeStepStats, SimObserver, SimResult, StepStats};

// ── RegimeRun ─────────────────────────────────────────────────────────────────

/// One regime's network state and vehicle population.
///
/// The two runs share nothing mutable; only the topology behind the
/// network state's `Arc` is common.
pub struct RegimeRun {
    pub network: NetworkState,
    pub fleet:   Fleet,
}

impl RegimeRun {
    pub fn new(network: NetworkState) -> Self {
        let fleet = Fleet::new(network.regime());
        Self { network, fleet }
    }

    pub fn regime(&self) -> Regime {
        self.network.regime()
    }

    /// Rebuild counts and latencies from this regime's active vehicles.
    pub fn refresh(&mut self) -> NetworkResult<RefreshReport> {
        self.network.update_latency(self.fleet.occupied_edges())
    }

    fn spawn_all<I>(&mut self, trips: I, now: Tick, stats: &mut RegimeStepStats) -> SimResult<()>
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        for (origin, destination) in trips {
            match self.fleet.spawn(origin, destination, now, &mut self.network)? {
                Spawn::Spawned(_)  => stats.spawned += 1,
                Spawn::Unreachable => stats.unreachable += 1,
                Spawn::SameVertex  => stats.same_vertex += 1,
            }
        }
        Ok(())
    }

    fn advance_and_reap(&mut self, delta_t_secs: f64, stats: &mut RegimeStepStats) {
        self.fleet.advance_all(&self.network, delta_t_secs);
        stats.completed = self.fleet.reap() as u64;
        stats.active = self.fleet.active_count() as u64;
        stats.total_completed = self.fleet.completed_count() as u64;
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim` holds both regimes and drives them in lockstep.  Each step:
///
/// 1. **Refresh** (every `refresh_steps()` steps, including tick 0): both
///    regimes rebuild counts, latencies, and path tables from their own
///    active vehicles.
/// 2. **Demand**: one Poisson draw, shared by both regimes.  Zero during
///    cool-off.
/// 3. **Spawn**: each trip becomes a vehicle in each regime, routed on that
///    regime's current snapshot.
/// 4. **Advance** every active vehicle by one step.
/// 5. **Reap** completed vehicles into each fleet's completed list.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config: SimConfig,

    /// Tracks the current tick and step length.
    pub clock: StepClock,

    /// Shared demand stream.
    pub demand: DemandGenerator,

    exact:   RegimeRun,
    private: RegimeRun,

    cool_off_steps: u64,
}

impl Sim {
    pub(crate) fn new(
        config:  SimConfig,
        demand:  DemandGenerator,
        exact:   RegimeRun,
        private: RegimeRun,
    ) -> Self {
        Self {
            clock: StepClock::new(config.delta_t_secs),
            config,
            demand,
            exact,
            private,
            cool_off_steps: 0,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run the horizon, then the cool-off if enabled.
    ///
    /// The cool-off ends when both fleets are empty or after
    /// `max_cool_off_steps` steps, whichever comes first.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        log::info!(
            "running {} steps of {} s (refresh every {} steps, epsilon {})",
            self.config.horizon_steps,
            self.config.delta_t_secs,
            self.config.refresh_steps(),
            self.config.epsilon
        );

        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                if !self.config.cool_off || self.is_drained() {
                    break;
                }
                if self.cool_off_steps >= self.config.max_cool_off_steps {
                    log::warn!(
                        "cool-off stopped after {} steps with {} exact and {} private vehicles still active",
                        self.cool_off_steps,
                        self.exact.fleet.active_count(),
                        self.private.fleet.active_count()
                    );
                    break;
                }
            }
            self.step(observer)?;
        }

        let final_tick = self.clock.current_tick;
        log::info!(
            "finished at {final_tick}: {} exact and {} private trips completed",
            self.exact.fleet.completed_count(),
            self.private.fleet.completed_count()
        );
        observer.on_sim_end(final_tick, &self.exact.fleet, &self.private.fleet);
        Ok(())
    }

    /// Run exactly `n` steps from the current position, with demand while
    /// inside the horizon and none after it.
    ///
    /// Useful for tests and incremental stepping.  Does not call
    /// `on_sim_end`.
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Process one step and advance the clock.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<StepStats> {
        let now = self.clock.current_tick;
        observer.on_step_start(now);

        let phase = if now < self.config.end_tick() { Phase::Horizon } else { Phase::CoolOff };
        let mut exact_stats = RegimeStepStats::new(Regime::Exact);
        let mut private_stats = RegimeStepStats::new(Regime::Private);

        // ── ① Refresh ─────────────────────────────────────────────────────
        if self.config.is_refresh_tick(now) {
            let (exact_report, private_report) = self.refresh_both()?;
            observer.on_refresh(now, &self.exact.network, &exact_report);
            observer.on_refresh(now, &self.private.network, &private_report);
            exact_stats.refreshed = true;
            private_stats.refreshed = true;
        }

        // ── ② Demand ──────────────────────────────────────────────────────
        let draw: DemandDraw = match phase {
            Phase::Horizon => self.demand.draw(),
            Phase::CoolOff => self.demand.zero(),
        };

        // ── ③ Spawn ───────────────────────────────────────────────────────
        let table = self.demand.table();
        self.exact.spawn_all(draw.trips(table), now, &mut exact_stats)?;
        self.private.spawn_all(draw.trips(table), now, &mut private_stats)?;

        // ── ④ Advance, ⑤ Reap ─────────────────────────────────────────────
        let dt = self.config.delta_t_secs;
        self.exact.advance_and_reap(dt, &mut exact_stats);
        self.private.advance_and_reap(dt, &mut private_stats);

        let stats = StepStats {
            tick: now,
            phase,
            demand: draw.total(),
            exact: exact_stats,
            private: private_stats,
        };
        observer.on_step_end(&stats);

        if phase == Phase::CoolOff {
            self.cool_off_steps += 1;
        }
        if self.config.status_interval_steps > 0 && now.is_multiple_of(self.config.status_interval_steps) {
            self.log_status(now);
        }

        self.clock.advance();
        Ok(stats)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn exact(&self) -> &RegimeRun {
        &self.exact
    }

    pub fn private(&self) -> &RegimeRun {
        &self.private
    }

    pub fn regime(&self, regime: Regime) -> &RegimeRun {
        match regime {
            Regime::Exact   => &self.exact,
            Regime::Private => &self.private,
        }
    }

    /// `true` once neither regime has active vehicles.
    pub fn is_drained(&self) -> bool {
        self.exact.fleet.is_drained() && self.private.fleet.is_drained()
    }

    /// Steps run past the horizon so far.
    pub fn cool_off_steps(&self) -> u64 {
        self.cool_off_steps
    }

    // ── Internals ─────────────────────────────────────────────────────────

    #[cfg(not(feature = "parallel"))]
    fn refresh_both(&mut self) -> SimResult<(RefreshReport, RefreshReport)> {
        let exact = self.exact.refresh()?;
        let private = self.private.refresh()?;
        Ok((exact, private))
    }

    #[cfg(feature = "parallel")]
    fn refresh_both(&mut self) -> SimResult<(RefreshReport, RefreshReport)> {
        let (exact_run, private_run) = (&mut self.exact, &mut self.private);
        let (exact, private) = rayon::join(|| exact_run.refresh(), || private_run.refresh());
        Ok((exact?, private?))
    }

    fn log_status(&self, now: Tick) {
        for run in [&self.exact, &self.private] {
            log::info!(
                "[{now}] {}: {} in transit, {} completed, {} spawned",
                run.regime(),
                run.fleet.active_count(),
                run.fleet.completed_count(),
                run.fleet.spawned_count()
            );
        }
    }
}

//! Seeded Poisson demand.
//!
//! One draw per step produces a count for every OD row.  The simulation
//! reuses the same draw for both regimes, so they see identical demand.

use dprt_core::{SimRng, VertexId};

use crate::{DemandTable, OdDemand};

/// New-trip counts for one step, indexed like the table's rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemandDraw {
    counts: Vec<u32>,
}

impl DemandDraw {
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Trips in this draw.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Every trip as `(origin, destination)`, rows in table order, each row
    /// repeated by its count.
    pub fn trips<'a>(&'a self, table: &'a DemandTable) -> impl Iterator<Item = (VertexId, VertexId)> + 'a {
        table
            .rows()
            .iter()
            .zip(&self.counts)
            .flat_map(|(od, &n): (&OdDemand, &u32)| {
                std::iter::repeat_n((od.origin, od.destination), n as usize)
            })
    }
}

/// Draws per-row Poisson counts from a table with its own seeded stream.
#[derive(Clone, Debug)]
pub struct DemandGenerator {
    table: DemandTable,
    rng:   SimRng,
    draws: u64,
}

impl DemandGenerator {
    /// Seeded once; identical seeds give identical draw sequences.
    pub fn new(table: DemandTable, seed: u64) -> Self {
        Self { table, rng: SimRng::new(seed), draws: 0 }
    }

    pub fn draw(&mut self) -> DemandDraw {
        self.draws += 1;
        let counts = self.table.rows().iter().map(|od| self.rng.poisson(od.lambda)).collect();
        DemandDraw { counts }
    }

    /// A draw with no trips, for cool-off steps.  Does not consume randomness.
    pub fn zero(&self) -> DemandDraw {
        DemandDraw { counts: vec![0; self.table.len()] }
    }

    pub fn table(&self) -> &DemandTable {
        &self.table
    }

    /// Number of `draw` calls so far.
    pub fn draw_count(&self) -> u64 {
        self.draws
    }
}

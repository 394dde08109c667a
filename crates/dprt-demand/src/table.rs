//! The origin-destination demand table.

use dprt_core::{DemandCalibration, DemandScenario, VertexId};

use crate::{DemandError, DemandResult};

/// Seconds in the period an OD volume is spread over.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// One OD row with its per-step Poisson rate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OdDemand {
    pub origin:      VertexId,
    pub destination: VertexId,
    /// Volume as given in the input, before scaling.
    pub volume:      f64,
    /// `volume / 86 400 · delta_t · multiplier`.
    pub lambda:      f64,
}

/// All OD rows, in input order, with rates fixed for one step length and
/// one demand scenario.
#[derive(Clone, Debug)]
pub struct DemandTable {
    rows:         Vec<OdDemand>,
    delta_t_secs: f64,
    multiplier:   f64,
}

impl DemandTable {
    /// Build from `(origin, destination, volume)` triples.
    pub fn from_rows<I>(
        rows:         I,
        delta_t_secs: f64,
        scenario:     DemandScenario,
        calibration:  DemandCalibration,
    ) -> DemandResult<DemandTable>
    where
        I: IntoIterator<Item = (VertexId, VertexId, f64)>,
    {
        if !(delta_t_secs.is_finite() && delta_t_secs > 0.0) {
            return Err(DemandError::Parse(format!(
                "step length must be positive, got {delta_t_secs}"
            )));
        }
        let multiplier = scenario.multiplier(calibration);
        let scale = delta_t_secs / SECONDS_PER_DAY * multiplier;

        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(row, (origin, destination, volume))| {
                if !(volume.is_finite() && volume >= 0.0) {
                    return Err(DemandError::Parse(format!(
                        "OD row {row}: volume must be non-negative, got {volume}"
                    )));
                }
                Ok(OdDemand { origin, destination, volume, lambda: volume * scale })
            })
            .collect::<DemandResult<Vec<_>>>()?;

        Ok(DemandTable { rows, delta_t_secs, multiplier })
    }

    /// Fail if any row names a vertex outside `0..vertex_count`.
    pub fn check_vertices(&self, vertex_count: usize) -> DemandResult<()> {
        for (row, od) in self.rows.iter().enumerate() {
            for vertex in [od.origin, od.destination] {
                if vertex.index() >= vertex_count {
                    return Err(DemandError::VertexOutOfRange { row, vertex, count: vertex_count });
                }
            }
        }
        Ok(())
    }

    pub fn rows(&self) -> &[OdDemand] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn delta_t_secs(&self) -> f64 {
        self.delta_t_secs
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Expected new trips per step, Σ λ.
    pub fn total_rate(&self) -> f64 {
        self.rows.iter().map(|od| od.lambda).sum()
    }
}

//! CSV demand loader.
//!
//! # CSV format
//!
//! One row per OD pair.  Extra columns are ignored.
//!
//! ```csv
//! origin,destination,volume
//! 0,1,100
//! 0,2,100
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use dprt_core::{DemandCalibration, DemandScenario, VertexId};

use crate::{DemandResult, DemandTable};

#[derive(Deserialize)]
struct OdRecord {
    origin:      u32,
    destination: u32,
    volume:      f64,
}

impl DemandTable {
    /// Load the OD table from a CSV file.
    pub fn load_csv(
        path:         &Path,
        delta_t_secs: f64,
        scenario:     DemandScenario,
        calibration:  DemandCalibration,
    ) -> DemandResult<DemandTable> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, delta_t_secs, scenario, calibration)
    }

    /// Like [`load_csv`](Self::load_csv) but accepts any `Read` source.
    pub fn from_reader<R: Read>(
        reader:       R,
        delta_t_secs: f64,
        scenario:     DemandScenario,
        calibration:  DemandCalibration,
    ) -> DemandResult<DemandTable> {
        let mut rows = Vec::new();
        for result in csv::Reader::from_reader(reader).deserialize::<OdRecord>() {
            let r = result?;
            rows.push((VertexId(r.origin), VertexId(r.destination), r.volume));
        }

        let table = DemandTable::from_rows(rows, delta_t_secs, scenario, calibration)?;
        log::info!(
            "loaded {} OD rows ({scenario} demand, ×{}): {:.3} expected trips per step",
            table.len(),
            table.multiplier(),
            table.total_rate()
        );
        Ok(table)
    }
}

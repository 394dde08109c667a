//! Demand and capacity scenarios.
//!
//! Demand multipliers depend on which calibration the OD volumes come from:
//!
//! | Scenario   | `Daily` | `PeakHour` |
//! |------------|---------|------------|
//! | `Low`      | ×0.5    | ×2         |
//! | `Baseline` | ×1      | ×4         |
//! | `High`     | ×1.5    | ×6         |
//!
//! Capacity scenarios scale every edge's capacity once, at load time:
//! `Low` ×0.5, `Baseline` ×1, `High` ×1.5.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Demand level applied to every OD row.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DemandScenario {
    Low,
    #[default]
    Baseline,
    High,
}

/// Which multiplier table a [`DemandScenario`] resolves against.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DemandCalibration {
    /// OD volumes are daily totals spread over 24 h.
    #[default]
    Daily,
    /// OD volumes are scaled up to peak-hour intensity.
    PeakHour,
}

/// Capacity level applied to every edge.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CapacityScenario {
    Low,
    #[default]
    Baseline,
    High,
}

impl DemandScenario {
    pub const ALL: [DemandScenario; 3] =
        [DemandScenario::Low, DemandScenario::Baseline, DemandScenario::High];

    /// Multiplier on the per-row Poisson rate.
    pub fn multiplier(self, calibration: DemandCalibration) -> f64 {
        match (calibration, self) {
            (DemandCalibration::Daily, DemandScenario::Low)         => 0.5,
            (DemandCalibration::Daily, DemandScenario::Baseline)    => 1.0,
            (DemandCalibration::Daily, DemandScenario::High)        => 1.5,
            (DemandCalibration::PeakHour, DemandScenario::Low)      => 2.0,
            (DemandCalibration::PeakHour, DemandScenario::Baseline) => 4.0,
            (DemandCalibration::PeakHour, DemandScenario::High)     => 6.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DemandScenario::Low      => "low",
            DemandScenario::Baseline => "baseline",
            DemandScenario::High     => "high",
        }
    }
}

impl CapacityScenario {
    pub const ALL: [CapacityScenario; 3] =
        [CapacityScenario::Low, CapacityScenario::Baseline, CapacityScenario::High];

    /// Multiplier on baseline edge capacity.
    pub fn multiplier(self) -> f64 {
        match self {
            CapacityScenario::Low      => 0.5,
            CapacityScenario::Baseline => 1.0,
            CapacityScenario::High     => 1.5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CapacityScenario::Low      => "low",
            CapacityScenario::Baseline => "baseline",
            CapacityScenario::High     => "high",
        }
    }
}

fn parse_level(s: &str, what: &str) -> Result<u8, CoreError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "low"      => Ok(0),
        "baseline" => Ok(1),
        "high"     => Ok(2),
        other => Err(CoreError::Parse(format!(
            "invalid {what} scenario {other:?}: expected \"low\", \"baseline\", or \"high\""
        ))),
    }
}

impl FromStr for DemandScenario {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DemandScenario::ALL[parse_level(s, "demand")? as usize])
    }
}

impl FromStr for CapacityScenario {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CapacityScenario::ALL[parse_level(s, "capacity")? as usize])
    }
}

impl fmt::Display for DemandScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CapacityScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

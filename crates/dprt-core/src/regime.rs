//! The two parallel network views simulated in lockstep.

use std::fmt;

/// Which routing regime a network, fleet, or output row belongs to.
///
/// Passed explicitly by the caller; nothing in the simulator infers the
/// regime from the type of a network object.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Regime {
    /// Vehicles are routed on exact edge counts.
    Exact,
    /// Vehicles are routed on Laplace-noised edge counts.
    Private,
}

impl Regime {
    pub const ALL: [Regime; 2] = [Regime::Exact, Regime::Private];

    /// Stream offset used when deriving this regime's noise RNG.
    pub fn stream(self) -> u64 {
        match self {
            Regime::Exact   => 1,
            Regime::Private => 2,
        }
    }

    /// Label used in log lines and output columns.
    pub fn as_str(self) -> &'static str {
        match self {
            Regime::Exact   => "exact",
            Regime::Private => "private",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

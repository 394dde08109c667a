//! `dprt-network` — topology, latency, routing, and count privacy.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`topology`]   | `Topology` (edge arrays + CSR), `TopologyBuilder`          |
//! | [`loader`]     | `load_topology_csv` / `load_topology_reader`               |
//! | [`flow_table`] | `FlowTable` — inverse of `x + 0.15x^5`, persisted w/ bincode |
//! | [`latency`]    | `LatencyModel` (quartic, table, overflow)                  |
//! | [`paths`]      | `PathTable` — all-pairs distances and predecessors         |
//! | [`privacy`]    | `LaplaceMechanism`, `CountObservation`                     |
//! | [`state`]      | `NetworkState` — per-regime counts, latencies, path tables |
//! | [`error`]      | `NetworkError`, `NetworkResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | All-pairs rows are computed on Rayon's thread pool.     |

pub mod error;
pub mod flow_table;
pub mod latency;
pub mod loader;
pub mod paths;
pub mod privacy;
pub mod state;
pub mod topology;


pub use error::{NetworkError, NetworkResult};
pub use flow_table::{FlowLookup, FlowTable, congestion_polynomial};
pub use latency::{LatencyEval, LatencyModel};
pub use loader::{load_topology_csv, load_topology_reader};
pub use paths::PathTable;
pub use privacy::{CountObservation, LaplaceMechanism};
pub use state::{LatencyView, NetworkState, RefreshReport};
pub use topology::{Topology, TopologyBuilder};

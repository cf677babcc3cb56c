//! Drop-based cellular network simulation core.
//!
//! A run consists of independent drops. In every drop terminals are scattered
//! over a hexagonal multi-site layout, connected to their strongest sector, and
//! scored by downlink and uplink SNIR and throughput. It integrates:
//! - Hexagonal site layout and sector spawning
//! - Path loss models with optional log-normal shadowing
//! - Per-role deterministic random streams
//! - Association and co-band interference
//! - Aggregation of per-drop statistics
//!
//! ## Module Organization
//!
//! - `types`: Shared data structures (positions, drop state, statistics)
//! - `geometry`: Distances and angles between sites and terminals
//! - `signal_calculations`: Power conversions, antenna pattern, SNIR, throughput
//! - `topology`: Hexagonal grid and sector construction
//! - `propagation`: Path loss models
//! - `random_streams`: Seeded per-role generators
//! - `entities`: Sectors and terminals
//! - `network`: Association and interference engine
//! - `statistics`: SNIR / throughput derivation
//! - `results`: Aggregation, CDF data, summaries
//! - `drop_loop`: Orchestration of a full run
//!
//! ## Public API
//!
//! The main entry point is `Simulation`: build it from a `SimulationConfig`,
//! call `run`, and read the returned `Results`.

pub mod drop_loop;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod network;
pub mod propagation;
pub mod random_streams;
pub mod results;
pub mod signal_calculations;
pub mod statistics;
pub mod topology;
pub mod types;

pub use drop_loop::Simulation;
pub use error::SimulationError;
pub use network::Network;
pub use results::{MetricSummary, Results, ResultsSummary, cdf};
pub use types::{DropSnapshot, DropState, DropStatistics, LinkStatistics, Point};

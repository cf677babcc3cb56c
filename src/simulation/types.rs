//! Type definitions shared across the simulation.
//!
//! Contains:
//! - 3-D positions of sites, sectors and terminals
//! - The per-drop state machine
//! - Output containers handed to the results collaborator

use serde::{Deserialize, Serialize};

/// Distances below this value (meters) are clamped before entering a path loss
/// formula so the logarithm stays finite when a terminal lands on a site.
pub const MIN_PROPAGATION_DISTANCE: f64 = 1.0;

/// Position in meters. `z` is the antenna height above ground.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point { x, y, z }
    }
}

/// Lifecycle of a single drop.
///
/// Operations on `Network` advance the state strictly in this order; `reset`
/// returns to `Idle` from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropState {
    Idle,
    Placed,
    Associated,
    InterferenceReady,
    StatisticsReady,
}

impl std::fmt::Display for DropState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropState::Idle => write!(f, "Idle"),
            DropState::Placed => write!(f, "Placed"),
            DropState::Associated => write!(f, "Associated"),
            DropState::InterferenceReady => write!(f, "InterferenceReady"),
            DropState::StatisticsReady => write!(f, "StatisticsReady"),
        }
    }
}

/// SNIR and throughput samples for one link direction of one drop.
///
/// Both vectors are index-aligned: entry `k` of `throughput` belongs to entry
/// `k` of `snir_db`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkStatistics {
    /// SNIR samples in dB.
    pub snir_db: Vec<f64>,
    /// Throughput samples in Mbit/s (bandwidth is configured in MHz).
    pub throughput: Vec<f64>,
}

impl LinkStatistics {
    pub fn push(&mut self, snir_db: f64, throughput: f64) {
        self.snir_db.push(snir_db);
        self.throughput.push(throughput);
    }

    pub fn len(&self) -> usize {
        self.snir_db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snir_db.is_empty()
    }
}

/// Statistics emitted by a single drop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropStatistics {
    /// One sample per terminal.
    pub downlink: LinkStatistics,
    /// One sample per sector with at least one connected terminal.
    pub uplink: LinkStatistics,
}

/// Placement and association of one drop, for inspection or drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct DropSnapshot {
    pub grid_radius: f64,
    pub terminal_positions: Vec<Point>,
    /// Serving sector index per terminal; `None` before association.
    pub serving_sectors: Vec<Option<usize>>,
}

//! Association and interference engine.
//!
//! A drop advances through fixed states:
//! 1) `place_terminals`: scatter terminals uniformly over the grid disk
//! 2) `associate`: received power for every (sector, terminal) pair in both
//!    directions, then connect each terminal to its strongest sector
//! 3) `build_interference`: prune each terminal's serving entry, pick one
//!    active terminal per sector and fill the co-band uplink interference
//! 4) `collect_statistics`: SNIR and throughput per terminal and per sector
//!
//! `reset` clears all per-drop state and returns to `Idle`. Sectors are reset
//! in place; terminals are rebuilt on every placement.

use rand::Rng;
use std::f64::consts::PI;

use super::entities::{Sector, Terminal};
use super::error::SimulationError;
use super::geometry::planar_distance;
use super::propagation::PathLoss;
use super::random_streams::{RandomStreams, StreamRole};
use super::signal_calculations::{noise_power_dbm, sector_antenna_gain};
use super::statistics::{downlink_statistics, uplink_statistics};
use super::topology::HexagonalGrid;
use super::types::{DropSnapshot, DropState, DropStatistics, Point};
use crate::common::config::{SimulationConfig, TerminalParameters};

/// Sector population, propagation model and the state of the current drop.
#[derive(Debug, Clone)]
pub struct Network {
    grid: HexagonalGrid,
    sectors: Vec<Sector>,
    terminals: Vec<Terminal>,
    terminal_params: TerminalParameters,
    terminal_noise_power: f64,
    path_loss: PathLoss,
    sectorization: bool,
    grid_radius: f64,
    state: DropState,
}

impl Network {
    /// Build the layout, the sectors and the propagation model.
    pub fn new(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let grid = HexagonalGrid::from_parameters(&config.topology)?;
        let sectors = grid.build_sectors(&config.sector)?;
        let path_loss = PathLoss::from_config(config)?;
        let grid_radius = grid.grid_radius();

        log::info!(
            "Built {} sites / {} sectors, grid radius {:.1} m, {:?} propagation{}",
            grid.num_sites(),
            sectors.len(),
            grid_radius,
            path_loss.model(),
            if path_loss.shadowing_enabled() { " with shadowing" } else { "" }
        );

        Ok(Network {
            grid,
            sectors,
            terminals: Vec::new(),
            terminal_params: config.terminal.clone(),
            terminal_noise_power: noise_power_dbm(config.terminal.noise_density, config.terminal.bandwidth),
            path_loss,
            sectorization: config.simulation.sectorization,
            grid_radius,
            state: DropState::Idle,
        })
    }

    pub fn grid(&self) -> &HexagonalGrid {
        &self.grid
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub fn grid_radius(&self) -> f64 {
        self.grid_radius
    }

    pub fn state(&self) -> DropState {
        self.state
    }

    fn expect_state(&self, expected: DropState, operation: &str) -> Result<(), SimulationError> {
        if self.state != expected {
            return Err(SimulationError::InvalidState(format!("{} requires state {}, drop is {}", operation, expected, self.state)));
        }
        Ok(())
    }

    /// Scatter the configured number of terminals uniformly over the grid disk.
    ///
    /// Polar sampling from the placement stream: all angles `θ ~ U(0, 2π)`
    /// first, then all radii `r = R_grid·sqrt(U(0, 1))`. The square root makes
    /// the density uniform in area rather than in radius.
    pub fn place_terminals(&mut self, streams: &mut RandomStreams) -> Result<(), SimulationError> {
        self.expect_state(DropState::Idle, "place_terminals")?;

        let count = self.terminal_params.count;
        let rng = streams.stream(StreamRole::TerminalPosition);
        let angles: Vec<f64> = (0..count).map(|_| rng.gen_range(0.0..2.0 * PI)).collect();
        let radii: Vec<f64> = (0..count).map(|_| self.grid_radius * rng.gen_range(0.0..1.0f64).sqrt()).collect();

        let positions: Vec<(f64, f64)> = angles.iter().zip(&radii).map(|(theta, r)| (r * theta.cos(), r * theta.sin())).collect();
        self.spawn_terminals(&positions);
        Ok(())
    }

    /// Place terminals at explicit planar positions instead of sampling them.
    pub fn place_terminals_at(&mut self, positions: &[(f64, f64)]) -> Result<(), SimulationError> {
        self.expect_state(DropState::Idle, "place_terminals_at")?;
        self.spawn_terminals(positions);
        Ok(())
    }

    fn spawn_terminals(&mut self, positions: &[(f64, f64)]) {
        let params = &self.terminal_params;
        self.terminals = positions
            .iter()
            .enumerate()
            .map(|(index, &(x, y))| Terminal::new(index, Point::new(x, y, params.height), params.tx_power, self.terminal_noise_power, params.bandwidth))
            .collect();
        self.state = DropState::Placed;
    }

    /// Compute both link directions for every pair and connect each terminal
    /// to the sector with the strongest downlink.
    ///
    /// Per pair: planar distance, antenna gain (0 dB without sectorization),
    /// one path loss evaluation (a single shadowing draw shared by both
    /// directions), then
    ///
    /// ```text
    /// downlink = P_sector − PL + G
    /// uplink   = P_terminal − PL + G
    /// ```
    ///
    /// Every pair is recorded before the winner is chosen. Ties go to the
    /// first sector seen (lowest index).
    pub fn associate(&mut self, streams: &mut RandomStreams) -> Result<(), SimulationError> {
        self.expect_state(DropState::Placed, "associate")?;

        let rng = streams.stream(StreamRole::Shadowing);
        for sector in self.sectors.iter_mut() {
            sector.uplink_power = Vec::with_capacity(self.terminals.len());
        }

        for terminal in self.terminals.iter_mut() {
            terminal.interference_power = Vec::with_capacity(self.sectors.len());
            let mut best: Option<(usize, f64, f64)> = None;

            for sector in self.sectors.iter_mut() {
                let distance = planar_distance(&sector.position, &terminal.position);
                let gain = if self.sectorization {
                    sector_antenna_gain(&sector.position, sector.azimuth, sector.down_tilt, &terminal.position)
                } else {
                    0.0
                };
                let path_loss = self.path_loss.path_loss(distance, rng);

                let downlink = sector.tx_power - path_loss + gain;
                let uplink = terminal.tx_power - path_loss + gain;
                terminal.interference_power.push(downlink);
                sector.uplink_power.push(uplink);

                if best.is_none_or(|(_, strongest, _)| downlink > strongest) {
                    best = Some((sector.index, downlink, uplink));
                }
            }

            let Some((serving, downlink, uplink)) = best else {
                return Err(SimulationError::Configuration("network has no sectors".to_string()));
            };
            terminal.connect_to(serving, downlink);
            self.sectors[serving].connect(terminal.index, uplink);
            log::debug!("Terminal {} connected to sector {} at {:.2} dBm", terminal.index, serving, downlink);
        }

        self.state = DropState::Associated;
        Ok(())
    }

    /// Build the interference sets of both directions.
    ///
    /// Downlink: every terminal keeps all sector powers except its serving
    /// one. Uplink: each sector with terminals draws one of them as its active
    /// terminal; a sector's interference comes from the active terminals of all
    /// other sectors on the same band.
    pub fn build_interference(&mut self, streams: &mut RandomStreams) -> Result<(), SimulationError> {
        self.expect_state(DropState::Associated, "build_interference")?;

        for terminal in self.terminals.iter_mut() {
            terminal.prune_serving_power();
        }

        let rng = streams.stream(StreamRole::ActiveTerminal);
        for sector in self.sectors.iter_mut() {
            if sector.has_terminals() {
                let slot = rng.gen_range(0..sector.connected_terminals.len());
                sector.active_slot = Some(slot);
                self.terminals[sector.connected_terminals[slot]].active = true;
            }
        }

        let active: Vec<Option<(usize, usize)>> = self.sectors.iter().map(|s| s.active_terminal().map(|t| (s.band_index, t))).collect();
        for sector in self.sectors.iter_mut() {
            sector.interference_power = active
                .iter()
                .enumerate()
                .map(|(other, entry)| match entry {
                    Some((band, terminal)) if other != sector.index && *band == sector.band_index => Some(sector.uplink_power[*terminal]),
                    _ => None,
                })
                .collect();
            sector.selected_interference = sector.interference_power.iter().flatten().copied().collect();
        }

        self.state = DropState::InterferenceReady;
        Ok(())
    }

    /// Derive SNIR and throughput for the drop.
    pub fn collect_statistics(&mut self) -> Result<DropStatistics, SimulationError> {
        self.expect_state(DropState::InterferenceReady, "collect_statistics")?;

        let statistics = DropStatistics {
            downlink: downlink_statistics(&self.terminals),
            uplink: uplink_statistics(&self.sectors),
        };

        self.state = DropState::StatisticsReady;
        Ok(statistics)
    }

    /// Run a complete drop from `Idle`: placement, association, interference and
    /// statistics. The network is left in `StatisticsReady`; call `reset` before
    /// the next drop.
    pub fn run_drop(&mut self, streams: &mut RandomStreams) -> Result<DropStatistics, SimulationError> {
        self.place_terminals(streams)?;
        self.associate(streams)?;
        self.build_interference(streams)?;
        self.collect_statistics()
    }

    /// Placement and association of the current drop.
    pub fn snapshot(&self) -> DropSnapshot {
        DropSnapshot {
            grid_radius: self.grid_radius,
            terminal_positions: self.terminals.iter().map(|t| t.position).collect(),
            serving_sectors: self.terminals.iter().map(|t| t.serving_sector).collect(),
        }
    }

    /// Discard the drop's terminals and clear every sector's per-drop state.
    pub fn reset(&mut self) {
        self.terminals.clear();
        for sector in self.sectors.iter_mut() {
            sector.reset();
        }
        self.state = DropState::Idle;
    }
}

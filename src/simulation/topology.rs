//! Hexagonal site layout.
//!
//! Sites sit on a hexagonal grid with one central site and `L` rings around
//! it, `3·L·(L+1) + 1` sites in total. With cell radius `R` and
//! `h = R·sin(60°)`:
//!
//! ```text
//! row i (i = -L..=L):  n = 2L + 1 - |i| sites
//!                      y = 1.5·R·i
//!                      x = -(n-1)·h, -(n-1)·h + 2h, ..., (n-1)·h
//! ```
//!
//! Rows are emitted central row first, then `+1, -1, +2, -2, ...`. Each site
//! spawns one sector per configured azimuth.

use super::entities::Sector;
use super::error::SimulationError;
use super::signal_calculations::noise_power_dbm;
use super::types::Point;
use crate::common::config::{SectorParameters, TopologyParameters};

/// Site positions of a hexagonal grid.
#[derive(Debug, Clone)]
pub struct HexagonalGrid {
    cell_radius: f64,
    num_layers: usize,
    site_height: f64,
    sites: Vec<Point>,
}

impl HexagonalGrid {
    /// Generate the grid.
    ///
    /// # Returns
    ///
    /// A configuration error when `num_layers` is negative or the radius is not
    /// positive; otherwise the sites in row order.
    pub fn new(cell_radius: f64, num_layers: i32, site_height: f64) -> Result<Self, SimulationError> {
        if num_layers < 0 {
            return Err(SimulationError::Configuration(format!("num_layers {} must be non-negative", num_layers)));
        }
        if !(cell_radius > 0.0) {
            return Err(SimulationError::Configuration(format!("cell_radius {} must be positive", cell_radius)));
        }
        let num_layers = num_layers as usize;
        let sites = site_coordinates(cell_radius, num_layers)
            .into_iter()
            .map(|(x, y)| Point::new(x, y, site_height))
            .collect();

        Ok(HexagonalGrid {
            cell_radius,
            num_layers,
            site_height,
            sites,
        })
    }

    pub fn from_parameters(params: &TopologyParameters) -> Result<Self, SimulationError> {
        HexagonalGrid::new(params.cell_radius, params.num_layers, params.site_height)
    }

    pub fn cell_radius(&self) -> f64 {
        self.cell_radius
    }

    pub fn num_layers(&self) -> usize {
        self.num_layers
    }

    pub fn site_height(&self) -> f64 {
        self.site_height
    }

    /// Half the distance between neighbouring sites in a row, `R·sin(60°)`.
    pub fn cell_side(&self) -> f64 {
        cell_side(self.cell_radius)
    }

    pub fn num_rows(&self) -> usize {
        2 * self.num_layers + 1
    }

    /// Sites in the central (longest) row.
    pub fn max_sites_per_row(&self) -> usize {
        2 * self.num_layers + 1
    }

    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    /// Radius of the disk terminals are dropped into.
    ///
    /// Taken from the outer corner of the first (leftmost central) site's cell:
    /// `x = x₀ - h`, `y = y₀ + R/2`. Equals `R` for a single site.
    pub fn grid_radius(&self) -> f64 {
        let first = self.sites[0];
        let x = first.x - self.cell_side();
        let y = first.y + self.cell_radius / 2.0;
        (x.powi(2) + y.powi(2)).sqrt()
    }

    /// Spawn one sector per site and azimuth.
    ///
    /// Sector indices run site-major, azimuth-minor; sector `k` of site `s` has
    /// index `s·azimuths + k` and transmits on `frequency_bands[k]`.
    pub fn build_sectors(&self, params: &SectorParameters) -> Result<Vec<Sector>, SimulationError> {
        if params.azimuths.len() != params.frequency_bands.len() {
            return Err(SimulationError::Configuration(format!(
                "{} azimuths but {} frequency bands",
                params.azimuths.len(),
                params.frequency_bands.len()
            )));
        }
        let noise_power = noise_power_dbm(params.noise_density, params.bandwidth);

        let mut sectors = Vec::with_capacity(self.sites.len() * params.azimuths.len());
        for (site_index, site) in self.sites.iter().enumerate() {
            for (azimuth_index, &azimuth) in params.azimuths.iter().enumerate() {
                sectors.push(Sector::new(
                    sectors.len(),
                    site_index,
                    *site,
                    azimuth,
                    params.down_tilt,
                    params.tx_power,
                    noise_power,
                    params.bandwidth,
                    params.frequency_bands[azimuth_index],
                ));
            }
        }
        Ok(sectors)
    }
}

fn cell_side(cell_radius: f64) -> f64 {
    cell_radius * 60f64.to_radians().sin()
}

/// Planar site coordinates for a grid of `num_layers` rings.
pub fn site_coordinates(cell_radius: f64, num_layers: usize) -> Vec<(f64, f64)> {
    let h = cell_side(cell_radius);
    let layers = num_layers as i64;
    let max_sites = 2 * layers + 1;

    let mut rows = vec![0i64];
    for i in 1..=layers {
        rows.push(i);
        rows.push(-i);
    }

    let mut coordinates = Vec::with_capacity((3 * layers * (layers + 1) + 1) as usize);
    for row in rows {
        let count = max_sites - row.abs();
        let y = 1.5 * cell_radius * row as f64;
        let x_start = -((count - 1) as f64) * h;
        for k in 0..count {
            coordinates.push((x_start + 2.0 * h * k as f64, y));
        }
    }
    coordinates
}

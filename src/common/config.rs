//! Simulation configuration loading, parsing, and validation logic.
//!
//! Contains all data structures for the simulation settings and provides
//! functions for loading them from JSON or TOML files. The configuration is an
//! explicit immutable value handed to every constructor.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::simulation::random_streams::StreamRole;

/// Highest carrier frequency (MHz) covered by the Okumura-Hata / COST-231 formulas.
pub const OKUMURA_HATA_MAX_FREQUENCY_MHZ: f64 = 2000.0;

/// Error type for configuration loading failures.
#[derive(Debug)]
pub enum ConfigLoadError {
    FileReadError(String),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigLoadError::FileReadError(msg) => write!(f, "Failed to read file: {}", msg),
            ConfigLoadError::ParseError(msg) => write!(f, "Failed to parse configuration: {}", msg),
            ConfigLoadError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigLoadError {}

/// On-disk format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from the file extension; anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Hexagonal grid geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyParameters {
    /// Cell radius in meters.
    pub cell_radius: f64,
    /// Number of interference rings around the central site.
    pub num_layers: i32,
    /// Height of every site in meters.
    pub site_height: f64,
}

/// Attributes shared by every sector of every site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorParameters {
    /// One sector per entry, boresight azimuth in degrees counter-clockwise from +x.
    pub azimuths: Vec<f64>,
    /// Frequency band index per azimuth index.
    pub frequency_bands: Vec<usize>,
    /// Boresight elevation in degrees; negative values tilt the antenna down.
    pub down_tilt: f64,
    /// Transmit power in dBm.
    pub tx_power: f64,
    /// Receiver noise density in dBm/Hz.
    pub noise_density: f64,
    /// Bandwidth in MHz.
    pub bandwidth: f64,
}

/// Attributes of the terminals dropped in every trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalParameters {
    /// Terminals per drop.
    pub count: usize,
    /// Transmit power in dBm.
    pub tx_power: f64,
    /// Receiver noise density in dBm/Hz.
    pub noise_density: f64,
    /// Bandwidth in MHz.
    pub bandwidth: f64,
    /// Antenna height in meters.
    pub height: f64,
}

/// Environment class of the Okumura-Hata / COST-231 model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationEnvironment {
    DenseUrban,
    Urban,
    Suburban,
    Rural,
}

/// Path loss formula, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropagationModel {
    /// `PL = PL₀ + 10·α·log₁₀(d/d₀)`
    Generic {
        /// PL₀ in dB.
        reference_loss: f64,
        /// d₀ in meters.
        reference_distance: f64,
        /// α.
        exponent: f64,
    },
    /// Friis free-space loss at the configured frequency.
    FreeSpace,
    /// Okumura-Hata up to 1500 MHz, COST-231 up to 2000 MHz. Base height is the
    /// site height and mobile height the terminal height.
    OkumuraHata { environment: PropagationEnvironment },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationParameters {
    pub model: PropagationModel,
    /// Carrier frequency in Hz.
    pub frequency: f64,
    /// Whether a Gaussian shadowing term is added to every path loss.
    #[serde(default)]
    pub shadowing: bool,
    /// Shadowing standard deviation in dB.
    #[serde(default)]
    pub shadowing_sigma: f64,
}

/// Stopping criterion of the drop loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationType {
    /// Run one drop per configured seed up to `max_num_drops`.
    FixedSeeds,
    /// Run until a confidence interval is reached. Not implemented.
    FixedConfidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub simulation_type: SimulationType,
    pub max_num_drops: usize,
    /// Base index into `seed_table` for each drop.
    pub seeds: Vec<usize>,
    /// Table of generator seeds; drop `i` role `r` uses `seed_table[seeds[i] + r]`.
    pub seed_table: Vec<u64>,
    /// Apply the sector antenna pattern; without it every link has 0 dB gain.
    #[serde(default)]
    pub sectorization: bool,
    /// Consumed by plotting front-ends only.
    #[serde(default)]
    pub plot_drop_grid: bool,
}

/// Root structure holding every simulation setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub topology: TopologyParameters,
    pub sector: SectorParameters,
    pub terminal: TerminalParameters,
    pub propagation: PropagationParameters,
    pub simulation: SimulationParameters,
}

/// Deterministic seed table used by the default configuration.
pub fn default_seed_table(len: usize) -> Vec<u64> {
    (0..len as u64).map(|i| 1_009 + i * 7_919).collect()
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let max_num_drops = 10;
        let roles = StreamRole::ALL.len();
        SimulationConfig {
            topology: TopologyParameters {
                cell_radius: 200.0,
                num_layers: 1,
                site_height: 30.0,
            },
            sector: SectorParameters {
                azimuths: vec![60.0, 180.0, 300.0],
                frequency_bands: vec![0, 1, 2],
                down_tilt: -10.0,
                tx_power: 46.0,
                noise_density: -174.0,
                bandwidth: 10.0,
            },
            terminal: TerminalParameters {
                count: 60,
                tx_power: 23.0,
                noise_density: -165.0,
                bandwidth: 10.0,
                height: 1.5,
            },
            propagation: PropagationParameters {
                model: PropagationModel::Generic {
                    reference_loss: 128.1,
                    reference_distance: 1000.0,
                    exponent: 3.76,
                },
                frequency: 700e6,
                shadowing: false,
                shadowing_sigma: 8.0,
            },
            simulation: SimulationParameters {
                simulation_type: SimulationType::FixedSeeds,
                max_num_drops,
                seeds: (0..max_num_drops).map(|i| i * roles).collect(),
                seed_table: default_seed_table(max_num_drops * roles),
                sectorization: true,
                plot_drop_grid: false,
            },
        }
    }
}

/// Load, parse and validate a configuration file.
///
/// # Parameters
///
/// * `path` - Path to a `.json` or `.toml` file
///
/// # Returns
///
/// Validated `SimulationConfig` or an error describing the failing step.
pub fn load_config(path: &str) -> Result<SimulationConfig, ConfigLoadError> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path))
        .map_err(|e| ConfigLoadError::FileReadError(e.to_string()))?;

    parse_config(&data, ConfigFormat::from_path(Path::new(path)))
}

/// Parse and validate configuration text.
pub fn parse_config(data: &str, format: ConfigFormat) -> Result<SimulationConfig, ConfigLoadError> {
    let config: SimulationConfig = match format {
        ConfigFormat::Json => serde_json::from_str(data)
            .context("Invalid JSON format")
            .map_err(|e| ConfigLoadError::ParseError(format!("{:#}", e)))?,
        ConfigFormat::Toml => toml::from_str(data)
            .context("Invalid TOML format")
            .map_err(|e| ConfigLoadError::ParseError(format!("{:#}", e)))?,
    };

    validate_config(&config).map_err(ConfigLoadError::ValidationError)?;

    Ok(config)
}

/// Validate a configuration.
///
/// # Returns
///
/// `Ok(())` if validation passes, `Err(String)` with error description otherwise.
pub fn validate_config(config: &SimulationConfig) -> Result<(), String> {
    let topology = &config.topology;
    if !(topology.cell_radius > 0.0) {
        return Err(format!("Invalid cell_radius {}, must be positive", topology.cell_radius));
    }
    if topology.num_layers < 0 {
        return Err(format!("Invalid num_layers {}, must be non-negative", topology.num_layers));
    }
    if topology.site_height < 0.0 {
        return Err("Invalid site_height, must be non-negative".to_string());
    }

    let sector = &config.sector;
    if sector.azimuths.is_empty() {
        return Err("Sector configuration requires at least one azimuth".to_string());
    }
    if sector.azimuths.len() != sector.frequency_bands.len() {
        return Err(format!(
            "Sector azimuth count {} does not match frequency band count {}",
            sector.azimuths.len(),
            sector.frequency_bands.len()
        ));
    }
    if !(sector.bandwidth > 0.0) {
        return Err("Invalid sector bandwidth, must be positive".to_string());
    }

    let terminal = &config.terminal;
    if terminal.count == 0 {
        return Err("Terminal count must be at least 1".to_string());
    }
    if !(terminal.bandwidth > 0.0) {
        return Err("Invalid terminal bandwidth, must be positive".to_string());
    }

    let propagation = &config.propagation;
    if !(propagation.shadowing_sigma >= 0.0) {
        return Err("Invalid shadowing_sigma, must be non-negative".to_string());
    }
    match &propagation.model {
        PropagationModel::Generic { reference_distance, .. } => {
            if !(*reference_distance > 0.0) {
                return Err("Invalid reference_distance, must be positive".to_string());
            }
        }
        PropagationModel::FreeSpace => {
            if !(propagation.frequency > 0.0) {
                return Err("Invalid frequency, must be positive".to_string());
            }
        }
        PropagationModel::OkumuraHata { .. } => {
            let frequency_mhz = propagation.frequency / 1e6;
            if !(frequency_mhz > 0.0) || frequency_mhz > OKUMURA_HATA_MAX_FREQUENCY_MHZ {
                return Err(format!(
                    "Frequency {} MHz outside the Okumura-Hata/COST-231 range (0-{} MHz)",
                    frequency_mhz, OKUMURA_HATA_MAX_FREQUENCY_MHZ
                ));
            }
            if !(topology.site_height > 0.0) || !(terminal.height > 0.0) {
                return Err("Okumura-Hata requires positive site and terminal heights".to_string());
            }
        }
    }

    let simulation = &config.simulation;
    if simulation.max_num_drops == 0 {
        return Err("max_num_drops must be at least 1".to_string());
    }
    if simulation.simulation_type == SimulationType::FixedSeeds {
        if simulation.seeds.len() < simulation.max_num_drops {
            return Err(format!(
                "Only {} seeds configured for {} drops",
                simulation.seeds.len(),
                simulation.max_num_drops
            ));
        }
        let roles = StreamRole::ALL.len();
        for (drop_index, &seed) in simulation.seeds.iter().take(simulation.max_num_drops).enumerate() {
            let in_table = seed.checked_add(roles).is_some_and(|end| end <= simulation.seed_table.len());
            if !in_table {
                return Err(format!(
                    "Seed {} of drop {} needs {} seed_table entries starting there, table has {}",
                    seed,
                    drop_index,
                    roles,
                    simulation.seed_table.len()
                ));
            }
        }
    }

    Ok(())
}

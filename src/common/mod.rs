//! Items shared between the simulation engine and the command-line driver.

pub mod config;

pub use config::{ConfigLoadError, SimulationConfig, load_config, validate_config};

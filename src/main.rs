use env_logger::Builder;
use log::{LevelFilter, info};

use cellular_drop_simulator::common::{SimulationConfig, load_config};
use cellular_drop_simulator::simulation::Simulation;

fn main() -> anyhow::Result<()> {
    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("cellular_drop_simulator"), LevelFilter::Debug)
        .init();

    info!("Starting up");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            load_config(&path)?
        }
        None => {
            info!("No configuration file given, using built-in defaults");
            SimulationConfig::default()
        }
    };

    let mut simulation = Simulation::new(config)?;
    let summary = simulation.run()?.summary();

    info!("Summary:\n{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

//! Drop loop orchestration.
//!
//! A `Simulation` owns the network and the results. Each drop re-derives its
//! random streams from the configured base seed, runs the full drop, hands the
//! statistics to `Results` and resets the network in place for the next one.

use log::info;

use super::error::SimulationError;
use super::network::Network;
use super::random_streams::RandomStreams;
use super::results::Results;
use super::types::DropStatistics;
use crate::common::config::{SimulationConfig, SimulationType, validate_config};

pub struct Simulation {
    config: SimulationConfig,
    network: Network,
    results: Results,
}

impl Simulation {
    /// Validate the configuration and build the network.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        validate_config(&config).map_err(SimulationError::Configuration)?;
        if config.simulation.plot_drop_grid {
            log::warn!("plot_drop_grid is set but drop grids are not drawn; use Simulation::run_single_drop and the drop snapshot instead");
        }
        let network = Network::new(&config)?;
        Ok(Simulation {
            config,
            network,
            results: Results::new(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn results(&self) -> &Results {
        &self.results
    }

    /// Run every configured drop and return the aggregated results.
    ///
    /// Results of an earlier `run` are discarded first, so repeated calls on
    /// the same simulation produce identical output.
    pub fn run(&mut self) -> Result<&Results, SimulationError> {
        match self.config.simulation.simulation_type {
            SimulationType::FixedSeeds => self.run_fixed_seeds()?,
            SimulationType::FixedConfidence => {
                return Err(SimulationError::NotImplemented("fixed_confidence simulation type".to_string()));
            }
        }
        Ok(&self.results)
    }

    fn run_fixed_seeds(&mut self) -> Result<(), SimulationError> {
        let num_drops = self.config.simulation.max_num_drops;
        info!(
            "Starting {} drops: {} sectors, {} terminals per drop",
            num_drops,
            self.network.sectors().len(),
            self.config.terminal.count
        );

        self.results.reset();
        for drop in 0..num_drops {
            let statistics = self.run_single_drop(drop)?;
            info!(
                "Drop {}/{} (seed {}): {} downlink / {} uplink samples",
                drop + 1,
                num_drops,
                self.config.simulation.seeds[drop],
                statistics.downlink.len(),
                statistics.uplink.len()
            );
            self.results.add_statistics(statistics);
            self.network.reset();
        }

        info!("Finished {} drops", self.results.drop_count());
        Ok(())
    }

    /// Run drop `drop` on its own, leaving the network in its final state so
    /// the placement can be inspected with `Network::snapshot`.
    ///
    /// The statistics are returned but not added to the results.
    pub fn run_single_drop(&mut self, drop: usize) -> Result<DropStatistics, SimulationError> {
        let base_seed = *self.config.simulation.seeds.get(drop).ok_or_else(|| {
            SimulationError::Configuration(format!("drop {} has no seed ({} seeds configured)", drop, self.config.simulation.seeds.len()))
        })?;
        let mut streams = RandomStreams::for_drop(&self.config.simulation.seed_table, base_seed)?;

        self.network.reset();
        self.network.run_drop(&mut streams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::PropagationModel;

    fn small_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.terminal.count = 20;
        config.simulation.max_num_drops = 4;
        config.propagation.shadowing = true;
        config
    }

    #[test]
    fn fixed_seeds_runs_every_drop() {
        let mut simulation = Simulation::new(small_config()).unwrap();
        let results = simulation.run().unwrap();
        assert_eq!(results.drop_count(), 4);
        for drop in results.drops() {
            assert_eq!(drop.downlink.len(), 20);
            assert!(!drop.uplink.is_empty());
            assert!(drop.uplink.len() <= 21);
        }
        assert_eq!(simulation.network().state(), crate::simulation::types::DropState::Idle);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let mut simulation = Simulation::new(small_config()).unwrap();
        let first = simulation.run().unwrap().drops().to_vec();
        let second = simulation.run().unwrap().drops().to_vec();
        assert_eq!(first, second);

        let mut fresh = Simulation::new(small_config()).unwrap();
        assert_eq!(fresh.run().unwrap().drops(), first.as_slice());
    }

    #[test]
    fn single_drop_matches_the_loop() {
        let mut simulation = Simulation::new(small_config()).unwrap();
        let looped = simulation.run().unwrap().drops()[2].clone();
        let single = simulation.run_single_drop(2).unwrap();
        assert_eq!(single, looped);
        assert_eq!(simulation.network().snapshot().terminal_positions.len(), 20);
        assert!(simulation.run_single_drop(99).is_err());
    }

    #[test]
    fn drops_use_distinct_seeds() {
        let mut simulation = Simulation::new(small_config()).unwrap();
        let drops = simulation.run().unwrap().drops().to_vec();
        assert_ne!(drops[0], drops[1]);
    }

    #[test]
    fn fixed_confidence_is_not_implemented() {
        let mut config = small_config();
        config.simulation.simulation_type = SimulationType::FixedConfidence;
        let mut simulation = Simulation::new(config).unwrap();
        assert!(matches!(simulation.run(), Err(SimulationError::NotImplemented(_))));
    }

    #[test]
    fn invalid_configuration_is_rejected_up_front() {
        let mut config = small_config();
        config.simulation.seeds.truncate(2);
        assert!(matches!(Simulation::new(config), Err(SimulationError::Configuration(_))));

        let mut config = small_config();
        config.topology.num_layers = -1;
        assert!(matches!(Simulation::new(config), Err(SimulationError::Configuration(_))));
    }

    #[test]
    fn free_space_model_runs_without_sectorization() {
        let mut config = small_config();
        config.propagation.model = PropagationModel::FreeSpace;
        config.propagation.frequency = 3.5e9;
        config.simulation.sectorization = false;
        let mut simulation = Simulation::new(config).unwrap();
        let summary = simulation.run().unwrap().summary();
        assert_eq!(summary.drops, 4);
        assert_eq!(summary.downlink_snir.unwrap().count, 80);
    }
}

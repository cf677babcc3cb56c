//! Deterministic random-number streams for a drop.
//!
//! Every source of randomness in a drop draws from a dedicated stream, one per
//! role, so that changing how often one role samples never shifts the numbers
//! another role sees. Streams are derived from a seed table:
//!
//! ```text
//! stream(drop, role) = StdRng::seed_from_u64(seed_table[seeds[drop] + role])
//! ```
//!
//! Streams are never carried from one drop to the next; every drop re-derives
//! all of them from its own base seed.

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::error::SimulationError;

/// Randomness roles, in seed-table order.
///
/// The discriminant is the offset added to the drop's base seed. Append new
/// roles at the end; reordering changes every existing stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum StreamRole {
    /// Terminal angle and radius sampling.
    TerminalPosition = 0,
    /// Shadowing term added to path loss.
    Shadowing = 1,
    /// Choice of the active (transmitting) terminal of each sector.
    ActiveTerminal = 2,
}

impl StreamRole {
    pub const ALL: [StreamRole; 3] = [StreamRole::TerminalPosition, StreamRole::Shadowing, StreamRole::ActiveTerminal];

    pub fn name(&self) -> &'static str {
        match self {
            StreamRole::TerminalPosition => "terminal_position",
            StreamRole::Shadowing => "shadowing",
            StreamRole::ActiveTerminal => "active_terminal",
        }
    }
}

/// The set of generators used by one drop.
#[derive(Debug, Clone)]
pub struct RandomStreams {
    base_seed: usize,
    streams: Vec<StdRng>,
}

impl RandomStreams {
    /// Derive every role's generator for a drop.
    ///
    /// # Parameters
    ///
    /// * `seed_table` - Table of generator seeds
    /// * `base_seed` - The drop's base index into `seed_table`
    ///
    /// # Returns
    ///
    /// The streams, or a configuration error if `base_seed + role` runs past the
    /// end of the table for any role.
    pub fn for_drop(seed_table: &[u64], base_seed: usize) -> Result<Self, SimulationError> {
        let streams = StreamRole::ALL
            .iter()
            .map(|&role| {
                base_seed
                    .checked_add(role as usize)
                    .and_then(|slot| seed_table.get(slot))
                    .map(|&seed| StdRng::seed_from_u64(seed))
                    .ok_or_else(|| {
                        SimulationError::Configuration(format!(
                            "seed_table has {} entries, {} stream of base seed {} is past its end",
                            seed_table.len(),
                            role.name(),
                            base_seed
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RandomStreams { base_seed, streams })
    }

    pub fn base_seed(&self) -> usize {
        self.base_seed
    }

    /// Mutable access to one role's generator.
    pub fn stream(&mut self, role: StreamRole) -> &mut StdRng {
        &mut self.streams[role as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn draw(streams: &mut RandomStreams, role: StreamRole, n: usize) -> Vec<f64> {
        (0..n).map(|_| streams.stream(role).gen_range(0.0..1.0)).collect()
    }

    #[test]
    fn same_seed_reproduces_every_stream() {
        let table = [5, 6, 7, 8, 9];
        let mut a = RandomStreams::for_drop(&table, 1).unwrap();
        let mut b = RandomStreams::for_drop(&table, 1).unwrap();
        for role in StreamRole::ALL {
            assert_eq!(draw(&mut a, role, 16), draw(&mut b, role, 16));
        }
    }

    #[test]
    fn roles_do_not_share_a_stream() {
        let table = [5, 6, 7];
        let mut streams = RandomStreams::for_drop(&table, 0).unwrap();
        let position = draw(&mut streams, StreamRole::TerminalPosition, 8);
        let shadowing = draw(&mut streams, StreamRole::Shadowing, 8);
        assert_ne!(position, shadowing);
    }

    #[test]
    fn consuming_one_role_leaves_the_others_untouched() {
        let table = [5, 6, 7];
        let mut a = RandomStreams::for_drop(&table, 0).unwrap();
        let mut b = RandomStreams::for_drop(&table, 0).unwrap();
        draw(&mut a, StreamRole::Shadowing, 100);
        assert_eq!(draw(&mut a, StreamRole::ActiveTerminal, 8), draw(&mut b, StreamRole::ActiveTerminal, 8));
    }

    #[test]
    fn overlapping_base_seeds_share_table_entries() {
        // drop with base 1 uses table[1] for positions, which base 0 uses for shadowing
        let table = [5, 6, 7, 8];
        let mut a = RandomStreams::for_drop(&table, 0).unwrap();
        let mut b = RandomStreams::for_drop(&table, 1).unwrap();
        assert_eq!(draw(&mut a, StreamRole::Shadowing, 4), draw(&mut b, StreamRole::TerminalPosition, 4));
        assert_eq!(b.base_seed(), 1);
    }

    #[test]
    fn base_seed_past_table_end_is_rejected() {
        let table = [5, 6, 7];
        assert!(matches!(RandomStreams::for_drop(&table, 1), Err(SimulationError::Configuration(_))));
        assert!(matches!(RandomStreams::for_drop(&table, usize::MAX), Err(SimulationError::Configuration(_))));
    }
}

//! Error type shared by the drop simulation engine.

/// Errors raised while building or running a simulation.
///
/// Configuration problems are fatal and surface at construction time. Calling
/// drop operations out of order yields `InvalidState`. Degenerate drops (for
/// example a sector without connected terminals) are not errors; they are
/// handled by excluding the affected sample.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Invalid or inconsistent configuration value.
    Configuration(String),
    /// Requested mode exists in the configuration model but has no implementation.
    NotImplemented(String),
    /// A drop operation was called while the drop was in the wrong state.
    InvalidState(String),
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            SimulationError::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
            SimulationError::InvalidState(msg) => write!(f, "Invalid drop state: {}", msg),
        }
    }
}

impl std::error::Error for SimulationError {}

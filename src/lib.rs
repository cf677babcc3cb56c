//! Monte-Carlo drop simulator for multi-site, multi-sector cellular networks.
//!
//! - `common`: configuration loading and validation
//! - `simulation`: layout, propagation, association, statistics and the drop loop

pub mod common;
pub mod simulation;

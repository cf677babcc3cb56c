//! Sectors and terminals.
//!
//! Both carry immutable radio attributes plus per-drop state:
//! - `Sector`s are created once from the site layout and live for the whole run.
//!   Their per-drop state is cleared by `Sector::reset` at the start of every
//!   drop.
//! - `Terminal`s are created fresh for each drop and discarded afterwards.
//!
//! Entities refer to each other by index into the network's sector and
//! terminal vectors, never by reference.

use super::types::Point;

/// One directional antenna face of a site.
#[derive(Debug, Clone)]
pub struct Sector {
    pub index: usize,
    pub site_index: usize,
    pub position: Point,
    /// Boresight azimuth in degrees.
    pub azimuth: f64,
    /// Boresight elevation in degrees (negative points down).
    pub down_tilt: f64,
    /// Transmit power in dBm.
    pub tx_power: f64,
    /// Thermal noise power in dBm.
    pub noise_power: f64,
    /// Bandwidth in MHz.
    pub bandwidth: f64,
    pub band_index: usize,

    /// Terminals served in the current drop.
    pub connected_terminals: Vec<usize>,
    /// Uplink power (dBm) received from each connected terminal, aligned with
    /// `connected_terminals`.
    pub rx_power: Vec<f64>,
    /// Uplink power (dBm) received from every terminal of the drop, indexed by
    /// terminal.
    pub uplink_power: Vec<f64>,
    /// Uplink interference indexed by sector; `None` where that sector does
    /// not interfere (other band, no terminals, or this sector itself).
    pub interference_power: Vec<Option<f64>>,
    /// Interference values contributing to this sector's uplink SNIR.
    pub selected_interference: Vec<f64>,
    /// Position in `connected_terminals` of this drop's transmitting terminal.
    pub active_slot: Option<usize>,
}

impl Sector {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        index: usize,
        site_index: usize,
        position: Point,
        azimuth: f64,
        down_tilt: f64,
        tx_power: f64,
        noise_power: f64,
        bandwidth: f64,
        band_index: usize,
    ) -> Self {
        Sector {
            index,
            site_index,
            position,
            azimuth,
            down_tilt,
            tx_power,
            noise_power,
            bandwidth,
            band_index,
            connected_terminals: Vec::new(),
            rx_power: Vec::new(),
            uplink_power: Vec::new(),
            interference_power: Vec::new(),
            selected_interference: Vec::new(),
            active_slot: None,
        }
    }

    /// Attach a terminal together with the uplink power it delivers here.
    pub fn connect(&mut self, terminal_index: usize, rx_power: f64) {
        self.connected_terminals.push(terminal_index);
        self.rx_power.push(rx_power);
    }

    pub fn has_terminals(&self) -> bool {
        !self.connected_terminals.is_empty()
    }

    /// Index of the active terminal in the drop's terminal vector.
    pub fn active_terminal(&self) -> Option<usize> {
        self.active_slot.map(|slot| self.connected_terminals[slot])
    }

    /// Uplink power received from the active terminal.
    pub fn active_rx_power(&self) -> Option<f64> {
        self.active_slot.map(|slot| self.rx_power[slot])
    }

    /// Clear all per-drop state. Immutable attributes are untouched, so a reset
    /// sector is indistinguishable from a freshly built one.
    pub fn reset(&mut self) {
        self.connected_terminals.clear();
        self.rx_power.clear();
        self.uplink_power.clear();
        self.interference_power.clear();
        self.selected_interference.clear();
        self.active_slot = None;
    }
}

/// A user terminal dropped for a single trial.
#[derive(Debug, Clone)]
pub struct Terminal {
    pub index: usize,
    pub position: Point,
    /// Transmit power in dBm.
    pub tx_power: f64,
    /// Thermal noise power in dBm.
    pub noise_power: f64,
    /// Bandwidth in MHz.
    pub bandwidth: f64,

    pub serving_sector: Option<usize>,
    /// Downlink power (dBm) from the serving sector.
    pub rx_power: f64,
    /// Downlink power (dBm) from every sector; after interference is built, the
    /// serving sector's entry is gone.
    pub interference_power: Vec<f64>,
    /// Whether this terminal is its sector's transmitting terminal in the drop.
    pub active: bool,
}

impl Terminal {
    pub fn new(index: usize, position: Point, tx_power: f64, noise_power: f64, bandwidth: f64) -> Self {
        Terminal {
            index,
            position,
            tx_power,
            noise_power,
            bandwidth,
            serving_sector: None,
            rx_power: f64::NEG_INFINITY,
            interference_power: Vec::new(),
            active: false,
        }
    }

    pub fn connect_to(&mut self, sector_index: usize, rx_power: f64) {
        self.serving_sector = Some(sector_index);
        self.rx_power = rx_power;
    }

    /// Drop the serving sector's downlink entry, leaving only interferers.
    ///
    /// The serving sector is the first-seen maximum of the list, so this removes
    /// exactly one copy of the largest value even when several sectors tie.
    pub fn prune_serving_power(&mut self) {
        if let Some(serving) = self.serving_sector {
            if serving < self.interference_power.len() {
                self.interference_power.remove(serving);
            }
        }
    }
}

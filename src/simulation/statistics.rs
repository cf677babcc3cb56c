//! SNIR and throughput derivation for a finished drop.
//!
//! The two link directions are asymmetric:
//! - Downlink: one sample per terminal. Signal is the serving sector's power,
//!   interference every other sector's power, noise the terminal's.
//! - Uplink: one sample per sector that serves at least one terminal. Signal is
//!   the active terminal's power, interference the sector's selected co-band
//!   set, noise the sector's.
//!
//! Samples whose received power is not finite are left out.

use super::entities::{Sector, Terminal};
use super::signal_calculations::{calculate_snir_db, shannon_throughput};
use super::types::LinkStatistics;

/// Downlink SNIR (dB) and throughput (Mbit/s) of one terminal, or `None` if
/// the terminal is not connected or its received power is not finite.
pub fn terminal_sample(terminal: &Terminal) -> Option<(f64, f64)> {
    terminal.serving_sector?;
    if !terminal.rx_power.is_finite() {
        log::warn!("Terminal {} has non-finite downlink power {}, sample skipped", terminal.index, terminal.rx_power);
        return None;
    }
    let snir = calculate_snir_db(terminal.rx_power, &terminal.interference_power, terminal.noise_power);
    Some((snir, shannon_throughput(terminal.bandwidth, snir)))
}

/// Uplink SNIR (dB) and throughput (Mbit/s) of one sector, or `None` if it has
/// no active terminal in this drop or the received power is not finite.
pub fn sector_sample(sector: &Sector) -> Option<(f64, f64)> {
    let rx_power = sector.active_rx_power()?;
    if !rx_power.is_finite() {
        log::warn!("Sector {} has non-finite uplink power {}, sample skipped", sector.index, rx_power);
        return None;
    }
    let snir = calculate_snir_db(rx_power, &sector.selected_interference, sector.noise_power);
    Some((snir, shannon_throughput(sector.bandwidth, snir)))
}

pub fn downlink_statistics(terminals: &[Terminal]) -> LinkStatistics {
    let mut statistics = LinkStatistics::default();
    for (snir, throughput) in terminals.iter().filter_map(terminal_sample) {
        statistics.push(snir, throughput);
    }
    statistics
}

pub fn uplink_statistics(sectors: &[Sector]) -> LinkStatistics {
    let mut statistics = LinkStatistics::default();
    for (snir, throughput) in sectors.iter().filter_map(sector_sample) {
        statistics.push(snir, throughput);
    }
    statistics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::types::Point;

    fn terminal(rx_power: f64, interference: Vec<f64>) -> Terminal {
        let mut t = Terminal::new(0, Point::new(10.0, 0.0, 1.5), 23.0, -100.0, 10.0);
        t.connect_to(0, rx_power);
        t.interference_power = interference;
        t
    }

    fn sector() -> Sector {
        Sector::new(0, 0, Point::new(0.0, 0.0, 30.0), 0.0, -10.0, 46.0, -100.0, 20.0, 0)
    }

    #[test]
    fn downlink_sample_without_interference_is_snr() {
        let (snir, throughput) = terminal_sample(&terminal(-90.0, vec![])).unwrap();
        assert!((snir - 10.0).abs() < 1e-9);
        assert!((throughput - 10.0 * 11f64.log2()).abs() < 1e-9);
    }

    #[test]
    fn downlink_interference_lowers_snir() {
        let (clean, _) = terminal_sample(&terminal(-90.0, vec![])).unwrap();
        let (noisy, _) = terminal_sample(&terminal(-90.0, vec![-95.0, -99.0])).unwrap();
        assert!(noisy < clean);
    }

    #[test]
    fn zero_db_snir_gives_one_bit_per_hertz() {
        let (snir, throughput) = terminal_sample(&terminal(-100.0, vec![-1000.0])).unwrap();
        assert!(snir.abs() < 1e-9);
        assert!((throughput - 10.0).abs() < 1e-9);
    }

    #[test]
    fn unconnected_or_non_finite_terminals_are_skipped() {
        let unconnected = Terminal::new(0, Point::default(), 23.0, -100.0, 10.0);
        assert_eq!(terminal_sample(&unconnected), None);
        assert_eq!(terminal_sample(&terminal(f64::NAN, vec![])), None);
        assert_eq!(terminal_sample(&terminal(f64::NEG_INFINITY, vec![])), None);

        let stats = downlink_statistics(&[terminal(-90.0, vec![]), terminal(f64::NAN, vec![]), unconnected]);
        assert_eq!(stats.len(), 1);
    }

    #[test]
    fn uplink_uses_active_terminal_and_selected_interference() {
        let mut s = sector();
        s.connect(4, -80.0);
        s.connect(7, -90.0);
        s.active_slot = Some(1);
        s.selected_interference = vec![-100.0];

        let (snir, throughput) = sector_sample(&s).unwrap();
        assert!((snir - (10.0 - 10.0 * 2f64.log10())).abs() < 1e-9);
        assert!((throughput - shannon_throughput(20.0, snir)).abs() < 1e-12);
    }

    #[test]
    fn sectors_without_terminals_produce_no_sample() {
        let empty = sector();
        let mut busy = sector();
        busy.connect(0, -85.0);
        busy.active_slot = Some(0);

        assert_eq!(sector_sample(&empty), None);
        let stats = uplink_statistics(&[empty, busy]);
        assert_eq!(stats.len(), 1);
        assert!((stats.snir_db[0] - 15.0).abs() < 1e-9);
        assert_eq!(stats.throughput.len(), 1);
    }
}

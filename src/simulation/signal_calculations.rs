//! Radio signal calculations.
//!
//! Contains helpers for:
//! - dBm / mW conversions
//! - Thermal noise power from a noise density and a bandwidth
//! - The sectorized antenna pattern (horizontal + vertical components)
//! - SNIR from a received power, a set of interferers and a noise floor
//! - Shannon-capacity throughput estimate
//!
//! Units:
//! - Power: dBm, mW (conversion provided)
//! - Noise density: dBm/Hz
//! - Bandwidth: MHz, so throughput comes out in Mbit/s
//! - Angles: degrees

use super::geometry::{bearing_deg, elevation_deg, wrap_angle_deg};
use super::types::Point;

/// Peak gain of the sector antenna in dBi.
pub const ANTENNA_MAX_GAIN: f64 = 18.0;
/// Horizontal half-power beamwidth in degrees.
pub const ANTENNA_HORIZONTAL_BEAMWIDTH: f64 = 65.0;
/// Front-to-back attenuation cap of the horizontal pattern in dB.
pub const ANTENNA_HORIZONTAL_MAX_ATTENUATION: f64 = 30.0;
/// Vertical half-power beamwidth in degrees.
pub const ANTENNA_VERTICAL_BEAMWIDTH: f64 = 6.2;
/// Side-lobe floor of the vertical pattern in dB.
pub const ANTENNA_VERTICAL_MAX_ATTENUATION: f64 = 18.0;

/// Convert power from dBm to milliwatts.
///
/// # Formula
///
/// ```text
/// P(mW) = 10^(P(dBm) / 10)
/// ```
///
/// # Examples
///
/// ```text
/// 0 dBm   → 1 mW
/// 10 dBm  → 10 mW
/// -10 dBm → 0.1 mW
/// ```
pub fn dbm_to_mw(dbm: f64) -> f64 {
    10f64.powf(dbm / 10.0)
}

/// Convert power from milliwatts to dBm.
///
/// # Formula
///
/// ```text
/// P(dBm) = 10 × log₁₀(P(mW))
/// ```
///
/// # Notes
///
/// - Inverse of `dbm_to_mw()`
/// - For `mw <= 0` this returns -∞ or NaN; callers that sum linear powers
///   always include a strictly positive noise term, which keeps the argument
///   positive
pub fn mw_to_dbm(mw: f64) -> f64 {
    10.0 * mw.log10()
}

/// Thermal noise power in dBm for a noise density (dBm/Hz) over a bandwidth
/// given in MHz.
///
/// ```text
/// N(dBm) = 10 × log₁₀(B(Hz) × 10^(N₀/10))
/// ```
pub fn noise_power_dbm(noise_density_dbm_hz: f64, bandwidth_mhz: f64) -> f64 {
    mw_to_dbm(bandwidth_mhz * 1e6 * dbm_to_mw(noise_density_dbm_hz))
}

/// Horizontal antenna pattern in dB for an angle `phi` (degrees) off boresight.
///
/// `phi` is wrapped into [-180°, 180°) first.
pub fn horizontal_gain(phi: f64) -> f64 {
    let phi = wrap_angle_deg(phi);
    -(12.0 * (phi / ANTENNA_HORIZONTAL_BEAMWIDTH).powi(2)).min(ANTENNA_HORIZONTAL_MAX_ATTENUATION) + ANTENNA_MAX_GAIN
}

/// Vertical antenna pattern in dB for an angle `theta` (degrees) off the tilted
/// boresight.
pub fn vertical_gain(theta: f64) -> f64 {
    (-12.0 * (theta / ANTENNA_VERTICAL_BEAMWIDTH).powi(2)).max(-ANTENNA_VERTICAL_MAX_ATTENUATION)
}

/// Total gain of a sector antenna towards a terminal.
///
/// # Parameters
///
/// * `sector_position` - Antenna position (z is the mast height)
/// * `azimuth` - Boresight azimuth in degrees, counter-clockwise from +x
/// * `down_tilt` - Boresight elevation in degrees (negative points below the horizon)
/// * `terminal_position` - Terminal position
///
/// # Returns
///
/// Horizontal plus vertical gain in dB.
pub fn sector_antenna_gain(sector_position: &Point, azimuth: f64, down_tilt: f64, terminal_position: &Point) -> f64 {
    let phi = bearing_deg(sector_position, terminal_position) - azimuth;
    let theta = elevation_deg(sector_position, terminal_position) - down_tilt;
    horizontal_gain(phi) + vertical_gain(theta)
}

/// SNIR in dB of a received power against a set of interferers and a noise floor.
///
/// All terms are converted to the linear domain before summing:
///
/// ```text
/// SNIR(dB) = P_rx − 10 × log₁₀(Σ 10^(I_k/10) + 10^(N/10))
/// ```
pub fn calculate_snir_db(rx_power_dbm: f64, interference_dbm: &[f64], noise_dbm: f64) -> f64 {
    let interference_mw: f64 = interference_dbm.iter().map(|&i| dbm_to_mw(i)).sum();
    rx_power_dbm - mw_to_dbm(interference_mw + dbm_to_mw(noise_dbm))
}

/// Shannon-capacity throughput for a bandwidth (MHz) and an SNIR in dB.
///
/// ```text
/// T = B × log₂(1 + 10^(SNIR/10))
/// ```
pub fn shannon_throughput(bandwidth_mhz: f64, snir_db: f64) -> f64 {
    bandwidth_mhz * (1.0 + dbm_to_mw(snir_db)).log2()
}

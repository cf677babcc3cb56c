//! Geometry calculations between sectors and terminals.
//!
//! Contains helper functions for:
//! - Planar (x/y) distance, the distance fed to the propagation models
//! - Bearing and elevation angles used by the sector antenna pattern
//! - Angle wrap-around into [-180°, 180°)

use super::types::Point;

/// Squared planar distance in meters² (heights ignored).
pub fn distance2(a: &Point, b: &Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Planar distance in meters between two positions.
///
/// Antenna heights do not contribute: the propagation models take the ground
/// distance and account for heights through their own parameters.
pub fn planar_distance(a: &Point, b: &Point) -> f64 {
    distance2(a, b).sqrt()
}

/// Wrap an angle in degrees into [-180, 180).
///
/// The antenna pattern is symmetric around the boresight, so a terminal at
/// bearing 350° seen from a sector pointing at 10° must produce -20°, not 340°.
pub fn wrap_angle_deg(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Bearing of `to` as seen from `from`, in degrees, counter-clockwise from the
/// positive x axis. Same convention as sector azimuths.
pub fn bearing_deg(from: &Point, to: &Point) -> f64 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees()
}

/// Elevation of `to` as seen from `from`, in degrees.
///
/// Negative when `to` is below `from` (a terminal seen from a mast).
pub fn elevation_deg(from: &Point, to: &Point) -> f64 {
    (to.z - from.z).atan2(planar_distance(from, to)).to_degrees()
}

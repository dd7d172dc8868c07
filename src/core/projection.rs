//! Web-Mercator projection onto the unit square.
//!
//! `x` grows eastward from 0 at -180° to 1 at 180°; `y` grows southward from
//! 0 at the northern Mercator limit to 1 at the southern one.

use crate::core::geo::LatLng;
use std::f64::consts::PI;

/// Projects `p` onto the normalized Mercator plane.
///
/// Precondition: `|lat| < 90°`. At the poles `tan`/`sec` diverge; callers are
/// expected to clamp with [`LatLng::clamped_to_mercator`] first.
pub fn forward(p: &LatLng) -> (f64, f64) {
    let lat = p.lat_radians();
    let lng = p.lng_radians();
    let x = lng / (2.0 * PI) + 0.5;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0;
    (x, y)
}

/// Inverse of [`forward`].
///
/// Uses `asin(tanh(2π(0.5 - y)))`, which equals `asin((k-1)/(k+1))` with
/// `k = exp(4π(0.5 - y))` but stays finite for large `|y|`. Longitudes outside
/// the world (from `x` outside `[0, 1]`) are wrapped back into `[-180, 180]`.
///
/// Total over finite input. Non-finite `x` or `y` has no location and maps to
/// `(0, 0)`; debug builds reject it.
pub fn inverse(x: f64, y: f64) -> LatLng {
    debug_assert!(x.is_finite() && y.is_finite(), "non-finite Mercator point ({}, {})", x, y);
    let lng = 2.0 * PI * (x - 0.5);
    let lat = (2.0 * PI * (0.5 - y)).tanh().asin();
    let lng_deg = LatLng::wrap_lng(lng.to_degrees());
    // asin of tanh is always within [-90, 90]; wrapping bounds the longitude.
    LatLng::new(lat.to_degrees().clamp(-90.0, 90.0), lng_deg.clamp(-180.0, 180.0))
        .unwrap_or_default()
}

/// Mercator y of a latitude given in radians, same scale as [`forward`].
pub fn lat_to_y(lat: f64) -> f64 {
    (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0
}

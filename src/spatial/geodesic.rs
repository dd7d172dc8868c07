//! Great-circle densification on the WGS84 ellipsoid.
//!
//! Straight pixel segments between sparse vertices do not follow geodesics
//! under the Mercator projection. [`densify`] inserts intermediate vertices
//! along each geodesic so that the rendered polyline bends correctly.

use crate::core::constants::CIRCLE_STEP_DEGREES;
use crate::core::geo::LatLng;
use crate::Result;
use geographiclib_rs::{DirectGeodesic, Geodesic, InverseGeodesic};
use std::f64::consts::PI;

/// How many times the sample count of one segment may be doubled while
/// trying to bring every longitude step under the threshold.
const MAX_REFINEMENTS: u32 = 6;

/// Signed longitude step from `from` to `to`, normalized into `[-PI, PI)`.
pub fn lng_delta(from: &LatLng, to: &LatLng) -> f64 {
    let mut d = to.lng_radians() - from.lng_radians();
    while d < 0.0 {
        d += 2.0 * PI;
    }
    while d >= PI {
        d -= 2.0 * PI;
    }
    d
}

/// Replaces every segment whose longitude step is at least `threshold`
/// (radians) with samples along the WGS84 geodesic.
///
/// The first and last input vertices are reproduced exactly. Every pair of
/// consecutive output vertices differs by less than `threshold` in
/// longitude (except for geodesics through a pole), so running the result
/// through `densify` again returns it unchanged.
pub fn densify(vertices: &[LatLng], threshold: f64) -> Result<Vec<LatLng>> {
    let mut out = Vec::with_capacity(vertices.len());
    let Some((first, rest)) = vertices.split_first() else {
        return Ok(out);
    };

    let geod = Geodesic::wgs84();
    out.push(*first);
    let mut last = *first;
    for current in rest {
        if lng_delta(&last, current).abs() >= threshold {
            densify_segment(&geod, &last, current, threshold, &mut out)?;
        }
        out.push(*current);
        last = *current;
    }

    log::trace!("densified {} vertices into {}", vertices.len(), out.len());
    Ok(out)
}

/// Appends the interior samples of the geodesic `from -> to` to `out`.
fn densify_segment(
    geod: &Geodesic,
    from: &LatLng,
    to: &LatLng,
    threshold: f64,
    out: &mut Vec<LatLng>,
) -> Result<()> {
    let (s12, azi1, _azi2, a12): (f64, f64, f64, f64) =
        geod.inverse(from.lat(), from.lng(), to.lat(), to.lng());

    // roughly one sample per degree of arc
    let mut n = 2 + a12.ceil() as usize;
    let mut samples = sample_geodesic(geod, from, azi1, s12, n)?;
    let mut refinements = 0;
    while !steps_within(from, &samples, to, threshold) && refinements < MAX_REFINEMENTS {
        n *= 2;
        samples = sample_geodesic(geod, from, azi1, s12, n)?;
        refinements += 1;
    }
    if refinements > 0 {
        log::trace!(
            "segment ({:.4}, {:.4}) -> ({:.4}, {:.4}) refined to {} samples",
            from.lat(),
            from.lng(),
            to.lat(),
            to.lng(),
            n
        );
    }
    out.extend(samples);
    Ok(())
}

/// Points at `i * s12 / n` along the geodesic for `i` in `1..n`.
fn sample_geodesic(
    geod: &Geodesic,
    from: &LatLng,
    azi1: f64,
    s12: f64,
    n: usize,
) -> Result<Vec<LatLng>> {
    (1..n)
        .map(|i| {
            let (lat, lng): (f64, f64) =
                geod.direct(from.lat(), from.lng(), azi1, s12 * i as f64 / n as f64);
            LatLng::wrapped(lat.clamp(-90.0, 90.0), lng)
        })
        .collect()
}

fn steps_within(from: &LatLng, samples: &[LatLng], to: &LatLng, threshold: f64) -> bool {
    let mut prev = from;
    for p in samples.iter().chain(std::iter::once(to)) {
        if lng_delta(prev, p).abs() >= threshold {
            return false;
        }
        prev = p;
    }
    true
}

/// Closed ring of points at `radius_m` meters from `center`, one every
/// 0.1° of azimuth. The first point is repeated at the end.
pub fn circle_ring(center: &LatLng, radius_m: f64) -> Result<Vec<LatLng>> {
    let geod = Geodesic::wgs84();
    let steps = (360.0 / CIRCLE_STEP_DEGREES).round() as usize;
    let mut ring = Vec::with_capacity(steps + 1);
    for i in 0..steps {
        let azimuth = i as f64 * CIRCLE_STEP_DEGREES;
        let (lat, lng): (f64, f64) = geod.direct(center.lat(), center.lng(), azimuth, radius_m);
        ring.push(LatLng::wrapped(lat.clamp(-90.0, 90.0), lng)?);
    }
    if let Some(first) = ring.first().copied() {
        ring.push(first);
    }
    Ok(ring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::DENSIFY_THRESHOLD;

    fn ll(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng).unwrap()
    }

    #[test]
    fn test_lng_delta_normalization() {
        let d = lng_delta(&ll(0.0, 179.0), &ll(0.0, -179.0));
        assert!((d.to_degrees() - 2.0).abs() < 1e-9);
        let d = lng_delta(&ll(0.0, -179.0), &ll(0.0, 179.0));
        assert!((d.to_degrees() + 2.0).abs() < 1e-9);
        let d = lng_delta(&ll(0.0, 10.0), &ll(0.0, 10.5));
        assert!((d.to_degrees() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_short_meridional_segment_is_untouched() {
        let line = [ll(48.0, 8.0), ll(49.0, 8.5), ll(50.0, 8.2)];
        let out = densify(&line, DENSIFY_THRESHOLD).unwrap();
        assert_eq!(out, line.to_vec());
    }

    #[test]
    fn test_endpoints_are_preserved() {
        let line = [ll(50.11, 8.68), ll(40.71, -74.01)];
        let out = densify(&line, DENSIFY_THRESHOLD).unwrap();
        assert!(out.len() > 50);
        assert_eq!(out.first(), line.first());
        assert_eq!(out.last(), line.last());
    }

    #[test]
    fn test_great_circle_bends_north() {
        // Frankfurt -> New York peaks well north of both endpoints.
        let line = [ll(50.11, 8.68), ll(40.71, -74.01)];
        let out = densify(&line, DENSIFY_THRESHOLD).unwrap();
        let max_lat = out.iter().map(|p| p.lat()).fold(f64::MIN, f64::max);
        assert!(max_lat > 51.5);
    }

    #[test]
    fn test_densify_is_idempotent() {
        let lines = [
            vec![ll(50.11, 8.68), ll(40.71, -74.01)],
            vec![ll(0.0, 0.0), ll(10.0, 30.0), ll(-20.0, 60.0)],
            vec![ll(70.0, -30.0), ll(72.0, 40.0)],
        ];
        for line in lines {
            let once = densify(&line, DENSIFY_THRESHOLD).unwrap();
            let twice = densify(&once, DENSIFY_THRESHOLD).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_antimeridian_crossing_stays_short() {
        let line = [ll(0.0, 179.0), ll(0.0, -179.0)];
        let out = densify(&line, DENSIFY_THRESHOLD).unwrap();
        // ~2° of arc, not a trip around the world
        assert!(out.len() < 10, "got {} points", out.len());
        for p in &out[1..out.len() - 1] {
            assert!(p.lng().abs() > 178.9, "sample at {}", p.lng());
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(densify(&[], DENSIFY_THRESHOLD).unwrap().is_empty());
        let single = [ll(1.0, 2.0)];
        assert_eq!(densify(&single, DENSIFY_THRESHOLD).unwrap(), single.to_vec());
    }

    #[test]
    fn test_circle_ring_is_closed_and_round() {
        let center = ll(48.0, 8.0);
        let ring = circle_ring(&center, 10_000.0).unwrap();
        assert_eq!(ring.len(), 3601);
        assert_eq!(ring.first(), ring.last());

        let geod = Geodesic::wgs84();
        for p in ring.iter().step_by(450) {
            let d: f64 = geod.inverse(center.lat(), center.lng(), p.lat(), p.lng());
            assert!((d - 10_000.0).abs() < 1e-3, "distance {}", d);
        }
    }
}

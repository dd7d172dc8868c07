use crate::core::constants::{MAX_API_ZOOM, MAX_LATITUDE};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Represents a validated geographical coordinate.
///
/// Latitude and longitude are stored in radians so the projection code can use
/// them directly; the public constructors and accessors work in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Degrees", into = "Degrees")]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

/// Serialized form of a [`LatLng`], in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Degrees {
    lat: f64,
    lng: f64,
}

impl TryFrom<Degrees> for LatLng {
    type Error = MapError;

    fn try_from(value: Degrees) -> Result<Self> {
        LatLng::new(value.lat, value.lng)
    }
}

impl From<LatLng> for Degrees {
    fn from(value: LatLng) -> Self {
        Degrees {
            lat: value.lat(),
            lng: value.lng(),
        }
    }
}

impl LatLng {
    /// Creates a coordinate from degrees, rejecting anything outside
    /// `[-90, 90] x [-180, 180]` (and NaN).
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !Self::is_valid_degrees(lat, lng) {
            return Err(MapError::InvalidCoordinates(format!(
                "lat/lng out of range: ({}, {})",
                lat, lng
            )));
        }
        Ok(Self {
            lat: lat.to_radians(),
            lng: lng.to_radians(),
        })
    }

    /// Creates a coordinate from radians with the same validation as [`LatLng::new`].
    pub fn from_radians(lat: f64, lng: f64) -> Result<Self> {
        Self::new(lat.to_degrees(), lng.to_degrees())
    }

    /// Creates a coordinate from degrees, wrapping the longitude into
    /// `[-180, 180]` first. Latitude is still validated.
    pub fn wrapped(lat: f64, lng: f64) -> Result<Self> {
        Self::new(lat, Self::wrap_lng(lng))
    }

    fn is_valid_degrees(lat: f64, lng: f64) -> bool {
        (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
    }

    /// Latitude in degrees
    pub fn lat(&self) -> f64 {
        self.lat.to_degrees()
    }

    /// Longitude in degrees
    pub fn lng(&self) -> f64 {
        self.lng.to_degrees()
    }

    pub fn lat_radians(&self) -> f64 {
        self.lat
    }

    pub fn lng_radians(&self) -> f64 {
        self.lng
    }

    /// Wraps longitude to [-180, 180] range
    pub fn wrap_lng(lng: f64) -> f64 {
        let wrapped = lng % 360.0;
        if wrapped > 180.0 {
            wrapped - 360.0
        } else if wrapped < -180.0 {
            wrapped + 360.0
        } else {
            wrapped
        }
    }

    /// Clamps latitude to the range the Mercator projection can represent
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Returns this coordinate with its latitude pulled inside the Mercator limit.
    pub fn clamped_to_mercator(&self) -> LatLng {
        let max = MAX_LATITUDE.to_radians();
        LatLng {
            lat: self.lat.clamp(-max, max),
            lng: self.lng,
        }
    }

    /// Parses a `"lat,lng"` pair in degrees, e.g. `" 48.1 , 8.2 "`.
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(MapError::InvalidCoordinates(format!(
                "cannot parse coordinates string \"{}\" (not a comma-separated lat/lng pair)",
                s
            )));
        }
        let parse_f64 = |v: &str| {
            v.trim().parse::<f64>().map_err(|_| {
                MapError::InvalidCoordinates(format!(
                    "cannot parse coordinates string \"{}\" (non-numeric lat/lng values)",
                    s
                ))
            })
        };
        let lat = parse_f64(parts[0])?;
        let lng = parse_f64(parts[1])?;
        Self::new(lat, lng).map_err(|_| {
            MapError::InvalidCoordinates(format!(
                "cannot parse coordinates string \"{}\" (out of bounds lat/lng values)",
                s
            ))
        })
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self { lat: 0.0, lng: 0.0 }
    }
}

/// Parses a whitespace separated list of `"lat,lng"` pairs.
pub fn parse_lat_lngs(s: &str) -> Result<Vec<LatLng>> {
    s.split_whitespace().map(LatLng::parse).collect()
}

// geo-types uses x for longitude and y for latitude
impl From<LatLng> for geo_types::Coord<f64> {
    fn from(p: LatLng) -> Self {
        geo_types::Coord {
            x: p.lng(),
            y: p.lat(),
        }
    }
}

impl From<LatLng> for geo_types::Point<f64> {
    fn from(p: LatLng) -> Self {
        geo_types::Point::new(p.lng(), p.lat())
    }
}

impl TryFrom<geo_types::Coord<f64>> for LatLng {
    type Error = MapError;

    fn try_from(c: geo_types::Coord<f64>) -> Result<Self> {
        LatLng::new(c.y, c.x)
    }
}

impl TryFrom<geo_types::Point<f64>> for LatLng {
    type Error = MapError;

    fn try_from(p: geo_types::Point<f64>) -> Result<Self> {
        LatLng::try_from(p.0)
    }
}

/// Vertices of a `LineString` whose coordinates are (lng, lat) in degrees.
pub fn lat_lngs_from_line_string(line: &geo_types::LineString<f64>) -> Result<Vec<LatLng>> {
    line.coords().map(|c| LatLng::try_from(*c)).collect()
}

/// Represents a point in screen or projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A closed longitude interval on the circle, in radians.
///
/// `lo > hi` means the interval runs eastward from `lo` through the
/// antimeridian to `hi`. The full circle is `[-PI, PI]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LngInterval {
    lo: f64,
    hi: f64,
}

impl LngInterval {
    fn point(p: f64) -> Self {
        // -PI and PI are the same meridian; keep a single representation.
        let p = if p == -PI { PI } else { p };
        Self { lo: p, hi: p }
    }

    fn full() -> Self {
        Self { lo: -PI, hi: PI }
    }

    fn from_point_pair(a: f64, b: f64) -> Self {
        let a = if a == -PI { PI } else { a };
        let b = if b == -PI { PI } else { b };
        if positive_distance(a, b) <= PI {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    fn is_full(&self) -> bool {
        self.lo == -PI && self.hi == PI
    }

    fn is_inverted(&self) -> bool {
        self.lo > self.hi
    }

    fn contains(&self, p: f64) -> bool {
        let p = if p == -PI { PI } else { p };
        if self.is_inverted() {
            p >= self.lo || p <= self.hi
        } else {
            p >= self.lo && p <= self.hi
        }
    }

    fn contains_interval(&self, other: &LngInterval) -> bool {
        if self.is_inverted() {
            if other.is_inverted() {
                return other.lo >= self.lo && other.hi <= self.hi;
            }
            return (other.lo >= self.lo && other.hi <= PI)
                || (other.hi <= self.hi && other.lo >= -PI);
        }
        if other.is_inverted() {
            return self.is_full();
        }
        other.lo >= self.lo && other.hi <= self.hi
    }

    fn length(&self) -> f64 {
        let len = self.hi - self.lo;
        if len >= 0.0 {
            len
        } else {
            len + 2.0 * PI
        }
    }

    fn center(&self) -> f64 {
        let c = 0.5 * (self.lo + self.hi);
        if !self.is_inverted() {
            return c;
        }
        if c <= 0.0 {
            c + PI
        } else {
            c - PI
        }
    }

    fn union(&self, other: &LngInterval) -> LngInterval {
        if self.contains(other.lo) {
            if self.contains(other.hi) {
                if self.contains_interval(other) {
                    return *self;
                }
                return LngInterval::full();
            }
            return LngInterval {
                lo: self.lo,
                hi: other.hi,
            };
        }
        if self.contains(other.hi) {
            return LngInterval {
                lo: other.lo,
                hi: self.hi,
            };
        }
        if other.contains(self.lo) {
            return *other;
        }

        // Disjoint: bridge across whichever gap is smaller.
        let west_gap = positive_distance(other.hi, self.lo);
        let east_gap = positive_distance(self.hi, other.lo);
        let extend_west = LngInterval {
            lo: other.lo,
            hi: self.hi,
        };
        let extend_east = LngInterval {
            lo: self.lo,
            hi: other.hi,
        };
        if west_gap < east_gap {
            extend_west
        } else if east_gap < west_gap {
            extend_east
        } else if extend_west.lo <= extend_east.lo {
            // tie; pick independently of argument order
            extend_west
        } else {
            extend_east
        }
    }
}

/// Eastward distance from `a` to `b` in `[0, 2*PI)`.
fn positive_distance(a: f64, b: f64) -> f64 {
    let d = b - a;
    if d >= 0.0 {
        d
    } else {
        (b + PI) - (a - PI)
    }
}

/// Represents a closed rectangle on the sphere.
///
/// The longitude range may wrap across the antimeridian (`lng_lo > lng_hi`).
/// Rectangles are never mutated; [`LatLngRect::union`] returns a new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngRect {
    lat_lo: f64,
    lat_hi: f64,
    lng: LngInterval,
}

impl LatLngRect {
    /// The degenerate rectangle containing exactly `p`.
    pub fn from_point(p: LatLng) -> Self {
        Self {
            lat_lo: p.lat_radians(),
            lat_hi: p.lat_radians(),
            lng: LngInterval::point(p.lng_radians()),
        }
    }

    /// The smallest rectangle containing both points.
    pub fn from_point_pair(a: LatLng, b: LatLng) -> Self {
        Self {
            lat_lo: a.lat_radians().min(b.lat_radians()),
            lat_hi: a.lat_radians().max(b.lat_radians()),
            lng: LngInterval::from_point_pair(a.lng_radians(), b.lng_radians()),
        }
    }

    /// Builds a rectangle from explicit edges in degrees. `lng_lo > lng_hi`
    /// produces a rectangle crossing the antimeridian.
    pub fn from_degrees(lat_lo: f64, lat_hi: f64, lng_lo: f64, lng_hi: f64) -> Result<Self> {
        let lo = LatLng::new(lat_lo, lng_lo)?;
        let hi = LatLng::new(lat_hi, lng_hi)?;
        if lat_lo > lat_hi {
            return Err(MapError::InvalidCoordinates(format!(
                "rect latitude range is inverted: {} > {}",
                lat_lo, lat_hi
            )));
        }
        let lng = if lng_lo == -180.0 && lng_hi == 180.0 {
            LngInterval::full()
        } else {
            LngInterval {
                lo: LngInterval::point(lo.lng_radians()).lo,
                hi: LngInterval::point(hi.lng_radians()).hi,
            }
        };
        Ok(Self {
            lat_lo: lo.lat_radians(),
            lat_hi: hi.lat_radians(),
            lng,
        })
    }

    /// Parses exactly two whitespace separated `"lat,lng"` pairs.
    pub fn parse(s: &str) -> Result<Self> {
        let points = parse_lat_lngs(s)?;
        if points.len() != 2 {
            return Err(MapError::InvalidCoordinates(format!(
                "cannot parse coordinates string \"{}\" (requires exactly two lat/lng pairs)",
                s
            )));
        }
        Ok(Self::from_point_pair(points[0], points[1]))
    }

    /// Southern edge in degrees
    pub fn lat_lo(&self) -> f64 {
        self.lat_lo.to_degrees()
    }

    /// Northern edge in degrees
    pub fn lat_hi(&self) -> f64 {
        self.lat_hi.to_degrees()
    }

    /// Western edge in degrees
    pub fn lng_lo(&self) -> f64 {
        self.lng.lo.to_degrees()
    }

    /// Eastern edge in degrees
    pub fn lng_hi(&self) -> f64 {
        self.lng.hi.to_degrees()
    }

    pub fn lat_lo_radians(&self) -> f64 {
        self.lat_lo
    }

    pub fn lat_hi_radians(&self) -> f64 {
        self.lat_hi
    }

    /// Whether the longitude range crosses the antimeridian
    pub fn is_inverted(&self) -> bool {
        self.lng.is_inverted()
    }

    pub fn is_point(&self) -> bool {
        self.lat_lo == self.lat_hi && self.lng.lo == self.lng.hi
    }

    /// Longitudinal extent in degrees, in `[0, 360]`
    pub fn lng_span(&self) -> f64 {
        self.lng.length().to_degrees()
    }

    pub fn contains(&self, p: &LatLng) -> bool {
        p.lat_radians() >= self.lat_lo
            && p.lat_radians() <= self.lat_hi
            && self.lng.contains(p.lng_radians())
    }

    pub fn union(&self, other: &LatLngRect) -> LatLngRect {
        LatLngRect {
            lat_lo: self.lat_lo.min(other.lat_lo),
            lat_hi: self.lat_hi.max(other.lat_hi),
            lng: self.lng.union(&other.lng),
        }
    }

    /// South-west corner
    pub fn south_west(&self) -> LatLng {
        LatLng {
            lat: self.lat_lo,
            lng: self.lng.lo,
        }
    }

    /// North-west corner
    pub fn north_west(&self) -> LatLng {
        LatLng {
            lat: self.lat_hi,
            lng: self.lng.lo,
        }
    }

    /// South-east corner
    pub fn south_east(&self) -> LatLng {
        LatLng {
            lat: self.lat_lo,
            lng: self.lng.hi,
        }
    }

    /// North-east corner
    pub fn north_east(&self) -> LatLng {
        LatLng {
            lat: self.lat_hi,
            lng: self.lng.hi,
        }
    }

    /// Center of the rectangle under the Mercator projection.
    ///
    /// The latitude is the inverse Mercator of the mean projected y of both
    /// edges, which keeps the rectangle visually centered on the map. The
    /// longitude is the midpoint of the (possibly wrapped) interval.
    pub fn center(&self) -> LatLng {
        let lng = self.lng.center();
        // a degenerate latitude range must come back bit-for-bit
        if self.lat_lo == self.lat_hi {
            return LatLng {
                lat: self.lat_lo,
                lng,
            };
        }
        let limit = MAX_LATITUDE.to_radians();
        let y1 = self.lat_lo.clamp(-limit, limit).sin().atanh();
        let y2 = self.lat_hi.clamp(-limit, limit).sin().atanh();
        LatLng {
            lat: ((y1 + y2) / 2.0).sinh().atan(),
            lng,
        }
    }
}

/// Represents a tile coordinate in the slippy map tile system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Resolves an unbounded tile index to a real tile.
    ///
    /// `x` wraps modulo `2^z`; rows outside `[0, 2^z)` lie beyond the poles
    /// and have no tile, so `None` is returned for them.
    pub fn wrapped(z: u8, x: i64, y: i64) -> Option<TileCoord> {
        if z as i64 > MAX_API_ZOOM {
            return None;
        }
        let n = 1_i64 << z;
        if y < 0 || y >= n {
            return None;
        }
        Some(TileCoord::new(x.rem_euclid(n) as u32, y as u32, z))
    }

    /// Checks if the tile is valid for the given zoom level
    pub fn is_valid(&self) -> bool {
        if self.z as i64 > MAX_API_ZOOM {
            return false;
        }
        let max_coord = 1_u64 << self.z;
        (self.x as u64) < max_coord && (self.y as u64) < max_coord
    }
}

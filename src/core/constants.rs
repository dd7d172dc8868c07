//! Core constants for viewport fitting and tile addressing.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Zoom used when all content collapses to a single point.
///
/// There is no extent to measure in that case, so this is a product choice
/// ("reasonably close"), not a derived value.
pub const POINT_ZOOM: u8 = 15;

/// Largest zoom accepted from callers before provider clamping.
pub const MAX_API_ZOOM: i64 = 30;

/// Providers never advertise more zoom levels than this.
pub const MAX_PROVIDER_ZOOM: u8 = 20;

/// Bottom margin reserved for the attribution line when no attribution
/// text will be drawn.
pub const ATTRIBUTION_MARGIN: u32 = 12;

/// Longitude step (1° in radians) below which a segment is drawn straight.
pub const DENSIFY_THRESHOLD: f64 = 2.0 * std::f64::consts::PI / 360.0;

/// Latitude limit of the square web-Mercator world.
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Azimuth step in degrees between consecutive circle ring points.
pub const CIRCLE_STEP_DEGREES: f64 = 0.1;

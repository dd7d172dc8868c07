//! Viewport fitting.
//!
//! [`ViewportResolver`] turns overlays, an image size and an optional
//! user-supplied center/zoom into the [`Viewport`] a map is rendered at.

use crate::core::bounds::{Bounds, PixelMargin};
use crate::core::config::TileProvider;
use crate::core::constants::{MAX_API_ZOOM, POINT_ZOOM};
use crate::core::geo::{LatLng, LatLngRect};
use crate::core::projection;
use crate::core::transformer::Transformer;
use crate::layers::base::Overlay;
use crate::layers::manager::{aggregate_bounds, aggregate_margin};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// The center and integer zoom a map is rendered at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedViewport")]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
}

/// Deserialized form of a [`Viewport`] before the zoom is validated.
#[derive(Deserialize)]
struct UncheckedViewport {
    center: LatLng,
    zoom: i64,
}

impl TryFrom<UncheckedViewport> for Viewport {
    type Error = MapError;

    fn try_from(raw: UncheckedViewport) -> Result<Self> {
        Ok(Viewport::new(raw.center, validate_zoom(raw.zoom)?))
    }
}

impl Viewport {
    pub fn new(center: LatLng, zoom: u8) -> Self {
        Self { center, zoom }
    }

    /// The transformer for rendering this viewport into a `width` x `height` image.
    pub fn transformer(&self, width: u32, height: u32, tile_size: u32) -> Transformer {
        Transformer::new(width, height, self.zoom, self.center, tile_size)
    }
}

/// Checks a caller-supplied zoom against the accepted API range `[0, 30]`.
pub fn validate_zoom(zoom: i64) -> Result<u8> {
    if (0..=MAX_API_ZOOM).contains(&zoom) {
        Ok(zoom as u8)
    } else {
        Err(MapError::InvalidZoom(zoom))
    }
}

/// Picks center and zoom so that every overlay, grown by its pixel margin,
/// fits into the image at the highest zoom the tile provider offers.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportResolver {
    tile_size: u32,
    max_zoom: u8,
    attribution_drawn: bool,
    custom_bounds: Option<LatLngRect>,
}

impl ViewportResolver {
    pub fn new(max_zoom: u8, tile_size: u32) -> Self {
        Self {
            tile_size: tile_size.max(1),
            max_zoom: max_zoom.min(MAX_API_ZOOM as u8),
            attribution_drawn: false,
            custom_bounds: None,
        }
    }

    /// Resolver matching the zoom range, tile size and attribution of `provider`.
    pub fn for_provider(provider: &TileProvider) -> Self {
        let attribution_drawn = provider.attribution().is_some_and(|a| !a.is_empty());
        Self::new(provider.max_zoom(), provider.tile_size()).with_attribution(attribution_drawn)
    }

    /// Whether an attribution line will be drawn. When it is not, the bottom
    /// margin reserves room for one.
    pub fn with_attribution(mut self, attribution_drawn: bool) -> Self {
        self.attribution_drawn = attribution_drawn;
        self
    }

    /// Extra area that must be visible in addition to the overlays
    pub fn with_bounds(mut self, bounds: Option<LatLngRect>) -> Self {
        self.custom_bounds = bounds;
        self
    }

    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn clamp_zoom(&self, zoom: i64) -> u8 {
        zoom.clamp(0, self.max_zoom as i64) as u8
    }

    /// Union of all overlay bounds and the custom bounds, if any.
    pub fn object_bounds(&self, overlays: &[Box<dyn Overlay>]) -> Option<LatLngRect> {
        match (aggregate_bounds(overlays), self.custom_bounds) {
            (Some(b), Some(custom)) => Some(b.union(&custom)),
            (b, custom) => b.or(custom),
        }
    }

    pub fn extra_pixel_bounds(&self, overlays: &[Box<dyn Overlay>]) -> PixelMargin {
        aggregate_margin(overlays, self.attribution_drawn)
    }

    /// Resolves the viewport.
    ///
    /// * center and zoom given: used as is, zoom clamped
    /// * only center given: zoom fitted around the center and all overlays
    /// * otherwise: center derived from the bounds, zoom fitted unless given,
    ///   then the center is nudged to balance the pixel margins
    ///
    /// Fails with [`MapError::Underconstrained`] when there is neither a
    /// center nor anything to derive one from.
    pub fn resolve(
        &self,
        overlays: &[Box<dyn Overlay>],
        width: u32,
        height: u32,
        center: Option<LatLng>,
        zoom: Option<u8>,
    ) -> Result<Viewport> {
        if let Some(z) = zoom {
            validate_zoom(z as i64)?;
        }

        if let Some(center) = center {
            if let Some(z) = zoom {
                log::debug!("using supplied center and zoom {}", z);
                return Ok(Viewport::new(center, self.clamp_zoom(z as i64)));
            }
            let bounds = self.object_bounds(overlays);
            let zoom = self.determine_zoom(overlays, width, height, bounds, center);
            log::debug!("fitted zoom {} around supplied center", zoom);
            return Ok(Viewport::new(center, zoom));
        }

        let bounds = self.object_bounds(overlays).ok_or(MapError::Underconstrained)?;
        let center = bounds.center();
        let zoom = match zoom {
            Some(z) => self.clamp_zoom(z as i64),
            None if bounds.is_point() => self.clamp_zoom(POINT_ZOOM as i64),
            None => self.determine_zoom(overlays, width, height, Some(bounds), center),
        };
        let center = self.adjust_center(overlays, width, height, center, zoom);
        log::debug!(
            "resolved viewport center=({:.6}, {:.6}) zoom={}",
            center.lat(),
            center.lng(),
            zoom
        );
        Ok(Viewport::new(center, zoom))
    }

    /// Largest zoom at which `bounds` (joined with `center`) fits the image
    /// minus the aggregate pixel margin.
    pub fn determine_zoom(
        &self,
        overlays: &[Box<dyn Overlay>],
        width: u32,
        height: u32,
        bounds: Option<LatLngRect>,
        center: LatLng,
    ) -> u8 {
        let point = LatLngRect::from_point(center);
        let b = bounds.map_or(point, |b| b.union(&point));
        if b.is_point() {
            return self.clamp_zoom(POINT_ZOOM as i64);
        }

        let margin = self.extra_pixel_bounds(overlays);
        let ts = self.tile_size as f64;
        let mut w = (width as f64 - margin.horizontal() as f64) / ts;
        let mut h = (height as f64 - margin.vertical() as f64) / ts;
        if w <= 0.0 || h <= 0.0 {
            log::debug!("pixel margins exceed the {}x{} image, ignoring them", width, height);
            w = width as f64 / ts;
            h = height as f64 / ts;
        }

        let (dx, dy) = mercator_extent(&b);
        for zoom in 1..=self.max_zoom {
            let tiles = (1_u64 << zoom) as f64;
            if dx * tiles > w || dy * tiles > h {
                log::trace!("extent overflows at zoom {}", zoom);
                return self.clamp_zoom(zoom as i64 - 1);
            }
        }
        self.max_zoom
    }

    /// Recenters on the midpoint of all overlay pixel footprints at `zoom`.
    ///
    /// Leaves `center` untouched when the footprint does not fit the image.
    pub fn adjust_center(
        &self,
        overlays: &[Box<dyn Overlay>],
        width: u32,
        height: u32,
        center: LatLng,
        zoom: u8,
    ) -> LatLng {
        let transformer = Transformer::new(width, height, zoom, center, self.tile_size);
        let Some(footprint) = overlay_footprint(overlays, &transformer) else {
            return center;
        };

        if !footprint.fits_within(width as f64, height as f64) {
            log::debug!(
                "overlay footprint {:.1}x{:.1} exceeds the {}x{} image, keeping center",
                footprint.width(),
                footprint.height(),
                width,
                height
            );
            return center;
        }
        let mid = footprint.center();
        transformer.pixel2ll(mid.x, mid.y)
    }
}

impl Default for ViewportResolver {
    fn default() -> Self {
        Self::for_provider(&TileProvider::default())
    }
}

/// Fractions of the Mercator world spanned by `b` horizontally and
/// vertically. Wrapped longitude ranges are measured the short way round.
fn mercator_extent(b: &LatLngRect) -> (f64, f64) {
    let mut dx = (b.lng_hi() - b.lng_lo()) / 360.0;
    if dx < 0.0 {
        dx += dx.abs().ceil();
    }
    if dx > 1.0 {
        dx -= dx.floor();
    }
    let y_lo = projection::lat_to_y(LatLng::clamp_lat(b.lat_lo()).to_radians());
    let y_hi = projection::lat_to_y(LatLng::clamp_lat(b.lat_hi()).to_radians());
    (dx, (y_hi - y_lo).abs())
}

/// Resolves a viewport with a provider-agnostic resolver.
///
/// No attribution is assumed, so the bottom margin reserves room for one.
pub fn resolve(
    overlays: &[Box<dyn Overlay>],
    width: u32,
    height: u32,
    center: Option<LatLng>,
    zoom: Option<u8>,
    max_zoom: u8,
    tile_size: u32,
) -> Result<Viewport> {
    ViewportResolver::new(max_zoom, tile_size).resolve(overlays, width, height, center, zoom)
}

/// Pixel footprint of all overlays under `transformer`, if there are any.
pub fn overlay_footprint(overlays: &[Box<dyn Overlay>], transformer: &Transformer) -> Option<Bounds> {
    overlays
        .iter()
        .map(|o| o.pixel_rect(transformer))
        .reduce(|acc, r| acc.extend_with(&r))
}

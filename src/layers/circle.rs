use crate::core::bounds::PixelMargin;
use crate::core::geo::{LatLng, LatLngRect};
use crate::core::transformer::Transformer;
use crate::layers::area::Area;
use crate::layers::base::{Overlay, OverlayKind};
use crate::rendering::pipeline::{Renderer, Rgba, RED, TRANSPARENT};
use crate::spatial::geodesic;
use crate::{MapError, Result};

/// A geodesic circle, drawn as an [`Area`] whose ring is sampled every 0.1°
/// of azimuth around the center.
#[derive(Debug, Clone)]
pub struct Circle {
    center: LatLng,
    radius_km: f64,
    area: Area,
}

impl Circle {
    pub fn new(center: LatLng, radius_km: f64) -> Result<Self> {
        Self::styled(center, radius_km, RED, TRANSPARENT, 0)
    }

    pub fn styled(
        center: LatLng,
        radius_km: f64,
        fill_color: Rgba,
        color: Rgba,
        width: i32,
    ) -> Result<Self> {
        if radius_km.is_nan() || radius_km < 0.0 {
            return Err(MapError::InvalidGeometry(format!(
                "circle radius must be >= 0: {}",
                radius_km
            )));
        }
        let ring = geodesic::circle_ring(&center, radius_km * 1000.0)?;
        Ok(Self {
            center,
            radius_km,
            area: Area::styled(ring, fill_color, color, width)?,
        })
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }
}

impl Overlay for Circle {
    fn kind(&self) -> OverlayKind {
        OverlayKind::Circle
    }

    fn bounds(&self) -> LatLngRect {
        self.area.bounds()
    }

    fn extra_pixel_bounds(&self) -> PixelMargin {
        self.area.extra_pixel_bounds()
    }

    fn densified_vertices(&self) -> Option<&[LatLng]> {
        self.area.densified_vertices()
    }

    fn render(&self, renderer: &mut dyn Renderer, transformer: &Transformer, offset_x: f64) {
        self.area.render(renderer, transformer, offset_x);
    }
}

use crate::core::bounds::PixelMargin;
use crate::core::geo::{LatLng, LatLngRect};
use crate::core::transformer::Transformer;
use crate::layers::base::{to_pixels, Overlay, OverlayKind};
use crate::layers::line::GeodesicPath;
use crate::rendering::pipeline::{Renderer, Rgba, RED, TRANSPARENT};
use crate::{MapError, Result};

/// A filled polygon with an optional outline.
///
/// Edges follow great-circle arcs, exactly like [`Line`](crate::layers::line::Line).
#[derive(Debug, Clone)]
pub struct Area {
    path: GeodesicPath,
    fill_color: Rgba,
    color: Rgba,
    width: u32,
}

impl Area {
    /// A red area without outline.
    pub fn new(vertices: Vec<LatLng>) -> Result<Self> {
        Self::styled(vertices, RED, TRANSPARENT, 0)
    }

    pub fn styled(vertices: Vec<LatLng>, fill_color: Rgba, color: Rgba, width: i32) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(MapError::InvalidGeometry(format!(
                "an area needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        let width = u32::try_from(width).map_err(|_| {
            MapError::InvalidGeometry(format!("outline width must be >= 0: {}", width))
        })?;
        Ok(Self {
            path: GeodesicPath::new(vertices),
            fill_color,
            color,
            width,
        })
    }

    pub fn vertices(&self) -> &[LatLng] {
        self.path.vertices()
    }

    pub fn fill_color(&self) -> Rgba {
        self.fill_color
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

impl Overlay for Area {
    fn kind(&self) -> OverlayKind {
        OverlayKind::Area
    }

    fn bounds(&self) -> LatLngRect {
        self.path.bounds()
    }

    fn extra_pixel_bounds(&self) -> PixelMargin {
        PixelMargin::uniform(self.width)
    }

    fn densified_vertices(&self) -> Option<&[LatLng]> {
        Some(self.path.densified())
    }

    fn render(&self, renderer: &mut dyn Renderer, transformer: &Transformer, offset_x: f64) {
        let points = to_pixels(self.path.densified(), transformer, offset_x);
        renderer.draw_polygon(&points, self.fill_color);
        if self.width > 0 {
            renderer.draw_polyline(&points, self.color, self.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::parse_lat_lngs;
    use crate::rendering::recording::{DrawCall, RecordingRenderer};

    #[test]
    fn test_area_needs_three_vertices() {
        let two = parse_lat_lngs("48,8 47,7").unwrap();
        assert!(matches!(Area::new(two), Err(MapError::InvalidGeometry(_))));

        let three = parse_lat_lngs("48,8 47,7 47,8").unwrap();
        assert!(Area::styled(three.clone(), RED, RED, -2).is_err());
        assert_eq!(Area::new(three).unwrap().vertices().len(), 3);
    }

    #[test]
    fn test_area_render_outline_only_when_wide() {
        let ring = parse_lat_lngs("48,8 47.5,7.5 47.5,8 48,8").unwrap();
        let t = Transformer::new(400, 400, 7, LatLng::new(47.5, 7.5).unwrap(), 256);

        let plain = Area::new(ring.clone()).unwrap();
        let mut r = RecordingRenderer::default();
        plain.render(&mut r, &t, 0.0);
        assert_eq!(r.calls.len(), 1);
        assert!(matches!(&r.calls[0], DrawCall::Polygon(points, fill) if points.len() == 4 && *fill == RED));

        let outlined = Area::styled(ring, TRANSPARENT, RED, 3).unwrap();
        assert_eq!(outlined.extra_pixel_bounds(), PixelMargin::uniform(3));
        let mut r = RecordingRenderer::default();
        outlined.render(&mut r, &t, 0.0);
        assert_eq!(r.calls.len(), 2);
        assert!(matches!(&r.calls[1], DrawCall::Polyline(_, color, 3) if *color == RED));
    }

    #[test]
    fn test_area_bounds() {
        let area = Area::new(parse_lat_lngs("48,8 47,7 47,8").unwrap()).unwrap();
        let b = area.bounds();
        assert!((b.lat_lo() - 47.0).abs() < 1e-9);
        assert!((b.lat_hi() - 48.0).abs() < 1e-9);
        assert!((b.lng_lo() - 7.0).abs() < 1e-9);
        assert!((b.lng_hi() - 8.0).abs() < 1e-9);
    }
}

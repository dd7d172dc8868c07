use crate::core::bounds::PixelMargin;
use crate::core::constants::DENSIFY_THRESHOLD;
use crate::core::geo::{LatLng, LatLngRect};
use crate::core::transformer::Transformer;
use crate::layers::base::{to_pixels, Overlay, OverlayKind};
use crate::rendering::pipeline::{Renderer, Rgba, RED};
use crate::spatial::geodesic;
use crate::{MapError, Result};
use once_cell::sync::OnceCell;

/// Vertices of a path-like shape together with their lazily computed
/// geodesic densification.
#[derive(Debug, Clone)]
pub(crate) struct GeodesicPath {
    vertices: Vec<LatLng>,
    densified: OnceCell<Vec<LatLng>>,
}

impl GeodesicPath {
    pub(crate) fn new(vertices: Vec<LatLng>) -> Self {
        Self {
            vertices,
            densified: OnceCell::new(),
        }
    }

    pub(crate) fn vertices(&self) -> &[LatLng] {
        &self.vertices
    }

    pub(crate) fn densified(&self) -> &[LatLng] {
        self.densified.get_or_init(|| {
            geodesic::densify(&self.vertices, DENSIFY_THRESHOLD).unwrap_or_else(|e| {
                log::warn!("geodesic densification failed, drawing straight segments: {}", e);
                self.vertices.clone()
            })
        })
    }

    /// Union of the point rectangles of every densified vertex
    pub(crate) fn bounds(&self) -> LatLngRect {
        let mut points = self.densified().iter();
        let Some(first) = points.next() else {
            return LatLngRect::from_point(LatLng::default());
        };
        points.fold(LatLngRect::from_point(*first), |acc, p| {
            acc.union(&LatLngRect::from_point(*p))
        })
    }
}

/// A polyline following great-circle arcs between its vertices.
#[derive(Debug, Clone)]
pub struct Line {
    path: GeodesicPath,
    color: Rgba,
    width: u32,
}

impl Line {
    /// A red line two pixels wide.
    pub fn new(vertices: Vec<LatLng>) -> Result<Self> {
        Self::styled(vertices, RED, 2)
    }

    pub fn styled(vertices: Vec<LatLng>, color: Rgba, width: i32) -> Result<Self> {
        if vertices.len() < 2 {
            return Err(MapError::InvalidGeometry(format!(
                "a line needs at least 2 vertices, got {}",
                vertices.len()
            )));
        }
        let width = u32::try_from(width)
            .map_err(|_| MapError::InvalidGeometry(format!("line width must be >= 0: {}", width)))?;
        Ok(Self {
            path: GeodesicPath::new(vertices),
            color,
            width,
        })
    }

    pub fn vertices(&self) -> &[LatLng] {
        self.path.vertices()
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

impl Overlay for Line {
    fn kind(&self) -> OverlayKind {
        OverlayKind::Line
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
        if self.width == 0 {
            return;
        }
        let points = to_pixels(self.path.densified(), transformer, offset_x);
        renderer.draw_polyline(&points, self.color, self.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::parse_lat_lngs;
    use crate::rendering::recording::{DrawCall, RecordingRenderer};

    #[test]
    fn test_line_validation() {
        let one = parse_lat_lngs("48,8").unwrap();
        assert!(matches!(Line::new(one), Err(MapError::InvalidGeometry(_))));

        let two = parse_lat_lngs("48,8 47,7").unwrap();
        assert!(matches!(
            Line::styled(two.clone(), RED, -1),
            Err(MapError::InvalidGeometry(_))
        ));
        let line = Line::styled(two, RED, 0).unwrap();
        assert_eq!(line.width(), 0);
        assert_eq!(line.extra_pixel_bounds(), PixelMargin::ZERO);
    }

    #[test]
    fn test_short_line_bounds() {
        let line = Line::new(parse_lat_lngs("48,8 47,7.5").unwrap()).unwrap();
        let b = line.bounds();
        assert!((b.lat_lo() - 47.0).abs() < 1e-9);
        assert!((b.lat_hi() - 48.0).abs() < 1e-9);
        assert!((b.lng_lo() - 7.5).abs() < 1e-9);
        assert!((b.lng_hi() - 8.0).abs() < 1e-9);
        assert_eq!(line.extra_pixel_bounds(), PixelMargin::uniform(2));
        assert_eq!(line.kind(), OverlayKind::Line);
    }

    #[test]
    fn test_densified_vertices_are_cached() {
        let line = Line::new(parse_lat_lngs("50.11,8.68 40.71,-74.01").unwrap()).unwrap();
        let a = line.densified_vertices().unwrap();
        let b = line.densified_vertices().unwrap();
        assert!(std::ptr::eq(a, b));
        assert!(a.len() > line.vertices().len());

        // the great circle bulges north of both endpoints
        assert!(line.bounds().lat_hi() > 51.5);
    }

    #[test]
    fn test_render_applies_offset() {
        let line = Line::new(parse_lat_lngs("48,8 47,7").unwrap()).unwrap();
        let t = Transformer::new(800, 500, 8, LatLng::new(47.5, 7.5).unwrap(), 256);
        let mut r = RecordingRenderer::default();
        line.render(&mut r, &t, 100.0);

        let DrawCall::Polyline(points, color, width) = &r.calls[0] else {
            panic!("expected a polyline, got {:?}", r.calls);
        };
        assert_eq!(*color, RED);
        assert_eq!(*width, 2);
        let expected = t.ll2pixel(&LatLng::new(48.0, 8.0).unwrap());
        assert!((points[0].x - (expected.x + 100.0)).abs() < 1e-9);
        assert!((points[0].y - expected.y).abs() < 1e-9);

        let invisible = Line::styled(parse_lat_lngs("48,8 47,7").unwrap(), RED, 0).unwrap();
        let mut r = RecordingRenderer::default();
        invisible.render(&mut r, &t, 0.0);
        assert!(r.calls.is_empty());
    }
}

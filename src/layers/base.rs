use crate::core::bounds::{Bounds, PixelMargin};
use crate::core::geo::{LatLng, LatLngRect, Point};
use crate::core::transformer::Transformer;
use crate::rendering::pipeline::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Marker,
    ImageMarker,
    Line,
    Area,
    Circle,
    Custom,
}

impl std::fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlayKind::Marker => write!(f, "marker"),
            OverlayKind::ImageMarker => write!(f, "image-marker"),
            OverlayKind::Line => write!(f, "line"),
            OverlayKind::Area => write!(f, "area"),
            OverlayKind::Circle => write!(f, "circle"),
            OverlayKind::Custom => write!(f, "custom"),
        }
    }
}

/// A shape drawn on top of the tiles.
///
/// Overlays are immutable once built. The viewport is fitted around their
/// [`bounds`](Overlay::bounds) grown by their
/// [`extra_pixel_bounds`](Overlay::extra_pixel_bounds).
pub trait Overlay: Send + Sync + std::fmt::Debug {
    fn kind(&self) -> OverlayKind {
        OverlayKind::Custom
    }

    /// Geographic extent of the shape
    fn bounds(&self) -> LatLngRect;

    /// Pixel footprint beyond the geographic extent, e.g. a marker pin
    fn extra_pixel_bounds(&self) -> PixelMargin {
        PixelMargin::ZERO
    }

    /// Image-space rectangle covered by the shape under `transformer`.
    ///
    /// Rectangles crossing the antimeridian have their east edge moved one
    /// world width to the right so the result is never inverted. The result
    /// lies in the world copy whose center is nearest the image center.
    fn pixel_rect(&self, transformer: &Transformer) -> Bounds {
        let bounds = self.bounds();
        let world_width = transformer.world_width();
        let mut nw = transformer.ll2pixel(&bounds.north_west());
        let mut se = transformer.ll2pixel(&bounds.south_east());
        if bounds.is_inverted() {
            se.x += world_width;
        }
        let mid = (nw.x + se.x) / 2.0;
        let copy = ((transformer.image_width() as f64 / 2.0 - mid) / world_width).round();
        nw.x += copy * world_width;
        se.x += copy * world_width;
        Bounds::new(nw, se).expanded_by(&self.extra_pixel_bounds())
    }

    /// Vertices following great-circle arcs, for path-like shapes only
    fn densified_vertices(&self) -> Option<&[LatLng]> {
        None
    }

    /// Draws the shape shifted horizontally by `offset_x` pixels.
    fn render(&self, renderer: &mut dyn Renderer, transformer: &Transformer, offset_x: f64);
}

/// Projects geographic vertices into image space, shifted by `offset_x`.
pub(crate) fn to_pixels(vertices: &[LatLng], transformer: &Transformer, offset_x: f64) -> Vec<Point> {
    vertices
        .iter()
        .map(|p| {
            let px = transformer.ll2pixel(p);
            Point::new(px.x + offset_x, px.y)
        })
        .collect()
}

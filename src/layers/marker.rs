use crate::core::bounds::PixelMargin;
use crate::core::geo::{LatLng, LatLngRect, Point};
use crate::core::transformer::Transformer;
use crate::layers::base::{Overlay, OverlayKind};
use crate::rendering::pipeline::{Renderer, Rgba, RED};

/// A map pin whose tip sits on `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    position: LatLng,
    color: Rgba,
    size: u32,
}

impl Marker {
    pub fn new(position: LatLng) -> Self {
        Self {
            position,
            color: RED,
            size: 10,
        }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

impl Overlay for Marker {
    fn kind(&self) -> OverlayKind {
        OverlayKind::Marker
    }

    fn bounds(&self) -> LatLngRect {
        LatLngRect::from_point(self.position)
    }

    // the pin head extends sideways and upward, never below the tip
    fn extra_pixel_bounds(&self) -> PixelMargin {
        PixelMargin::new(self.size, self.size, self.size, 0)
    }

    fn render(&self, renderer: &mut dyn Renderer, transformer: &Transformer, offset_x: f64) {
        let tip = transformer.ll2pixel(&self.position);
        renderer.draw_marker(Point::new(tip.x + offset_x, tip.y), self.color, self.size);
    }
}

/// A caller-supplied image anchored at `position`.
///
/// `origin_x`/`origin_y` locate the anchor inside the image, in pixels from
/// its top-left corner. The bytes are handed to the renderer untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMarker {
    position: LatLng,
    image: Vec<u8>,
    width: u32,
    height: u32,
    origin_x: i32,
    origin_y: i32,
}

impl ImageMarker {
    pub fn new(
        position: LatLng,
        image: Vec<u8>,
        width: u32,
        height: u32,
        origin_x: i32,
        origin_y: i32,
    ) -> Self {
        Self {
            position,
            image,
            width,
            height,
            origin_x,
            origin_y,
        }
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn origin(&self) -> (i32, i32) {
        (self.origin_x, self.origin_y)
    }
}

impl Overlay for ImageMarker {
    fn kind(&self) -> OverlayKind {
        OverlayKind::ImageMarker
    }

    fn bounds(&self) -> LatLngRect {
        LatLngRect::from_point(self.position)
    }

    fn extra_pixel_bounds(&self) -> PixelMargin {
        let clamp = |v: i64| v.clamp(0, u32::MAX as i64) as u32;
        let (ox, oy) = (self.origin_x as i64, self.origin_y as i64);
        PixelMargin::new(
            clamp(ox),
            clamp(oy),
            clamp(self.width as i64 - ox),
            clamp(self.height as i64 - oy),
        )
    }

    fn render(&self, renderer: &mut dyn Renderer, transformer: &Transformer, offset_x: f64) {
        let anchor = transformer.ll2pixel(&self.position);
        let top_left = Point::new(
            anchor.x - self.origin_x as f64 + offset_x,
            anchor.y - self.origin_y as f64,
        );
        renderer.draw_image(top_left, self.width, self.height, &self.image);
    }
}

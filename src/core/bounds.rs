use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Represents a bounding box in screen/pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Creates new bounds from two points
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Gets the width of the bounds
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Gets the height of the bounds
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Whether the bounds would fit inside a `width` x `height` image.
    pub fn fits_within(&self, width: f64, height: f64) -> bool {
        self.width() <= width && self.height() <= height
    }

    /// Grows the bounds outward by a pixel margin
    pub fn expanded_by(&self, margin: &PixelMargin) -> Bounds {
        Bounds::from_coords(
            self.min.x - margin.left as f64,
            self.min.y - margin.top as f64,
            self.max.x + margin.right as f64,
            self.max.y + margin.bottom as f64,
        )
    }

    /// Returns a new bounds that extends this bounds with another bounds
    pub fn extend_with(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        )
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(Point::new(0.0, 0.0), Point::new(0.0, 0.0))
    }
}

/// Extra pixel footprint around an object's geographic bounds, e.g. the pin
/// of a marker that extends above its anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelMargin {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PixelMargin {
    pub const ZERO: PixelMargin = PixelMargin::new(0, 0, 0, 0);

    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same margin on all four sides
    pub const fn uniform(value: u32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Component-wise maximum
    pub fn max(&self, other: &PixelMargin) -> PixelMargin {
        PixelMargin::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Left plus right, saturating at `u32::MAX`
    pub fn horizontal(&self) -> u32 {
        self.left.saturating_add(self.right)
    }

    /// Top plus bottom, saturating at `u32::MAX`
    pub fn vertical(&self) -> u32 {
        self.top.saturating_add(self.bottom)
    }
}

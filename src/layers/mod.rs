pub mod area;
pub mod base;
pub mod circle;
pub mod line;
pub mod manager;
pub mod marker;

pub use area::Area;
pub use base::{Overlay, OverlayKind};
pub use circle::Circle;
pub use line::Line;
pub use manager::{aggregate_bounds, aggregate_margin, OverlaySet};
pub use marker::{ImageMarker, Marker};

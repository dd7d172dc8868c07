//! # mapframe
//!
//! Viewport fitting and projection for static maps.
//!
//! Given a set of overlays (markers, lines, areas, circles) and an image
//! size, the crate picks the center and zoom that show all of them, places
//! the web-Mercator tiles that cover the image, and hands pixel-space
//! geometry to a pluggable [`Renderer`](rendering::Renderer). Lines follow
//! great-circle arcs on the WGS84 ellipsoid.

pub mod core;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod spatial;
pub mod tiles;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::{Bounds, PixelMargin},
    builder::MapBuilder,
    config::{TileProvider, TileProviderProfile},
    geo::{LatLng, LatLngRect, Point, TileCoord},
    map::StaticMap,
    transformer::Transformer,
    viewport::{Viewport, ViewportResolver},
};

pub use layers::{Area, Circle, ImageMarker, Line, Marker, Overlay};

pub use rendering::{RenderPipeline, Renderer};

pub use tiles::{CachedTileSource, TileSource};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid zoom {0}: must be within [0, 30]")]
    InvalidZoom(i64),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Cannot render map without objects or center")]
    Underconstrained,

    #[error("Tile error: {0}")]
    Tile(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Installs `env_logger` as the `log` backend. Calling it more than once is
/// harmless.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(cfg!(test)).try_init();
}

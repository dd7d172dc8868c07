//! Prelude module for common mapframe types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapframe::prelude::*;`

pub use crate::core::{
    bounds::{Bounds, PixelMargin},
    builder::MapBuilder,
    config::{TileProvider, TileProviderProfile},
    geo::{parse_lat_lngs, LatLng, LatLngRect, Point, TileCoord},
    map::StaticMap,
    transformer::{TilePlacement, Transformer},
    viewport::{resolve, Viewport, ViewportResolver},
};

pub use crate::layers::{
    aggregate_bounds, aggregate_margin, Area, Circle, ImageMarker, Line, Marker, Overlay,
    OverlayKind, OverlaySet,
};

pub use crate::rendering::pipeline::{RenderPipeline, Renderer, Rgba, RED, TRANSPARENT};

pub use crate::spatial::geodesic::densify;

pub use crate::tiles::{CachedTileSource, EmptyTileSource, ProviderTileSource, TileCache, TileSource};

pub use crate::{MapError, Result};

//! Fluent construction of [`StaticMap`] instances.

use crate::{
    core::{
        config::TileProviderProfile,
        geo::{LatLng, LatLngRect},
        map::StaticMap,
    },
    layers::base::Overlay,
    rendering::pipeline::Rgba,
    Result,
};

/// Builder for creating and configuring [`StaticMap`] instances
#[derive(Debug, Default)]
pub struct MapBuilder {
    center: Option<LatLng>,
    zoom: Option<i64>,
    bounds: Option<LatLngRect>,
    background_color: Option<Rgba>,
    tile_provider: TileProviderProfile,
    overlays: Vec<Box<dyn Overlay>>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_center(mut self, center: LatLng) -> Self {
        self.center = Some(center);
        self
    }

    /// Fixed zoom; validated when the map is built
    pub fn with_zoom(mut self, zoom: i64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn with_bounds(mut self, bounds: LatLngRect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_background_color(mut self, color: Rgba) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn with_tile_provider(mut self, profile: TileProviderProfile) -> Self {
        self.tile_provider = profile;
        self
    }

    pub fn with_overlay<O: Overlay + 'static>(mut self, overlay: O) -> Self {
        self.overlays.push(Box::new(overlay));
        self
    }

    pub fn build(self) -> Result<StaticMap> {
        let mut map = StaticMap::new();
        map.set_tile_provider(self.tile_provider);
        map.set_center(self.center);
        if let Some(zoom) = self.zoom {
            map.set_zoom(zoom)?;
        }
        map.set_bounds(self.bounds);
        map.set_background_color(self.background_color);
        for overlay in self.overlays {
            map.add_boxed(overlay);
        }
        Ok(map)
    }
}

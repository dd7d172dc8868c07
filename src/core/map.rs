use crate::{
    core::{
        bounds::PixelMargin,
        config::{TileProvider, TileProviderProfile},
        geo::{LatLng, LatLngRect},
        viewport::{validate_zoom, Viewport, ViewportResolver},
    },
    layers::{base::Overlay, manager::OverlaySet},
    rendering::pipeline::{RenderPipeline, Renderer, Rgba},
    tiles::source::TileSource,
    Result,
};

/// A static map: overlays plus everything needed to fit and render them.
///
/// Center, zoom and bounds are optional; whatever is missing is derived
/// from the overlays when the map is rendered.
#[derive(Debug, Default)]
pub struct StaticMap {
    overlays: OverlaySet,
    center: Option<LatLng>,
    zoom: Option<u8>,
    bounds: Option<LatLngRect>,
    background_color: Option<Rgba>,
    tile_provider: TileProvider,
}

impl StaticMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object<O: Overlay + 'static>(&mut self, overlay: O) {
        self.overlays.add(Box::new(overlay));
    }

    pub fn add_boxed(&mut self, overlay: Box<dyn Overlay>) {
        self.overlays.add(overlay);
    }

    pub fn clear_objects(&mut self) {
        self.overlays.clear();
    }

    pub fn objects(&self) -> &[Box<dyn Overlay>] {
        self.overlays.as_slice()
    }

    pub fn set_center(&mut self, center: Option<LatLng>) {
        self.center = center;
    }

    /// Sets a fixed zoom; it must lie in `[0, 30]` and is clamped to the
    /// provider's range when rendering.
    pub fn set_zoom(&mut self, zoom: i64) -> Result<()> {
        self.zoom = Some(validate_zoom(zoom)?);
        Ok(())
    }

    pub fn clear_zoom(&mut self) {
        self.zoom = None;
    }

    /// Extra area that must stay visible, e.g. a region of interest without
    /// any overlay in it
    pub fn set_bounds(&mut self, bounds: Option<LatLngRect>) {
        self.bounds = bounds;
    }

    pub fn set_background_color(&mut self, color: Option<Rgba>) {
        self.background_color = color;
    }

    pub fn set_tile_provider(&mut self, profile: TileProviderProfile) {
        self.tile_provider = profile.resolve();
    }

    pub fn center(&self) -> Option<LatLng> {
        self.center
    }

    pub fn zoom(&self) -> Option<u8> {
        self.zoom
    }

    pub fn tile_provider(&self) -> &TileProvider {
        &self.tile_provider
    }

    pub fn resolver(&self) -> ViewportResolver {
        ViewportResolver::for_provider(&self.tile_provider).with_bounds(self.bounds)
    }

    /// Union of all overlay bounds and the custom bounds
    pub fn object_bounds(&self) -> Option<LatLngRect> {
        self.resolver().object_bounds(self.overlays.as_slice())
    }

    pub fn extra_pixel_bounds(&self) -> PixelMargin {
        self.resolver().extra_pixel_bounds(self.overlays.as_slice())
    }

    pub fn determine_center_zoom(&self, width: u32, height: u32) -> Result<Viewport> {
        self.resolver()
            .resolve(self.overlays.as_slice(), width, height, self.center, self.zoom)
    }

    /// Fits the viewport and draws background, tiles, overlays and
    /// attribution into `renderer`. Returns the viewport used.
    pub fn render(
        &self,
        width: u32,
        height: u32,
        source: &dyn TileSource,
        renderer: &mut dyn Renderer,
    ) -> Result<Viewport> {
        let viewport = self.determine_center_zoom(width, height)?;
        let transformer = viewport.transformer(width, height, self.tile_provider.tile_size());
        RenderPipeline::new(&transformer).run(
            renderer,
            source,
            self.overlays.as_slice(),
            self.background_color,
            self.tile_provider.attribution(),
        );
        Ok(viewport)
    }
}

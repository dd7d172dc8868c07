use crate::core::geo::Point;
use crate::core::transformer::{TilePlacement, Transformer};
use crate::layers::base::Overlay;
use crate::tiles::source::TileSource;
use instant::Instant;

/// Straight RGBA bytes. Parsing color strings is left to the host.
pub type Rgba = [u8; 4];

pub const RED: Rgba = [255, 0, 0, 255];
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Drawing backend contract.
///
/// Everything arrives already in image pixel space; a backend never sees
/// geographic coordinates.
pub trait Renderer {
    fn draw_background(&mut self, _color: Rgba) {}

    /// Encoded tile bytes exactly as returned by the tile source.
    fn draw_tile(&mut self, placement: &TilePlacement, data: &[u8]);

    fn draw_polyline(&mut self, points: &[Point], color: Rgba, width: u32);

    fn draw_polygon(&mut self, points: &[Point], fill: Rgba);

    /// A map pin whose tip sits on `anchor`.
    fn draw_marker(&mut self, anchor: Point, color: Rgba, size: u32);

    fn draw_image(&mut self, top_left: Point, width: u32, height: u32, data: &[u8]);

    fn draw_attribution(&mut self, _text: &str) {}
}

/// Drives one render pass: background, tiles, overlays, attribution.
pub struct RenderPipeline<'a> {
    transformer: &'a Transformer,
}

impl<'a> RenderPipeline<'a> {
    pub fn new(transformer: &'a Transformer) -> Self {
        Self { transformer }
    }

    pub fn render_background(&self, renderer: &mut dyn Renderer, color: Option<Rgba>) {
        if let Some(color) = color {
            renderer.draw_background(color);
        }
    }

    /// Fetches and draws every visible tile, sequentially. Missing tiles are
    /// skipped.
    pub fn render_tiles(&self, renderer: &mut dyn Renderer, source: &dyn TileSource) -> usize {
        let mut drawn = 0;
        for placement in self.transformer.visible_tiles() {
            let coord = placement.coord;
            match source.fetch(coord.z, coord.x, coord.y) {
                Some(data) => {
                    renderer.draw_tile(&placement, &data);
                    drawn += 1;
                }
                None => log::debug!("no tile for {:?}", coord),
            }
        }
        drawn
    }

    /// Draws every overlay once per world copy that can intersect the image.
    pub fn render_overlays(&self, renderer: &mut dyn Renderer, overlays: &[Box<dyn Overlay>]) {
        let offsets = self.transformer.world_offsets();
        for overlay in overlays {
            for offset_x in &offsets {
                overlay.render(renderer, self.transformer, *offset_x);
            }
        }
    }

    pub fn render_attribution(&self, renderer: &mut dyn Renderer, attribution: Option<&str>) {
        match attribution {
            Some(text) if !text.is_empty() => renderer.draw_attribution(text),
            _ => {}
        }
    }

    pub fn run(
        &self,
        renderer: &mut dyn Renderer,
        source: &dyn TileSource,
        overlays: &[Box<dyn Overlay>],
        background: Option<Rgba>,
        attribution: Option<&str>,
    ) {
        let started = Instant::now();
        self.render_background(renderer, background);
        let tiles = self.render_tiles(renderer, source);
        self.render_overlays(renderer, overlays);
        self.render_attribution(renderer, attribution);
        log::debug!(
            "rendered {} tiles and {} overlays at zoom {} in {:?}",
            tiles,
            overlays.len(),
            self.transformer.zoom(),
            started.elapsed()
        );
    }
}

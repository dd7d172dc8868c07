//! Renderer that records draw calls, for unit tests.

use super::pipeline::{Renderer, Rgba};
use crate::core::geo::Point;
use crate::core::transformer::TilePlacement;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Background(Rgba),
    Tile(TilePlacement, usize),
    Polyline(Vec<Point>, Rgba, u32),
    Polygon(Vec<Point>, Rgba),
    Marker(Point, Rgba, u32),
    Image(Point, u32, u32),
    Attribution(String),
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
}

impl Renderer for RecordingRenderer {
    fn draw_background(&mut self, color: Rgba) {
        self.calls.push(DrawCall::Background(color));
    }

    fn draw_tile(&mut self, placement: &TilePlacement, data: &[u8]) {
        self.calls.push(DrawCall::Tile(*placement, data.len()));
    }

    fn draw_polyline(&mut self, points: &[Point], color: Rgba, width: u32) {
        self.calls.push(DrawCall::Polyline(points.to_vec(), color, width));
    }

    fn draw_polygon(&mut self, points: &[Point], fill: Rgba) {
        self.calls.push(DrawCall::Polygon(points.to_vec(), fill));
    }

    fn draw_marker(&mut self, anchor: Point, color: Rgba, size: u32) {
        self.calls.push(DrawCall::Marker(anchor, color, size));
    }

    fn draw_image(&mut self, top_left: Point, width: u32, height: u32, _data: &[u8]) {
        self.calls.push(DrawCall::Image(top_left, width, height));
    }

    fn draw_attribution(&mut self, text: &str) {
        self.calls.push(DrawCall::Attribution(text.to_string()));
    }
}

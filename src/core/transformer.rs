//! Pixel <-> geographic conversion for a single render pass.
//!
//! A [`Transformer`] is derived once from `(width, height, zoom, center,
//! tile_size)` and is the only authority for placing tiles and overlay
//! geometry in image space.

use crate::core::constants::MAX_API_ZOOM;
use crate::core::geo::{LatLng, Point, TileCoord};
use crate::core::projection;

/// A visible tile together with the pixel position of its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub coord: TileCoord,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transformer {
    width: u32,
    height: u32,
    zoom: u8,
    number_of_tiles: i64,
    tile_size: u32,
    /// Fractional tile index of the image center
    tile_center_x: f64,
    tile_center_y: f64,
    /// Top-left tile of the covered area (unwrapped)
    first_tile_x: i64,
    first_tile_y: i64,
    /// Inclusive count of tiles touching the image
    tiles_x: i64,
    tiles_y: i64,
    /// Pixel position of the top-left tile's origin
    tile_offset_x: f64,
    tile_offset_y: f64,
}

impl Transformer {
    /// Zooms above the API limit are clamped to it.
    pub fn new(width: u32, height: u32, zoom: u8, center: LatLng, tile_size: u32) -> Self {
        let zoom = zoom.min(MAX_API_ZOOM as u8);
        let number_of_tiles = 1_i64 << zoom;
        let (cx, cy) = projection::forward(&center.clamped_to_mercator());
        let tile_center_x = number_of_tiles as f64 * cx;
        let tile_center_y = number_of_tiles as f64 * cy;

        let ts = tile_size as f64;
        let half_w = width as f64 / (2.0 * ts);
        let half_h = height as f64 / (2.0 * ts);

        let first_tile_x = (tile_center_x - half_w).floor() as i64;
        let first_tile_y = (tile_center_y - half_h).floor() as i64;
        let tiles_x = 1 + (tile_center_x + half_w).floor() as i64 - first_tile_x;
        let tiles_y = 1 + (tile_center_y + half_h).floor() as i64 - first_tile_y;

        let tile_offset_x =
            width as f64 / 2.0 - ((tile_center_x - first_tile_x as f64) * ts).floor();
        let tile_offset_y =
            height as f64 / 2.0 - ((tile_center_y - first_tile_y as f64) * ts).floor();

        log::trace!(
            "transformer z={} center_tile=({:.3}, {:.3}) first=({}, {}) tiles={}x{}",
            zoom,
            tile_center_x,
            tile_center_y,
            first_tile_x,
            first_tile_y,
            tiles_x,
            tiles_y
        );

        Self {
            width,
            height,
            zoom,
            number_of_tiles,
            tile_size,
            tile_center_x,
            tile_center_y,
            first_tile_x,
            first_tile_y,
            tiles_x,
            tiles_y,
            tile_offset_x,
            tile_offset_y,
        }
    }

    pub fn image_width(&self) -> u32 {
        self.width
    }

    pub fn image_height(&self) -> u32 {
        self.height
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn number_of_tiles(&self) -> i64 {
        self.number_of_tiles
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn first_tile_x(&self) -> i64 {
        self.first_tile_x
    }

    pub fn first_tile_y(&self) -> i64 {
        self.first_tile_y
    }

    pub fn tiles_x(&self) -> i64 {
        self.tiles_x
    }

    pub fn tiles_y(&self) -> i64 {
        self.tiles_y
    }

    pub fn tile_offset_x(&self) -> f64 {
        self.tile_offset_x
    }

    pub fn tile_offset_y(&self) -> f64 {
        self.tile_offset_y
    }

    /// Pixel width of one full wrap of the world at this zoom
    pub fn world_width(&self) -> f64 {
        self.number_of_tiles as f64 * self.tile_size as f64
    }

    /// Horizontal offsets at which overlays must be repeated so that every
    /// world copy that can intersect the image gets drawn.
    pub fn world_offsets(&self) -> Vec<f64> {
        let world_width = self.world_width();
        let count = (self.width as f64 / (2.0 * world_width)).ceil() as i64;
        (-count..=count).map(|k| k as f64 * world_width).collect()
    }

    /// Geographic coordinate to fractional tile index
    pub fn ll2tile(&self, p: &LatLng) -> (f64, f64) {
        let (x, y) = projection::forward(&p.clamped_to_mercator());
        let n = self.number_of_tiles as f64;
        (n * x, n * y)
    }

    /// Fractional tile index to geographic coordinate
    pub fn tile2ll(&self, x: f64, y: f64) -> LatLng {
        let n = self.number_of_tiles as f64;
        projection::inverse(x / n, y / n)
    }

    pub fn ll2pixel(&self, p: &LatLng) -> Point {
        let (tx, ty) = self.ll2tile(p);
        let ts = self.tile_size as f64;
        Point::new(
            self.width as f64 / 2.0 + (tx - self.tile_center_x) * ts,
            self.height as f64 / 2.0 + (ty - self.tile_center_y) * ts,
        )
    }

    pub fn pixel2ll(&self, x: f64, y: f64) -> LatLng {
        let ts = self.tile_size as f64;
        let tx = (x - self.width as f64 / 2.0) / ts + self.tile_center_x;
        let ty = (y - self.height as f64 / 2.0) / ts + self.tile_center_y;
        self.tile2ll(tx, ty)
    }

    /// Tiles covering the image, row by row.
    ///
    /// Columns wrap around the antimeridian; rows beyond the poles are skipped.
    pub fn visible_tiles(&self) -> impl Iterator<Item = TilePlacement> + '_ {
        let ts = self.tile_size as f64;
        (0..self.tiles_y).flat_map(move |yy| {
            (0..self.tiles_x).filter_map(move |xx| {
                let coord =
                    TileCoord::wrapped(self.zoom, self.first_tile_x + xx, self.first_tile_y + yy)?;
                Some(TilePlacement {
                    coord,
                    x: self.tile_offset_x + xx as f64 * ts,
                    y: self.tile_offset_y + yy as f64 * ts,
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ll(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng).unwrap()
    }

    #[test]
    fn test_center_maps_to_image_center() {
        let t = Transformer::new(800, 500, 10, ll(48.0, 8.0), 256);
        let p = t.ll2pixel(&ll(48.0, 8.0));
        assert!((p.x - 400.0).abs() < 1e-6);
        assert!((p.y - 250.0).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_round_trip() {
        let t = Transformer::new(800, 500, 12, ll(48.0, 8.0), 256);
        for (px, py) in [(0.0, 0.0), (400.0, 250.0), (799.0, 499.0), (123.5, 321.25)] {
            let p = t.pixel2ll(px, py);
            let back = t.ll2pixel(&p);
            assert!((back.x - px).abs() < 1e-6, "x {} -> {}", px, back.x);
            assert!((back.y - py).abs() < 1e-6, "y {} -> {}", py, back.y);
        }
        let q = ll(48.01, 8.02);
        let r = t.pixel2ll(t.ll2pixel(&q).x, t.ll2pixel(&q).y);
        assert!((r.lat() - q.lat()).abs() < 1e-9);
        assert!((r.lng() - q.lng()).abs() < 1e-9);
    }

    #[test]
    fn test_world_zero_tile_window() {
        let t = Transformer::new(256, 256, 0, ll(0.0, 0.0), 256);
        assert_eq!(t.number_of_tiles(), 1);
        assert_eq!(t.first_tile_x(), 0);
        assert_eq!(t.first_tile_y(), 0);
        assert_eq!(t.tiles_x(), 2);
        assert_eq!(t.tiles_y(), 2);
        assert_eq!(t.tile_offset_x(), 0.0);
        assert_eq!(t.tile_offset_y(), 0.0);

        let tiles: Vec<TilePlacement> = t.visible_tiles().collect();
        // row 1 lies beyond the south pole; column 1 wraps back to column 0
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].coord, TileCoord::new(0, 0, 0));
        assert_eq!(tiles[1].coord, TileCoord::new(0, 0, 0));
        assert_eq!(tiles[1].x, 256.0);
    }

    #[test]
    fn test_tile_window_covers_image() {
        let t = Transformer::new(800, 500, 10, ll(48.0, 8.0), 256);
        let ts = t.tile_size() as f64;
        assert!(t.tile_offset_x() <= 0.0);
        assert!(t.tile_offset_y() <= 0.0);
        assert!(t.tile_offset_x() + t.tiles_x() as f64 * ts >= 800.0);
        assert!(t.tile_offset_y() + t.tiles_y() as f64 * ts >= 500.0);

        // the tile under the center pixel starts at or left of it
        let center_tile = t
            .visible_tiles()
            .find(|tp| tp.x <= 400.0 && tp.x + ts > 400.0 && tp.y <= 250.0 && tp.y + ts > 250.0)
            .unwrap();
        let (tx, ty) = t.ll2tile(&ll(48.0, 8.0));
        assert_eq!(center_tile.coord.x as i64, tx.floor() as i64);
        assert_eq!(center_tile.coord.y as i64, ty.floor() as i64);
    }

    #[test]
    fn test_antimeridian_tiles_wrap() {
        let t = Transformer::new(800, 256, 3, ll(0.0, 180.0), 256);
        let xs: Vec<u32> = t.visible_tiles().map(|tp| tp.coord.x).collect();
        assert!(xs.contains(&7));
        assert!(xs.contains(&0));
        assert!(xs.iter().all(|x| *x < 8));
    }

    #[test]
    fn test_world_offsets() {
        let t = Transformer::new(800, 500, 0, ll(0.0, 0.0), 256);
        assert_eq!(t.world_width(), 256.0);
        assert_eq!(t.world_offsets(), vec![-512.0, -256.0, 0.0, 256.0, 512.0]);

        let deep = Transformer::new(800, 500, 10, ll(0.0, 0.0), 256);
        assert_eq!(deep.world_offsets(), vec![-262144.0, 0.0, 262144.0]);
    }

    #[test]
    fn test_zoom_beyond_api_limit_is_clamped() {
        let t = Transformer::new(800, 500, 70, ll(48.0, 8.0), 256);
        assert_eq!(t.zoom(), 30);
        assert_eq!(t.number_of_tiles(), 1 << 30);
        assert!(t.visible_tiles().all(|tp| tp.coord.z == 30));
        assert_eq!(TileCoord::wrapped(64, 0, 0), None);
    }
}

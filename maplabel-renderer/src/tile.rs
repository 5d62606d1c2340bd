use serde::{Deserialize, Serialize};

use crate::viewport::{project, ScreenPoint, Viewport, TILE_SIZE};

/// Deepest zoom level whose tile indices fit in a `u32`.
pub const MAX_TILE_ZOOM: u8 = 30;

/// A slippy-map raster tile source.
///
/// Zoom levels above `max_native_zoom` (up to `max_zoom`) reuse the tiles of
/// `max_native_zoom`, drawn scaled up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayer {
    /// URL with `{s}`, `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    pub subdomains: String,
    pub min_zoom: u8,
    /// Highest zoom the user may reach.
    pub max_zoom: u8,
    /// Highest zoom the tile server actually provides.
    pub max_native_zoom: u8,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            subdomains: "abc".to_string(),
            min_zoom: 0,
            max_zoom: 20,
            max_native_zoom: 19,
            attribution: "© OpenStreetMap contributors".to_string(),
        }
    }
}

/// One tile to draw for the current viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRef {
    pub url: String,
    pub x: u32,
    pub y: u32,
    pub z: u8,
    /// Canvas position of the tile's top-left corner.
    pub origin: ScreenPoint,
    /// Edge length on the canvas, in pixels.
    pub size: f64,
}

impl TileLayer {
    pub fn new(url_template: &str, max_zoom: u8, max_native_zoom: u8) -> Self {
        Self {
            url_template: url_template.to_string(),
            max_zoom,
            max_native_zoom,
            ..Self::default()
        }
        .normalized()
    }

    pub fn with_attribution(mut self, attribution: &str) -> Self {
        self.attribution = attribution.to_string();
        self
    }

    pub fn tile_url(&self, x: u32, y: u32, z: u8) -> String {
        let sub = if self.subdomains.is_empty() {
            String::new()
        } else {
            let chars: Vec<char> = self.subdomains.chars().collect();
            chars[(x as usize + y as usize) % chars.len()].to_string()
        };
        self.url_template
            .replace("{s}", &sub)
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }

    /// The same layer with its zoom levels ordered
    /// `min_zoom <= max_native_zoom <= max_zoom <= MAX_TILE_ZOOM`.
    pub fn normalized(mut self) -> Self {
        let (min, native, max) = self.zoom_levels();
        self.min_zoom = min;
        self.max_native_zoom = native;
        self.max_zoom = max;
        self
    }

    fn zoom_levels(&self) -> (u8, u8, u8) {
        let max = self.max_zoom.min(MAX_TILE_ZOOM);
        let min = self.min_zoom.min(max);
        let native = self.max_native_zoom.clamp(min, max);
        (min, native, max)
    }

    /// Zoom level of the tiles fetched for a viewport at `zoom`.
    pub fn tile_zoom(&self, zoom: f64) -> u8 {
        let (min, native, max) = self.zoom_levels();
        let z = zoom.round().clamp(min as f64, max as f64) as u8;
        z.min(native)
    }

    /// Tiles covering the viewport, in row-major order.
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<TileRef> {
        let z = self.tile_zoom(viewport.zoom);
        let size = TILE_SIZE * (viewport.zoom - z as f64).exp2();
        if !size.is_finite() || size <= 0.0 {
            return Vec::new();
        }

        let center = project(&viewport.center, viewport.zoom);
        let left = center.x - viewport.canvas_width / 2.0;
        let top = center.y - viewport.canvas_height / 2.0;
        let max_index = (1u64 << z) as f64 - 1.0;

        let x0 = (left / size).floor().clamp(0.0, max_index) as u32;
        let x1 = ((left + viewport.canvas_width) / size).floor().clamp(0.0, max_index) as u32;
        let y0 = (top / size).floor().clamp(0.0, max_index) as u32;
        let y1 = ((top + viewport.canvas_height) / size).floor().clamp(0.0, max_index) as u32;

        let mut tiles = Vec::with_capacity(((x1 - x0 + 1) * (y1 - y0 + 1)) as usize);
        for y in y0..=y1 {
            for x in x0..=x1 {
                tiles.push(TileRef {
                    url: self.tile_url(x, y, z),
                    x,
                    y,
                    z,
                    origin: ScreenPoint::new(x as f64 * size - left, y as f64 * size - top),
                    size,
                });
            }
        }
        tiles
    }
}

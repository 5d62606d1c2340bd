use std::f64::consts::PI;

use maplabel_core::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};

/// Edge length of a base map tile in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Web Mercator latitude limit.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// A position on the canvas, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Project a coordinate to world pixels at `zoom` (Web Mercator, 256px tiles).
pub fn project(latlng: &LatLng, zoom: f64) -> ScreenPoint {
    let scale = TILE_SIZE * zoom.exp2();
    let lat = latlng.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let sin = (lat * PI / 180.0).sin();
    let x = (latlng.lng + 180.0) / 360.0 * scale;
    let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * scale;
    ScreenPoint::new(x, y)
}

/// Inverse of [`project`].
pub fn unproject(point: &ScreenPoint, zoom: f64) -> LatLng {
    let scale = TILE_SIZE * zoom.exp2();
    let lng = point.x / scale * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * point.y / scale);
    let lat = n.sinh().atan() * 180.0 / PI;
    LatLng::new(lat, lng)
}

/// Represents the current camera over the map canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Geographic center of the canvas.
    pub center: LatLng,
    /// Zoom level; each step doubles the pixel size of the world.
    pub zoom: f64,
    /// Canvas width in pixels.
    pub canvas_width: f64,
    /// Canvas height in pixels.
    pub canvas_height: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            center: LatLng::new(0.0, 0.0),
            zoom: 0.0,
            canvas_width,
            canvas_height,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    pub fn with_zoom_range(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom.max(min_zoom);
        self.zoom = self.clamp_zoom(self.zoom);
        self
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.min_zoom;
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        if center.is_finite() {
            self.center = center;
        }
        self.zoom = self.clamp_zoom(zoom);
    }

    pub fn resize(&mut self, canvas_width: f64, canvas_height: f64) {
        self.canvas_width = canvas_width;
        self.canvas_height = canvas_height;
    }

    fn half_size(&self) -> ScreenPoint {
        ScreenPoint::new(self.canvas_width / 2.0, self.canvas_height / 2.0)
    }

    /// Convert a geographic coordinate to canvas pixels.
    pub fn latlng_to_screen(&self, latlng: &LatLng) -> ScreenPoint {
        let p = project(latlng, self.zoom);
        let c = project(&self.center, self.zoom);
        let half = self.half_size();
        ScreenPoint::new(p.x - c.x + half.x, p.y - c.y + half.y)
    }

    /// Convert canvas pixels to a geographic coordinate.
    pub fn screen_to_latlng(&self, point: &ScreenPoint) -> LatLng {
        let c = project(&self.center, self.zoom);
        let half = self.half_size();
        unproject(
            &ScreenPoint::new(point.x - half.x + c.x, point.y - half.y + c.y),
            self.zoom,
        )
    }

    /// Pan the viewport by a delta in screen pixels (content follows the drag).
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let c = project(&self.center, self.zoom);
        self.center = unproject(&ScreenPoint::new(c.x - dx, c.y - dy), self.zoom);
    }

    /// Change zoom by `delta` levels while keeping the geographic point under
    /// the given screen position fixed.
    pub fn zoom_at(&mut self, screen: ScreenPoint, delta: f64) {
        let anchor = self.screen_to_latlng(&screen);
        self.zoom = self.clamp_zoom(self.zoom + delta);

        // Re-center so that `anchor` lands back on `screen`.
        let p = project(&anchor, self.zoom);
        let half = self.half_size();
        let center_px = ScreenPoint::new(p.x - (screen.x - half.x), p.y - (screen.y - half.y));
        self.center = unproject(&center_px, self.zoom);
    }

    /// Largest whole zoom level at which `bounds` fits inside the canvas minus
    /// `padding` pixels on every side.
    pub fn bounds_zoom(&self, bounds: &LatLngBounds, padding: f64) -> f64 {
        let nw = project(
            &LatLng::new(bounds.north_east.lat, bounds.south_west.lng),
            0.0,
        );
        let se = project(
            &LatLng::new(bounds.south_west.lat, bounds.north_east.lng),
            0.0,
        );
        let width = (se.x - nw.x).abs();
        let height = (se.y - nw.y).abs();
        let avail_w = (self.canvas_width - 2.0 * padding).max(1.0);
        let avail_h = (self.canvas_height - 2.0 * padding).max(1.0);

        // A zero extent on one axis imposes no limit; on both, only max_zoom does.
        let scale = (avail_w / width).min(avail_h / height);
        self.clamp_zoom(scale.log2().floor())
    }

    /// Center and zoom the camera on `bounds`. Returns `false` (camera
    /// unchanged) if the bounds are not valid.
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64) -> bool {
        if !bounds.is_valid() {
            return false;
        }
        let zoom = self.bounds_zoom(bounds, padding);
        let sw = project(&bounds.south_west, zoom);
        let ne = project(&bounds.north_east, zoom);
        let mid = ScreenPoint::new((sw.x + ne.x) / 2.0, (sw.y + ne.y) / 2.0);
        self.center = unproject(&mid, zoom);
        self.zoom = zoom;
        true
    }

    /// Geographic bounds of the visible canvas.
    pub fn visible_bounds(&self) -> LatLngBounds {
        self.padded_bounds(0.0)
    }

    /// Visible bounds grown by `margin` pixels on every side.
    pub fn padded_bounds(&self, margin: f64) -> LatLngBounds {
        let nw = self.screen_to_latlng(&ScreenPoint::new(-margin, -margin));
        let se = self.screen_to_latlng(&ScreenPoint::new(
            self.canvas_width + margin,
            self.canvas_height + margin,
        ));
        LatLngBounds::new(nw, se)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_project_origin_is_world_center() {
        let p = project(&LatLng::new(0.0, 0.0), 0.0);
        assert!(close(p.x, 128.0, 1e-9));
        assert!(close(p.y, 128.0, 1e-9));
    }

    #[test]
    fn test_project_unproject_roundtrip() {
        let ll = LatLng::new(39.93, 32.85);
        for z in [0.0, 6.0, 12.5, 19.0] {
            let back = unproject(&project(&ll, z), z);
            assert!(close(back.lat, ll.lat, 1e-9));
            assert!(close(back.lng, ll.lng, 1e-9));
        }
    }

    #[test]
    fn test_center_maps_to_canvas_middle() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.set_view(LatLng::new(39.0, 35.2), 6.0);
        let s = vp.latlng_to_screen(&LatLng::new(39.0, 35.2));
        assert!(close(s.x, 400.0, 1e-6));
        assert!(close(s.y, 300.0, 1e-6));
    }

    #[test]
    fn test_zoom_clamped_to_range() {
        let mut vp = Viewport::new(800.0, 600.0).with_zoom_range(2.0, 20.0);
        vp.set_view(LatLng::new(0.0, 0.0), 25.0);
        assert_eq!(vp.zoom, 20.0);
        vp.set_view(LatLng::new(0.0, 0.0), -3.0);
        assert_eq!(vp.zoom, 2.0);
    }

    #[test]
    fn test_pan_moves_content_with_drag() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.set_view(LatLng::new(0.0, 0.0), 4.0);
        let target = LatLng::new(10.0, 10.0);
        let before = vp.latlng_to_screen(&target);
        vp.pan(50.0, -20.0);
        let after = vp.latlng_to_screen(&target);
        assert!(close(after.x - before.x, 50.0, 1e-6));
        assert!(close(after.y - before.y, -20.0, 1e-6));
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.set_view(LatLng::new(39.0, 35.0), 6.0);
        let cursor = ScreenPoint::new(200.0, 150.0);
        let under = vp.screen_to_latlng(&cursor);
        vp.zoom_at(cursor, 2.0);
        assert_eq!(vp.zoom, 8.0);
        let s = vp.latlng_to_screen(&under);
        assert!(close(s.x, 200.0, 1e-6));
        assert!(close(s.y, 150.0, 1e-6));
    }

    #[test]
    fn test_fit_bounds_contains_bounds() {
        let mut vp = Viewport::new(1024.0, 768.0);
        let b = LatLngBounds::new(LatLng::new(36.0, 26.0), LatLng::new(42.0, 45.0));
        assert!(vp.fit_bounds(&b, 16.0));
        assert_eq!(vp.zoom, vp.zoom.floor());
        for corner in [b.south_west, b.north_east] {
            let s = vp.latlng_to_screen(&corner);
            assert!(s.x >= 16.0 - 1e-6 && s.x <= 1024.0 - 16.0 + 1e-6);
            assert!(s.y >= 16.0 - 1e-6 && s.y <= 768.0 - 16.0 + 1e-6);
        }
        // One more zoom level would overflow.
        let next = vp.bounds_zoom(&b, 16.0) + 1.0;
        let w = (project(&b.north_east, next).x - project(&b.south_west, next).x).abs();
        let h = (project(&b.north_east, next).y - project(&b.south_west, next).y).abs();
        assert!(w > 1024.0 - 32.0 || h > 768.0 - 32.0);
    }

    #[test]
    fn test_fit_single_point_uses_max_zoom() {
        let mut vp = Viewport::new(800.0, 600.0).with_zoom_range(0.0, 19.0);
        let p = LatLng::new(41.0, 29.0);
        assert!(vp.fit_bounds(&LatLngBounds::new(p, p), 16.0));
        assert_eq!(vp.zoom, 19.0);
        assert!(close(vp.center.lat, 41.0, 1e-9));
    }

    #[test]
    fn test_fit_invalid_bounds_leaves_camera() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.set_view(LatLng::new(39.0, 35.2), 6.0);
        let before = vp;
        assert!(!vp.fit_bounds(&LatLngBounds::empty(), 16.0));
        assert_eq!(vp, before);
    }

    #[test]
    fn test_visible_bounds_contains_center() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.set_view(LatLng::new(39.0, 35.2), 6.0);
        let vb = vp.visible_bounds();
        assert!(vb.contains(&vp.center));
        assert!(vp.padded_bounds(100.0).contains(&vb.south_west));
    }
}

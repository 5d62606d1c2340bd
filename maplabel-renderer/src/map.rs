use std::collections::HashMap;

use log::debug;
use maplabel_core::{LatLng, LatLngBounds, SpatialIndex};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::drawable::{DrawOrder, Drawable, DrawableId};
use crate::render_data::{RecordingSurface, RenderFrame};
use crate::surface::Surface;
use crate::tile::TileLayer;
use crate::viewport::{ScreenPoint, Viewport};

/// Minimum extra pixels around the canvas searched when culling. Drawables
/// that paint further from their bounds widen it through `screen_margin`.
const CULL_MARGIN_PX: f64 = 256.0;

/// Initial camera and canvas settings for a [`MapCanvas`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub center: LatLng,
    pub zoom: f64,
    pub min_zoom: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            canvas_width: 1280.0,
            canvas_height: 800.0,
            center: LatLng::new(39.0, 35.2),
            zoom: 6.0,
            min_zoom: 0.0,
        }
    }
}

/// Counters for one call to [`MapCanvas::render`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub tiles: usize,
    pub drawn: usize,
    pub culled: usize,
}

#[derive(Debug)]
struct Attached {
    drawable: Box<dyn Drawable>,
    bounds: LatLngBounds,
    order: DrawOrder,
    seq: u64,
}

/// The map: camera, base tiles and every attached drawable.
///
/// Drawables are indexed by their geographic bounds; `render` only redraws
/// the ones near the visible area, shapes before labels, each pass in
/// attachment order.
#[derive(Debug)]
pub struct MapCanvas {
    viewport: Viewport,
    tile_layer: Option<TileLayer>,
    drawables: HashMap<DrawableId, Attached>,
    index: SpatialIndex<DrawableId>,
    /// Drawables without valid bounds; never culled.
    unindexed: Vec<DrawableId>,
    next_seq: u64,
    /// Per-frame scratch list, kept to avoid reallocating every frame.
    visible: Vec<(DrawOrder, u64, DrawableId)>,
}

impl MapCanvas {
    pub fn new(options: &MapOptions) -> Self {
        let mut viewport = Viewport::new(options.canvas_width, options.canvas_height)
            .with_zoom_range(options.min_zoom, 18.0);
        viewport.set_view(options.center, options.zoom);
        Self {
            viewport,
            tile_layer: None,
            drawables: HashMap::new(),
            index: SpatialIndex::new(),
            unindexed: Vec::new(),
            next_seq: 0,
            visible: Vec::new(),
        }
    }

    // ── Camera ───────────────────────────────────────────────────────

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.viewport.set_view(center, zoom);
        debug!("view set to {:?} @ z{}", self.viewport.center, self.viewport.zoom);
    }

    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64) -> bool {
        let fitted = self.viewport.fit_bounds(bounds, padding);
        if fitted {
            debug!(
                "fitted view to {:?} -> {:?} @ z{}",
                bounds, self.viewport.center, self.viewport.zoom
            );
        }
        fitted
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_at(&mut self, screen: ScreenPoint, delta: f64) {
        self.viewport.zoom_at(screen, delta);
    }

    pub fn resize(&mut self, canvas_width: f64, canvas_height: f64) {
        self.viewport.resize(canvas_width, canvas_height);
    }

    // ── Base layer ───────────────────────────────────────────────────

    /// Attach the base tile layer. The map's zoom range follows the layer's.
    pub fn set_tile_layer(&mut self, layer: TileLayer) {
        let layer = layer.normalized();
        self.viewport = self
            .viewport
            .with_zoom_range(layer.min_zoom as f64, layer.max_zoom as f64);
        self.tile_layer = Some(layer);
    }

    pub fn tile_layer(&self) -> Option<&TileLayer> {
        self.tile_layer.as_ref()
    }

    // ── Drawables ────────────────────────────────────────────────────

    pub fn add(&mut self, drawable: Box<dyn Drawable>) -> DrawableId {
        let id = Uuid::new_v4();
        let bounds = drawable.bounds();
        if !self.index.insert(id, bounds) {
            self.unindexed.push(id);
        }
        let attached = Attached {
            order: drawable.order(),
            drawable,
            bounds,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.drawables.insert(id, attached);
        id
    }

    /// Detach a drawable. Returns `false` if it was not attached.
    pub fn remove(&mut self, id: &DrawableId) -> bool {
        let Some(attached) = self.drawables.remove(id) else {
            return false;
        };
        if !self.index.remove(id, &attached.bounds) {
            self.unindexed.retain(|u| u != id);
        }
        true
    }

    pub fn contains(&self, id: &DrawableId) -> bool {
        self.drawables.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn count_by_order(&self, order: DrawOrder) -> usize {
        self.drawables.values().filter(|a| a.order == order).count()
    }

    /// Number of drawables held by the culling index (for consistency checks).
    pub fn indexed_len(&self) -> usize {
        self.index.len() + self.unindexed.len()
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Redraw the map for the current viewport.
    pub fn render(&mut self, surface: &mut dyn Surface) -> RenderStats {
        let mut stats = RenderStats::default();

        if let Some(layer) = &self.tile_layer {
            for tile in layer.visible_tiles(&self.viewport) {
                surface.draw_tile(&tile);
                stats.tiles += 1;
            }
        }

        let zoom = self.viewport.zoom;
        let margin = self
            .drawables
            .values()
            .map(|a| a.drawable.screen_margin(zoom))
            .filter(|m| m.is_finite())
            .fold(CULL_MARGIN_PX, f64::max);
        let area = self.viewport.padded_bounds(margin);
        self.visible.clear();
        for entry in self.index.query_bounds(&area) {
            if let Some(a) = self.drawables.get(&entry.key) {
                self.visible.push((a.order, a.seq, entry.key));
            }
        }
        for id in &self.unindexed {
            if let Some(a) = self.drawables.get(id) {
                self.visible.push((a.order, a.seq, *id));
            }
        }
        self.visible.sort_unstable();

        for (_, _, id) in &self.visible {
            if let Some(a) = self.drawables.get_mut(id) {
                a.drawable.redraw(surface, &self.viewport);
            }
        }
        stats.drawn = self.visible.len();
        stats.culled = self.drawables.len() - stats.drawn;
        stats
    }

    /// Render into a [`RenderFrame`] of recorded draw commands.
    pub fn frame(&mut self) -> RenderFrame {
        let mut surface = RecordingSurface::new();
        let stats = self.render(&mut surface);
        RenderFrame {
            viewport: self.viewport,
            attribution: self.tile_layer.as_ref().map(|l| l.attribution.clone()),
            commands: surface.into_commands(),
            drawable_count: self.drawables.len(),
            visible_count: stats.drawn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::AddTo;
    use crate::label::text_label;
    use crate::render_data::DrawCommand;
    use maplabel_core::LabelStyle;

    fn map() -> MapCanvas {
        MapCanvas::new(&MapOptions {
            canvas_width: 800.0,
            canvas_height: 600.0,
            center: LatLng::new(39.0, 35.0),
            zoom: 10.0,
            min_zoom: 0.0,
        })
    }

    #[test]
    fn test_add_and_remove() {
        let mut map = map();
        let id = text_label(LatLng::new(39.0, 35.0), "A", &LabelStyle::default()).add_to(&mut map);
        assert!(map.contains(&id));
        assert_eq!(map.len(), 1);
        assert!(map.remove(&id));
        assert!(!map.remove(&id));
        assert!(map.is_empty());
        assert_eq!(map.indexed_len(), 0);
    }

    #[test]
    fn test_offscreen_drawables_culled() {
        let mut map = map();
        text_label(LatLng::new(39.0, 35.0), "near", &LabelStyle::default()).add_to(&mut map);
        text_label(LatLng::new(-30.0, 150.0), "far", &LabelStyle::default()).add_to(&mut map);
        let mut surface = RecordingSurface::new();
        let stats = map.render(&mut surface);
        assert_eq!(stats.drawn, 1);
        assert_eq!(stats.culled, 1);
        assert_eq!(surface.filled_texts(), vec!["near"]);
    }

    #[test]
    fn test_large_label_anchored_offscreen_still_painted() {
        let mut map = map();
        map.set_view(LatLng::new(39.0, 35.0), 14.0);
        let anchor = map.viewport().screen_to_latlng(&ScreenPoint::new(-600.0, 300.0));
        text_label(anchor, "Mediterranean Sea", &LabelStyle::default()).add_to(&mut map);

        let mut surface = RecordingSurface::new();
        let stats = map.render(&mut surface);
        assert_eq!(stats.drawn, 1);
        assert_eq!(stats.culled, 0);
        assert_eq!(surface.filled_texts(), vec!["Mediterranean Sea"]);
    }

    #[test]
    fn test_inverted_tile_zoom_range_renders() {
        let mut map = map();
        map.set_tile_layer(TileLayer {
            min_zoom: 10,
            max_zoom: 5,
            ..TileLayer::default()
        });
        assert_eq!(map.viewport().max_zoom, 5.0);
        let frame = map.frame();
        assert!(frame.commands.iter().all(|c| match c {
            DrawCommand::DrawTile { tile } => tile.z == 5,
            _ => true,
        }));
    }

    #[test]
    fn test_labels_painted_in_attachment_order() {
        let mut map = map();
        for t in ["one", "two", "three"] {
            text_label(LatLng::new(39.0, 35.0), t, &LabelStyle::default()).add_to(&mut map);
        }
        let mut surface = RecordingSurface::new();
        map.render(&mut surface);
        assert_eq!(surface.filled_texts(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_tile_layer_sets_zoom_range_and_draws_tiles() {
        let mut map = map();
        map.set_tile_layer(TileLayer::default());
        map.set_view(LatLng::new(39.0, 35.0), 30.0);
        assert_eq!(map.zoom(), 20.0);
        let frame = map.frame();
        assert!(frame.commands.iter().any(|c| matches!(c, DrawCommand::DrawTile { .. })));
        assert_eq!(frame.attribution.as_deref(), Some("© OpenStreetMap contributors"));
    }
}

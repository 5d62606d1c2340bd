//! Map lifecycle: camera setup, base tiles and (re)loading data sources.

use std::collections::{HashMap, HashSet};

use log::{info, warn};
use maplabel_core::{LatLng, LatLngBounds};
use maplabel_io::{load_collection, SourceFetcher, ViewerConfig};
use maplabel_renderer::{
    LayerAssembler, MapCanvas, RenderFrame, RenderStats, RenderedLayer, ScreenPoint, Surface,
    Viewport,
};
use serde::Serialize;

use crate::status::ViewerStatus;

/// A source that could not be loaded during a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub source: String,
    pub message: String,
}

/// Outcome of one [`ViewportController::reload`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReloadSummary {
    /// Sources loaded by this reload, in configuration order.
    pub loaded: Vec<String>,
    pub failures: Vec<SourceFailure>,
    /// Sum of the feature counts of every loaded source.
    pub feature_count: usize,
    /// Union of the loaded layers' bounds.
    pub bounds: Option<LatLngBounds>,
    /// Whether the camera was moved to `bounds`.
    pub fitted: bool,
}

/// Owns the map and one rendered layer per configured source.
#[derive(Debug)]
pub struct ViewportController {
    config: ViewerConfig,
    map: MapCanvas,
    assembler: LayerAssembler,
    layers: HashMap<String, RenderedLayer>,
    status: ViewerStatus,
}

impl ViewportController {
    pub fn new(config: ViewerConfig) -> Self {
        let mut map = MapCanvas::new(&config.map);
        map.set_tile_layer(config.tiles.clone());
        // The tile layer's zoom range applies to the initial view too.
        map.set_view(config.map.center, config.map.zoom);
        info!(
            "map created at {:?} z{} with {} sources",
            map.viewport().center,
            map.zoom(),
            config.sources.len()
        );
        Self {
            assembler: LayerAssembler::new(config.labels.clone()),
            config,
            map,
            layers: HashMap::new(),
            status: ViewerStatus::Loading,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn status(&self) -> &ViewerStatus {
        &self.status
    }

    pub fn map(&self) -> &MapCanvas {
        &self.map
    }

    pub fn viewport(&self) -> &Viewport {
        self.map.viewport()
    }

    pub fn layer(&self, source: &str) -> Option<&RenderedLayer> {
        self.layers.get(source)
    }

    /// Fetch every configured source and replace its layer.
    ///
    /// A source that fails to fetch or parse keeps whatever it showed before
    /// and is reported in the summary; the other sources still load. When at
    /// least one source loaded with usable bounds the camera is fitted to
    /// their union, otherwise it stays where it is.
    pub async fn reload<F: SourceFetcher>(&mut self, fetcher: &F) -> ReloadSummary {
        self.status = ViewerStatus::Loading;
        let mut summary = ReloadSummary::default();
        let mut bounds = LatLngBounds::empty();

        let mut seen = HashSet::new();
        for source in &self.config.sources {
            if !seen.insert(source.id.as_str()) {
                warn!("{}: duplicate source id, {} skipped", source.id, source.url);
                summary.failures.push(SourceFailure {
                    source: source.id.clone(),
                    message: format!("duplicate source id for {}", source.url),
                });
                continue;
            }
            let collection = match load_collection(fetcher, &source.id, &source.url).await {
                Ok(collection) => collection,
                Err(e) => {
                    warn!("{}: failed to load {}: {}", source.id, source.url, e);
                    summary.failures.push(SourceFailure {
                        source: source.id.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if let Some(previous) = self.layers.remove(&source.id) {
                previous.detach(&mut self.map);
            }
            let layer = self
                .assembler
                .load_layer(&mut self.map, collection, &source.style);

            summary.feature_count += layer.feature_count();
            if let Some(b) = layer.bounds() {
                bounds.extend_bounds(&b);
            }
            summary.loaded.push(source.id.clone());
            self.layers.insert(source.id.clone(), layer);
        }

        summary.bounds = bounds.is_valid().then_some(bounds);
        if let Some(b) = &summary.bounds {
            summary.fitted = self.map.fit_bounds(b, self.config.fit_padding);
        }

        self.status = if summary.loaded.is_empty() && !summary.failures.is_empty() {
            let message = summary
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.source, f.message))
                .collect::<Vec<_>>()
                .join("; ");
            ViewerStatus::Failed { message }
        } else {
            ViewerStatus::Ready {
                feature_count: summary.feature_count,
                failures: summary.failures.len(),
            }
        };
        info!("reload finished: {}", self.status);
        summary
    }

    // ── Camera ───────────────────────────────────────────────────────

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.map.set_view(center, zoom);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.map.pan(dx, dy);
    }

    pub fn zoom_at(&mut self, screen: ScreenPoint, delta: f64) {
        self.map.zoom_at(screen, delta);
    }

    pub fn resize(&mut self, canvas_width: f64, canvas_height: f64) {
        self.map.resize(canvas_width, canvas_height);
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&mut self, surface: &mut dyn Surface) -> RenderStats {
        self.map.render(surface)
    }

    pub fn frame(&mut self) -> RenderFrame {
        self.map.frame()
    }
}

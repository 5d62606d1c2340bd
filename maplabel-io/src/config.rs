use std::collections::HashSet;
use std::io;
use std::path::Path;

use maplabel_core::{LabelPolicy, LayerStyle};
use maplabel_renderer::{MapOptions, TileLayer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("source id {0:?} is used more than once")]
    DuplicateSource(String),
}

/// One GeoJSON source drawn as its own layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Stable key; reloading a source replaces the layer with the same id.
    pub id: String,
    /// `http(s)://` URL, `file://` URL or path.
    pub url: String,
    #[serde(default)]
    pub style: LayerStyle,
}

impl SourceConfig {
    pub fn new(id: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
            style: LayerStyle::default(),
        }
    }

    pub fn with_style(mut self, style: LayerStyle) -> Self {
        self.style = style;
        self
    }
}

/// Viewer settings, stored as a human-readable JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub map: MapOptions,
    pub tiles: TileLayer,
    /// Padding in pixels kept around loaded data when fitting the camera.
    pub fit_padding: f64,
    pub labels: LabelPolicy,
    pub sources: Vec<SourceConfig>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            map: MapOptions::default(),
            tiles: TileLayer::default(),
            fit_padding: 16.0,
            labels: LabelPolicy::default(),
            sources: vec![SourceConfig::new("text", "text.geojson")],
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Every source needs its own id; layers are replaced by id on reload.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.id.as_str()) {
                return Err(ConfigError::DuplicateSource(source.id.clone()));
            }
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplabel_core::{Color, LatLng};

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.map.canvas_width, 1280.0);
        assert_eq!(config.map.center, LatLng::new(39.0, 35.2));
        assert_eq!(config.map.zoom, 6.0);
        assert_eq!(config.tiles.max_native_zoom, 19);
        assert_eq!(config.tiles.max_zoom, 20);
        assert_eq!(config.fit_padding, 16.0);
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].url, "text.geojson");
        assert_eq!(config.sources[0].style.stroke_color, Color::rgb(0x25, 0x63, 0xeb));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ViewerConfig::from_json(
            r##"{
                "map": { "zoom": 9 },
                "sources": [
                    { "id": "cities", "url": "https://example.com/cities.geojson" },
                    { "id": "roads", "url": "roads.geojson", "style": { "stroke_color": "#ff0000" } }
                ]
            }"##,
        )
        .unwrap();
        assert_eq!(config.map.zoom, 9.0);
        assert_eq!(config.map.canvas_height, 800.0);
        assert_eq!(config.tiles, TileLayer::default());
        assert_eq!(config.sources[0].style, LayerStyle::default());
        assert_eq!(config.sources[1].style.stroke_color, Color::rgb(255, 0, 0));
        assert_eq!(config.sources[1].style.weight, 2.0);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ViewerConfig::default();
        let back = ViewerConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_duplicate_source_ids_rejected() {
        let err = ViewerConfig::from_json(
            r#"{ "sources": [
                { "id": "dup", "url": "a.geojson" },
                { "id": "dup", "url": "b.geojson" }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSource(ref id) if id == "dup"));
    }

    #[test]
    fn test_bad_config() {
        assert!(matches!(
            ViewerConfig::from_json("{\"fit_padding\": \"wide\"}"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            ViewerConfig::load("/nonexistent/maplabel.json"),
            Err(ConfigError::Io(_))
        ));
    }
}

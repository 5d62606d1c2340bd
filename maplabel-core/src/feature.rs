use geo::Geometry;
use serde_json::{Map, Value};

/// The property key whose string value becomes a feature's label.
pub const TEXT_PROPERTY: &str = "text";

/// A single GeoJSON feature.
///
/// `geometry` is `None` both for features declared with a `null` geometry and
/// for features whose geometry could not be decoded; such features are still
/// counted as part of their collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<Value>,
    pub geometry: Option<Geometry<f64>>,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            id: None,
            geometry: Some(geometry),
            properties: Map::new(),
        }
    }

    pub fn without_geometry() -> Self {
        Self {
            id: None,
            geometry: None,
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.with_property(TEXT_PROPERTY, text)
    }

    /// The label text, if the feature carries a non-empty `text` string.
    pub fn text(&self) -> Option<&str> {
        match self.properties.get(TEXT_PROPERTY) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

/// An ordered set of features loaded from one source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    /// Identifier of the source this collection was loaded from.
    pub name: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(name: &str, features: Vec<Feature>) -> Self {
        Self {
            name: name.to_string(),
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Number of features that carry label text.
    pub fn labelled_count(&self) -> usize {
        self.features.iter().filter(|f| f.text().is_some()).count()
    }
}

//! # MapLabel I/O
//!
//! GeoJSON reading, fetching sources over HTTP or from disk, and the
//! JSON viewer configuration file.

pub mod geojson;
pub mod source;
pub mod config;

pub use geojson::{parse_feature_collection, parse_geometry, GeoJsonError};
pub use source::{load_collection, FileFetcher, HttpFetcher, RoutingFetcher, SourceError, SourceFetcher};
pub use config::{ConfigError, SourceConfig, ViewerConfig};

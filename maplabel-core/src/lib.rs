//! # MapLabel Core
//!
//! Geographic primitives, the GeoJSON-shaped feature model, label anchor
//! resolution, layer and label styling, and an R-tree spatial index.
//!
//! Nothing in this crate knows about pixels; projection and painting live in
//! `maplabel-renderer`.

pub mod geometry;
pub mod feature;
pub mod anchor;
pub mod label;
pub mod layer;
pub mod spatial;

pub use geometry::{LatLng, LatLngBounds};
pub use feature::{Feature, FeatureCollection};
pub use anchor::{resolve_anchor, envelope, Anchor, AnchorKind, GeometryError};
pub use label::{LabelPolicy, LabelSpec, LabelStyle};
pub use layer::{Color, ColorError, LayerStyle};
pub use spatial::{SpatialEntry, SpatialIndex};

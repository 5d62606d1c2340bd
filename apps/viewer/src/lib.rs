//! # MapLabel Viewer
//!
//! Wires the pieces together: a [`ViewportController`] owns the map, loads
//! every configured GeoJSON source through a fetcher and reports a
//! [`ViewerStatus`]. The `maplabel` binary drives it from the command line.

pub mod cli;
pub mod controller;
pub mod status;

pub use cli::Cli;
pub use controller::{ReloadSummary, SourceFailure, ViewportController};
pub use status::ViewerStatus;

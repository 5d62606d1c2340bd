//! # MapLabel Renderer
//!
//! 2D rendering for the map canvas: Web Mercator viewport math, the paint
//! [`Surface`] abstraction, drawables (feature shapes and zoom-scaled text
//! labels), the base tile layer description and the [`MapCanvas`] that owns
//! them all.
//!
//! Painting goes through [`Surface`] so a host can back it with a real 2D
//! context; [`RecordingSurface`] captures JSON-serializable draw commands
//! instead.

pub mod viewport;
pub mod surface;
pub mod render_data;
pub mod drawable;
pub mod shape;
pub mod label;
pub mod tile;
pub mod map;
pub mod assembler;

pub use viewport::{ScreenPoint, Viewport};
pub use surface::{LineJoin, ScreenPath, Segment, Surface, TextAlign, TextBaseline};
pub use render_data::{DrawCommand, RecordingSurface, RenderFrame};
pub use drawable::{AddTo, DrawOrder, Drawable, DrawableId};
pub use shape::ShapeDrawable;
pub use label::{text_label, ScaledLabel};
pub use tile::{TileLayer, TileRef};
pub use map::{MapCanvas, MapOptions, RenderStats};
pub use assembler::{LayerAssembler, RenderedLayer};

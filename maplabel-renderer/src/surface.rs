use maplabel_core::Color;
use serde::{Deserialize, Serialize};

use crate::tile::TileRef;
use crate::viewport::ScreenPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextBaseline {
    Top,
    Middle,
    Alphabetic,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

/// A 2D painting target with canvas-style mutable paint state.
///
/// Paint state (font, colors, widths, alignment) is shared by everything
/// drawn on the surface. A drawable must set every attribute it depends on
/// before painting and must not assume anything left behind by another.
pub trait Surface {
    fn set_font(&mut self, font: &str);
    fn set_fill_style(&mut self, color: Color);
    fn set_stroke_style(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);

    fn fill_text(&mut self, text: &str, at: ScreenPoint);
    fn stroke_text(&mut self, text: &str, at: ScreenPoint);

    /// Fill the closed rings and circles of `path`; open lines are ignored.
    fn fill_path(&mut self, path: &ScreenPath);
    fn stroke_path(&mut self, path: &ScreenPath);

    fn draw_tile(&mut self, tile: &TileRef);
}

/// One sub-path of a [`ScreenPath`]. Rings and lines index into the path's
/// shared point buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    Ring { start: usize, len: usize },
    Line { start: usize, len: usize },
    Circle { center: ScreenPoint, radius: f64 },
}

/// A reusable buffer of screen-space sub-paths.
///
/// `clear` keeps the allocated capacity so a drawable can rebuild its path
/// every frame without reallocating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPath {
    points: Vec<ScreenPoint>,
    segments: Vec<Segment>,
}

impl ScreenPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.segments.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Points of a ring or line segment; empty for circles.
    pub fn points(&self, segment: &Segment) -> &[ScreenPoint] {
        match *segment {
            Segment::Ring { start, len } | Segment::Line { start, len } => {
                &self.points[start..start + len]
            }
            Segment::Circle { .. } => &[],
        }
    }

    /// Append a closed ring. Rings with fewer than 3 points are dropped.
    pub fn push_ring(&mut self, points: impl IntoIterator<Item = ScreenPoint>) {
        let start = self.points.len();
        self.points.extend(points);
        let len = self.points.len() - start;
        if len < 3 {
            self.points.truncate(start);
            return;
        }
        self.segments.push(Segment::Ring { start, len });
    }

    /// Append an open polyline. Lines with fewer than 2 points are dropped.
    pub fn push_line(&mut self, points: impl IntoIterator<Item = ScreenPoint>) {
        let start = self.points.len();
        self.points.extend(points);
        let len = self.points.len() - start;
        if len < 2 {
            self.points.truncate(start);
            return;
        }
        self.segments.push(Segment::Line { start, len });
    }

    pub fn push_circle(&mut self, center: ScreenPoint, radius: f64) {
        self.segments.push(Segment::Circle { center, radius });
    }

    pub fn has_fillable(&self) -> bool {
        self.segments
            .iter()
            .any(|s| !matches!(s, Segment::Line { .. }))
    }
}

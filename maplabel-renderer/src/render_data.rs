use maplabel_core::Color;
use serde::{Deserialize, Serialize};

use crate::surface::{LineJoin, ScreenPath, Surface, TextAlign, TextBaseline};
use crate::tile::TileRef;
use crate::viewport::{ScreenPoint, Viewport};

/// A single paint operation, as issued to a [`Surface`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    SetFont { font: String },
    SetFillStyle { color: Color },
    SetStrokeStyle { color: Color },
    SetLineWidth { width: f64 },
    SetLineJoin { join: LineJoin },
    SetGlobalAlpha { alpha: f32 },
    SetTextAlign { align: TextAlign },
    SetTextBaseline { baseline: TextBaseline },
    FillText { text: String, at: ScreenPoint },
    StrokeText { text: String, at: ScreenPoint },
    FillPath { path: ScreenPath },
    StrokePath { path: ScreenPath },
    DrawTile { tile: TileRef },
}

impl DrawCommand {
    /// Whether the command puts pixels on the surface (as opposed to
    /// changing paint state).
    pub fn is_paint(&self) -> bool {
        matches!(
            self,
            DrawCommand::FillText { .. }
                | DrawCommand::StrokeText { .. }
                | DrawCommand::FillPath { .. }
                | DrawCommand::StrokePath { .. }
                | DrawCommand::DrawTile { .. }
        )
    }
}

/// A [`Surface`] that records every call as a [`DrawCommand`].
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn paint_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_paint()).count()
    }

    /// Text passed to `fill_text`, in paint order.
    pub fn filled_texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    fn set_font(&mut self, font: &str) {
        self.commands.push(DrawCommand::SetFont {
            font: font.to_string(),
        });
    }

    fn set_fill_style(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetFillStyle { color });
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetStrokeStyle { color });
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::SetLineWidth { width });
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.commands.push(DrawCommand::SetLineJoin { join });
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::SetGlobalAlpha { alpha });
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.commands.push(DrawCommand::SetTextAlign { align });
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.commands.push(DrawCommand::SetTextBaseline { baseline });
    }

    fn fill_text(&mut self, text: &str, at: ScreenPoint) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            at,
        });
    }

    fn stroke_text(&mut self, text: &str, at: ScreenPoint) {
        self.commands.push(DrawCommand::StrokeText {
            text: text.to_string(),
            at,
        });
    }

    fn fill_path(&mut self, path: &ScreenPath) {
        self.commands.push(DrawCommand::FillPath { path: path.clone() });
    }

    fn stroke_path(&mut self, path: &ScreenPath) {
        self.commands.push(DrawCommand::StrokePath { path: path.clone() });
    }

    fn draw_tile(&mut self, tile: &TileRef) {
        self.commands.push(DrawCommand::DrawTile { tile: tile.clone() });
    }
}

/// Complete render frame data, ready to be replayed by a canvas host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub attribution: Option<String>,
    pub commands: Vec<DrawCommand>,
    /// Drawables attached to the map when the frame was rendered.
    pub drawable_count: usize,
    /// Drawables redrawn for this frame (the rest were outside the view).
    pub visible_count: usize,
}

impl RenderFrame {
    pub fn empty(viewport: Viewport) -> Self {
        Self {
            viewport,
            attribution: None,
            commands: Vec::new(),
            drawable_count: 0,
            visible_count: 0,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

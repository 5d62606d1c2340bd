//! Zoom-scaled text labels.
//!
//! A label's font size follows the map: it renders at its base size at the
//! reference zoom and doubles or halves with every zoom level. Below one pixel
//! nothing is painted.

use maplabel_core::{Anchor, AnchorKind, LabelSpec, LabelStyle, LatLng, LatLngBounds};

use crate::drawable::{DrawOrder, Drawable};
use crate::surface::{LineJoin, Surface, TextAlign, TextBaseline};
use crate::viewport::Viewport;

/// Halo width relative to the font size.
const HALO_RATIO: f64 = 1.0 / 8.0;

/// A text label drawn at a geographic anchor, scaled with zoom.
#[derive(Debug, Clone)]
pub struct ScaledLabel {
    spec: LabelSpec,
    /// Font string for `font_size`; rebuilt only when the size changes.
    font: String,
    font_size: f64,
}

impl ScaledLabel {
    pub fn new(spec: LabelSpec) -> Self {
        Self {
            spec,
            font: String::new(),
            font_size: f64::NAN,
        }
    }

    pub fn spec(&self) -> &LabelSpec {
        &self.spec
    }

    pub fn anchor(&self) -> LatLng {
        self.spec.anchor
    }

    fn update_font(&mut self, size: f64) {
        if size == self.font_size {
            return;
        }
        use std::fmt::Write;
        self.font.clear();
        // Writing into a String cannot fail.
        let _ = write!(self.font, "{} {}px sans-serif", self.spec.font_weight, size);
        self.font_size = size;
    }
}

/// Build a label for `text` anchored at `anchor` using `style`.
pub fn text_label(anchor: LatLng, text: &str, style: &LabelStyle) -> ScaledLabel {
    let anchor = Anchor {
        position: anchor,
        kind: AnchorKind::Point,
    };
    ScaledLabel::new(LabelSpec::new(anchor, text, style))
}

impl Drawable for ScaledLabel {
    fn redraw(&mut self, surface: &mut dyn Surface, viewport: &Viewport) {
        let size = self.spec.display_size(viewport.zoom);
        // Also rejects NaN sizes.
        if !self.spec.is_visible_at(viewport.zoom) || self.spec.text.is_empty() {
            return;
        }
        let at = viewport.latlng_to_screen(&self.spec.anchor);
        if !at.is_finite() {
            return;
        }
        self.update_font(size);

        surface.set_global_alpha(1.0);
        surface.set_font(&self.font);
        surface.set_text_align(TextAlign::Center);
        surface.set_text_baseline(TextBaseline::Middle);
        surface.set_line_join(LineJoin::Round);
        surface.set_line_width(size * HALO_RATIO);
        surface.set_stroke_style(self.spec.stroke_color);
        surface.set_fill_style(self.spec.text_color);

        surface.stroke_text(&self.spec.text, at);
        surface.fill_text(&self.spec.text, at);
    }

    fn bounds(&self) -> LatLngBounds {
        LatLngBounds::new(self.spec.anchor, self.spec.anchor)
    }

    /// Glyphs are at most one em wide, so the text never reaches further
    /// from its anchor than `size * chars` (halo included).
    fn screen_margin(&self, zoom: f64) -> f64 {
        let size = self.spec.display_size(zoom);
        if !size.is_finite() || !self.spec.is_visible_at(zoom) {
            return 0.0;
        }
        let chars = self.spec.text.chars().count().max(1) as f64;
        size * chars + size * HALO_RATIO
    }

    fn order(&self) -> DrawOrder {
        DrawOrder::Label
    }
}

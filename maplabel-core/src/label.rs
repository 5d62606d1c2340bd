use serde::{Deserialize, Serialize};

use crate::anchor::{resolve_anchor, Anchor, AnchorKind, GeometryError};
use crate::feature::Feature;
use crate::geometry::LatLng;
use crate::layer::Color;

/// Below this many pixels a label is not painted at all.
pub const MIN_VISIBLE_FONT_SIZE: f64 = 1.0;

/// Size and paint settings shared by a class of labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    /// Font size in pixels at `reference_zoom`.
    pub base_font_size: f64,
    /// Zoom level at which `base_font_size` renders 1:1.
    pub reference_zoom: f64,
    pub font_weight: String,
    pub text_color: Color,
    /// Halo drawn behind the glyphs.
    pub stroke_color: Color,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            base_font_size: 16.0,
            reference_zoom: 10.0,
            font_weight: "600".to_string(),
            text_color: Color::rgb(0x1f, 0x29, 0x37),
            stroke_color: Color::rgba(255, 255, 255, 0.85),
        }
    }
}

/// Chooses label sizing by how the anchor was derived.
///
/// Point labels get a smaller base size and a lower reference zoom than
/// envelope labels so they stay legible when zoomed further out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelPolicy {
    pub point: LabelStyle,
    pub envelope: LabelStyle,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            point: LabelStyle {
                base_font_size: 12.0,
                reference_zoom: 8.0,
                ..LabelStyle::default()
            },
            envelope: LabelStyle::default(),
        }
    }
}

impl LabelPolicy {
    pub fn style_for(&self, kind: AnchorKind) -> &LabelStyle {
        match kind {
            AnchorKind::Point => &self.point,
            AnchorKind::Envelope => &self.envelope,
        }
    }

    /// Derive the label for `feature`, if it has one.
    pub fn label_for(&self, feature: &Feature) -> Result<Option<LabelSpec>, GeometryError> {
        let Some(anchor) = resolve_anchor(feature)? else {
            return Ok(None);
        };
        let text = feature.text().unwrap_or_default();
        Ok(Some(LabelSpec::new(anchor, text, self.style_for(anchor.kind))))
    }
}

/// Everything needed to paint one label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSpec {
    pub anchor: LatLng,
    pub text: String,
    pub base_font_size: f64,
    pub reference_zoom: f64,
    pub font_weight: String,
    pub text_color: Color,
    pub stroke_color: Color,
}

impl LabelSpec {
    pub fn new(anchor: Anchor, text: &str, style: &LabelStyle) -> Self {
        Self {
            anchor: anchor.position,
            text: text.to_string(),
            base_font_size: style.base_font_size,
            reference_zoom: style.reference_zoom,
            font_weight: style.font_weight.clone(),
            text_color: style.text_color,
            stroke_color: style.stroke_color,
        }
    }

    /// `2^(zoom - reference_zoom)`
    pub fn scale_at(&self, zoom: f64) -> f64 {
        (zoom - self.reference_zoom).exp2()
    }

    /// Font size in pixels at `zoom`.
    pub fn display_size(&self, zoom: f64) -> f64 {
        self.base_font_size * self.scale_at(zoom)
    }

    pub fn is_visible_at(&self, zoom: f64) -> bool {
        self.display_size(zoom) >= MIN_VISIBLE_FONT_SIZE
    }
}

//! Turning feature collections into drawables.

use log::{info, warn};
use maplabel_core::{FeatureCollection, LabelPolicy, LatLngBounds, LayerStyle};

use crate::drawable::{Drawable, DrawableId};
use crate::label::ScaledLabel;
use crate::map::MapCanvas;
use crate::shape::ShapeDrawable;

/// Everything one feature collection put on the map.
///
/// Dropping a `RenderedLayer` does not detach its drawables; call
/// [`RenderedLayer::detach`] with the map it was loaded into.
#[derive(Debug)]
#[must_use = "a rendered layer must be kept to detach it later"]
pub struct RenderedLayer {
    source: String,
    drawables: Vec<DrawableId>,
    bounds: LatLngBounds,
    feature_count: usize,
    shape_count: usize,
    label_count: usize,
    skipped_count: usize,
}

impl RenderedLayer {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Union of every drawn feature's envelope, or `None` if nothing had a
    /// usable geometry.
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.bounds.is_valid().then_some(self.bounds)
    }

    pub fn drawable_ids(&self) -> &[DrawableId] {
        &self.drawables
    }

    /// Features in the source collection, whether drawn or not.
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    pub fn shape_count(&self) -> usize {
        self.shape_count
    }

    pub fn label_count(&self) -> usize {
        self.label_count
    }

    /// Features whose geometry could not be drawn at all.
    pub fn skipped_count(&self) -> usize {
        self.skipped_count
    }

    /// Remove every drawable this layer added. Returns how many were removed.
    pub fn detach(self, map: &mut MapCanvas) -> usize {
        let removed = self.drawables.iter().filter(|id| map.remove(id)).count();
        info!("{}: detached {} drawables", self.source, removed);
        removed
    }
}

/// Builds shapes and labels for feature collections.
#[derive(Debug, Clone, Default)]
pub struct LayerAssembler {
    policy: LabelPolicy,
}

impl LayerAssembler {
    pub fn new(policy: LabelPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &LabelPolicy {
        &self.policy
    }

    /// Attach a shape for every feature and a label for every labelled one.
    ///
    /// A feature that cannot be drawn is logged and skipped; the rest of the
    /// collection still loads. A feature whose label cannot be anchored keeps
    /// its shape.
    pub fn load_layer(
        &self,
        map: &mut MapCanvas,
        collection: FeatureCollection,
        style: &LayerStyle,
    ) -> RenderedLayer {
        let source = collection.name;
        let mut layer = RenderedLayer {
            feature_count: collection.features.len(),
            source,
            drawables: Vec::with_capacity(collection.features.len() * 2),
            bounds: LatLngBounds::empty(),
            shape_count: 0,
            label_count: 0,
            skipped_count: 0,
        };

        for (i, feature) in collection.features.into_iter().enumerate() {
            let label = match self.policy.label_for(&feature) {
                Ok(label) => label,
                Err(e) => {
                    warn!("{}: feature #{} not labelled: {}", layer.source, i, e);
                    None
                }
            };

            match feature.geometry {
                Some(geometry) => match ShapeDrawable::new(geometry, style.clone()) {
                    Ok(shape) => {
                        layer.bounds.extend_bounds(&shape.bounds());
                        layer.drawables.push(map.add(Box::new(shape)));
                        layer.shape_count += 1;
                    }
                    Err(e) => {
                        warn!("{}: feature #{} skipped: {}", layer.source, i, e);
                        layer.skipped_count += 1;
                    }
                },
                None => {
                    warn!("{}: feature #{} skipped: no geometry", layer.source, i);
                    layer.skipped_count += 1;
                }
            }

            if let Some(spec) = label {
                layer.drawables.push(map.add(Box::new(ScaledLabel::new(spec))));
                layer.label_count += 1;
            }
        }

        info!(
            "{}: {} features, {} shapes, {} labels, {} skipped",
            layer.source, layer.feature_count, layer.shape_count, layer.label_count, layer.skipped_count
        );
        layer
    }
}

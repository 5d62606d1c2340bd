//! Label anchor resolution.
//!
//! A point feature is labelled at its own coordinate. Every other geometry is
//! labelled at the center of its bounding envelope, which is cheap and good
//! enough for placement but may fall outside concave or multi-part shapes.

use geo::{BoundingRect, Geometry};
use thiserror::Error;

use crate::feature::Feature;
use crate::geometry::{LatLng, LatLngBounds};

/// Why a feature's geometry could not produce an anchor or an envelope.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("feature has no geometry")]
    Missing,

    #[error("geometry has no coordinates")]
    Empty,

    #[error("geometry has non-finite coordinates")]
    NonFinite,
}

/// How an anchor was derived from its feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    /// The feature's own point coordinate.
    Point,
    /// The center of the feature's bounding envelope.
    Envelope,
}

/// The geographic coordinate a label is centered on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub position: LatLng,
    pub kind: AnchorKind,
}

/// Bounding envelope of a geometry.
pub fn envelope(geometry: &Geometry<f64>) -> Result<LatLngBounds, GeometryError> {
    let rect = geometry.bounding_rect().ok_or(GeometryError::Empty)?;
    let bounds = LatLngBounds::from(rect);
    if !bounds.is_valid() {
        return Err(GeometryError::NonFinite);
    }
    Ok(bounds)
}

/// Resolve where `feature`'s label should be anchored.
///
/// Returns `Ok(None)` for features without label text. Geometry problems are
/// only reported for features that would otherwise be labelled.
pub fn resolve_anchor(feature: &Feature) -> Result<Option<Anchor>, GeometryError> {
    if feature.text().is_none() {
        return Ok(None);
    }
    let geometry = feature.geometry.as_ref().ok_or(GeometryError::Missing)?;

    let anchor = match geometry {
        Geometry::Point(p) => {
            let position = LatLng::from(*p);
            if !position.is_finite() {
                return Err(GeometryError::NonFinite);
            }
            Anchor {
                position,
                kind: AnchorKind::Point,
            }
        }
        other => {
            let bounds = envelope(other)?;
            let position = bounds.center().ok_or(GeometryError::Empty)?;
            Anchor {
                position,
                kind: AnchorKind::Envelope,
            }
        }
    };
    Ok(Some(anchor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point, polygon, GeometryCollection, MultiPolygon};

    #[test]
    fn test_point_anchor_is_own_coordinate() {
        let f = Feature::new(point!(x: 32.85, y: 39.93).into()).with_text("A");
        let anchor = resolve_anchor(&f).unwrap().unwrap();
        assert_eq!(anchor.position, LatLng::new(39.93, 32.85));
        assert_eq!(anchor.kind, AnchorKind::Point);
    }

    #[test]
    fn test_polygon_anchor_is_envelope_center() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 2.0),
            (x: 2.0, y: 2.0),
            (x: 2.0, y: 0.0)
        ];
        let f = Feature::new(square.into()).with_text("sq");
        let anchor = resolve_anchor(&f).unwrap().unwrap();
        assert_eq!(anchor.position, LatLng::new(1.0, 1.0));
        assert_eq!(anchor.kind, AnchorKind::Envelope);
    }

    #[test]
    fn test_concave_polygon_anchor_may_fall_outside() {
        // A "U" shape whose envelope center sits in the notch.
        let u = polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 1.5, y: 2.0),
            (x: 1.5, y: 0.5),
            (x: 0.5, y: 0.5),
            (x: 0.5, y: 2.0),
            (x: 0.0, y: 2.0)
        ];
        let f = Feature::new(u.clone().into()).with_text("U");
        let anchor = resolve_anchor(&f).unwrap().unwrap();
        assert_eq!(anchor.position, LatLng::new(1.0, 1.0));

        use geo::Contains;
        assert!(!u.contains(&point!(x: 1.0, y: 1.0)));
    }

    #[test]
    fn test_line_and_multi_geometry_use_envelope() {
        let line = line_string![(x: 10.0, y: 40.0), (x: 14.0, y: 44.0)];
        let f = Feature::new(line.into()).with_text("road");
        assert_eq!(
            resolve_anchor(&f).unwrap().unwrap().position,
            LatLng::new(42.0, 12.0)
        );

        let mp = MultiPolygon::new(vec![
            polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)],
            polygon![(x: 3.0, y: 3.0), (x: 4.0, y: 3.0), (x: 4.0, y: 4.0)],
        ]);
        let f = Feature::new(mp.into()).with_text("islands");
        assert_eq!(
            resolve_anchor(&f).unwrap().unwrap().position,
            LatLng::new(2.0, 2.0)
        );
    }

    #[test]
    fn test_no_text_no_anchor() {
        let f = Feature::new(point!(x: 1.0, y: 1.0).into());
        assert_eq!(resolve_anchor(&f), Ok(None));
        // Geometry problems are irrelevant without text.
        assert_eq!(resolve_anchor(&Feature::without_geometry()), Ok(None));
    }

    #[test]
    fn test_degenerate_geometries() {
        let f = Feature::without_geometry().with_text("x");
        assert_eq!(resolve_anchor(&f), Err(GeometryError::Missing));

        let empty = Geometry::GeometryCollection(GeometryCollection::<f64>(vec![]));
        let f = Feature::new(empty).with_text("x");
        assert_eq!(resolve_anchor(&f), Err(GeometryError::Empty));

        let f = Feature::new(point!(x: f64::NAN, y: 0.0).into()).with_text("x");
        assert_eq!(resolve_anchor(&f), Err(GeometryError::NonFinite));
    }

    #[test]
    fn test_anchor_within_envelope() {
        let line = line_string![(x: -3.0, y: 5.0), (x: 7.0, y: -1.0), (x: 2.0, y: 9.0)];
        let geom: Geometry<f64> = line.into();
        let bounds = envelope(&geom).unwrap();
        let f = Feature::new(geom).with_text("zigzag");
        let anchor = resolve_anchor(&f).unwrap().unwrap();
        assert!(bounds.contains(&anchor.position));
    }
}

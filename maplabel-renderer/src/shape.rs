use geo::{Coord, Geometry, LineString};
use maplabel_core::{envelope, GeometryError, LatLng, LatLngBounds, LayerStyle};

use crate::drawable::{DrawOrder, Drawable};
use crate::surface::{LineJoin, ScreenPath, Surface};
use crate::viewport::{ScreenPoint, Viewport};

/// The outline and fill of one feature's geometry.
#[derive(Debug, Clone)]
pub struct ShapeDrawable {
    geometry: Geometry<f64>,
    style: LayerStyle,
    bounds: LatLngBounds,
    /// Polygons and point markers: filled, then stroked.
    areas: ScreenPath,
    /// Line strings: stroked only.
    lines: ScreenPath,
}

impl ShapeDrawable {
    /// Fails if the geometry has no finite envelope.
    pub fn new(geometry: Geometry<f64>, style: LayerStyle) -> Result<Self, GeometryError> {
        let bounds = envelope(&geometry)?;
        Ok(Self {
            geometry,
            style,
            bounds,
            areas: ScreenPath::new(),
            lines: ScreenPath::new(),
        })
    }

    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    pub fn style(&self) -> &LayerStyle {
        &self.style
    }
}

fn to_screen(viewport: &Viewport, c: &Coord<f64>) -> ScreenPoint {
    viewport.latlng_to_screen(&LatLng::from(*c))
}

fn ring_points<'a>(
    viewport: &'a Viewport,
    ring: &'a LineString<f64>,
) -> impl Iterator<Item = ScreenPoint> + 'a {
    ring.coords()
        .map(move |c| to_screen(viewport, c))
        .filter(ScreenPoint::is_finite)
}

fn build_paths(
    geometry: &Geometry<f64>,
    viewport: &Viewport,
    radius: f64,
    areas: &mut ScreenPath,
    lines: &mut ScreenPath,
) {
    match geometry {
        Geometry::Point(p) => {
            let s = to_screen(viewport, &p.0);
            if s.is_finite() {
                areas.push_circle(s, radius);
            }
        }
        Geometry::MultiPoint(mp) => {
            for p in mp.iter() {
                build_paths(&Geometry::Point(*p), viewport, radius, areas, lines);
            }
        }
        Geometry::Line(l) => {
            lines.push_line([l.start, l.end].iter().map(|c| to_screen(viewport, c)));
        }
        Geometry::LineString(ls) => lines.push_line(ring_points(viewport, ls)),
        Geometry::MultiLineString(mls) => {
            for ls in mls.iter() {
                lines.push_line(ring_points(viewport, ls));
            }
        }
        Geometry::Polygon(poly) => {
            areas.push_ring(ring_points(viewport, poly.exterior()));
            for hole in poly.interiors() {
                areas.push_ring(ring_points(viewport, hole));
            }
        }
        Geometry::MultiPolygon(mp) => {
            for poly in mp.iter() {
                areas.push_ring(ring_points(viewport, poly.exterior()));
                for hole in poly.interiors() {
                    areas.push_ring(ring_points(viewport, hole));
                }
            }
        }
        Geometry::Rect(r) => {
            areas.push_ring(ring_points(viewport, r.to_polygon().exterior()));
        }
        Geometry::Triangle(t) => {
            areas.push_ring(t.to_array().iter().map(|c| to_screen(viewport, c)));
        }
        Geometry::GeometryCollection(gc) => {
            for g in gc.iter() {
                build_paths(g, viewport, radius, areas, lines);
            }
        }
    }
}

impl Drawable for ShapeDrawable {
    fn redraw(&mut self, surface: &mut dyn Surface, viewport: &Viewport) {
        self.areas.clear();
        self.lines.clear();
        build_paths(
            &self.geometry,
            viewport,
            self.style.point_radius,
            &mut self.areas,
            &mut self.lines,
        );

        if !self.areas.is_empty() {
            surface.set_global_alpha(self.style.fill_opacity);
            surface.set_fill_style(self.style.fill_color);
            surface.fill_path(&self.areas);
        }

        if !self.areas.is_empty() || !self.lines.is_empty() {
            surface.set_global_alpha(1.0);
            surface.set_stroke_style(self.style.stroke_color);
            surface.set_line_width(self.style.weight);
            surface.set_line_join(LineJoin::Round);
            if !self.areas.is_empty() {
                surface.stroke_path(&self.areas);
            }
            if !self.lines.is_empty() {
                surface.stroke_path(&self.lines);
            }
        }
    }

    fn bounds(&self) -> LatLngBounds {
        self.bounds
    }

    fn order(&self) -> DrawOrder {
        DrawOrder::Shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_data::{DrawCommand, RecordingSurface};
    use geo::{line_string, point, polygon, GeometryCollection};
    use maplabel_core::Color;

    fn viewport() -> Viewport {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.set_view(LatLng::new(1.0, 1.0), 6.0);
        vp
    }

    #[test]
    fn test_polygon_filled_then_stroked() {
        let style = LayerStyle::default().with_colors(Color::rgb(255, 0, 0), Color::rgb(0, 255, 0));
        let square = polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 2.0), (x: 2.0, y: 2.0), (x: 2.0, y: 0.0)];
        let mut shape = ShapeDrawable::new(square.into(), style).unwrap();
        let mut surface = RecordingSurface::new();
        shape.redraw(&mut surface, &viewport());

        let cmds = surface.commands();
        let fill = cmds.iter().position(|c| matches!(c, DrawCommand::FillPath { .. })).unwrap();
        let stroke = cmds.iter().position(|c| matches!(c, DrawCommand::StrokePath { .. })).unwrap();
        assert!(fill < stroke);
        assert!(cmds.contains(&DrawCommand::SetGlobalAlpha { alpha: 0.2 }));
        assert!(cmds.contains(&DrawCommand::SetLineWidth { width: 2.0 }));
        assert!(cmds.contains(&DrawCommand::SetStrokeStyle { color: Color::rgb(255, 0, 0) }));
    }

    #[test]
    fn test_line_is_only_stroked() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 2.0, y: 2.0)];
        let mut shape = ShapeDrawable::new(line.into(), LayerStyle::default()).unwrap();
        let mut surface = RecordingSurface::new();
        shape.redraw(&mut surface, &viewport());
        assert!(!surface.commands().iter().any(|c| matches!(c, DrawCommand::FillPath { .. })));
        assert_eq!(surface.paint_count(), 1);
    }

    #[test]
    fn test_point_drawn_as_circle_marker() {
        let mut shape = ShapeDrawable::new(point!(x: 1.0, y: 1.0).into(), LayerStyle::default()).unwrap();
        let mut surface = RecordingSurface::new();
        shape.redraw(&mut surface, &viewport());
        let fill = surface
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::FillPath { path } => Some(path.clone()),
                _ => None,
            })
            .unwrap();
        assert!(matches!(fill.segments()[0], crate::surface::Segment::Circle { radius, .. } if radius == 4.0));
    }

    #[test]
    fn test_empty_geometry_rejected() {
        let empty = Geometry::GeometryCollection(GeometryCollection::<f64>(vec![]));
        assert_eq!(
            ShapeDrawable::new(empty, LayerStyle::default()).unwrap_err(),
            GeometryError::Empty
        );
    }

    #[test]
    fn test_redraw_reuses_buffers() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 2.0), (x: 2.0, y: 2.0), (x: 2.0, y: 0.0)];
        let mut shape = ShapeDrawable::new(square.into(), LayerStyle::default()).unwrap();
        let mut surface = RecordingSurface::new();
        shape.redraw(&mut surface, &viewport());
        shape.redraw(&mut surface, &viewport());
        assert_eq!(shape.areas.segments().len(), 1);
    }
}

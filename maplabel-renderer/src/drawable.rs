use std::fmt;

use maplabel_core::LatLngBounds;
use uuid::Uuid;

use crate::map::MapCanvas;
use crate::surface::Surface;
use crate::viewport::Viewport;

/// Identifier of a drawable attached to a [`MapCanvas`].
pub type DrawableId = Uuid;

/// Paint pass a drawable belongs to. Lower passes are painted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DrawOrder {
    Shape,
    Label,
}

/// A unit of paintable content bound to geographic coordinates.
///
/// `redraw` is called by the map whenever the viewport changes. It must not
/// panic and reports nothing: a drawable that cannot paint for the current
/// viewport simply paints nothing.
pub trait Drawable: fmt::Debug {
    fn redraw(&mut self, surface: &mut dyn Surface, viewport: &Viewport);

    /// Geographic extent used for viewport culling.
    fn bounds(&self) -> LatLngBounds;

    /// Pixels the painted content may reach beyond `bounds` at `zoom`.
    fn screen_margin(&self, _zoom: f64) -> f64 {
        0.0
    }

    fn order(&self) -> DrawOrder;
}

/// `drawable.add_to(&mut map)` as sugar for `map.add(Box::new(drawable))`.
pub trait AddTo {
    fn add_to(self, map: &mut MapCanvas) -> DrawableId;
}

impl<D: Drawable + 'static> AddTo for D {
    fn add_to(self, map: &mut MapCanvas) -> DrawableId {
        map.add(Box::new(self))
    }
}

use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<geo::Coord<f64>> for LatLng {
    /// GeoJSON positions are `[lng, lat]`, so `x` is longitude.
    fn from(c: geo::Coord<f64>) -> Self {
        Self::new(c.y, c.x)
    }
}

impl From<geo::Point<f64>> for LatLng {
    fn from(p: geo::Point<f64>) -> Self {
        Self::new(p.y(), p.x())
    }
}

/// An axis-aligned geographic bounding envelope.
///
/// A freshly created `LatLngBounds::empty()` is not valid until it has been
/// extended with at least one finite coordinate. Extending never shrinks the
/// envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(a: LatLng, b: LatLng) -> Self {
        Self {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    pub fn empty() -> Self {
        Self {
            south_west: LatLng::new(f64::INFINITY, f64::INFINITY),
            north_east: LatLng::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: &[LatLng]) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.extend(*p);
        }
        bounds
    }

    pub fn is_valid(&self) -> bool {
        self.south_west.is_finite()
            && self.north_east.is_finite()
            && self.south_west.lat <= self.north_east.lat
            && self.south_west.lng <= self.north_east.lng
    }

    /// Grow the envelope to include `point`. Non-finite points are ignored.
    pub fn extend(&mut self, point: LatLng) {
        if !point.is_finite() {
            return;
        }
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Grow the envelope to include `other`. Invalid bounds are ignored.
    pub fn extend_bounds(&mut self, other: &LatLngBounds) {
        if !other.is_valid() {
            return;
        }
        self.extend(other.south_west);
        self.extend(other.north_east);
    }

    pub fn union(&self, other: &LatLngBounds) -> Self {
        let mut merged = *self;
        merged.extend_bounds(other);
        merged
    }

    /// Center of the envelope, or `None` while the bounds are invalid.
    pub fn center(&self) -> Option<LatLng> {
        if !self.is_valid() {
            return None;
        }
        Some(LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        ))
    }

    pub fn width(&self) -> f64 {
        self.north_east.lng - self.south_west.lng
    }

    pub fn height(&self) -> f64 {
        self.north_east.lat - self.south_west.lat
    }

    pub fn contains(&self, p: &LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }

    pub fn intersects(&self, other: &LatLngBounds) -> bool {
        self.south_west.lng <= other.north_east.lng
            && self.north_east.lng >= other.south_west.lng
            && self.south_west.lat <= other.north_east.lat
            && self.north_east.lat >= other.south_west.lat
    }
}

impl Default for LatLngBounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<geo::Rect<f64>> for LatLngBounds {
    fn from(r: geo::Rect<f64>) -> Self {
        Self::new(r.min().into(), r.max().into())
    }
}

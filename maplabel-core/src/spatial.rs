use std::fmt;

use log::debug;
use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::{LatLng, LatLngBounds};

/// An entry in the R-tree spatial index: a key and its geographic envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialEntry<K> {
    pub key: K,
    pub bounds: LatLngBounds,
}

impl<K> RTreeObject for SpatialEntry<K> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        to_aabb(&self.bounds)
    }
}

fn to_aabb(bounds: &LatLngBounds) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [bounds.south_west.lng, bounds.south_west.lat],
        [bounds.north_east.lng, bounds.north_east.lat],
    )
}

/// Spatial index for viewport culling of drawables.
pub struct SpatialIndex<K> {
    tree: RTree<SpatialEntry<K>>,
}

impl<K: PartialEq> SpatialIndex<K> {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Build the index in one pass.
    pub fn build(entries: Vec<SpatialEntry<K>>) -> Self {
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Insert a single entry. Entries with invalid bounds are not indexed.
    pub fn insert(&mut self, key: K, bounds: LatLngBounds) -> bool {
        if !bounds.is_valid() {
            debug!("not indexing entry with invalid bounds {:?}", bounds);
            return false;
        }
        self.tree.insert(SpatialEntry { key, bounds });
        true
    }

    /// Remove the entry for `key` that was inserted with `bounds`.
    pub fn remove(&mut self, key: &K, bounds: &LatLngBounds) -> bool {
        let selector = KeySelector {
            key,
            envelope: to_aabb(bounds),
        };
        self.tree.remove_with_selection_function(selector).is_some()
    }

    /// Find all entries whose envelope contains the given coordinate.
    pub fn query_point(&self, point: &LatLng) -> Vec<&SpatialEntry<K>> {
        self.tree
            .locate_in_envelope_intersecting(&AABB::from_point([point.lng, point.lat]))
            .collect()
    }

    /// Find all entries that intersect the given bounds.
    pub fn query_bounds(&self, bounds: &LatLngBounds) -> Vec<&SpatialEntry<K>> {
        self.tree
            .locate_in_envelope_intersecting(&to_aabb(bounds))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }
}

impl<K> fmt::Debug for SpatialIndex<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.tree.size())
            .finish()
    }
}

impl<K: PartialEq> Default for SpatialIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

struct KeySelector<'a, K> {
    key: &'a K,
    envelope: AABB<[f64; 2]>,
}

impl<K: PartialEq> rstar::SelectionFunction<SpatialEntry<K>> for KeySelector<'_, K> {
    fn should_unpack_parent(&self, envelope: &AABB<[f64; 2]>) -> bool {
        use rstar::Envelope;
        envelope.contains_envelope(&self.envelope)
    }

    fn should_unpack_leaf(&self, leaf: &SpatialEntry<K>) -> bool {
        &leaf.key == self.key
    }
}

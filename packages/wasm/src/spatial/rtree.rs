//! R-tree hit testing over drawn nodes, using the rstar crate.
//!
//! Coordinates are those of the drawing group, i.e. relative to the centre
//! of the radial tree.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::tree::NodeKey;

/// Upper bound on drawn circle radii (log10 of u32::MAX × 1.5 + 1).
const MAX_RADIUS: f32 = 16.0;

/// A drawn node: its key, centre and circle radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePoint {
    pub key: NodeKey,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl NodePoint {
    pub fn new(key: NodeKey, x: f32, y: f32, radius: f32) -> Self {
        Self { key, x, y, radius }
    }
}

impl RTreeObject for NodePoint {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for NodePoint {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index answering "which node is under the pointer".
pub struct SpatialIndex {
    tree: RTree<NodePoint>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Replace the index contents. Bulk loading beats incremental inserts here
    /// since every update moves most nodes.
    pub fn rebuild(&mut self, points: Vec<NodePoint>) {
        self.tree = RTree::bulk_load(points);
    }

    /// Node under `(x, y)`: the nearest one whose circle, widened by
    /// `tolerance`, contains the point.
    pub fn hit(&self, x: f32, y: f32, tolerance: f32) -> Option<NodeKey> {
        self.tree
            .nearest_neighbor_iter(&[x, y])
            .take_while(|point| {
                // Circles are small; anything further than the largest
                // plausible reach is not a hit.
                point.distance_2(&[x, y]).sqrt() <= point.radius.max(MAX_RADIUS) + tolerance
            })
            .find(|point| point.distance_2(&[x, y]).sqrt() <= point.radius + tolerance)
            .map(|point| point.key)
    }

    /// Remove every node.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    /// Get the number of nodes in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

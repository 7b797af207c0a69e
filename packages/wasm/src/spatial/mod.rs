//! Spatial indexing for O(log n) hit testing.
//!
//! This module provides an R-tree over the nodes currently drawn, so pointer
//! coordinates can be mapped back to the node under them.

mod rtree;

pub use rtree::{NodePoint, SpatialIndex};

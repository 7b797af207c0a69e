//! Layout algorithms.
//!
//! This module contains the radial tree layout that places the visible part
//! of the search tree: angle from sibling order, radius from depth.

pub mod radial_tree;

pub use radial_tree::{Link, PlacedNode, RadialLayout, RadialTreeConfig, RadialTreeLayout, Separation};

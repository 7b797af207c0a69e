//! Search tree model.
//!
//! The tree is stored in petgraph's StableGraph, with the sibling ordinal as
//! edge weight so child order survives. Expand/collapse only flips a per-node
//! flag; the edges themselves never change after loading.

mod document;
mod game_tree;
mod node;

pub use document::NodeDocument;
pub use game_tree::GameTree;
pub use node::{Expansion, GameNode, NodeKey, Player, Polar};
pub use petgraph::stable_graph::NodeIndex;

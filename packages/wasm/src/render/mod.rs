//! Rendering: visual encodings, SVG geometry, and the enter/update/exit
//! pipeline that turns layouts into animated transitions.

pub mod diff;
pub mod path;
pub mod scene;
pub mod style;
pub mod svg;

pub use diff::{DiffVisitor, KeyedDiff};
pub use scene::{LinkTransition, NodeTransition, Phase, Scene, UpdateFrame};

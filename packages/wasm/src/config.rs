//! Visualization configuration.
//!
//! Passed from JavaScript as a plain object; every field is optional and
//! falls back to the values the page was tuned with.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VisError};

/// Configuration for layout, animation and the drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisConfig {
    /// Nominal diameter of the drawing. Seeds the root's previous position
    /// and bounds the layout's radial extent.
    pub diameter: f32,
    /// Angular span (degrees) the tree is spread over.
    pub angular_span: f32,
    /// Radial distance between consecutive depth levels.
    pub level_spacing: f32,
    /// Separation numerator for siblings sharing a parent.
    pub sibling_separation: f32,
    /// Separation numerator for neighbours from different parents.
    pub cousin_separation: f32,
    /// Transition duration in milliseconds.
    pub duration_ms: u32,
    /// Width of the viewport the drawing is centred in.
    pub viewport_width: f32,
    /// Height of the viewport the drawing is centred in.
    pub viewport_height: f32,
    /// Subtrees below this depth start collapsed. `None` keeps everything expanded.
    pub initial_depth: Option<u32>,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            diameter: 1000.0,
            angular_span: 360.0,
            level_spacing: 120.0,
            sibling_separation: 1.0,
            cousin_separation: 10.0,
            duration_ms: 350,
            viewport_width: 960.0,
            viewport_height: 800.0,
            initial_depth: None,
        }
    }
}

impl VisConfig {
    /// Radial extent handed to the layout (before per-depth normalization).
    pub fn layout_radius(&self) -> f32 {
        self.diameter / 2.0 - 80.0
    }

    /// Previous position the root is seeded with before the first update.
    pub fn root_seed(&self) -> (f32, f32) {
        (self.diameter / 2.0, 0.0)
    }

    /// Reject values the layout cannot work with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("diameter", self.diameter),
            ("angularSpan", self.angular_span),
            ("levelSpacing", self.level_spacing),
            ("siblingSeparation", self.sibling_separation),
            ("cousinSeparation", self.cousin_separation),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(VisError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if !self.viewport_width.is_finite() || !self.viewport_height.is_finite() {
            return Err(VisError::Config("viewport size must be finite".to_string()));
        }
        Ok(())
    }
}

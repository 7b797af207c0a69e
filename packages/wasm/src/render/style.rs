//! Visual encodings of search statistics.
//!
//! Circle size and link weight grow with `log10(visits)`, link opacity with
//! the share of the parent's visits a child received.

use serde::Serialize;

/// Stand-in for zero in radii and opacities; keeps animations interpolable.
pub const VANISHING: f32 = 1e-6;

/// Distance between a node's centre and its label.
pub const LABEL_OFFSET: f32 = 10.0;

#[inline]
fn log_visits(visits: u32) -> f32 {
    (visits.max(1) as f32).log10()
}

/// Radius of a node's circle. Non-decreasing in `visits`, 1.0 at one visit.
pub fn circle_radius(visits: u32) -> f32 {
    log_visits(visits) * 1.5 + 1.0
}

/// Win rate in percent, rounded to one decimal.
pub fn win_rate(wins: f64, visits: u32) -> f64 {
    if visits == 0 {
        return 0.0;
    }
    (wins / visits as f64 * 1000.0).round() / 10.0
}

/// Node label: `visits (winrate)`.
pub fn label(visits: u32, wins: f64) -> String {
    format!("{} ({:.1})", visits, win_rate(wins, visits))
}

/// Link opacity from the fraction of the parent's visits spent on the child.
pub fn link_opacity(parent_visits: u32, child_visits: u32) -> f32 {
    if parent_visits == 0 {
        return 1.0;
    }
    let share = (child_visits as f32 / parent_visits as f32).min(1.0);
    0.98 * share + 0.02
}

/// Link stroke width.
pub fn link_width(child_visits: u32) -> f32 {
    log_visits(child_visits).powi(2) / 1.5
}

/// Text anchor for a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAnchor {
    Start,
    End,
}

impl LabelAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelAnchor::Start => "start",
            LabelAnchor::End => "end",
        }
    }
}

/// Label placement for a node at `angle` degrees.
///
/// On the far half of the circle the label is turned upside down again and
/// anchored at its end, so it reads left-to-right and points away from the node.
pub fn label_placement(angle: f32) -> (LabelAnchor, String) {
    if angle < 180.0 {
        (LabelAnchor::Start, format!("translate({LABEL_OFFSET})"))
    } else {
        (
            LabelAnchor::End,
            format!("rotate(180)translate(-{LABEL_OFFSET})"),
        )
    }
}

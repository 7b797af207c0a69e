//! SVG geometry: node transforms and radial diagonal paths.

use std::fmt::Write;

use crate::tree::Polar;

/// Format a coordinate compactly: at most three decimals, no trailing zeros.
pub fn num(value: f32) -> String {
    let mut s = format!("{value:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s.remove(0);
    }
    s
}

/// Transform placing a node group at `p`.
pub fn node_transform(p: Polar) -> String {
    format!("rotate({})translate({})", num(p.angle - 90.0), num(p.radius))
}

/// Smooth cubic curve from `source` to `target` in radial coordinates.
///
/// Control points sit at the mean radius on the source's and the target's
/// angles, so the curve leaves the parent radially and enters the child radially.
pub fn diagonal(source: Polar, target: Polar) -> String {
    let m = (source.radius + target.radius) / 2.0;
    let points = [
        source,
        Polar::new(source.angle, m),
        Polar::new(target.angle, m),
        target,
    ]
    .map(Polar::to_cartesian);

    let mut d = String::with_capacity(64);
    // Writing into a String cannot fail.
    let _ = write!(d, "M{},{}", num(points[0].0), num(points[0].1));
    let _ = write!(
        d,
        "C{},{} {},{} {},{}",
        num(points[1].0),
        num(points[1].1),
        num(points[2].0),
        num(points[2].1),
        num(points[3].0),
        num(points[3].1)
    );
    d
}

/// Zero-length path collapsed onto a single point.
pub fn collapsed_diagonal(at: Polar) -> String {
    diagonal(at, at)
}

//! Static SVG snapshot of a scene.

use std::fmt::Write;

use super::path::num;
use super::scene::Scene;

/// Escape text for use in SVG content and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize the scene's current state as a standalone SVG document.
///
/// Links are emitted before nodes so nodes paint on top of them.
pub fn render(scene: &Scene) -> String {
    let config = scene.config();
    let (cx, cy) = scene.center();
    let mut svg = String::with_capacity(256 + scene.node_count() * 256);

    // Writing into a String cannot fail.
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="vis" width="{}" height="{}">"#,
        num(config.viewport_width),
        num(config.viewport_height)
    );
    let _ = write!(svg, r#"<g transform="translate({},{})">"#, num(cx), num(cy));

    for (_, link) in scene.links() {
        let _ = write!(
            svg,
            r#"<path class="link" d="{}" stroke-opacity="{}" stroke-width="{}"/>"#,
            link.attrs.d,
            num(link.attrs.stroke_opacity),
            num(link.attrs.stroke_width)
        );
    }

    for (_, element) in scene.nodes() {
        let visual = &element.visual;
        let attrs = &element.attrs;
        let mut class = String::from("node");
        for extra in [visual.class, if visual.collapsed { "parent" } else { "" }] {
            if !extra.is_empty() {
                class.push(' ');
                class.push_str(extra);
            }
        }
        let _ = write!(
            svg,
            r#"<g class="{}" transform="{}"><title>{}</title><circle r="{}"/>"#,
            class,
            attrs.transform,
            escape(&visual.title),
            num(attrs.circle_radius)
        );
        let _ = write!(
            svg,
            r#"<text dy=".35em" text-anchor="{}" transform="{}" fill-opacity="{}">{}</text></g>"#,
            attrs.label_anchor.as_str(),
            attrs.label_transform,
            num(attrs.label_opacity),
            escape(&visual.label)
        );
    }

    svg.push_str("</g></svg>");
    svg
}

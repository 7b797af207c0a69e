//! Buchheim-Junger-Leipert tidy tree layout in polar coordinates.
//!
//! Implements the O(n) algorithm from "Improving Walker's Algorithm to Run in
//! Linear Time" (Buchheim, Junger, Leipert, 2002) over the visible part of a
//! search tree, with a depth-dependent separation policy.
//!
//! # Algorithm Overview
//!
//! 1. **First walk (bottom-up):** Recursively assign preliminary x-coordinates
//!    to each node by merging subtree contours. Uses threads for O(1) amortized
//!    contour traversal.
//! 2. **Second walk (top-down):** Apply accumulated modifiers to convert
//!    preliminary x-coordinates to final positions.
//! 3. **Coordinate transform:** Scale x into the angular span (degrees) and
//!    depth into the radial extent.

use crate::tree::{GameTree, NodeIndex};

/// Separation between neighbouring nodes of the same level.
///
/// Neighbours from different parents get `cousin / depth`, siblings get
/// `sibling / depth`: wide gaps near the root where labels crowd, compact
/// spacing deep in the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separation {
    pub sibling: f32,
    pub cousin: f32,
}

impl Separation {
    /// Separation for a node at `depth`. Depth 0 counts as 1.
    #[inline]
    pub fn between(&self, same_parent: bool, depth: u32) -> f32 {
        let numerator = if same_parent { self.sibling } else { self.cousin };
        numerator / depth.max(1) as f32
    }
}

impl Default for Separation {
    fn default() -> Self {
        Self {
            sibling: 1.0,
            cousin: 10.0,
        }
    }
}

/// Configuration for the radial tree layout.
#[derive(Debug, Clone)]
pub struct RadialTreeConfig {
    /// Angular span in degrees the leftmost..rightmost nodes are mapped into.
    pub angular_span: f32,
    /// Radius of the deepest level.
    pub radial_extent: f32,
    /// Separation policy.
    pub separation: Separation,
}

impl Default for RadialTreeConfig {
    fn default() -> Self {
        Self {
            angular_span: 360.0,
            radial_extent: 420.0,
            separation: Separation::default(),
        }
    }
}

/// Internal node data used during the Buchheim algorithm.
#[derive(Debug)]
struct LayoutNode {
    /// Tree node this layout node stands for.
    node: NodeIndex,
    /// Depth in the tree (root = 0).
    depth: u32,
    /// Parent layout index (None for root).
    parent: Option<usize>,
    /// Visible children, in sibling order.
    children: Vec<usize>,
    /// Preliminary x-coordinate (from first walk).
    prelim: f32,
    /// Modifier for subtree shift (accumulated in first walk, applied in second).
    modifier: f32,
    /// Contour thread for leaves.
    thread: Option<usize>,
    /// Ancestor pointer (for the "default ancestor" in apportion).
    ancestor: usize,
    /// Shift value for even spacing of intermediate children.
    shift: f32,
    /// Change value for even spacing of intermediate children.
    change: f32,
    /// Left-to-right index among siblings.
    number: usize,
}

/// A node with its computed position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedNode {
    pub node: NodeIndex,
    pub parent: Option<NodeIndex>,
    pub depth: u32,
    /// Angular position in degrees, within `0..=angular_span`.
    pub x: f32,
    /// Radial position.
    pub y: f32,
}

/// A parent → child connection between two placed nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub source: NodeIndex,
    pub target: NodeIndex,
}

/// Result of the layout: nodes in pre-order plus the links between them.
#[derive(Debug, Clone, Default)]
pub struct RadialLayout {
    pub nodes: Vec<PlacedNode>,
    pub links: Vec<Link>,
}

/// The radial tree layout engine.
pub struct RadialTreeLayout {
    config: RadialTreeConfig,
}

impl RadialTreeLayout {
    /// Create a new radial tree layout with the given configuration.
    pub fn new(config: RadialTreeConfig) -> Self {
        Self { config }
    }

    /// Create a radial tree layout with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RadialTreeConfig::default())
    }

    pub fn config(&self) -> &RadialTreeConfig {
        &self.config
    }

    /// Lay out every node reachable from the root through expanded nodes.
    pub fn compute(&self, tree: &GameTree) -> RadialLayout {
        let mut nodes: Vec<LayoutNode> = Vec::new();
        Self::build_layout_tree(tree, tree.root(), None, 0, 0, &mut nodes);

        self.first_walk(0, &mut nodes);

        let mut final_x = vec![0.0f32; nodes.len()];
        Self::second_walk(0, 0.0, &nodes, &mut final_x);

        // Leftmost, rightmost and deepest nodes bound the coordinate transform.
        let mut left = 0;
        let mut right = 0;
        let mut bottom = 0;
        for i in 1..nodes.len() {
            if final_x[i] < final_x[left] {
                left = i;
            }
            if final_x[i] > final_x[right] {
                right = i;
            }
            if nodes[i].depth > nodes[bottom].depth {
                bottom = i;
            }
        }

        let tx = self.separation(left, right, &nodes) / 2.0 - final_x[left];
        let kx = self.config.angular_span
            / (final_x[right] + self.separation(right, left, &nodes) / 2.0 + tx);
        let ky = self.config.radial_extent / nodes[bottom].depth.max(1) as f32;

        let mut layout = RadialLayout {
            nodes: Vec::with_capacity(nodes.len()),
            links: Vec::with_capacity(nodes.len().saturating_sub(1)),
        };

        // Layout nodes were built in pre-order, so the output keeps that order.
        for (i, node) in nodes.iter().enumerate() {
            let parent = node.parent.map(|p| nodes[p].node);
            layout.nodes.push(PlacedNode {
                node: node.node,
                parent,
                depth: node.depth,
                x: (final_x[i] + tx) * kx,
                y: node.depth as f32 * ky,
            });
            for &child in &node.children {
                layout.links.push(Link {
                    source: node.node,
                    target: nodes[child].node,
                });
            }
        }

        layout
    }

    /// Separation between two layout nodes, using the first node's depth.
    fn separation(&self, a: usize, b: usize, nodes: &[LayoutNode]) -> f32 {
        let same_parent = nodes[a].parent == nodes[b].parent;
        self.config.separation.between(same_parent, nodes[a].depth)
    }

    /// Build the layout tree via DFS over visible children.
    fn build_layout_tree(
        tree: &GameTree,
        node: NodeIndex,
        parent: Option<usize>,
        depth: u32,
        number: usize,
        nodes: &mut Vec<LayoutNode>,
    ) -> usize {
        let layout_idx = nodes.len();
        nodes.push(LayoutNode {
            node,
            depth,
            parent,
            children: Vec::new(),
            prelim: 0.0,
            modifier: 0.0,
            thread: None,
            ancestor: layout_idx,
            shift: 0.0,
            change: 0.0,
            number,
        });

        let children: Vec<usize> = tree
            .visible_children(node)
            .into_iter()
            .enumerate()
            .map(|(number, child)| {
                Self::build_layout_tree(tree, child, Some(layout_idx), depth + 1, number, nodes)
            })
            .collect();

        nodes[layout_idx].children = children;
        layout_idx
    }

    /// Left sibling of a node, if any.
    fn left_sibling(v: usize, nodes: &[LayoutNode]) -> Option<usize> {
        let parent = nodes[v].parent?;
        let number = nodes[v].number;
        if number == 0 {
            None
        } else {
            Some(nodes[parent].children[number - 1])
        }
    }

    /// Buchheim first walk: bottom-up assignment of preliminary x-coordinates.
    fn first_walk(&self, v: usize, nodes: &mut Vec<LayoutNode>) {
        // Clone children indices to avoid borrow conflict during recursion
        let children: Vec<usize> = nodes[v].children.clone();
        let left_sibling = Self::left_sibling(v, nodes);

        if children.is_empty() {
            nodes[v].prelim = match left_sibling {
                Some(w) => nodes[w].prelim + self.separation(v, w, nodes),
                None => 0.0,
            };
            return;
        }

        let mut default_ancestor = children[0];
        for &child in &children {
            self.first_walk(child, nodes);
            default_ancestor = self.apportion(child, default_ancestor, nodes);
        }

        self.execute_shifts(v, nodes);

        // Center parent over first and last children
        let midpoint =
            (nodes[children[0]].prelim + nodes[children[children.len() - 1]].prelim) / 2.0;
        match left_sibling {
            Some(w) => {
                nodes[v].prelim = nodes[w].prelim + self.separation(v, w, nodes);
                nodes[v].modifier = nodes[v].prelim - midpoint;
            }
            None => nodes[v].prelim = midpoint,
        }
    }

    /// Get the next node on the right contour of a subtree.
    fn next_right(v: usize, nodes: &[LayoutNode]) -> Option<usize> {
        nodes[v].children.last().copied().or(nodes[v].thread)
    }

    /// Get the next node on the left contour of a subtree.
    fn next_left(v: usize, nodes: &[LayoutNode]) -> Option<usize> {
        nodes[v].children.first().copied().or(nodes[v].thread)
    }

    /// Apportion: push `v`'s subtree right until it clears every subtree to
    /// its left, walking the facing contours level by level.
    fn apportion(&self, v: usize, mut default_ancestor: usize, nodes: &mut Vec<LayoutNode>) -> usize {
        let Some(w) = Self::left_sibling(v, nodes) else {
            return default_ancestor;
        };

        // Inner/outer contours on the right (p, v's side) and left (m, w's side).
        let mut v_inner_right = v;
        let mut v_outer_right = v;
        let mut v_inner_left = w;
        let mut v_outer_left = match nodes[v].parent {
            Some(parent) => nodes[parent].children[0],
            None => v,
        };

        let mut s_inner_right = nodes[v_inner_right].modifier;
        let mut s_outer_right = nodes[v_outer_right].modifier;
        let mut s_inner_left = nodes[v_inner_left].modifier;
        let mut s_outer_left = nodes[v_outer_left].modifier;

        loop {
            let (Some(il), Some(ir)) = (
                Self::next_right(v_inner_left, nodes),
                Self::next_left(v_inner_right, nodes),
            ) else {
                break;
            };
            v_inner_left = il;
            v_inner_right = ir;
            if let Some(next) = Self::next_left(v_outer_left, nodes) {
                v_outer_left = next;
            }
            if let Some(next) = Self::next_right(v_outer_right, nodes) {
                v_outer_right = next;
            }
            nodes[v_outer_right].ancestor = v;

            let shift = (nodes[v_inner_left].prelim + s_inner_left)
                - (nodes[v_inner_right].prelim + s_inner_right)
                + self.separation(v_inner_left, v_inner_right, nodes);

            if shift > 0.0 {
                let ancestor = self.next_ancestor(v_inner_left, v, default_ancestor, nodes);
                Self::move_subtree(ancestor, v, shift, nodes);
                s_inner_right += shift;
                s_outer_right += shift;
            }

            s_inner_left += nodes[v_inner_left].modifier;
            s_inner_right += nodes[v_inner_right].modifier;
            s_outer_left += nodes[v_outer_left].modifier;
            s_outer_right += nodes[v_outer_right].modifier;
        }

        // Set threads
        if let Some(next) = Self::next_right(v_inner_left, nodes) {
            if Self::next_right(v_outer_right, nodes).is_none() {
                nodes[v_outer_right].thread = Some(next);
                nodes[v_outer_right].modifier += s_inner_left - s_outer_right;
            }
        }

        if let Some(next) = Self::next_left(v_inner_right, nodes) {
            if Self::next_left(v_outer_left, nodes).is_none() {
                nodes[v_outer_left].thread = Some(next);
                nodes[v_outer_left].modifier += s_inner_right - s_outer_left;
                default_ancestor = v;
            }
        }

        default_ancestor
    }

    /// The greatest distinct ancestor of `v_inner_left` among `v`'s siblings,
    /// or the default ancestor when that pointer is stale.
    fn next_ancestor(
        &self,
        v_inner_left: usize,
        v: usize,
        default_ancestor: usize,
        nodes: &[LayoutNode],
    ) -> usize {
        let ancestor = nodes[v_inner_left].ancestor;
        if nodes[ancestor].parent == nodes[v].parent {
            ancestor
        } else {
            default_ancestor
        }
    }

    /// Move subtree: shift `wr` right and spread the shift over the siblings
    /// between `wl` and `wr`.
    fn move_subtree(wl: usize, wr: usize, shift: f32, nodes: &mut [LayoutNode]) {
        let subtrees = (nodes[wr].number as f32 - nodes[wl].number as f32).max(1.0);
        let per_subtree = shift / subtrees;

        nodes[wr].change -= per_subtree;
        nodes[wr].shift += shift;
        nodes[wl].change += per_subtree;
        nodes[wr].prelim += shift;
        nodes[wr].modifier += shift;
    }

    /// Execute accumulated shifts for children of node v.
    fn execute_shifts(&self, v: usize, nodes: &mut Vec<LayoutNode>) {
        let children: Vec<usize> = nodes[v].children.clone();
        let mut shift = 0.0f32;
        let mut change = 0.0f32;

        for &child in children.iter().rev() {
            nodes[child].prelim += shift;
            nodes[child].modifier += shift;
            change += nodes[child].change;
            shift += nodes[child].shift + change;
        }
    }

    /// Second walk: apply accumulated modifiers to get final x-coordinates.
    fn second_walk(v: usize, modifier_sum: f32, nodes: &[LayoutNode], final_x: &mut [f32]) {
        final_x[v] = nodes[v].prelim + modifier_sum;

        for &child in &nodes[v].children {
            Self::second_walk(child, modifier_sum + nodes[v].modifier, nodes, final_x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(json: &str) -> GameTree {
        GameTree::from_json(json).unwrap()
    }

    fn placed(layout: &RadialLayout, tree: &GameTree, mv: &str) -> PlacedNode {
        *layout
            .nodes
            .iter()
            .find(|p| tree.node(p.node).mv == mv)
            .unwrap_or_else(|| panic!("{mv} not laid out"))
    }

    const FORK: &str = r#"{"player":"n","move":"R","visits":10,"wins":5,"children":[
        {"player":"b","move":"A","visits":5,"wins":2},
        {"player":"b","move":"B","visits":5,"wins":3}]}"#;

    const DEEP: &str = r#"{"player":"n","move":"R","visits":30,"wins":15,"children":[
        {"player":"b","move":"A","visits":20,"wins":10,"children":[
            {"player":"w","move":"A1","visits":10,"wins":5},
            {"player":"w","move":"A2","visits":9,"wins":5}]},
        {"player":"b","move":"B","visits":9,"wins":4,"children":[
            {"player":"w","move":"B1","visits":8,"wins":4}]}]}"#;

    #[test]
    fn test_single_node() {
        let tree = tree(r#"{"player":"b","move":"D4","visits":1,"wins":1}"#);
        let layout = RadialTreeLayout::with_defaults().compute(&tree);

        assert_eq!(layout.nodes.len(), 1);
        assert!(layout.links.is_empty());
        let root = layout.nodes[0];
        assert!(root.x.is_finite(), "root angle should be finite, got {}", root.x);
        assert_eq!(root.y, 0.0);
    }

    #[test]
    fn test_simple_fork() {
        let tree = tree(FORK);
        let layout = RadialTreeLayout::with_defaults().compute(&tree);

        assert_eq!(layout.nodes.len(), 3);
        assert_eq!(layout.links.len(), 2);

        let root = placed(&layout, &tree, "R");
        let a = placed(&layout, &tree, "A");
        let b = placed(&layout, &tree, "B");

        // Root should be centered over children
        let midpoint = (a.x + b.x) / 2.0;
        assert!(
            (root.x - midpoint).abs() < 0.01,
            "Root x ({}) should be midpoint of children ({midpoint})",
            root.x
        );

        // Two siblings at separation 1 fill the span with half a gap on each side.
        assert!((a.x - 90.0).abs() < 0.01, "A at 90 degrees, got {}", a.x);
        assert!((b.x - 270.0).abs() < 0.01, "B at 270 degrees, got {}", b.x);

        // Deepest level sits on the radial extent
        assert!((a.y - 420.0).abs() < 0.01, "A radius 420, got {}", a.y);
        assert_eq!(root.y, 0.0);
    }

    #[test]
    fn test_preorder_output() {
        let tree = tree(DEEP);
        let layout = RadialTreeLayout::with_defaults().compute(&tree);
        let order: Vec<&str> = layout.nodes.iter().map(|p| tree.node(p.node).mv.as_str()).collect();
        assert_eq!(order, vec!["R", "A", "A1", "A2", "B", "B1"]);
        assert_eq!(layout.nodes[0].parent, None);
        assert_eq!(layout.nodes[2].parent, Some(layout.nodes[1].node));
    }

    #[test]
    fn test_angles_within_span_and_ordered() {
        let tree = tree(DEEP);
        let layout = RadialTreeLayout::with_defaults().compute(&tree);

        for p in &layout.nodes {
            assert!(p.x >= 0.0 && p.x <= 360.0, "angle out of span: {}", p.x);
        }

        let a1 = placed(&layout, &tree, "A1");
        let a2 = placed(&layout, &tree, "A2");
        let b1 = placed(&layout, &tree, "B1");
        assert!(a1.x < a2.x && a2.x < b1.x, "leaves should keep sibling order");
    }

    #[test]
    fn test_cousins_further_apart_than_siblings() {
        let tree = tree(DEEP);
        let layout = RadialTreeLayout::with_defaults().compute(&tree);

        let a1 = placed(&layout, &tree, "A1");
        let a2 = placed(&layout, &tree, "A2");
        let b1 = placed(&layout, &tree, "B1");
        let sibling_gap = a2.x - a1.x;
        let cousin_gap = b1.x - a2.x;
        // Separation at depth 2 is 1/2 for siblings and 10/2 for cousins.
        assert!(
            (cousin_gap / sibling_gap - 10.0).abs() < 0.01,
            "cousin gap {cousin_gap} should be 10x sibling gap {sibling_gap}"
        );
    }

    #[test]
    fn test_collapsed_subtree_not_laid_out() {
        let mut tree = tree(DEEP);
        let a = tree.children(tree.root())[0];
        tree.toggle(a);

        let layout = RadialTreeLayout::with_defaults().compute(&tree);
        assert_eq!(layout.nodes.len(), 4);
        assert_eq!(layout.links.len(), 3);
        assert!(layout.links.iter().all(|l| l.source != a));
    }

    #[test]
    fn test_wide_subtree_does_not_overlap() {
        // Left subtree much wider than right one at depth 2.
        let tree = tree(
            r#"{"player":"n","move":"R","visits":100,"wins":50,"children":[
                {"player":"b","move":"A","visits":60,"wins":30,"children":[
                    {"player":"w","move":"A1","visits":10,"wins":5},
                    {"player":"w","move":"A2","visits":10,"wins":5},
                    {"player":"w","move":"A3","visits":10,"wins":5},
                    {"player":"w","move":"A4","visits":10,"wins":5}]},
                {"player":"b","move":"B","visits":20,"wins":10},
                {"player":"b","move":"C","visits":19,"wins":10,"children":[
                    {"player":"w","move":"C1","visits":10,"wins":5}]}]}"#,
        );
        let layout = RadialTreeLayout::with_defaults().compute(&tree);

        let mut level2: Vec<f32> = layout
            .nodes
            .iter()
            .filter(|p| p.depth == 2)
            .map(|p| p.x)
            .collect();
        let unsorted = level2.clone();
        level2.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(unsorted, level2, "depth-2 nodes should be in document order");

        let a4 = placed(&layout, &tree, "A4");
        let c1 = placed(&layout, &tree, "C1");
        assert!(c1.x > a4.x, "C1 ({}) should be right of A4 ({})", c1.x, a4.x);
    }
}

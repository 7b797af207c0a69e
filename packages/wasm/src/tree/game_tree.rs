//! GameTree - owned search tree with expand/collapse state.

use log::{debug, warn};
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use super::document::NodeDocument;
use super::node::{Expansion, GameNode, NodeKey, Polar};
use crate::error::{Result, VisError};

/// The search tree.
///
/// Nodes are never added or removed after loading. Edges point parent → child
/// and carry the child's position among its siblings.
pub struct GameTree {
    graph: StableGraph<GameNode, u32, Directed>,
    root: NodeIndex,
}

impl GameTree {
    /// Parse a JSON document into a tree.
    pub fn from_json(text: &str) -> Result<Self> {
        let document: NodeDocument = serde_json::from_str(text)?;
        Self::from_document(document)
    }

    /// Build a tree from an already parsed document, validating statistics.
    pub fn from_document(document: NodeDocument) -> Result<Self> {
        let mut graph = StableGraph::new();
        let mut root = None;
        let mut stack: Vec<(NodeDocument, Option<(NodeIndex, u32)>, u32, String)> =
            vec![(document, None, 0, "root".to_string())];

        while let Some((doc, parent, depth, path)) = stack.pop() {
            Self::validate(&doc, &path)?;

            let NodeDocument {
                id,
                player,
                mv,
                visits,
                wins,
                children,
            } = doc;

            let mut node = GameNode::new(player, mv, visits, wins);
            node.source_id = id;
            node.depth = depth;
            let index = graph.add_node(node);

            match parent {
                Some((parent_index, ordinal)) => {
                    graph.add_edge(parent_index, index, ordinal);
                }
                None => root = Some(index),
            }

            for (ordinal, child) in children.into_iter().enumerate() {
                let child_path = format!("{path}/{ordinal}");
                stack.push((child, Some((index, ordinal as u32)), depth + 1, child_path));
            }
        }

        // The stack starts with the root document, so it is always assigned.
        let root = root.ok_or_else(|| VisError::InvalidNode {
            path: "root".to_string(),
            reason: "document has no root".to_string(),
        })?;

        debug!("loaded search tree with {} nodes", graph.node_count());
        Ok(Self { graph, root })
    }

    fn validate(doc: &NodeDocument, path: &str) -> Result<()> {
        if !doc.wins.is_finite() || doc.wins < 0.0 {
            return Err(VisError::InvalidNode {
                path: path.to_string(),
                reason: format!("wins must be a non-negative number, got {}", doc.wins),
            });
        }
        if doc.wins > doc.visits as f64 {
            return Err(VisError::InvalidNode {
                path: path.to_string(),
                reason: format!("wins {} exceed visits {}", doc.wins, doc.visits),
            });
        }
        if doc.visits == 0 {
            warn!("node {path} has no visits; drawing it at minimum size");
        }
        Ok(())
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// The root node.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Get a node.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not belong to this tree.
    pub fn node(&self, index: NodeIndex) -> &GameNode {
        &self.graph[index]
    }

    /// Get a node mutably.
    pub fn node_mut(&mut self, index: NodeIndex) -> &mut GameNode {
        &mut self.graph[index]
    }

    /// Look up a node without panicking.
    pub fn get(&self, index: NodeIndex) -> Option<&GameNode> {
        self.graph.node_weight(index)
    }

    /// All children in document order, regardless of expansion state.
    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<(u32, NodeIndex)> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .map(|edge| (*edge.weight(), edge.target()))
            .collect();
        children.sort_unstable_by_key(|&(ordinal, _)| ordinal);
        children.into_iter().map(|(_, child)| child).collect()
    }

    /// Children currently shown. Empty when the node is collapsed.
    pub fn visible_children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        match self.graph[index].expansion {
            Expansion::Expanded => self.children(index),
            Expansion::Collapsed => Vec::new(),
        }
    }

    /// Children hidden by a collapse. Empty when the node is expanded.
    pub fn collapsed_children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        match self.graph[index].expansion {
            Expansion::Expanded => Vec::new(),
            Expansion::Collapsed => self.children(index),
        }
    }

    /// Whether the node has any children at all.
    pub fn has_children(&self, index: NodeIndex) -> bool {
        self.graph
            .neighbors_directed(index, Direction::Outgoing)
            .next()
            .is_some()
    }

    /// Whether the node hides children (drawn with the `parent` class).
    pub fn is_collapsed(&self, index: NodeIndex) -> bool {
        self.graph[index].expansion == Expansion::Collapsed && self.has_children(index)
    }

    /// Parent of a node, `None` for the root.
    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(index, Direction::Incoming)
            .next()
    }

    /// Visible nodes in pre-order (parents before children, siblings in order).
    pub fn visible_preorder(&self) -> Vec<NodeIndex> {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            order.push(index);
            let children = self.visible_children(index);
            stack.extend(children.into_iter().rev());
        }
        order
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of nodes reachable through expanded nodes.
    pub fn visible_count(&self) -> usize {
        self.visible_preorder().len()
    }

    /// Depth of the deepest node.
    pub fn max_depth(&self) -> u32 {
        self.graph
            .node_weights()
            .map(|node| node.depth)
            .max()
            .unwrap_or(0)
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    /// Flip a node between expanded and collapsed.
    ///
    /// Returns `false` for nodes without children, which have nothing to toggle.
    pub fn toggle(&mut self, index: NodeIndex) -> bool {
        let has_children = self.has_children(index);
        let node = &mut self.graph[index];
        let next = node.expansion.toggled(has_children);
        let changed = next != node.expansion;
        node.expansion = next;
        changed
    }

    /// Collapse every node at `depth` or deeper.
    pub fn collapse_below(&mut self, depth: u32) {
        for node in self.graph.node_weights_mut() {
            node.expansion = if node.depth >= depth {
                Expansion::Collapsed
            } else {
                Expansion::Expanded
            };
        }
    }

    /// Collapse every node below the root, leaving only the first ply visible.
    pub fn collapse_all(&mut self) {
        self.collapse_below(1);
    }

    /// Expand every node.
    pub fn expand_all(&mut self) {
        for node in self.graph.node_weights_mut() {
            node.expansion = Expansion::Expanded;
        }
    }

    // =========================================================================
    // Keys and positions
    // =========================================================================

    /// Key of a node, assigning the next one from `counter` on first use.
    pub fn key_or_assign(&mut self, index: NodeIndex, counter: &mut u32) -> NodeKey {
        let node = &mut self.graph[index];
        *node.key.get_or_insert_with(|| {
            *counter += 1;
            NodeKey(*counter)
        })
    }

    /// Seed the position the first transition starts from.
    pub fn seed_root(&mut self, previous: Polar) {
        let root = self.root;
        self.graph[root].previous = previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"player":"n","move":"","visits":100,"wins":50,"children":[
        {"player":"b","move":"D4","visits":60,"wins":33,"children":[
            {"player":"w","move":"Q16","visits":40,"wins":20},
            {"player":"w","move":"C3","visits":19,"wins":4}]},
        {"player":"b","move":"Q4","visits":39,"wins":17}]}"#;

    fn sample() -> GameTree {
        GameTree::from_json(SAMPLE).unwrap()
    }

    fn moves(tree: &GameTree, nodes: &[NodeIndex]) -> Vec<String> {
        nodes.iter().map(|&n| tree.node(n).mv.clone()).collect()
    }

    #[test]
    fn test_load_preserves_order_and_depth() {
        let tree = sample();
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.max_depth(), 2);

        let root = tree.root();
        let children = tree.children(root);
        assert_eq!(moves(&tree, &children), vec!["D4", "Q4"]);
        assert_eq!(moves(&tree, &tree.children(children[0])), vec!["Q16", "C3"]);
        assert_eq!(tree.node(children[0]).depth, 1);
        assert_eq!(tree.parent(children[0]), Some(root));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn test_visible_preorder() {
        let tree = sample();
        let order = tree.visible_preorder();
        assert_eq!(moves(&tree, &order), vec!["", "D4", "Q16", "C3", "Q4"]);
    }

    #[test]
    fn test_wins_exceeding_visits_rejected() {
        let err = GameTree::from_json(
            r#"{"player":"b","move":"D4","visits":2,"wins":1,"children":[
                {"player":"w","move":"C3","visits":1,"wins":3}]}"#,
        )
        .err()
        .unwrap();
        match err {
            VisError::InvalidNode { path, .. } => assert_eq!(path, "root/0"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            GameTree::from_json("{\"player\":"),
            Err(VisError::Parse(_))
        ));
    }

    #[test]
    fn test_toggle_mutual_exclusion() {
        let mut tree = sample();
        let d4 = tree.children(tree.root())[0];

        for index in tree.visible_preorder() {
            assert!(tree.visible_children(index).is_empty() || tree.collapsed_children(index).is_empty());
        }

        assert!(tree.toggle(d4));
        assert!(tree.visible_children(d4).is_empty());
        assert_eq!(tree.collapsed_children(d4).len(), 2);
        assert!(tree.is_collapsed(d4));
        assert_eq!(tree.visible_count(), 3);

        assert!(tree.toggle(d4));
        assert_eq!(tree.visible_children(d4).len(), 2);
        assert!(tree.collapsed_children(d4).is_empty());
        assert_eq!(tree.visible_count(), 5);
    }

    #[test]
    fn test_toggle_leaf_is_noop() {
        let mut tree = sample();
        let q4 = tree.children(tree.root())[1];
        let before = tree.visible_preorder();
        assert!(!tree.toggle(q4));
        assert!(!tree.is_collapsed(q4));
        assert_eq!(tree.visible_preorder(), before);
    }

    #[test]
    fn test_collapse_below_and_expand_all() {
        let mut tree = sample();
        tree.collapse_below(1);
        assert_eq!(tree.visible_count(), 3);

        tree.expand_all();
        tree.collapse_all();
        assert_eq!(tree.visible_count(), 3);
        assert!(!tree.is_collapsed(tree.root()));
        assert_eq!(tree.visible_children(tree.root()).len(), 2);

        tree.collapse_below(0);
        assert_eq!(tree.visible_count(), 1);

        tree.expand_all();
        assert_eq!(tree.visible_count(), 5);
    }

    #[test]
    fn test_keys_assigned_once() {
        let mut tree = sample();
        let root = tree.root();
        let mut counter = 0;
        let first = tree.key_or_assign(root, &mut counter);
        let again = tree.key_or_assign(root, &mut counter);
        assert_eq!(first, again);
        assert_eq!(counter, 1);
    }
}

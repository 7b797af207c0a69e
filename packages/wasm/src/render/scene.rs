//! Scene - the drawn elements and the update pipeline that reconciles them
//! with a fresh layout.
//!
//! Every update lays out the visible tree, diffs the result against the
//! elements already drawn (keyed by node, links keyed by their target) and
//! emits one transition per element:
//!
//! - entering elements grow out of the triggering node's previous position,
//! - updating elements move from their drawn state to the new layout,
//! - exiting elements shrink into the triggering node's new position and are
//!   removed once their transition ends.
//!
//! Finally every visible node's position is stashed as its previous position,
//! so the next update starts from here.

use std::collections::{BTreeMap, HashMap};

use log::debug;
use serde::Serialize;

use super::diff::{DiffVisitor, KeyedDiff};
use super::path::{collapsed_diagonal, diagonal, node_transform};
use super::style::{self, LabelAnchor, VANISHING};
use crate::config::VisConfig;
use crate::layout::{RadialTreeConfig, RadialTreeLayout, Separation};
use crate::spatial::{NodePoint, SpatialIndex};
use crate::tree::{GameNode, GameTree, NodeIndex, NodeKey, Polar};

/// Animated attributes of a node group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttrs {
    pub position: Polar,
    pub transform: String,
    pub circle_radius: f32,
    pub label_opacity: f32,
    pub label_anchor: LabelAnchor,
    pub label_transform: String,
}

impl NodeAttrs {
    /// Fully grown node at its laid out position.
    pub fn settled(node: &GameNode) -> Self {
        let (label_anchor, label_transform) = style::label_placement(node.position.angle);
        Self {
            position: node.position,
            transform: node_transform(node.position),
            circle_radius: style::circle_radius(node.visits),
            label_opacity: 1.0,
            label_anchor,
            label_transform,
        }
    }

    /// The same node shrunk to nothing at `at`.
    pub fn vanishing_at(&self, at: Polar) -> Self {
        Self {
            position: at,
            transform: node_transform(at),
            circle_radius: VANISHING,
            label_opacity: VANISHING,
            label_anchor: self.label_anchor,
            label_transform: self.label_transform.clone(),
        }
    }
}

/// Attributes of a node group that are set, not animated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeVisual {
    /// `black`, `white`, or empty for the engine's `n` root.
    pub class: &'static str,
    pub title: String,
    pub label: String,
    /// Node hides children (`parent` class).
    pub collapsed: bool,
}

impl NodeVisual {
    fn of(tree: &GameTree, index: NodeIndex) -> Self {
        let node = tree.node(index);
        Self {
            class: node.player.class(),
            title: node.title(),
            label: style::label(node.visits, node.wins),
            collapsed: tree.is_collapsed(index),
        }
    }
}

/// Animated attributes of a link path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAttrs {
    pub d: String,
    pub stroke_opacity: f32,
    pub stroke_width: f32,
}

impl LinkAttrs {
    fn between(source: &GameNode, target: &GameNode) -> Self {
        Self {
            d: diagonal(source.position, target.position),
            stroke_opacity: style::link_opacity(source.visits, target.visits),
            stroke_width: style::link_width(target.visits),
        }
    }

    fn collapsed_at(&self, at: Polar) -> Self {
        Self {
            d: collapsed_diagonal(at),
            ..self.clone()
        }
    }
}

/// Which population an element belongs to in this update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Enter,
    Update,
    Exit,
}

/// One node's transition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTransition {
    pub key: NodeKey,
    pub phase: Phase,
    pub visual: NodeVisual,
    pub from: NodeAttrs,
    pub to: NodeAttrs,
    /// Remove the element once the transition ends.
    pub remove: bool,
}

/// One link's transition, keyed by its target node.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTransition {
    pub key: NodeKey,
    pub source: NodeKey,
    pub phase: Phase,
    pub from: LinkAttrs,
    pub to: LinkAttrs,
    pub remove: bool,
}

/// Everything the renderer needs to animate one update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFrame {
    /// Node whose click triggered the update.
    pub anchor: Option<NodeKey>,
    pub duration_ms: u32,
    pub nodes: Vec<NodeTransition>,
    pub links: Vec<LinkTransition>,
}

impl UpdateFrame {
    /// Number of node transitions in `phase`.
    pub fn count(&self, phase: Phase) -> usize {
        self.nodes.iter().filter(|t| t.phase == phase).count()
    }

    /// Number of link transitions in `phase`.
    pub fn link_count(&self, phase: Phase) -> usize {
        self.links.iter().filter(|t| t.phase == phase).count()
    }
}

/// A node group currently drawn.
#[derive(Debug, Clone)]
pub struct NodeElement {
    pub node: NodeIndex,
    pub visual: NodeVisual,
    pub attrs: NodeAttrs,
}

/// A link path currently drawn.
#[derive(Debug, Clone)]
pub struct LinkElement {
    pub source: NodeKey,
    pub attrs: LinkAttrs,
}

/// The drawn state and the update pipeline.
pub struct Scene {
    config: VisConfig,
    layout: RadialTreeLayout,
    nodes: BTreeMap<NodeKey, NodeElement>,
    links: BTreeMap<NodeKey, LinkElement>,
    next_key: u32,
    spatial: SpatialIndex,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(config: VisConfig) -> Self {
        let layout = RadialTreeLayout::new(RadialTreeConfig {
            angular_span: config.angular_span,
            radial_extent: config.layout_radius(),
            separation: Separation {
                sibling: config.sibling_separation,
                cousin: config.cousin_separation,
            },
        });
        Self {
            config,
            layout,
            nodes: BTreeMap::new(),
            links: BTreeMap::new(),
            next_key: 0,
            spatial: SpatialIndex::new(),
        }
    }

    pub fn config(&self) -> &VisConfig {
        &self.config
    }

    /// Lay out the visible tree and reconcile the drawn elements with it.
    ///
    /// `anchor` is the node that triggered the update; new elements grow out
    /// of its previous position and departing ones collapse into its new one.
    pub fn update(&mut self, tree: &mut GameTree, anchor: NodeIndex) -> UpdateFrame {
        let layout = self.layout.compute(tree);

        // Normalize for fixed-depth.
        let mut placed: HashMap<NodeKey, NodeIndex> = HashMap::with_capacity(layout.nodes.len());
        let mut order: Vec<NodeKey> = Vec::with_capacity(layout.nodes.len());
        for p in &layout.nodes {
            tree.node_mut(p.node).position =
                Polar::new(p.x, p.depth as f32 * self.config.level_spacing);
            let key = tree.key_or_assign(p.node, &mut self.next_key);
            placed.insert(key, p.node);
            order.push(key);
        }

        let anchor_node = tree.node(anchor);
        let anchor_previous = anchor_node.previous;
        let anchor_current = anchor_node.position;
        let mut frame = UpdateFrame {
            anchor: anchor_node.key,
            duration_ms: self.config.duration_ms,
            nodes: Vec::with_capacity(order.len()),
            links: Vec::with_capacity(layout.links.len()),
        };

        let node_diff = KeyedDiff::compute(self.nodes.keys().copied(), order.iter().copied());
        node_diff.visit(&mut NodePass {
            tree,
            elements: &mut self.nodes,
            placed: &placed,
            anchor_previous,
            anchor_current,
            out: &mut frame.nodes,
        });

        let mut link_targets: HashMap<NodeKey, (NodeIndex, NodeIndex)> =
            HashMap::with_capacity(layout.links.len());
        let mut link_order: Vec<NodeKey> = Vec::with_capacity(layout.links.len());
        for link in &layout.links {
            if let Some(key) = tree.node(link.target).key {
                link_targets.insert(key, (link.source, link.target));
                link_order.push(key);
            }
        }

        let link_diff = KeyedDiff::compute(self.links.keys().copied(), link_order);
        link_diff.visit(&mut LinkPass {
            tree,
            elements: &mut self.links,
            placed: &link_targets,
            anchor_previous,
            anchor_current,
            out: &mut frame.links,
        });

        debug!(
            "update at {:?}: nodes +{} ={} -{}, links +{} ={} -{}",
            frame.anchor,
            node_diff.entering.len(),
            node_diff.updating.len(),
            node_diff.exiting.len(),
            link_diff.entering.len(),
            link_diff.updating.len(),
            link_diff.exiting.len(),
        );

        // Stash the old positions for transition.
        for p in &layout.nodes {
            let node = tree.node_mut(p.node);
            node.previous = node.position;
        }

        self.rebuild_spatial_index();
        frame
    }

    fn rebuild_spatial_index(&mut self) {
        let points = self
            .nodes
            .iter()
            .map(|(&key, element)| {
                let (x, y) = element.attrs.position.to_cartesian();
                NodePoint::new(key, x, y, element.attrs.circle_radius)
            })
            .collect();
        self.spatial.rebuild(points);
    }

    /// Tree node drawn under `key`.
    pub fn lookup(&self, key: NodeKey) -> Option<NodeIndex> {
        self.nodes.get(&key).map(|element| element.node)
    }

    /// Node under a point given in viewport pixels.
    pub fn node_at(&self, x: f32, y: f32, tolerance: f32) -> Option<NodeKey> {
        let (cx, cy) = self.center();
        self.spatial.hit(x - cx, y - cy, tolerance)
    }

    /// Centre of the drawing in viewport pixels.
    pub fn center(&self) -> (f32, f32) {
        (self.config.viewport_width / 2.0, self.config.viewport_height / 2.0)
    }

    /// Drawn node groups in key order. A node that re-enters keeps its
    /// original key, so this is not the order of element creation.
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeKey, &NodeElement)> {
        self.nodes.iter()
    }

    /// Drawn links in key order of their targets.
    pub fn links(&self) -> impl Iterator<Item = (&NodeKey, &LinkElement)> {
        self.links.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

/// Node reconciliation for one update.
struct NodePass<'a> {
    tree: &'a GameTree,
    elements: &'a mut BTreeMap<NodeKey, NodeElement>,
    placed: &'a HashMap<NodeKey, NodeIndex>,
    anchor_previous: Polar,
    anchor_current: Polar,
    out: &'a mut Vec<NodeTransition>,
}

impl DiffVisitor<NodeKey> for NodePass<'_> {
    fn enter(&mut self, key: NodeKey) {
        let Some(&index) = self.placed.get(&key) else {
            return;
        };
        let to = NodeAttrs::settled(self.tree.node(index));
        let from = to.vanishing_at(self.anchor_previous);
        let visual = NodeVisual::of(self.tree, index);

        self.out.push(NodeTransition {
            key,
            phase: Phase::Enter,
            visual: visual.clone(),
            from,
            to: to.clone(),
            remove: false,
        });
        self.elements.insert(
            key,
            NodeElement {
                node: index,
                visual,
                attrs: to,
            },
        );
    }

    fn update(&mut self, key: NodeKey) {
        let (Some(&index), Some(element)) = (self.placed.get(&key), self.elements.get_mut(&key))
        else {
            return;
        };
        let to = NodeAttrs::settled(self.tree.node(index));
        let from = std::mem::replace(&mut element.attrs, to.clone());
        element.visual = NodeVisual::of(self.tree, index);

        self.out.push(NodeTransition {
            key,
            phase: Phase::Update,
            visual: element.visual.clone(),
            from,
            to,
            remove: false,
        });
    }

    fn exit(&mut self, key: NodeKey) {
        let Some(element) = self.elements.remove(&key) else {
            return;
        };
        let to = element.attrs.vanishing_at(self.anchor_current);

        self.out.push(NodeTransition {
            key,
            phase: Phase::Exit,
            visual: element.visual,
            from: element.attrs,
            to,
            remove: true,
        });
    }
}

/// Link reconciliation for one update.
struct LinkPass<'a> {
    tree: &'a GameTree,
    elements: &'a mut BTreeMap<NodeKey, LinkElement>,
    placed: &'a HashMap<NodeKey, (NodeIndex, NodeIndex)>,
    anchor_previous: Polar,
    anchor_current: Polar,
    out: &'a mut Vec<LinkTransition>,
}

impl LinkPass<'_> {
    fn endpoints(&self, key: NodeKey) -> Option<(NodeKey, LinkAttrs)> {
        let &(source, target) = self.placed.get(&key)?;
        let source = self.tree.node(source);
        Some((source.key?, LinkAttrs::between(source, self.tree.node(target))))
    }
}

impl DiffVisitor<NodeKey> for LinkPass<'_> {
    fn enter(&mut self, key: NodeKey) {
        let Some((source, to)) = self.endpoints(key) else {
            return;
        };
        let from = to.collapsed_at(self.anchor_previous);

        self.out.push(LinkTransition {
            key,
            source,
            phase: Phase::Enter,
            from,
            to: to.clone(),
            remove: false,
        });
        self.elements.insert(key, LinkElement { source, attrs: to });
    }

    fn update(&mut self, key: NodeKey) {
        let Some((source, to)) = self.endpoints(key) else {
            return;
        };
        let Some(element) = self.elements.get_mut(&key) else {
            return;
        };
        let from = std::mem::replace(&mut element.attrs, to.clone());
        element.source = source;

        self.out.push(LinkTransition {
            key,
            source,
            phase: Phase::Update,
            from,
            to,
            remove: false,
        });
    }

    fn exit(&mut self, key: NodeKey) {
        let Some(element) = self.elements.remove(&key) else {
            return;
        };
        let to = element.attrs.collapsed_at(self.anchor_current);

        self.out.push(LinkTransition {
            key,
            source: element.source,
            phase: Phase::Exit,
            from: element.attrs,
            to,
            remove: true,
        });
    }
}

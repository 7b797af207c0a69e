//! Node type and related structures.
//!
//! Each node of the search tree carries:
//! - The move that led to it and the player who made it
//! - Search statistics (visits, wins)
//! - Its expansion state (children shown or collapsed)
//! - A lazily assigned element key (stable across updates)
//! - Its current and previous polar position

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable element key.
///
/// Assigned the first time a node is laid out and never changed afterwards,
/// so the scene can tell persisting nodes from new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeKey(pub u32);

impl NodeKey {
    /// Create a new NodeKey from a raw u32.
    #[inline]
    pub fn new(key: u32) -> Self {
        Self(key)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeKey {
    #[inline]
    fn from(key: u32) -> Self {
        Self(key)
    }
}

impl From<NodeKey> for u32 {
    #[inline]
    fn from(key: NodeKey) -> Self {
        key.0
    }
}

/// Player to move, as written by the search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Player {
    #[serde(rename = "b")]
    Black,
    #[serde(rename = "w")]
    White,
    /// Used by the engine for the root of a fresh search.
    #[serde(rename = "n")]
    Neither,
}

impl Player {
    /// Single-letter code used in node titles.
    pub fn code(self) -> char {
        match self {
            Player::Black => 'b',
            Player::White => 'w',
            Player::Neither => 'n',
        }
    }

    /// CSS class applied to the node group; empty when no player is to move.
    pub fn class(self) -> &'static str {
        match self {
            Player::Black => "black",
            Player::White => "white",
            Player::Neither => "",
        }
    }
}

/// Position in the radial drawing: `angle` in degrees, `radius` in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Polar {
    pub angle: f32,
    pub radius: f32,
}

impl Polar {
    #[inline]
    pub fn new(angle: f32, radius: f32) -> Self {
        Self { angle, radius }
    }

    /// Cartesian coordinates, with angle 0 pointing up.
    pub fn to_cartesian(self) -> (f32, f32) {
        let a = (self.angle - 90.0).to_radians();
        (self.radius * a.cos(), self.radius * a.sin())
    }
}

/// Whether a node's children are shown.
///
/// A node with children is always in exactly one of the two states, so
/// "visible children" and "collapsed children" can never both be populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expansion {
    #[default]
    Expanded,
    Collapsed,
}

impl Expansion {
    /// State after a click. Nodes without children have nothing to toggle.
    #[inline]
    pub fn toggled(self, has_children: bool) -> Self {
        match (self, has_children) {
            (_, false) => self,
            (Expansion::Expanded, true) => Expansion::Collapsed,
            (Expansion::Collapsed, true) => Expansion::Expanded,
        }
    }
}

/// A node of the search tree.
#[derive(Debug, Clone)]
pub struct GameNode {
    pub player: Player,
    pub mv: String,
    pub visits: u32,
    pub wins: f64,
    /// Identifier written by the engine, if any. Only shown in titles.
    pub source_id: Option<String>,
    pub depth: u32,
    pub expansion: Expansion,
    pub key: Option<NodeKey>,
    /// Position computed by the latest layout.
    pub position: Polar,
    /// Position at the end of the previous update.
    pub previous: Polar,
}

impl GameNode {
    pub fn new(player: Player, mv: impl Into<String>, visits: u32, wins: f64) -> Self {
        Self {
            player,
            mv: mv.into(),
            visits,
            wins,
            source_id: None,
            depth: 0,
            expansion: Expansion::Expanded,
            key: None,
            position: Polar::default(),
            previous: Polar::default(),
        }
    }

    /// Hover title: player code, move and identifier.
    pub fn title(&self) -> String {
        let id = match (&self.source_id, self.key) {
            (Some(id), _) => id.replace("0x", ""),
            (None, Some(key)) => key.raw().to_string(),
            (None, None) => String::new(),
        };
        format!("{}{} : {}", self.player.code(), self.mv, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_key() {
        let key = NodeKey::new(42);
        assert_eq!(key.raw(), 42);
        assert_eq!(format!("{}", key), "Node(42)");
        let raw: u32 = NodeKey::from(7).into();
        assert_eq!(raw, 7);
    }

    #[test]
    fn test_player_codes() {
        let black: Player = serde_json::from_str("\"b\"").unwrap();
        let white: Player = serde_json::from_str("\"w\"").unwrap();
        assert_eq!(black, Player::Black);
        assert_eq!(white.class(), "white");
        assert_eq!(Player::Neither.code(), 'n');
        assert_eq!(Player::Neither.class(), "");
        assert!(serde_json::from_str::<Player>("\"x\"").is_err());
    }

    #[test]
    fn test_expansion_toggle_is_involution() {
        for state in [Expansion::Expanded, Expansion::Collapsed] {
            assert_ne!(state.toggled(true), state);
            assert_eq!(state.toggled(true).toggled(true), state);
        }
    }

    #[test]
    fn test_expansion_toggle_leaf_is_noop() {
        assert_eq!(Expansion::Expanded.toggled(false), Expansion::Expanded);
        assert_eq!(Expansion::Collapsed.toggled(false), Expansion::Collapsed);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let (x, y) = Polar::new(90.0, 10.0).to_cartesian();
        assert!((x - 10.0).abs() < 1e-4 && y.abs() < 1e-4, "got ({x}, {y})");
        let (x, y) = Polar::new(0.0, 10.0).to_cartesian();
        assert!(x.abs() < 1e-4 && (y + 10.0).abs() < 1e-4, "got ({x}, {y})");
    }

    #[test]
    fn test_title() {
        let mut node = GameNode::new(Player::Black, "D4", 10, 4.0);
        node.source_id = Some("0x7f3a".to_string());
        assert_eq!(node.title(), "bD4 : 7f3a");

        let mut node = GameNode::new(Player::White, "Q16", 10, 4.0);
        node.key = Some(NodeKey(3));
        assert_eq!(node.title(), "wQ16 : 3");
    }
}

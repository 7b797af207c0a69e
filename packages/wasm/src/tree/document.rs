//! Serialized form of a search tree, as written by the engine.

use serde::{Deserialize, Serialize};

use super::node::Player;

/// One node of the JSON document. Children are nested recursively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub player: Player,
    #[serde(rename = "move", default)]
    pub mv: String,
    pub visits: u32,
    pub wins: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_output_parses() {
        let text = r#"{"id":"55d0c3a0","player":"n","move":"","visits":900,"wins":410,"children":[
            {"id":"55d0c3f0","player":"b","move":"D4","visits":500,"wins":285},
            {"id":"55d0c440","player":"b","move":"Q16","visits":400,"wins":125.5}]}"#;
        let doc: NodeDocument = serde_json::from_str(text).unwrap();
        assert_eq!(doc.player, Player::Neither);
        assert_eq!(doc.children.len(), 2);
        assert_eq!(doc.children[0].mv, "D4");
        assert_eq!(doc.children[1].wins, 125.5);
        assert!(doc.children[1].children.is_empty());
    }

    #[test]
    fn test_missing_stats_rejected() {
        let text = r#"{"player":"b","move":"D4","wins":1}"#;
        assert!(serde_json::from_str::<NodeDocument>(text).is_err());
    }
}

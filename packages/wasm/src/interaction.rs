//! Click handling: toggle a node, then re-render anchored at it.

use log::debug;

use crate::error::{Result, VisError};
use crate::render::{Scene, UpdateFrame};
use crate::tree::{GameTree, NodeKey};

/// Toggle the node drawn under `key` and run an update anchored at it.
///
/// Leaves have nothing to toggle; they still get an update pass, which
/// leaves the drawn structure as it was.
pub fn click(tree: &mut GameTree, scene: &mut Scene, key: NodeKey) -> Result<UpdateFrame> {
    let index = scene.lookup(key).ok_or(VisError::UnknownNode(key.raw()))?;
    if tree.toggle(index) {
        debug!("{key} is now {:?}", tree.node(index).expansion);
    } else {
        debug!("{key} has no children to toggle");
    }
    Ok(scene.update(tree, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VisConfig;
    use crate::render::Phase;

    const SAMPLE: &str = r#"{"player":"n","move":"","visits":10,"wins":5,"children":[
        {"player":"b","move":"A","visits":6,"wins":3,"children":[
            {"player":"w","move":"A1","visits":5,"wins":2}]},
        {"player":"b","move":"B","visits":3,"wins":1}]}"#;

    fn setup() -> (GameTree, Scene) {
        let mut tree = GameTree::from_json(SAMPLE).unwrap();
        let mut scene = Scene::new(VisConfig::default());
        let root = tree.root();
        scene.update(&mut tree, root);
        (tree, scene)
    }

    fn key_of(tree: &GameTree, mv: &str) -> NodeKey {
        let index = tree
            .visible_preorder()
            .into_iter()
            .find(|&i| tree.node(i).mv == mv)
            .unwrap();
        tree.node(index).key.unwrap()
    }

    #[test]
    fn test_click_twice_restores_structure() {
        let (mut tree, mut scene) = setup();
        let before = tree.visible_preorder();
        let a = key_of(&tree, "A");

        let frame = click(&mut tree, &mut scene, a).unwrap();
        assert_eq!(frame.anchor, Some(a));
        assert_eq!(frame.count(Phase::Exit), 1);
        assert_eq!(tree.visible_count(), 3);

        let frame = click(&mut tree, &mut scene, a).unwrap();
        assert_eq!(frame.count(Phase::Enter), 1);
        assert_eq!(tree.visible_preorder(), before);
    }

    #[test]
    fn test_click_leaf_changes_nothing() {
        let (mut tree, mut scene) = setup();
        let before = tree.visible_preorder();
        let b = key_of(&tree, "B");

        let frame = click(&mut tree, &mut scene, b).unwrap();
        assert_eq!(frame.count(Phase::Enter), 0);
        assert_eq!(frame.count(Phase::Exit), 0);
        assert_eq!(tree.visible_preorder(), before);
    }

    #[test]
    fn test_click_unknown_key() {
        let (mut tree, mut scene) = setup();
        let err = click(&mut tree, &mut scene, NodeKey(999)).unwrap_err();
        assert!(matches!(err, VisError::UnknownNode(999)));
    }
}

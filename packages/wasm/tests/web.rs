//! Browser smoke tests. Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use search_tree_vis_wasm::{SearchTreeVis, load, select_dataset};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const DOCUMENT: &str = r#"{"player":"b","move":"D4","visits":100,"wins":57,"children":[
    {"player":"w","move":"Q16","visits":60,"wins":20},
    {"player":"w","move":"C3","visits":39,"wins":11}]}"#;

#[wasm_bindgen_test]
fn dataset_selection_crosses_the_boundary() {
    let choice = select_dataset(Some("#2".to_string())).unwrap();
    let path = js_sys::Reflect::get(&choice, &JsValue::from_str("path")).unwrap();
    assert_eq!(path.as_string().as_deref(), Some("graph2.json"));
}

#[wasm_bindgen_test]
fn render_and_click_return_frames() {
    let mut vis = SearchTreeVis::from_json(DOCUMENT, JsValue::UNDEFINED).unwrap();
    let frame = vis.render().unwrap();
    assert!(frame.is_object());
    assert_eq!(vis.visible_count(), 3);

    let (cx, cy) = vis.scene().center();
    let root = vis.node_at(cx, cy, 0.0).unwrap();
    vis.click(root).unwrap();
    assert_eq!(vis.visible_count(), 1);
}

#[wasm_bindgen_test]
fn malformed_document_is_rejected() {
    assert!(SearchTreeVis::from_json("{", JsValue::UNDEFINED).is_err());
}

/// The test page serves no datasets, so loading must reject instead of
/// drawing anything.
#[wasm_bindgen_test]
async fn missing_dataset_rejects_load() {
    let err = match load(JsValue::UNDEFINED).await {
        Ok(_) => panic!("load should fail without graph1.json"),
        Err(err) => err,
    };
    let message: String = err
        .dyn_into::<js_sys::Error>()
        .expect("rejection should be an Error")
        .message()
        .into();
    assert!(
        message.starts_with("failed to fetch graph1.json"),
        "unexpected message: {message}"
    );
}

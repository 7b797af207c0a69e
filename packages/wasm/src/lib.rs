//! Search Tree Vis - WASM Module
//!
//! Radial visualization of game-tree search statistics (visit and win counts
//! per move). Rust owns the tree, the layout and the reconciliation of drawn
//! elements; JavaScript only applies the attribute transitions it is handed.
//!
//! # Architecture
//!
//! - `dataset`: URL fragment → dataset path and page title
//! - `tree`: the search tree, loaded from JSON, with expand/collapse state
//! - `layout`: Buchheim tidy tree layout in polar coordinates
//! - `render`: visual encodings, keyed enter/update/exit diffing, SVG output
//! - `interaction`: click → toggle → update
//! - `spatial`: R-tree hit testing over drawn nodes

use log::{LevelFilter, info};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod config;
pub mod dataset;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod logging;
pub mod render;
pub mod spatial;
pub mod tree;

use config::VisConfig;
use error::{Result, VisError};
use render::{Scene, UpdateFrame};
use tree::{GameTree, NodeKey, Polar};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init(LevelFilter::Info);
}

/// Dataset chosen for a URL fragment.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetChoice {
    pub path: &'static str,
    pub title: &'static str,
}

/// Resolve a URL fragment (e.g. `"#2"`) into `{ path, title }`.
#[wasm_bindgen(js_name = selectDataset)]
pub fn select_dataset(fragment: Option<String>) -> std::result::Result<JsValue, JsValue> {
    let (path, title) = dataset::select(fragment.as_deref());
    Ok(serde_wasm_bindgen::to_value(&DatasetChoice { path, title })?)
}

/// Read an optional JS config object.
fn config_from_js(value: JsValue) -> Result<VisConfig> {
    if value.is_undefined() || value.is_null() {
        return Ok(VisConfig::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|err| VisError::Config(err.to_string()))
}

/// Load the dataset selected by the page's URL fragment.
///
/// Sets the page title, sizes the drawing to the current viewport and fetches
/// the document. A failed fetch or parse rejects the returned promise; there is
/// no retry.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn load(config: JsValue) -> std::result::Result<SearchTreeVis, JsValue> {
    let mut config = config_from_js(config)?;
    if let Some((width, height)) = browser::viewport_size() {
        config.viewport_width = width;
        config.viewport_height = height;
    }

    let (path, title) = dataset::select(browser::fragment().as_deref());
    info!("loading {path} ({title})");
    browser::set_title(title);

    let text = browser::fetch_text(path).await?;
    let tree = GameTree::from_json(&text)?;
    Ok(SearchTreeVis::new(tree, config)?)
}

/// Main entry point for the visualization.
///
/// Owns the search tree and the drawn scene; every method that changes what
/// is visible returns the `UpdateFrame` describing the transitions to run.
#[wasm_bindgen]
pub struct SearchTreeVis {
    tree: GameTree,
    scene: Scene,
}

impl SearchTreeVis {
    /// Create a visualization over a loaded tree. Nothing is drawn until the
    /// first update.
    pub fn new(mut tree: GameTree, config: VisConfig) -> Result<Self> {
        config.validate()?;

        let (angle, radius) = config.root_seed();
        tree.seed_root(Polar::new(angle, radius));
        if let Some(depth) = config.initial_depth {
            tree.collapse_below(depth);
        }

        info!(
            "search tree: {} nodes, {} visible, depth {}",
            tree.node_count(),
            tree.visible_count(),
            tree.max_depth()
        );

        Ok(Self {
            tree,
            scene: Scene::new(config),
        })
    }

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Update anchored at the root.
    pub fn update_root(&mut self) -> UpdateFrame {
        let root = self.tree.root();
        self.scene.update(&mut self.tree, root)
    }

    /// Toggle the node drawn under `key` and update anchored at it.
    pub fn toggle(&mut self, key: NodeKey) -> Result<UpdateFrame> {
        interaction::click(&mut self.tree, &mut self.scene, key)
    }

    fn frame_to_js(frame: &UpdateFrame) -> std::result::Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(frame)?)
    }
}

#[wasm_bindgen]
impl SearchTreeVis {
    /// Parse a JSON document and create a visualization.
    ///
    /// `config` is an optional object with any `VisConfig` fields.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str, config: JsValue) -> std::result::Result<SearchTreeVis, JsValue> {
        let config = config_from_js(config)?;
        let tree = GameTree::from_json(json)?;
        Ok(Self::new(tree, config)?)
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Lay out and reconcile the whole visible tree, anchored at the root.
    pub fn render(&mut self) -> std::result::Result<JsValue, JsValue> {
        let frame = self.update_root();
        Self::frame_to_js(&frame)
    }

    /// Handle a click on the node with `key`.
    pub fn click(&mut self, key: u32) -> std::result::Result<JsValue, JsValue> {
        let frame = self.toggle(NodeKey(key))?;
        Self::frame_to_js(&frame)
    }

    /// Collapse every node below the root.
    #[wasm_bindgen(js_name = collapseAll)]
    pub fn collapse_all(&mut self) -> std::result::Result<JsValue, JsValue> {
        self.tree.collapse_all();
        self.render()
    }

    /// Expand every node.
    #[wasm_bindgen(js_name = expandAll)]
    pub fn expand_all(&mut self) -> std::result::Result<JsValue, JsValue> {
        self.tree.expand_all();
        self.render()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Key of the node under viewport point `(x, y)`, if any.
    #[wasm_bindgen(js_name = nodeAt)]
    pub fn node_at(&self, x: f32, y: f32, tolerance: f32) -> Option<u32> {
        self.scene.node_at(x, y, tolerance).map(NodeKey::raw)
    }

    /// Snapshot of the current drawing as an SVG document.
    #[wasm_bindgen(js_name = toSvg)]
    pub fn to_svg(&self) -> String {
        render::svg::render(&self.scene)
    }

    /// Total number of nodes in the tree.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.tree.node_count() as u32
    }

    /// Number of nodes currently drawn.
    #[wasm_bindgen(js_name = visibleCount)]
    pub fn visible_count(&self) -> u32 {
        self.scene.node_count() as u32
    }
}

//! Error type shared by the loader, the tree model and the wasm boundary.

use thiserror::Error;

/// Errors surfaced by the visualization.
///
/// Everything downstream of a successful load is total over well-formed
/// trees, so in practice only loading and lookups by key can fail.
#[derive(Debug, Error)]
pub enum VisError {
    /// The dataset document is not valid JSON or does not match the node shape.
    #[error("failed to parse search tree document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A node carries statistics that cannot be displayed.
    #[error("invalid node {path}: {reason}")]
    InvalidNode { path: String, reason: String },

    /// A key that is not bound to any node of the current scene.
    #[error("no node with key {0}")]
    UnknownNode(u32),

    /// The dataset could not be fetched.
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },

    /// The configuration object passed from JS was rejected.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, VisError>;

impl From<VisError> for wasm_bindgen::JsValue {
    fn from(err: VisError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

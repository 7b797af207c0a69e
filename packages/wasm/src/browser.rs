//! Browser glue: URL fragment, viewport size, page title and dataset fetch.
//!
//! Only compiled for wasm32; everything here talks to `window`.

use log::info;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::{Result, VisError};

fn fetch_error(path: &str, reason: impl Into<String>) -> VisError {
    VisError::Fetch {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn describe(value: &wasm_bindgen::JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Current `location.hash`, or `None` when unavailable or empty.
pub fn fragment() -> Option<String> {
    let hash = web_sys::window()?.location().hash().ok()?;
    if hash.is_empty() { None } else { Some(hash) }
}

/// Size of the document element at this moment.
pub fn viewport_size() -> Option<(f32, f32)> {
    let element = web_sys::window()?.document()?.document_element()?;
    Some((element.client_width() as f32, element.client_height() as f32))
}

/// Set `document.title`.
pub fn set_title(title: &str) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        document.set_title(title);
    }
}

/// Fetch a document as text. Any failure, including a non-2xx status, is an error.
pub async fn fetch_text(path: &str) -> Result<String> {
    let window = web_sys::window().ok_or_else(|| fetch_error(path, "no window"))?;

    let response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|err| fetch_error(path, describe(&err)))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| fetch_error(path, "fetch did not return a Response"))?;

    if !response.ok() {
        return Err(fetch_error(path, format!("HTTP {}", response.status())));
    }

    let body = response
        .text()
        .map_err(|err| fetch_error(path, describe(&err)))?;
    let text = JsFuture::from(body)
        .await
        .map_err(|err| fetch_error(path, describe(&err)))?;

    let text = text
        .as_string()
        .ok_or_else(|| fetch_error(path, "response body is not text"))?;
    info!("fetched {path} ({} bytes)", text.len());
    Ok(text)
}

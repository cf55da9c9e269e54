//! WASM bindings for `mdtext`.
//!
//! Exposes parsing, styled-text rendering, link extraction and validation to
//! JavaScript via wasm-bindgen. Trees and diagnostics are returned as JSON
//! strings; rendered runs are returned as plain JS objects.

use mdtext::RenderContext;
use wasm_bindgen::prelude::*;

/// Parse Markdown and return the block tree as JSON.
#[wasm_bindgen]
pub fn parse(input: &str) -> String {
    let blocks = mdtext::parse(input);
    serde_json::to_string(&blocks).unwrap_or_else(|_| "[]".to_string())
}

/// Parse Markdown and render every inline-bearing block to styled runs.
///
/// Returns an array (one entry per paragraph, heading or table cell) of
/// `{ text, attributes }` run arrays. Relative links resolve against
/// `base_url` when given.
#[wasm_bindgen]
pub fn render(input: &str, base_url: Option<String>) -> Result<JsValue, JsError> {
    let ctx = match base_url {
        Some(url) => RenderContext::default().with_base_url_str(&url)?,
        None => RenderContext::default(),
    };
    let blocks = mdtext::parse(input);
    let fragments = mdtext::render_blocks(&blocks, &ctx);
    Ok(serde_wasm_bindgen::to_value(&fragments)?)
}

/// Return link destinations in document order as a JSON array of strings.
#[wasm_bindgen]
pub fn links(input: &str) -> String {
    let blocks = mdtext::parse(input);
    serde_json::to_string(&mdtext::link_destinations(&blocks)).unwrap_or_else(|_| "[]".to_string())
}

/// Validate Markdown and return diagnostics as JSON.
///
/// Returns a JSON array of `{ severity, message, code }` objects.
/// An empty array means the document is valid.
#[wasm_bindgen]
pub fn validate(input: &str) -> String {
    let blocks = mdtext::parse(input);
    serde_json::to_string(&mdtext::validate(&blocks)).unwrap_or_else(|_| "[]".to_string())
}

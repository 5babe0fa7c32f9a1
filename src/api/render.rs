//! Stateless rendering functions
//!
//! For hosts that only want the page markup or the emphasis segments and
//! render them with their own framework.

use wasm_bindgen::prelude::*;

use super::helpers::{config_from_js, cv_from_js, serialize};
use crate::renderers::document::render_html;
use crate::renderers::emphasis::segments;
use crate::renderers::styles::{render_stylesheet, StyleTemplate};
use crate::theme::Theme;

/// Render CV data to escaped page HTML
///
/// # Parameters
/// - `data`: CV object, JSON string or YAML string
/// - `options`: optional viewer options (only `labels` is used)
#[wasm_bindgen(js_name = renderCvHtml)]
pub fn render_cv_html(data: JsValue, options: JsValue) -> Result<String, JsValue> {
    let cv = cv_from_js(data)?;
    let config = config_from_js(options)?;
    Ok(render_html(&cv, &config.labels))
}

/// Split text into `{kind: "plain" | "emphasis", text}` segments
#[wasm_bindgen(js_name = emphasizeText)]
pub fn emphasize_text(text: &str) -> Result<JsValue, JsValue> {
    serialize(&segments(text), "Segment serialization error")
}

/// The page stylesheet for `dark` or light, as used by the export surface
#[wasm_bindgen(js_name = pageStylesheet)]
pub fn page_stylesheet(dark: bool) -> Result<String, JsValue> {
    render_stylesheet(StyleTemplate::Offscreen, Theme::from_dark(dark))
        .map_err(|e| JsValue::from_str(&format!("Stylesheet error: {}", e)))
}

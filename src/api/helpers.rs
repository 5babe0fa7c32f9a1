//! Shared helpers for WASM API operations
//!
//! This module contains common patterns for serialization, deserialization,
//! error conversion and DOM construction across the API.

use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::models::{CvData, CvDataError, ViewerConfig};
use crate::renderers::markup::Node;

// ============================================================================
// Errors
// ============================================================================

/// Failures while mounting or driving the viewer
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ViewerError {
    #[error("Element #{0} not found")]
    MissingElement(String),

    #[error("Invalid CV data: {0}")]
    InvalidData(String),

    #[error("Invalid viewer options: {0}")]
    InvalidOptions(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("No browser window")]
    NoWindow,
}

impl From<CvDataError> for ViewerError {
    fn from(e: CvDataError) -> Self {
        ViewerError::InvalidData(e.to_string())
    }
}

impl From<ViewerError> for JsValue {
    fn from(e: ViewerError) -> Self {
        let msg = e.to_string();
        log::error!("{}", msg);
        JsValue::from_str(&msg)
    }
}

/// Wrap a JS exception from a DOM call
pub fn dom_error(context: &str) -> impl Fn(JsValue) -> ViewerError + '_ {
    move |e| ViewerError::Dom(format!("{}: {:?}", context, e))
}

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Serialize a value to JavaScript with automatic error handling
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| {
            let msg = format!("{}: {}", error_context, e);
            log::error!("{}", msg);
            JsValue::from_str(&msg)
        })
}

/// Accept CV data as a JS object, a JSON string or a YAML string
pub fn cv_from_js(data: JsValue) -> Result<CvData, ViewerError> {
    match data.as_string() {
        Some(text) if text.trim_start().starts_with('{') => Ok(CvData::from_json(&text)?),
        Some(text) => Ok(CvData::from_yaml(&text)?),
        None => serde_wasm_bindgen::from_value(data).map_err(|e| ViewerError::InvalidData(e.to_string())),
    }
}

/// Options object to config; `undefined`/`null` mean all defaults
pub fn config_from_js(options: JsValue) -> Result<ViewerConfig, ViewerError> {
    if options.is_undefined() || options.is_null() {
        return Ok(ViewerConfig::default());
    }
    serde_wasm_bindgen::from_value::<ViewerConfig>(options)
        .map(ViewerConfig::normalized)
        .map_err(|e| ViewerError::InvalidOptions(e.to_string()))
}

// ============================================================================
// DOM Helpers
// ============================================================================

/// Build DOM nodes from a markup tree. Text always becomes text nodes.
pub fn build_dom(document: &Document, node: &Node) -> Result<web_sys::Node, ViewerError> {
    match node {
        Node::Text { text } => Ok(document.create_text_node(text).into()),
        Node::Element(el) => {
            let element = document
                .create_element(el.tag)
                .map_err(dom_error("createElement"))?;
            for (name, value) in &el.attrs {
                element
                    .set_attribute(name, value)
                    .map_err(dom_error("setAttribute"))?;
            }
            for child in &el.children {
                let child = build_dom(document, child)?;
                element.append_child(&child).map_err(dom_error("appendChild"))?;
            }
            Ok(element.into())
        }
    }
}

/// Create an element with a class
pub fn create_with_class(document: &Document, tag: &str, class: &str) -> Result<HtmlElement, ViewerError> {
    let element: Element = document.create_element(tag).map_err(dom_error("createElement"))?;
    element.set_class_name(class);
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| ViewerError::Dom(format!("<{}> is not an HTML element", tag)))
}

//! CV Viewer WASM API
//!
//! This module provides the JavaScript-facing API for the CV viewer.
//!
//! # Module Structure
//!
//! - `helpers`: serialization, error conversion and DOM construction helpers
//! - `controls`: toolbar and sidebar DOM
//! - `viewer`: the mounted viewer (state, events, animation, export)
//! - `render`: stateless markup functions

pub mod controls;
pub mod helpers;
pub mod render;
pub mod viewer;

pub use helpers::ViewerError;
pub use render::{emphasize_text, page_stylesheet, render_cv_html};
pub use viewer::CvViewer;

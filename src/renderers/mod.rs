//! Renderers
//!
//! - `markup`: escaped element/text tree
//! - `emphasis`: keyword segment tokenizer
//! - `document`: CV data to page markup
//! - `styles`: mustache stylesheet templates
//! - `pdf`: single-image PDF assembly

pub mod document;
pub mod emphasis;
pub mod markup;
pub mod pdf;
pub mod styles;

pub use document::{render_document, render_html, PAGE_CLASS};
pub use emphasis::{emphasize, segments, Segment, KEYWORDS};
pub use markup::{Element, Node};
pub use pdf::{single_image_pdf, JpegImage, PageSize, PdfError};
pub use styles::{render_stylesheet, Palette, StyleTemplate};

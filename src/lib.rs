//! CV Viewer WASM Module
//!
//! Renders an interactive, printable CV document in the browser: light/dark
//! theme, zoom, pointer-driven 3D tilt and single-page PDF export.

pub mod api;
pub mod export;
pub mod models;
pub mod renderers;
pub mod theme;
pub mod utils;
pub mod viewport;

// Re-export commonly used types
pub use api::CvViewer;
pub use models::*;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("logger already initialised: {}", e).into());
    }

    log::info!("CV viewer WASM module initialized");
}

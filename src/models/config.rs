//! Viewer configuration
//!
//! Options passed from JavaScript at mount time. Every field has a default,
//! so hosts may pass `undefined`, `{}` or any subset.

use serde::{Deserialize, Serialize};

use crate::models::view_state::DEFAULT_ZOOM;

/// How the toolbar's download button produces output
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Rasterize the page and save a single-page PDF
    #[default]
    Raster,
    /// Hand off to the browser's native print dialog
    Print,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    /// localStorage key holding `"dark"` / `"light"`
    pub storage_key: String,

    /// Zoom applied at mount and on reset
    pub default_zoom: f64,

    pub file_name: String,

    /// Delay before rasterizing the offscreen surface
    pub settle_delay_ms: u32,

    pub pixel_ratio: f64,

    /// JPEG quality in (0, 1]
    pub jpeg_quality: f64,

    pub transition_ms: u32,

    pub export_mode: ExportMode,

    /// Show a toast when rasterization or encoding fails
    pub failure_toast: bool,

    pub labels: Labels,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".to_string(),
            default_zoom: DEFAULT_ZOOM,
            file_name: "CV.pdf".to_string(),
            settle_delay_ms: 300,
            pixel_ratio: 2.0,
            jpeg_quality: 0.98,
            transition_ms: 500,
            export_mode: ExportMode::Raster,
            failure_toast: true,
            labels: Labels::default(),
        }
    }
}

/// User-visible strings for section headings and control titles
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Labels {
    pub experience: String,
    pub education: String,
    pub contact: String,
    pub email: String,
    pub linkedin: String,
    pub github: String,
    pub zoom_in: String,
    pub zoom_out: String,
    pub reset: String,
    pub download: String,
    pub view_3d: String,
    pub view_flat: String,
    pub theme_dark: String,
    pub theme_light: String,
    pub export_failed: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            experience: "EXPERIENCIA".to_string(),
            education: "EDUCACIÓN".to_string(),
            contact: "CONTACTO".to_string(),
            email: "Email:".to_string(),
            linkedin: "LinkedIn:".to_string(),
            github: "GitHub:".to_string(),
            zoom_in: "Zoom In".to_string(),
            zoom_out: "Zoom Out".to_string(),
            reset: "Resetear Vista".to_string(),
            download: "Descargar PDF".to_string(),
            view_3d: "Vista 3D".to_string(),
            view_flat: "Vista plana".to_string(),
            theme_dark: "Tema oscuro".to_string(),
            theme_light: "Tema claro".to_string(),
            export_failed: "No se pudo generar el PDF".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Clamp numeric options into usable ranges
    pub fn normalized(mut self) -> Self {
        if !(self.jpeg_quality > 0.0 && self.jpeg_quality <= 1.0) {
            self.jpeg_quality = 0.98;
        }
        if !(self.pixel_ratio >= 1.0 && self.pixel_ratio <= 4.0) {
            self.pixel_ratio = 2.0;
        }
        if self.file_name.trim().is_empty() {
            self.file_name = "CV.pdf".to_string();
        }
        self
    }
}

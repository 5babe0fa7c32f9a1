//! Error types for PDF export
//!
//! Every variant aborts the pipeline. None is retried; the viewer logs the
//! failure and only rasterization/encoding failures are shown to the user.

use thiserror::Error;

use crate::renderers::pdf::PdfError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExportError {
    /// No rendered page node to capture
    #[error("no target")]
    TargetMissing,

    /// The offscreen surface could not be created or filled
    #[error("Offscreen surface failed: {0}")]
    Surface(String),

    #[error("Rasterization failed: {0}")]
    Rasterization(String),

    #[error("Image encoding failed: {0}")]
    Encoding(String),

    #[error("PDF assembly failed: {0}")]
    Pdf(String),

    #[error("Saving file failed: {0}")]
    Save(String),
}

impl ExportError {
    /// Failures that silently defeat the export and deserve a visible notice
    pub fn is_user_visible(&self) -> bool {
        matches!(self, ExportError::Rasterization(_) | ExportError::Encoding(_))
    }
}

impl From<PdfError> for ExportError {
    fn from(e: PdfError) -> Self {
        ExportError::Pdf(e.to_string())
    }
}

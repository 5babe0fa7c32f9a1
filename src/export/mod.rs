//! PDF export
//!
//! - `pipeline`: the host-independent export state machine
//! - `browser`: iframe/canvas/Blob implementation of `ExportHost`
//! - `errors`: export failure taxonomy

pub mod browser;
pub mod errors;
pub mod pipeline;

pub use browser::BrowserExportHost;
pub use errors::ExportError;
pub use pipeline::{ExportHost, ExportOutcome, ExportPipeline, ExportSettings, ExportState};

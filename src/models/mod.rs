//! Models module for the CV viewer
//!
//! This module contains the CV content model, the volatile view state and the
//! mount-time configuration.

pub mod config;
pub mod cv;
pub mod view_state;

// Re-export commonly used types
pub use config::{ExportMode, Labels, ViewerConfig};
pub use cv::{CvData, CvDataError, Education, Experience, Profile};
pub use view_state::{PointerOffset, ViewState, ViewerIntent};

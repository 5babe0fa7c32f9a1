//! Utility modules for the CV viewer

pub mod performance;

// Re-export commonly used types
pub use performance::*;

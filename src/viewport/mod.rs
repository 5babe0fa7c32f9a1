//! Viewport transform
//!
//! Springs and the pointer-to-rotation mapping for the tilted page view.

pub mod spring;
pub mod transform;

pub use spring::{Spring, SpringConfig};
pub use transform::{rotation_for, TransformFrame, ViewportTransform};

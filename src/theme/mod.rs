//! Theme preference and theme-switch transition
//!
//! - `preference`: the persisted dark/light flag and its single owner
//! - `transition`: circular-reveal animation planning
//! - `web`: localStorage, root class and view-transition bindings

pub mod preference;
pub mod transition;
pub mod web;

pub use preference::{
    DetachedMarker, MemoryStorage, Theme, ThemeError, ThemeMarker, ThemePreference, ThemeStorage,
};
pub use transition::RevealPlan;

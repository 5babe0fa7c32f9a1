//! Viewer state management
//!
//! `ViewState` is the container-owned source of truth for zoom, 3D mode and
//! pointer offset. Toolbar and sidebar controls only emit `ViewerIntent`s;
//! every change goes through `ViewState::apply`.

use serde::{Deserialize, Serialize};

pub const ZOOM_MIN: f64 = 0.4;
pub const ZOOM_MAX: f64 = 1.5;
pub const ZOOM_STEP: f64 = 0.1;
pub const DEFAULT_ZOOM: f64 = 0.85;

/// Pointer offset bound on each axis, as a fraction of the page box
pub const POINTER_BOUND: f64 = 0.5;

/// Pointer offset from the center of the page box, as a fraction of its size
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct PointerOffset {
    pub x: f64,
    pub y: f64,
}

impl PointerOffset {
    pub const CENTER: PointerOffset = PointerOffset { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_axis(x),
            y: clamp_axis(y),
        }
    }

    /// Offset of a client-space point from the center of a bounding box
    pub fn from_client(client_x: f64, client_y: f64, left: f64, top: f64, width: f64, height: f64) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::CENTER;
        }
        let from_center_x = client_x - left - width / 2.0;
        let from_center_y = client_y - top - height / 2.0;
        Self::new(from_center_x / width, from_center_y / height)
    }
}

fn clamp_axis(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-POINTER_BOUND, POINTER_BOUND)
    }
}

/// User intents emitted by the toolbar, sidebar and pointer handlers
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewerIntent {
    ZoomIn,
    ZoomOut,
    Reset,
    Toggle3d,
    PointerMove(PointerOffset),
    PointerLeave,
}

/// Volatile view state (not persisted)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    zoom: f64,
    is_3d: bool,
    pointer: PointerOffset,
    default_zoom: f64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::with_default_zoom(DEFAULT_ZOOM)
    }

    /// Create a state whose reset target is `default_zoom` (clamped to range)
    pub fn with_default_zoom(default_zoom: f64) -> Self {
        let default_zoom = clamp_zoom(default_zoom);
        Self {
            zoom: default_zoom,
            is_3d: false,
            pointer: PointerOffset::CENTER,
            default_zoom,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn is_3d(&self) -> bool {
        self.is_3d
    }

    pub fn pointer(&self) -> PointerOffset {
        self.pointer
    }

    pub fn default_zoom(&self) -> f64 {
        self.default_zoom
    }

    /// Zoom as the integer percentage shown in the toolbar
    pub fn zoom_percent(&self) -> i32 {
        (self.zoom * 100.0).round() as i32
    }

    /// Apply an intent; returns true when the state changed
    pub fn apply(&mut self, intent: ViewerIntent) -> bool {
        let before = *self;
        match intent {
            ViewerIntent::ZoomIn => self.zoom = step_zoom(self.zoom, ZOOM_STEP),
            ViewerIntent::ZoomOut => self.zoom = step_zoom(self.zoom, -ZOOM_STEP),
            ViewerIntent::Reset => {
                self.zoom = self.default_zoom;
                self.is_3d = false;
                self.pointer = PointerOffset::CENTER;
            }
            ViewerIntent::Toggle3d => self.is_3d = !self.is_3d,
            ViewerIntent::PointerMove(offset) => {
                // Tilt only tracks the pointer in 3D mode
                if self.is_3d {
                    self.pointer = PointerOffset::new(offset.x, offset.y);
                }
            }
            ViewerIntent::PointerLeave => self.pointer = PointerOffset::CENTER,
        }
        before != *self
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        DEFAULT_ZOOM
    } else {
        zoom.clamp(ZOOM_MIN, ZOOM_MAX)
    }
}

fn step_zoom(zoom: f64, delta: f64) -> f64 {
    // Round to hundredths so repeated steps don't drift (0.85 + 0.1 != 0.95)
    let stepped = ((zoom + delta) * 100.0).round() / 100.0;
    clamp_zoom(stepped)
}

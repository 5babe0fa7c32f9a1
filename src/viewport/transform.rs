//! Pointer-driven 3D tilt and zoom transform
//!
//! Maps the spring-smoothed pointer offset to a rotation pair and a
//! reflection overlay opacity. The vertical axis drives `rotateX` with a sign
//! flip and also drives the reflection; the horizontal axis drives `rotateY`.

use serde::Serialize;

use super::spring::{Spring, SCALE_SPRING, TILT_SPRING};
use crate::models::view_state::{PointerOffset, ViewState, POINTER_BOUND};

/// Maximum tilt on either axis, in degrees
pub const MAX_TILT_DEG: f64 = 5.0;

/// Reflection overlay opacity at the bottom edge
pub const MAX_REFLECTION: f64 = 0.3;

/// Perspective distance of the stage, in CSS pixels
pub const PERSPECTIVE_PX: u32 = 1200;

/// Linear map from `input` range to `output` range, clamped to the output
pub fn map_range(value: f64, input: (f64, f64), output: (f64, f64)) -> f64 {
    let span = input.1 - input.0;
    if span == 0.0 {
        return output.0;
    }
    let t = ((value - input.0) / span).clamp(0.0, 1.0);
    output.0 + (output.1 - output.0) * t
}

/// Rotation `(rotate_x, rotate_y)` in degrees for a pointer offset
pub fn rotation_for(offset: PointerOffset, is_3d: bool) -> (f64, f64) {
    if !is_3d {
        return (0.0, 0.0);
    }
    let bounds = (-POINTER_BOUND, POINTER_BOUND);
    let rotate_x = map_range(offset.y, bounds, (MAX_TILT_DEG, -MAX_TILT_DEG));
    let rotate_y = map_range(offset.x, bounds, (-MAX_TILT_DEG, MAX_TILT_DEG));
    (rotate_x, rotate_y)
}

/// Reflection opacity for a vertical offset
pub fn reflection_for(offset_y: f64) -> f64 {
    map_range(offset_y, (-POINTER_BOUND, POINTER_BOUND), (0.0, MAX_REFLECTION))
}

/// One evaluated output of the viewport transform
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransformFrame {
    pub rotate_x_deg: f64,
    pub rotate_y_deg: f64,
    pub scale: f64,

    /// Present only while 3D mode is on
    pub reflection_opacity: Option<f64>,

    /// True when every spring is at rest
    pub settled: bool,
}

impl TransformFrame {
    /// Value for the page element's `transform` style
    pub fn css_transform(&self) -> String {
        format!(
            "rotateX({:.3}deg) rotateY({:.3}deg) scale({:.4})",
            self.rotate_x_deg, self.rotate_y_deg, self.scale
        )
    }
}

/// Spring-smoothed transform state
#[derive(Clone, Debug)]
pub struct ViewportTransform {
    x: Spring,
    y: Spring,
    scale: Spring,
    is_3d: bool,
}

impl ViewportTransform {
    pub fn new(state: &ViewState) -> Self {
        let pointer = state.pointer();
        Self {
            x: Spring::new(TILT_SPRING, pointer.x),
            y: Spring::new(TILT_SPRING, pointer.y),
            scale: Spring::new(SCALE_SPRING, state.zoom()),
            is_3d: state.is_3d(),
        }
    }

    /// Retarget the springs from the current view state
    pub fn sync(&mut self, state: &ViewState) {
        let pointer = state.pointer();
        self.x.set_target(pointer.x);
        self.y.set_target(pointer.y);
        self.scale.set_target(state.zoom());
        self.is_3d = state.is_3d();
    }

    /// Advance the springs by `dt_ms` and evaluate
    pub fn step(&mut self, dt_ms: f64) -> TransformFrame {
        let dt = dt_ms / 1000.0;
        self.x.step(dt);
        self.y.step(dt);
        self.scale.step(dt);
        self.frame()
    }

    /// Evaluate without advancing
    pub fn frame(&self) -> TransformFrame {
        let smoothed = PointerOffset {
            x: self.x.value(),
            y: self.y.value(),
        };
        let (rotate_x_deg, rotate_y_deg) = rotation_for(smoothed, self.is_3d);
        TransformFrame {
            rotate_x_deg,
            rotate_y_deg,
            scale: self.scale.value(),
            reflection_opacity: self.is_3d.then(|| reflection_for(smoothed.y)),
            settled: self.is_settled(),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.x.is_settled() && self.y.is_settled() && self.scale.is_settled()
    }
}

//! Damped spring used to smooth pointer tilt and zoom
//!
//! Integrated with fixed sub-steps (semi-implicit Euler) so the result does
//! not depend on the animation frame rate.

use serde::{Deserialize, Serialize};

/// Integration sub-step in seconds
const SUB_STEP: f64 = 0.001;

/// Frames longer than this are treated as a stall (tab hidden, debugger)
const MAX_FRAME: f64 = 0.064;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    /// Settle when within this distance of the target...
    pub rest_delta: f64,
    /// ...and slower than this
    pub rest_speed: f64,
}

impl SpringConfig {
    pub const fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass: 1.0,
            rest_delta: 0.0005,
            rest_speed: 0.005,
        }
    }
}

/// Pointer tilt spring, one per axis
pub const TILT_SPRING: SpringConfig = SpringConfig::new(200.0, 20.0);

/// Zoom scale spring
pub const SCALE_SPRING: SpringConfig = SpringConfig::new(200.0, 25.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    value: f64,
    velocity: f64,
    target: f64,
}

impl Spring {
    pub fn new(config: SpringConfig, value: f64) -> Self {
        Self {
            config,
            value,
            velocity: 0.0,
            target: value,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Jump to a value with no motion
    pub fn snap(&mut self, value: f64) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() <= self.config.rest_delta
            && self.velocity.abs() <= self.config.rest_speed
    }

    /// Advance by `dt` seconds; returns the new value
    pub fn step(&mut self, dt: f64) -> f64 {
        if self.is_settled() {
            self.snap(self.target);
            return self.value;
        }

        let mut remaining = dt.clamp(0.0, MAX_FRAME);
        let SpringConfig {
            stiffness,
            damping,
            mass,
            ..
        } = self.config;

        while remaining > 0.0 {
            let h = remaining.min(SUB_STEP);
            let force = -stiffness * (self.value - self.target) - damping * self.velocity;
            self.velocity += force / mass * h;
            self.value += self.velocity * h;
            remaining -= h;
        }

        if self.is_settled() {
            self.snap(self.target);
        }
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(spring: &mut Spring, seconds: f64) {
        let frames = (seconds / 0.016).ceil() as usize;
        for _ in 0..frames {
            spring.step(0.016);
        }
    }

    #[test]
    fn test_spring_moves_toward_target_without_snapping() {
        let mut spring = Spring::new(TILT_SPRING, 0.0);
        spring.set_target(0.5);
        let after_one_frame = spring.step(0.016);
        assert!(after_one_frame > 0.0);
        assert!(after_one_frame < 0.5);
    }

    #[test]
    fn test_spring_settles_on_target() {
        let mut spring = Spring::new(TILT_SPRING, 0.4);
        spring.set_target(0.0);
        run(&mut spring, 2.0);
        assert!(spring.is_settled());
        assert_eq!(spring.value(), 0.0);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut spring = Spring::new(SCALE_SPRING, 0.85);
        spring.set_target(1.5);
        let value = spring.step(10.0);
        assert!(value.is_finite());
        assert!(value < 1.5);
    }
}

//! Circular-reveal theme transition
//!
//! When the browser exposes `document.startViewTransition`, the theme change
//! runs inside it and a circular clip animates out from the click point.
//! Otherwise the change is applied directly.

use serde::Serialize;

pub const REVEAL_EASING: &str = "ease-in-out";

/// Root class that lifts the old snapshot above the new one while contracting
pub const CONTRACT_CLASS: &str = "reveal-contract";

/// Keyframes and timing for one reveal animation
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RevealPlan {
    /// `clip-path` values, start then end
    pub clip_path: [String; 2],

    /// Snapshot the animation is attached to
    pub pseudo_element: &'static str,

    pub duration_ms: u32,

    /// True for dark to light, which shrinks the old snapshot away
    pub contracting: bool,
}

impl RevealPlan {
    /// Plan a reveal centred on the pointer origin.
    ///
    /// The radius reaches the farthest viewport corner so the circle covers
    /// the whole page at full extent.
    pub fn new(
        origin_x: f64,
        origin_y: f64,
        viewport_width: f64,
        viewport_height: f64,
        to_dark: bool,
        duration_ms: u32,
    ) -> Self {
        let x = origin_x.clamp(0.0, viewport_width.max(0.0));
        let y = origin_y.clamp(0.0, viewport_height.max(0.0));
        let radius = x.max(viewport_width - x).hypot(y.max(viewport_height - y));

        let collapsed = format!("circle(0px at {}px {}px)", x, y);
        let expanded = format!("circle({}px at {}px {}px)", radius.ceil(), x, y);

        if to_dark {
            Self {
                clip_path: [collapsed, expanded],
                pseudo_element: "::view-transition-new(root)",
                duration_ms,
                contracting: false,
            }
        } else {
            Self {
                clip_path: [expanded, collapsed],
                pseudo_element: "::view-transition-old(root)",
                duration_ms,
                contracting: true,
            }
        }
    }

    pub fn keyframes(&self) -> RevealKeyframes<'_> {
        RevealKeyframes {
            clip_path: &self.clip_path,
        }
    }

    pub fn timing(&self) -> RevealTiming {
        RevealTiming {
            duration: self.duration_ms,
            easing: REVEAL_EASING,
            pseudo_element: self.pseudo_element,
        }
    }
}

/// `Element.animate` keyframes argument
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RevealKeyframes<'a> {
    pub clip_path: &'a [String; 2],
}

/// `Element.animate` options argument
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RevealTiming {
    pub duration: u32,
    pub easing: &'static str,
    pub pseudo_element: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_to_dark_expands_new_snapshot() {
        let plan = RevealPlan::new(0.0, 0.0, 300.0, 400.0, true, 500);
        assert_eq!(plan.clip_path[0], "circle(0px at 0px 0px)");
        assert_eq!(plan.clip_path[1], "circle(500px at 0px 0px)");
        assert_eq!(plan.pseudo_element, "::view-transition-new(root)");
        assert!(!plan.contracting);
    }

    #[test]
    fn test_dark_to_light_reverses_clip_sequence() {
        let to_dark = RevealPlan::new(100.0, 50.0, 300.0, 400.0, true, 500);
        let to_light = RevealPlan::new(100.0, 50.0, 300.0, 400.0, false, 500);
        assert_eq!(to_light.clip_path[0], to_dark.clip_path[1]);
        assert_eq!(to_light.clip_path[1], to_dark.clip_path[0]);
        assert_eq!(to_light.pseudo_element, "::view-transition-old(root)");
        assert!(to_light.contracting);
    }

    #[test]
    fn test_origin_clamped_to_viewport() {
        let plan = RevealPlan::new(-20.0, 900.0, 300.0, 400.0, true, 500);
        assert_eq!(plan.clip_path[0], "circle(0px at 0px 400px)");
    }

    #[test]
    fn test_timing_uses_duration() {
        let plan = RevealPlan::new(10.0, 10.0, 100.0, 100.0, true, 500);
        let timing = plan.timing();
        assert_eq!(timing.duration, 500);
        assert_eq!(timing.easing, REVEAL_EASING);
    }
}

// Zoom clamping, reset, and pointer-to-rotation properties

use cv_viewer_wasm::models::view_state::{DEFAULT_ZOOM, ZOOM_MAX, ZOOM_MIN};
use cv_viewer_wasm::models::{PointerOffset, ViewState, ViewerIntent};
use cv_viewer_wasm::viewport::transform::{rotation_for, MAX_TILT_DEG};
use cv_viewer_wasm::viewport::ViewportTransform;

/// Deterministic intent sequence mixing every kind of action
fn intents(seed: u64, len: usize) -> Vec<ViewerIntent> {
    let mut x = seed;
    (0..len)
        .map(|_| {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let r = (x >> 33) as u32;
            let fx = (r % 200) as f64 / 100.0 - 1.0;
            match r % 6 {
                0 | 1 => ViewerIntent::ZoomIn,
                2 => ViewerIntent::ZoomOut,
                3 => ViewerIntent::Toggle3d,
                4 => ViewerIntent::PointerMove(PointerOffset::new(fx, -fx)),
                _ => ViewerIntent::PointerLeave,
            }
        })
        .collect()
}

#[test]
fn test_zoom_always_within_bounds() {
    for seed in 0..20 {
        let mut state = ViewState::new();
        for intent in intents(seed, 300) {
            state.apply(intent);
            assert!(state.zoom() >= ZOOM_MIN && state.zoom() <= ZOOM_MAX, "zoom {}", state.zoom());
        }
    }
}

#[test]
fn test_clamping_idempotent_at_bounds() {
    let mut state = ViewState::new();
    for _ in 0..20 {
        state.apply(ViewerIntent::ZoomOut);
    }
    let at_min = state.zoom();
    state.apply(ViewerIntent::ZoomOut);
    assert_eq!(state.zoom(), at_min);
    assert_eq!(at_min, ZOOM_MIN);
}

#[test]
fn test_reset_restores_defaults_from_any_state() {
    for seed in 0..20 {
        let mut state = ViewState::new();
        for intent in intents(seed, 50) {
            state.apply(intent);
        }
        state.apply(ViewerIntent::Reset);
        assert_eq!(state.zoom(), DEFAULT_ZOOM);
        assert!(!state.is_3d());
        assert_eq!(state.pointer(), PointerOffset::CENTER);
    }
}

#[test]
fn test_flat_mode_never_rotates() {
    for i in -10..=10 {
        for j in -10..=10 {
            let offset = PointerOffset::new(i as f64 / 20.0, j as f64 / 20.0);
            assert_eq!(rotation_for(offset, false), (0.0, 0.0));
        }
    }
}

#[test]
fn test_rotation_monotonic_and_bounded() {
    assert_eq!(rotation_for(PointerOffset::CENTER, true), (0.0, 0.0));

    let mut last_ry = f64::NEG_INFINITY;
    let mut last_rx = f64::INFINITY;
    for i in -10..=10 {
        let v = i as f64 / 20.0;
        let (_, ry) = rotation_for(PointerOffset::new(v, 0.0), true);
        let (rx, _) = rotation_for(PointerOffset::new(0.0, v), true);
        assert!(ry >= last_ry, "rotateY must not decrease with x");
        assert!(rx <= last_rx, "rotateX must not increase with y");
        assert!(ry.abs() <= MAX_TILT_DEG && rx.abs() <= MAX_TILT_DEG);
        last_ry = ry;
        last_rx = rx;
    }
}

#[test]
fn test_spring_overshoot_stays_bounded() {
    let mut state = ViewState::new();
    state.apply(ViewerIntent::Toggle3d);
    let mut transform = ViewportTransform::new(&state);

    state.apply(ViewerIntent::PointerMove(PointerOffset::new(0.5, 0.5)));
    transform.sync(&state);
    for _ in 0..120 {
        let frame = transform.step(16.0);
        assert!(frame.rotate_x_deg.abs() <= MAX_TILT_DEG);
        assert!(frame.rotate_y_deg.abs() <= MAX_TILT_DEG);
        let opacity = frame.reflection_opacity.expect("reflection shown in 3D");
        assert!((0.0..=0.3).contains(&opacity));
    }
}

#[test]
fn test_leaving_3d_collapses_rotation() {
    let mut state = ViewState::new();
    state.apply(ViewerIntent::Toggle3d);
    state.apply(ViewerIntent::PointerMove(PointerOffset::new(0.4, 0.4)));
    let mut transform = ViewportTransform::new(&state);
    assert_ne!(transform.frame().rotate_y_deg, 0.0);

    state.apply(ViewerIntent::Toggle3d);
    transform.sync(&state);
    let frame = transform.frame();
    assert_eq!((frame.rotate_x_deg, frame.rotate_y_deg), (0.0, 0.0));
    assert_eq!(frame.reflection_opacity, None);
}

#[test]
fn test_zoom_change_eases_scale() {
    let mut state = ViewState::new();
    let mut transform = ViewportTransform::new(&state);
    state.apply(ViewerIntent::ZoomIn);
    transform.sync(&state);

    let first = transform.step(16.0).scale;
    assert!(first > DEFAULT_ZOOM && first < state.zoom());
    for _ in 0..200 {
        transform.step(16.0);
    }
    assert_eq!(transform.frame().scale, state.zoom());
}

// Host-side tests for pointer tracking and wheel input.

use glam::Vec2;
use rolling_soon_web::camera::PerspectiveCamera;
use rolling_soon_web::controls::OrbitControls;
use rolling_soon_web::input::*;

#[test]
fn primary_drag_rotates_and_secondary_drag_pans() {
    let mut t = PointerTracker::new();
    t.pointer_down(1, Vec2::new(10.0, 10.0), 0);
    assert_eq!(t.mode(), Some(DragMode::Rotate));
    let g = t.pointer_move(1, Vec2::new(15.0, 8.0));
    assert_eq!(g.as_slice(), &[ControlGesture::Rotate { dx: 5.0, dy: -2.0 }]);
    t.pointer_up(1);
    assert_eq!(t.active_count(), 0);
    assert_eq!(t.mode(), None);

    t.pointer_down(2, Vec2::ZERO, 2);
    assert_eq!(t.mode(), Some(DragMode::Pan));
    let g = t.pointer_move(2, Vec2::new(3.0, 4.0));
    assert_eq!(g.as_slice(), &[ControlGesture::Pan { dx: 3.0, dy: 4.0 }]);
}

#[test]
fn moves_from_unknown_pointers_are_ignored() {
    let mut t = PointerTracker::new();
    assert!(t.pointer_move(7, Vec2::ONE).is_empty());
    t.pointer_down(1, Vec2::ZERO, 0);
    assert!(t.pointer_move(7, Vec2::ONE).is_empty());
    assert!(t.pointer_move(1, Vec2::ZERO).is_empty());
}

#[test]
fn pinch_apart_dollies_in() {
    let mut t = PointerTracker::new();
    t.pointer_down(1, Vec2::new(0.0, 0.0), 0);
    t.pointer_down(2, Vec2::new(100.0, 0.0), 0);
    assert_eq!(t.active_count(), 2);
    assert_eq!(t.mode(), None);

    let g = t.pointer_move(2, Vec2::new(200.0, 0.0));
    let factor = g
        .iter()
        .find_map(|g| match g {
            ControlGesture::Dolly { factor } => Some(*factor),
            _ => None,
        })
        .expect("dolly gesture");
    assert!((factor - 0.5).abs() < 1e-6);
    assert!(g
        .iter()
        .any(|g| matches!(g, ControlGesture::Pan { dx, .. } if (*dx - 50.0).abs() < 1e-6)));
}

#[test]
fn lifting_one_finger_falls_back_to_rotate() {
    let mut t = PointerTracker::new();
    t.pointer_down(1, Vec2::ZERO, 0);
    t.pointer_down(2, Vec2::ONE, 0);
    t.pointer_up(2);
    assert_eq!(t.mode(), Some(DragMode::Rotate));
    t.clear();
    assert_eq!(t.active_count(), 0);
}

#[test]
fn wheel_direction_maps_to_dolly_factor() {
    match wheel_gesture(-100.0, 1.0) {
        Some(ControlGesture::Dolly { factor }) => assert!(factor < 1.0),
        other => panic!("unexpected {:?}", other),
    }
    match wheel_gesture(100.0, 1.0) {
        Some(ControlGesture::Dolly { factor }) => assert!(factor > 1.0),
        other => panic!("unexpected {:?}", other),
    }
    assert!(wheel_gesture(0.0, 1.0).is_none());
}

#[test]
fn gestures_apply_to_controls() {
    let mut camera = PerspectiveCamera::new(1.0);
    let mut controls = OrbitControls::new();
    controls.enable_damping = false;
    let before = controls.distance(&camera);
    ControlGesture::Dolly { factor: 0.5 }.apply(&mut controls, &camera, 600.0);
    controls.update(&mut camera);
    let after = controls.distance(&camera);
    assert!((after - (before * 0.5).max(controls.min_distance)).abs() < 1e-4);
}

// Host-side tests for orbit controls.

use glam::Vec3;
use rolling_soon_web::camera::PerspectiveCamera;
use rolling_soon_web::constants::*;
use rolling_soon_web::controls::{OrbitControls, Spherical};

fn undamped() -> OrbitControls {
    let mut c = OrbitControls::new();
    c.enable_damping = false;
    c
}

#[test]
fn spherical_round_trip() {
    let v = Vec3::new(1.0, 2.0, -3.0);
    let back = Spherical::from_offset(v).to_offset();
    assert!((back - v).length() < 1e-5);
    assert_eq!(Spherical::from_offset(Vec3::ZERO), Spherical::default());
}

#[test]
fn polar_angle_never_passes_limit() {
    let mut cam = PerspectiveCamera::new(1.0);
    let mut c = undamped();
    c.rotate_up(-10.0);
    c.update(&mut cam);
    assert!((c.polar_angle(&cam) - CONTROLS_MAX_POLAR).abs() < 1e-4);
    assert!(cam.position.y > 0.0);
}

#[test]
fn distance_clamps_to_limits() {
    let mut cam = PerspectiveCamera::new(1.0);
    let mut c = undamped();
    c.dolly(0.01);
    c.update(&mut cam);
    assert!((c.distance(&cam) - CONTROLS_MIN_DISTANCE).abs() < 1e-4);
    c.dolly(100.0);
    c.update(&mut cam);
    assert!((c.distance(&cam) - CONTROLS_MAX_DISTANCE).abs() < 1e-4);
}

#[test]
fn dolly_ignores_degenerate_factors() {
    let mut cam = PerspectiveCamera::new(1.0);
    let before = cam.position;
    let mut c = undamped();
    c.dolly(0.0);
    c.dolly(f32::NAN);
    c.dolly(-2.0);
    assert!(!c.update(&mut cam));
    assert!((cam.position - before).length() < 1e-4);
}

#[test]
fn damping_spreads_rotation_over_frames() {
    let mut cam = PerspectiveCamera::new(1.0);
    let mut c = OrbitControls::new();
    c.rotate_left(1.0);

    let theta = |cam: &PerspectiveCamera| Spherical::from_offset(cam.position).theta;
    let t0 = theta(&cam);
    assert!(c.update(&mut cam));
    let t1 = theta(&cam);
    c.update(&mut cam);
    let t2 = theta(&cam);

    let first = t1 - t0;
    let second = t2 - t1;
    assert!((first + CONTROLS_DAMPING_FACTOR).abs() < 1e-4);
    assert!((second + CONTROLS_DAMPING_FACTOR * (1.0 - CONTROLS_DAMPING_FACTOR)).abs() < 1e-4);
}

#[test]
fn quarter_height_drag_turns_a_quarter() {
    let mut cam = PerspectiveCamera::new(1.0);
    let mut c = undamped();
    c.rotate_by_pixels(100.0, 0.0, 400.0);
    c.update(&mut cam);
    assert!((cam.position.x + CAMERA_START.z).abs() < 1e-3);
    assert!(cam.position.z.abs() < 1e-3);
    assert!((cam.position.y - CAMERA_START.y).abs() < 1e-3);
}

#[test]
fn pan_moves_target_and_camera_together() {
    let mut cam = PerspectiveCamera::new(1.0);
    let mut c = undamped();
    let offset_before = cam.position - c.target;
    c.pan_by_pixels(&cam.clone(), 50.0, 0.0, 500.0);
    c.update(&mut cam);
    assert!(c.target.x < 0.0);
    assert_eq!(cam.target, c.target);
    assert!((cam.position - c.target - offset_before).length() < 1e-4);
}

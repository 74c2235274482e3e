// Host-side tests for tuning constants and the relationships between them.

use rolling_soon_web::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn camera_frustum_is_sane() {
    assert!(CAMERA_FOV_DEG > 0.0 && CAMERA_FOV_DEG < 180.0);
    assert!(CAMERA_NEAR > 0.0);
    assert!(CAMERA_FAR > CAMERA_NEAR);
    assert_eq!(CAMERA_START, glam::Vec3::new(0.0, 2.0, 5.0));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn controls_limits_are_ordered() {
    assert!(CONTROLS_MIN_DISTANCE < CONTROLS_MAX_DISTANCE);
    assert!(CONTROLS_MIN_POLAR <= CONTROLS_MAX_POLAR);
    assert!(CONTROLS_MAX_POLAR < std::f32::consts::FRAC_PI_2);
    assert!(CONTROLS_DAMPING_FACTOR > 0.0 && CONTROLS_DAMPING_FACTOR < 1.0);
    assert!(ZOOM_STEP_BASE > 0.0 && ZOOM_STEP_BASE < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn start_position_lies_inside_control_limits() {
    let r = CAMERA_START.length();
    assert!(r >= CONTROLS_MIN_DISTANCE && r <= CONTROLS_MAX_DISTANCE);
    let phi = (CAMERA_START.y / r).acos();
    assert!(phi <= CONTROLS_MAX_POLAR);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn lights_and_assets_match_page_defaults() {
    assert_eq!(AMBIENT_INTENSITY, 0.5);
    assert_eq!(DIRECTIONAL_POSITION, glam::Vec3::new(5.0, 5.0, 5.0));
    assert_eq!(POINT_POSITION, glam::Vec3::new(-5.0, 5.0, -5.0));
    assert!(MAX_POINT_LIGHTS >= 1);
    assert!(SHADOW_MAP_SIZE.is_power_of_two());
    assert!(AUDIO_VOLUME >= 0.0 && AUDIO_VOLUME <= 1.0);
    assert_eq!(MODEL_SRC, "/space_boi/scene.gltf");
    assert_eq!(AUDIO_SRC, "song.mp3");
    assert_eq!(MODEL_LOAD_ERROR, "Failed to load 3D model");
}

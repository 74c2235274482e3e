// Host-side tests for the scene flow: framing, failure, resize and teardown.

use rolling_soon_web::camera::Viewport;
use rolling_soon_web::constants::*;
use rolling_soon_web::runtime::SceneRuntime;
use rolling_soon_web::scene::{Geometry, Material, MeshRef, ModelAsset, Node, NoopDisposer};
use rolling_soon_web::state::{Lifecycle, LoadingBanner};

fn cube(size: f32) -> ModelAsset {
    let h = size / 2.0;
    let mut positions = Vec::new();
    for x in [-h, h] {
        for y in [-h, h] {
            for z in [-h, h] {
                positions.push([x, y, z]);
            }
        }
    }
    let mut asset = ModelAsset::new();
    let geometry = asset.push_geometry(Geometry {
        positions,
        ..Default::default()
    });
    let material = asset.push_material(Material::default());
    asset.push_node(Node::new().with_mesh(MeshRef::single(geometry, material)), None);
    asset
}

fn runtime() -> SceneRuntime {
    let mut rt = SceneRuntime::new(Viewport::new(800.0, 600.0, 1.0), MODEL_ROTATION_STEP);
    rt.start();
    rt
}

#[test]
fn new_runtime_has_standard_lights_and_waits_for_start() {
    let mut rt = SceneRuntime::new(Viewport::new(800.0, 600.0, 1.0), MODEL_ROTATION_STEP);
    assert_eq!(rt.scene.lights().len(), 3);
    assert_eq!(rt.lifecycle(), Lifecycle::Uninitialized);
    assert!(!rt.step());
    assert!(rt.start());
    assert!(rt.step());
}

#[test]
fn small_model_is_framed_from_above_and_behind() {
    let mut rt = runtime();
    let d = rt.apply_model(cube(2.0)).expect("applied");
    let expected = 1.0 / 37.5_f32.to_radians().tan();
    assert!((d - expected).abs() < 1e-4);
    assert!(rt.camera.position.x.abs() < 1e-3);
    assert!((rt.camera.position.y - d).abs() < 1e-3);
    assert!((rt.camera.position.z - 2.0 * d).abs() < 1e-3);
    assert!(rt.readiness().model_loaded());
    assert!(rt.model().is_some());
}

#[test]
fn large_model_distance_is_clamped() {
    let mut rt = runtime();
    let d = rt.apply_model(cube(40.0)).expect("applied");
    assert!(d > CONTROLS_MAX_DISTANCE);
    assert!((rt.controls.distance(&rt.camera) - CONTROLS_MAX_DISTANCE).abs() < 1e-3);
}

#[test]
fn model_spins_each_frame() {
    let mut rt = runtime();
    rt.apply_model(cube(2.0));
    let root = rt.model().expect("model");
    let before = rt.scene.node(root).expect("node").transform.rotation;
    assert!(rt.step());
    let after = rt.scene.node(root).expect("node").transform.rotation;
    assert!(before.angle_between(after) > 0.0);
}

#[test]
fn failure_shows_error_and_blocks_late_success() {
    let mut rt = runtime();
    assert!(rt.fail_model(&"404 Not Found"));
    assert!(!rt.readiness().model_loaded());
    let banner = LoadingBanner::derive(rt.readiness(), true);
    assert_eq!(banner.text().as_deref(), Some("Error: Failed to load 3D model"));
    assert!(rt.apply_model(cube(2.0)).is_none());
    assert!(rt.step());
}

#[test]
fn second_result_is_ignored() {
    let mut rt = runtime();
    assert!(rt.apply_model(cube(2.0)).is_some());
    assert!(rt.apply_model(cube(2.0)).is_none());
    assert!(!rt.fail_model(&"late"));
    assert_eq!(rt.readiness().error(), None);
}

#[test]
fn resize_updates_aspect_and_ignores_empty() {
    let mut rt = runtime();
    assert_eq!(rt.resize(Viewport::new(1000.0, 500.0, 2.0)), Some((2000, 1000)));
    assert!((rt.camera.aspect - 2.0).abs() < 1e-6);
    assert_eq!(rt.resize(Viewport::new(0.0, 300.0, 1.0)), None);
    assert!((rt.camera.aspect - 2.0).abs() < 1e-6);
    assert_eq!(rt.viewport().css_width, 1000.0);
}

#[test]
fn teardown_runs_once_and_stops_everything() {
    let mut rt = runtime();
    rt.apply_model(cube(2.0));
    let report = rt.teardown(&mut NoopDisposer).expect("first teardown");
    assert_eq!(report.geometries, 1);
    assert_eq!(report.materials, 1);
    assert!(rt.teardown(&mut NoopDisposer).is_none());
    assert_eq!(rt.lifecycle(), Lifecycle::Disposed);
    assert!(!rt.step());
    assert!(rt.model().is_none());
    assert_eq!(rt.scene.node_count(), 0);
    assert_eq!(rt.resize(Viewport::new(10.0, 10.0, 1.0)), None);
}

#[test]
fn results_after_teardown_are_dropped() {
    let mut rt = runtime();
    rt.teardown(&mut NoopDisposer);
    assert!(rt.apply_model(cube(2.0)).is_none());
    assert!(!rt.fail_model(&"late"));
    assert_eq!(rt.scene.node_count(), 0);
}

// Host-side tests for uniform packing.

use glam::{Mat4, Vec3};
use rolling_soon_web::camera::PerspectiveCamera;
use rolling_soon_web::constants::*;
use rolling_soon_web::scene::{standard_lights, Light, Material, TextureId};
use rolling_soon_web::uniforms::*;

fn point(x: f32) -> Light {
    Light::Point {
        color: [1.0, 0.5, 0.0],
        intensity: 2.0,
        position: Vec3::new(x, 0.0, 0.0),
        decay: 2.0,
    }
}

#[test]
fn standard_lights_pack() {
    let cam = PerspectiveCamera::new(1.0);
    let g = SceneGlobals::pack(&cam, &standard_lights());
    assert_eq!(g.point_count(), 1);
    assert!(g.casts_shadow());
    assert_eq!(g.ambient, [0.5, 0.5, 0.5, 1.0]);
    let dir = Vec3::new(g.dir_direction[0], g.dir_direction[1], g.dir_direction[2]);
    assert!((dir - Vec3::ONE.normalize()).length() < 1e-5);
    assert_eq!(g.points[0].position, [-5.0, 5.0, -5.0, POINT_DECAY]);
    assert_eq!(g.camera_pos, [0.0, 2.0, 5.0, 1.0]);
}

#[test]
fn extra_point_lights_are_dropped() {
    let cam = PerspectiveCamera::new(1.0);
    let lights: Vec<Light> = (0..6).map(|i| point(i as f32)).collect();
    let g = SceneGlobals::pack(&cam, &lights);
    assert_eq!(g.point_count(), MAX_POINT_LIGHTS);
    assert_eq!(g.points[3].position[0], 3.0);
    assert_eq!(g.points[0].color, [2.0, 1.0, 0.0, 1.0]);
}

#[test]
fn first_directional_light_wins() {
    let cam = PerspectiveCamera::new(1.0);
    let key = |x: f32, shadow: bool| Light::Directional {
        color: [1.0, 1.0, 1.0],
        intensity: 1.0,
        position: Vec3::new(x, 0.0, 0.0),
        target: Vec3::ZERO,
        cast_shadow: shadow,
    };
    let g = SceneGlobals::pack(&cam, &[key(3.0, false), key(-3.0, true)]);
    assert_eq!(g.dir_direction, [1.0, 0.0, 0.0, 0.0]);
    assert!(!g.casts_shadow());
}

#[test]
fn no_directional_light_means_no_shadow() {
    let cam = PerspectiveCamera::new(1.0);
    let g = SceneGlobals::pack(&cam, &[]);
    assert!(!g.casts_shadow());
    assert_eq!(g.point_count(), 0);
    assert_eq!(g.light_view_proj, Mat4::IDENTITY.to_cols_array_2d());
}

#[test]
fn shadow_projection_keeps_target_in_view() {
    let m = shadow_view_projection(DIRECTIONAL_POSITION, Vec3::ZERO);
    let p = m.project_point3(Vec3::ZERO);
    assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
    assert!((0.0..=1.0).contains(&p.z));
}

#[test]
fn node_uniform_normal_matrix_ignores_translation() {
    let u = NodeUniform::from_world(Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
    assert_eq!(u.model[3], [1.0, 2.0, 3.0, 1.0]);
    for (i, col) in u.normal.iter().take(3).enumerate() {
        for (j, v) in col.iter().take(3).enumerate() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!((v - expected).abs() < 1e-6);
        }
    }
}

#[test]
fn material_flags_follow_map() {
    let plain = MaterialUniform::from(&Material::default());
    assert_eq!(plain.flags[0], 0.0);
    let mapped = MaterialUniform::from(&Material {
        map: Some(TextureId(7)),
        base_color: [0.2, 0.4, 0.6, 1.0],
        ..Default::default()
    });
    assert_eq!(mapped.flags[0], 1.0);
    assert_eq!(mapped.base_color, [0.2, 0.4, 0.6, 1.0]);
}

#[test]
fn interleave_zero_fills_missing_attributes() {
    let v = interleave(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]], &[[0.0, 1.0, 0.0]], &[]);
    assert_eq!(v.len(), 2);
    assert_eq!(v[0].normal, [0.0, 1.0, 0.0]);
    assert_eq!(v[1].normal, [0.0, 0.0, 0.0]);
    assert_eq!(v[1].uv, [0.0, 0.0]);
    assert_eq!(std::mem::size_of::<Vertex>(), 32);
}

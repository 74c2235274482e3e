//! GPU-facing uniform blocks. Layouts mirror the structs in `shaders/scene.wgsl`.

use crate::camera::PerspectiveCamera;
use crate::constants::{MAX_POINT_LIGHTS, SHADOW_EXTENT, SHADOW_FAR, SHADOW_NEAR};
use crate::scene::{Light, Material};
use bytemuck::Zeroable;
use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightPacked {
    /// xyz position, w decay exponent.
    pub position: [f32; 4],
    /// rgb premultiplied by intensity.
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneGlobals {
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub ambient: [f32; 4],
    /// xyz unit vector towards the light, w = 1 when it casts shadows.
    pub dir_direction: [f32; 4],
    pub dir_color: [f32; 4],
    /// x point light count, y directional light present.
    pub counts: [u32; 4],
    pub points: [PointLightPacked; MAX_POINT_LIGHTS],
}

/// Orthographic shadow camera looking from `position` at `target`.
pub fn shadow_view_projection(position: Vec3, target: Vec3) -> Mat4 {
    let e = SHADOW_EXTENT;
    Mat4::orthographic_rh(-e, e, -e, e, SHADOW_NEAR, SHADOW_FAR)
        * Mat4::look_at_rh(position, target, Vec3::Y)
}

impl SceneGlobals {
    /// Pack camera and lights. Ambient lights sum; the first directional light
    /// is used and extra point lights beyond the shader's capacity are skipped.
    pub fn pack(camera: &PerspectiveCamera, lights: &[Light]) -> Self {
        let mut g = Self::zeroed();
        g.view_proj = camera.view_projection().to_cols_array_2d();
        g.light_view_proj = Mat4::IDENTITY.to_cols_array_2d();
        g.camera_pos = camera.position.extend(1.0).to_array();

        let mut ambient = Vec3::ZERO;
        let mut has_directional = false;
        let mut points = 0usize;
        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    ambient += Vec3::from_array(color) * intensity;
                }
                Light::Directional {
                    color,
                    intensity,
                    position,
                    target,
                    cast_shadow,
                } if !has_directional => {
                    has_directional = true;
                    let dir = (position - target).normalize_or_zero();
                    g.dir_direction = dir.extend(if cast_shadow { 1.0 } else { 0.0 }).to_array();
                    g.dir_color = (Vec3::from_array(color) * intensity).extend(1.0).to_array();
                    g.light_view_proj = shadow_view_projection(position, target).to_cols_array_2d();
                }
                Light::Point {
                    color,
                    intensity,
                    position,
                    decay,
                } if points < MAX_POINT_LIGHTS => {
                    g.points[points] = PointLightPacked {
                        position: position.extend(decay).to_array(),
                        color: (Vec3::from_array(color) * intensity).extend(1.0).to_array(),
                    };
                    points += 1;
                }
                _ => {}
            }
        }
        g.ambient = ambient.extend(1.0).to_array();
        g.counts = [points as u32, has_directional as u32, 0, 0];
        g
    }

    pub fn point_count(&self) -> usize {
        self.counts[0] as usize
    }

    pub fn casts_shadow(&self) -> bool {
        self.counts[1] == 1 && self.dir_direction[3] > 0.5
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

impl NodeUniform {
    pub fn from_world(world: Mat4) -> Self {
        Self {
            model: world.to_cols_array_2d(),
            normal: world.inverse().transpose().to_cols_array_2d(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    /// x = 1 when a base color map is bound.
    pub flags: [f32; 4],
}

impl From<&Material> for MaterialUniform {
    fn from(m: &Material) -> Self {
        Self {
            base_color: m.base_color,
            flags: [if m.map.is_some() { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Interleave a geometry's attribute arrays. Missing normals or uvs become zero.
pub fn interleave(
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
    uvs: &[[f32; 2]],
) -> Vec<Vertex> {
    positions
        .iter()
        .enumerate()
        .map(|(i, p)| Vertex {
            position: *p,
            normal: normals.get(i).copied().unwrap_or([0.0, 0.0, 0.0]),
            uv: uvs.get(i).copied().unwrap_or([0.0, 0.0]),
        })
        .collect()
}

use crate::constants::{CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, CAMERA_START};
use crate::scene::Aabb;
use glam::{Mat4, Vec3};

/// Right-handed perspective camera looking at `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: CAMERA_START,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_deg: CAMERA_FOV_DEG,
            aspect,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }

    #[inline]
    pub fn fov_radians(&self) -> f32 {
        self.fov_deg.to_radians()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Camera-space basis in world coordinates: (right, up).
    pub fn screen_axes(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        (right, up)
    }

    /// Distance at which an object of the given size fills the vertical field of view.
    pub fn framing_distance(&self, size: Vec3) -> f32 {
        let max_dim = size.max_element();
        (max_dim / 2.0 / (self.fov_radians() / 2.0).tan()).abs()
    }

    /// Pull the camera back to frame `bounds`: y = d, z = 2d, x untouched.
    /// Returns d. The caller retargets its controls at the box center.
    pub fn frame_bounds(&mut self, bounds: &Aabb) -> f32 {
        let distance = self.framing_distance(bounds.size());
        self.position.y = distance;
        self.position.z = distance * 2.0;
        distance
    }
}

/// CSS size of the mount surface plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub css_width: f64,
    pub css_height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(css_width: f64, css_height: f64, pixel_ratio: f64) -> Self {
        Self {
            css_width,
            css_height,
            pixel_ratio: if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.css_width <= 0.0 || self.css_height <= 0.0
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        if self.css_height > 0.0 {
            (self.css_width / self.css_height) as f32
        } else {
            1.0
        }
    }

    /// Backing-store size in device pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let w = (self.css_width * self.pixel_ratio) as u32;
        let h = (self.css_height * self.pixel_ratio) as u32;
        (w.max(1), h.max(1))
    }
}

//! Orbit camera controls: rotate, dolly and pan around a target with optional
//! damping and clamped distance / polar angle.

use crate::camera::PerspectiveCamera;
use crate::constants::*;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

const EPS: f32 = 1e-6;

/// Offset from the target in spherical form. `phi` is measured from +Y,
/// `theta` around Y starting at +Z.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let sin_phi_r = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_r * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_r * self.theta.cos(),
        )
    }

    /// Keep phi off the poles.
    pub fn make_safe(&mut self) {
        self.phi = self.phi.clamp(EPS, PI - EPS);
    }
}

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    delta: Spherical,
    scale: f32,
    pan_offset: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: true,
            damping_factor: CONTROLS_DAMPING_FACTOR,
            min_distance: CONTROLS_MIN_DISTANCE,
            max_distance: CONTROLS_MAX_DISTANCE,
            min_polar_angle: CONTROLS_MIN_POLAR,
            max_polar_angle: CONTROLS_MAX_POLAR,
            rotate_speed: CONTROLS_ROTATE_SPEED,
            zoom_speed: CONTROLS_ZOOM_SPEED,
            pan_speed: CONTROLS_PAN_SPEED,
            delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta.phi -= angle;
    }

    /// Drag rotation: a full viewport height of travel is one full turn.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, client_height: f32) {
        let h = client_height.max(1.0);
        self.rotate_left(TAU * dx / h * self.rotate_speed);
        self.rotate_up(TAU * dy / h * self.rotate_speed);
    }

    /// Multiply the orbit radius by `factor` at the next update (<1 moves closer).
    pub fn dolly(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.scale *= factor;
        }
    }

    /// Screen-space pan by a pixel delta, scaled so the target tracks the pointer.
    pub fn pan_by_pixels(
        &mut self,
        camera: &PerspectiveCamera,
        dx: f32,
        dy: f32,
        client_height: f32,
    ) {
        let h = client_height.max(1.0);
        let offset = camera.position - self.target;
        let target_distance = offset.length() * (camera.fov_radians() / 2.0).tan();
        let (right, up) = camera.screen_axes();
        let left = 2.0 * dx * target_distance / h * self.pan_speed;
        let upward = 2.0 * dy * target_distance / h * self.pan_speed;
        self.pan_offset += right * -left;
        self.pan_offset += up * upward;
    }

    /// Current distance between camera and target.
    pub fn distance(&self, camera: &PerspectiveCamera) -> f32 {
        (camera.position - self.target).length()
    }

    pub fn polar_angle(&self, camera: &PerspectiveCamera) -> f32 {
        Spherical::from_offset(camera.position - self.target).phi
    }

    /// Apply pending input to the camera. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let before_pos = camera.position;
        let before_target = self.target;

        let mut s = Spherical::from_offset(camera.position - self.target);
        if self.enable_damping {
            s.theta += self.delta.theta * self.damping_factor;
            s.phi += self.delta.phi * self.damping_factor;
        } else {
            s.theta += self.delta.theta;
            s.phi += self.delta.phi;
        }
        s.phi = s.phi.clamp(self.min_polar_angle, self.max_polar_angle);
        s.make_safe();
        s.radius = (s.radius * self.scale).clamp(self.min_distance, self.max_distance);

        if self.enable_damping {
            self.target += self.pan_offset * self.damping_factor;
        } else {
            self.target += self.pan_offset;
        }

        camera.position = self.target + s.to_offset();
        camera.target = self.target;

        if self.enable_damping {
            let keep = 1.0 - self.damping_factor;
            self.delta.theta *= keep;
            self.delta.phi *= keep;
            self.pan_offset *= keep;
        } else {
            self.delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.position.distance_squared(before_pos) > EPS
            || self.target.distance_squared(before_target) > EPS
    }
}

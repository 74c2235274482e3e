use crate::camera::PerspectiveCamera;
use crate::constants::ZOOM_STEP_BASE;
use crate::controls::OrbitControls;
use glam::Vec2;
use smallvec::SmallVec;

/// Primary button rotates, secondary pans; two touches pinch-dolly and pan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlGesture {
    Rotate { dx: f32, dy: f32 },
    Pan { dx: f32, dy: f32 },
    /// Radius multiplier (<1 moves closer).
    Dolly { factor: f32 },
}

impl ControlGesture {
    pub fn apply(
        self,
        controls: &mut OrbitControls,
        camera: &PerspectiveCamera,
        client_height: f32,
    ) {
        match self {
            ControlGesture::Rotate { dx, dy } => controls.rotate_by_pixels(dx, dy, client_height),
            ControlGesture::Pan { dx, dy } => controls.pan_by_pixels(camera, dx, dy, client_height),
            ControlGesture::Dolly { factor } => controls.dolly(factor),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActivePointer {
    id: i32,
    pos: Vec2,
}

/// Tracks pressed pointers on the canvas and turns movement into gestures.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    pointers: SmallVec<[ActivePointer; 2]>,
    mode: Option<DragMode>,
}

pub type Gestures = SmallVec<[ControlGesture; 2]>;

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn mode(&self) -> Option<DragMode> {
        self.mode
    }

    /// `button` follows `MouseEvent.button`: 0 primary, 2 secondary.
    pub fn pointer_down(&mut self, id: i32, pos: Vec2, button: i16) {
        if self.pointers.iter().any(|p| p.id == id) {
            return;
        }
        self.pointers.push(ActivePointer { id, pos });
        self.mode = match (self.pointers.len(), button) {
            (1, 2) => Some(DragMode::Pan),
            (1, _) => Some(DragMode::Rotate),
            _ => None,
        };
    }

    pub fn pointer_move(&mut self, id: i32, pos: Vec2) -> Gestures {
        let mut out = Gestures::new();
        let Some(idx) = self.pointers.iter().position(|p| p.id == id) else {
            return out;
        };
        if self.pointers.len() >= 2 {
            let other = self.pointers[if idx == 0 { 1 } else { 0 }].pos;
            let prev = self.pointers[idx].pos;
            let prev_dist = prev.distance(other);
            let new_dist = pos.distance(other);
            if prev_dist > 0.0 && new_dist > 0.0 {
                out.push(ControlGesture::Dolly {
                    factor: prev_dist / new_dist,
                });
            }
            let mid_delta = ((pos + other) - (prev + other)) * 0.5;
            if mid_delta != Vec2::ZERO {
                out.push(ControlGesture::Pan {
                    dx: mid_delta.x,
                    dy: mid_delta.y,
                });
            }
        } else {
            let d = pos - self.pointers[idx].pos;
            if d != Vec2::ZERO {
                match self.mode {
                    Some(DragMode::Rotate) => out.push(ControlGesture::Rotate { dx: d.x, dy: d.y }),
                    Some(DragMode::Pan) => out.push(ControlGesture::Pan { dx: d.x, dy: d.y }),
                    None => {}
                }
            }
        }
        self.pointers[idx].pos = pos;
        out
    }

    pub fn pointer_up(&mut self, id: i32) {
        self.pointers.retain(|p| p.id != id);
        self.mode = match self.pointers.len() {
            1 => Some(DragMode::Rotate),
            _ => None,
        };
    }

    pub fn clear(&mut self) {
        self.pointers.clear();
        self.mode = None;
    }
}

/// Wheel notch to dolly factor: scrolling up (negative delta) moves closer.
#[inline]
pub fn wheel_gesture(delta_y: f64, zoom_speed: f32) -> Option<ControlGesture> {
    let step = ZOOM_STEP_BASE.powf(zoom_speed);
    if delta_y < 0.0 {
        Some(ControlGesture::Dolly { factor: step })
    } else if delta_y > 0.0 {
        Some(ControlGesture::Dolly { factor: 1.0 / step })
    } else {
        None
    }
}

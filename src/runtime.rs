//! Scene flow state machine, independent of the browser and the GPU.
//!
//! The web layer owns one [`SceneRuntime`] per mount, calls [`SceneRuntime::step`]
//! from its animation frame callback and forwards load results, resizes and
//! teardown here.

use crate::camera::{PerspectiveCamera, Viewport};
use crate::constants::{BACKGROUND_COLOR, MODEL_LOAD_ERROR};
use crate::controls::OrbitControls;
use crate::scene::{standard_lights, DisposeReport, Disposer, ModelAsset, NodeId, Scene};
use crate::state::{Lifecycle, SceneLifecycle, SceneReadiness};
use std::fmt::Display;

pub struct SceneRuntime {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    model: Option<NodeId>,
    readiness: SceneReadiness,
    lifecycle: SceneLifecycle,
    viewport: Viewport,
    rotation_step: f32,
}

impl SceneRuntime {
    /// Scene, camera, lights and controls for a mount surface of the given size.
    pub fn new(viewport: Viewport, rotation_step: f32) -> Self {
        let mut scene = Scene::new(BACKGROUND_COLOR);
        for light in standard_lights() {
            scene.add_light(light);
        }
        Self {
            scene,
            camera: PerspectiveCamera::new(viewport.aspect()),
            controls: OrbitControls::new(),
            model: None,
            readiness: SceneReadiness::default(),
            lifecycle: SceneLifecycle::default(),
            viewport,
            rotation_step,
        }
    }

    pub fn start(&mut self) -> bool {
        self.lifecycle.start()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.state()
    }

    pub fn readiness(&self) -> &SceneReadiness {
        &self.readiness
    }

    pub fn model(&self) -> Option<NodeId> {
        self.model
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Advance one frame. Returns false once the scene is no longer rendering,
    /// in which case nothing was touched and nothing should be drawn.
    pub fn step(&mut self) -> bool {
        if !self.lifecycle.is_rendering() {
            return false;
        }
        if let Some(model) = self.model {
            self.scene.rotate_y(model, self.rotation_step);
        }
        self.controls.update(&mut self.camera);
        true
    }

    /// Add the loaded model and frame it. Returns the framing distance, or
    /// `None` if the result arrived after teardown or after the load settled.
    pub fn apply_model(&mut self, asset: ModelAsset) -> Option<f32> {
        if self.lifecycle.is_disposed() || self.readiness.is_settled() {
            log::warn!("[scene] dropping model result (lifecycle={:?})", self.lifecycle.state());
            return None;
        }
        let root = self.scene.add_model(asset);
        self.model = Some(root);
        let distance = match self.scene.world_bounds(root) {
            Some(bounds) => {
                let d = self.camera.frame_bounds(&bounds);
                self.controls.target = bounds.center();
                self.controls.update(&mut self.camera);
                log::info!(
                    "[scene] framed model: center=({:.2},{:.2},{:.2}) distance={:.2}",
                    bounds.center().x,
                    bounds.center().y,
                    bounds.center().z,
                    d
                );
                d
            }
            None => {
                log::warn!("[scene] model has no geometry to frame");
                0.0
            }
        };
        self.readiness.mark_model_loaded();
        Some(distance)
    }

    /// Record a load failure. The scene keeps rendering without a model.
    pub fn fail_model(&mut self, cause: &dyn Display) -> bool {
        log::error!("[scene] model loading error: {}", cause);
        if self.lifecycle.is_disposed() {
            return false;
        }
        self.readiness.mark_failed(MODEL_LOAD_ERROR)
    }

    /// New mount size: aspect follows width/height and the returned physical
    /// size is what the render target should become. Empty sizes are ignored.
    pub fn resize(&mut self, viewport: Viewport) -> Option<(u32, u32)> {
        if viewport.is_empty() || self.lifecycle.is_disposed() {
            return None;
        }
        self.viewport = viewport;
        self.camera.aspect = viewport.aspect();
        Some(viewport.physical_size())
    }

    /// Stop rendering and hand every GPU-backed resource to `disposer`.
    /// Only the first call does anything.
    pub fn teardown(&mut self, disposer: &mut dyn Disposer) -> Option<DisposeReport> {
        if !self.lifecycle.dispose() {
            return None;
        }
        self.model = None;
        let report = self.scene.dispose(disposer);
        log::info!(
            "[scene] disposed geometries={} materials={} textures={}",
            report.geometries,
            report.materials,
            report.textures
        );
        Some(report)
    }
}

use crate::clock::FrameClock;
use crate::render::GpuState;
use crate::runtime::SceneRuntime;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub runtime: Rc<RefCell<SceneRuntime>>,
    pub gpu: Rc<RefCell<Option<GpuState>>>,
    clock: FrameClock,
}

impl FrameContext {
    pub fn new(runtime: Rc<RefCell<SceneRuntime>>, gpu: Rc<RefCell<Option<GpuState>>>) -> Self {
        Self {
            runtime,
            gpu,
            clock: FrameClock::new(Instant::now()),
        }
    }

    /// One animation frame. Returns false once the scene has stopped rendering.
    pub fn frame(&mut self) -> bool {
        let mut rt = self.runtime.borrow_mut();
        if !rt.step() {
            return false;
        }
        if let (_, Some(fps)) = self.clock.tick(Instant::now()) {
            log::info!("[frame] {:.1} fps", fps);
        }
        let mut gpu = self.gpu.borrow_mut();
        let Some(gpu) = gpu.as_mut() else {
            return true;
        };
        match gpu.render(&rt.scene, &rt.camera) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[frame] surface out of memory");
            }
            Err(e) => log::warn!("[frame] skipped frame: {:?}", e),
        }
        true
    }
}

type Tick = Closure<dyn FnMut()>;

/// `requestAnimationFrame` loop whose pending handle can be cancelled.
pub struct AnimationLoop {
    handle: Rc<Cell<Option<i32>>>,
    running: Rc<Cell<bool>>,
    tick: Rc<RefCell<Option<Tick>>>,
}

fn schedule(tick: &RefCell<Option<Tick>>, handle: &Cell<Option<i32>>) {
    let Some(window) = web::window() else {
        return;
    };
    let tick = tick.borrow();
    let Some(cb) = tick.as_ref() else {
        return;
    };
    match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
        Ok(id) => handle.set(Some(id)),
        Err(e) => log::error!("[frame] requestAnimationFrame failed: {:?}", e),
    }
}

impl AnimationLoop {
    pub fn start(frame_ctx: Rc<RefCell<FrameContext>>) -> Self {
        let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let running = Rc::new(Cell::new(true));
        let tick: Rc<RefCell<Option<Tick>>> = Rc::new(RefCell::new(None));

        let weak_tick: Weak<RefCell<Option<Tick>>> = Rc::downgrade(&tick);
        let handle_tick = handle.clone();
        let running_tick = running.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            handle_tick.set(None);
            if !running_tick.get() {
                return;
            }
            if !frame_ctx.borrow_mut().frame() {
                running_tick.set(false);
                log::info!("[frame] loop ended");
                return;
            }
            if let Some(tick) = weak_tick.upgrade() {
                schedule(&tick, &handle_tick);
            }
        }) as Box<dyn FnMut()>));
        schedule(&tick, &handle);

        Self {
            handle,
            running,
            tick,
        }
    }

    /// Cancel the pending frame. No frame callback runs after this returns.
    pub fn stop(&self) {
        self.running.set(false);
        if let Some(id) = self.handle.take() {
            if let Some(window) = web::window() {
                _ = window.cancel_animation_frame(id);
            }
        }
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
        self.tick.borrow_mut().take();
    }
}

//! One mounted page: the scene flow and the audio flow side by side.

use crate::audio::BackgroundTrack;
use crate::config::SiteConfig;
use crate::dom;
use crate::events::{wire_pointer_controls, ListenerSet};
use crate::frame::{AnimationLoop, FrameContext};
use crate::loader;
use crate::overlay;
use crate::render::GpuState;
use crate::runtime::SceneRuntime;
use crate::scene::NoopDisposer;
use crate::state::{CancelToken, LoadingBanner};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub struct SiteApp {
    canvas: web::HtmlCanvasElement,
    runtime: Rc<RefCell<SceneRuntime>>,
    gpu: Rc<RefCell<Option<GpuState>>>,
    audio: Option<Rc<BackgroundTrack>>,
    animation: AnimationLoop,
    listeners: ListenerSet,
    cancel: CancelToken,
}

impl SiteApp {
    pub fn mount(document: &web::Document) -> anyhow::Result<Self> {
        let defaults = SiteConfig::default();
        let mount: web::HtmlElement = dom::element_by_id(document, &defaults.mount_id)?;
        let config =
            defaults.with_overrides(|key| mount.get_attribute(&format!("data-{}", key)));
        log::info!(
            "[app] mounting model={} audio={}",
            config.model_src,
            config.audio_src
        );

        let canvas = dom::append_canvas(document, &mount)?;
        let viewport = dom::mount_viewport(&mount);
        dom::sync_canvas_backing_size(&canvas, viewport.physical_size());
        let runtime = Rc::new(RefCell::new(SceneRuntime::new(viewport, config.rotation_step)));
        runtime.borrow_mut().start();
        let gpu: Rc<RefCell<Option<GpuState>>> = Rc::new(RefCell::new(None));
        let cancel = CancelToken::new();
        let mut listeners = ListenerSet::new();

        let audio_slot: Rc<RefCell<Weak<BackgroundTrack>>> = Rc::new(RefCell::new(Weak::new()));
        let notify: Rc<dyn Fn()> = {
            let document = document.clone();
            let runtime = Rc::downgrade(&runtime);
            let audio_slot = audio_slot.clone();
            Rc::new(move || {
                let Some(runtime) = runtime.upgrade() else {
                    return;
                };
                let audio_loaded = audio_slot
                    .borrow()
                    .upgrade()
                    .map(|t| t.state().loaded())
                    .unwrap_or(false);
                let banner = LoadingBanner::derive(runtime.borrow().readiness(), audio_loaded);
                overlay::sync_banner(&document, &banner);
            })
        };

        let track = BackgroundTrack::new(&config.audio_src, config.audio_volume, notify.clone());
        let audio = match track {
            Ok(track) => {
                let track = Rc::new(track);
                *audio_slot.borrow_mut() = Rc::downgrade(&track);
                Some(track)
            }
            Err(e) => {
                log::error!("[audio] setup failed: {:?}", e);
                None
            }
        };
        notify();

        wire_pointer_controls(&mut listeners, &canvas, runtime.clone());
        if let Some(window) = web::window() {
            let mount = mount.clone();
            let canvas = canvas.clone();
            let runtime = runtime.clone();
            let gpu = gpu.clone();
            listeners.add(window.as_ref(), "resize", move |_| {
                let viewport = dom::mount_viewport(&mount);
                let Some((w, h)) = runtime.borrow_mut().resize(viewport) else {
                    return;
                };
                dom::sync_canvas_backing_size(&canvas, (w, h));
                if let Some(gpu) = gpu.borrow_mut().as_mut() {
                    gpu.resize(w, h);
                }
            });
        }
        if let Some(track) = &audio {
            let track = Rc::downgrade(track);
            let wired = overlay::wire_mute_button(document, &mut listeners, move || {
                track.upgrade().map(|t| t.toggle_mute()).unwrap_or(false)
            });
            if wired {
                log::info!("[app] mute button enabled");
            }
        }

        {
            let canvas = canvas.clone();
            let gpu = gpu.clone();
            let cancel = cancel.clone();
            spawn_local(async move {
                match GpuState::new(&canvas).await {
                    Ok(state) if cancel.is_cancelled() => state.dispose(),
                    Ok(mut state) => {
                        state.resize(canvas.width(), canvas.height());
                        *gpu.borrow_mut() = Some(state);
                    }
                    Err(e) => log::error!("[gpu] init failed, continuing without 3D: {:?}", e),
                }
            });
        }
        {
            let runtime = runtime.clone();
            let cancel = cancel.clone();
            let notify = notify.clone();
            let url = config.model_src.clone();
            spawn_local(async move {
                let result = loader::load_model(&url).await;
                if cancel.is_cancelled() {
                    log::info!("[model] load finished after unmount; dropped");
                    return;
                }
                match result {
                    Ok(asset) => {
                        runtime.borrow_mut().apply_model(asset);
                    }
                    Err(e) => {
                        runtime.borrow_mut().fail_model(&e);
                    }
                }
                notify();
            });
        }

        let frame_ctx = Rc::new(RefCell::new(FrameContext::new(runtime.clone(), gpu.clone())));
        let animation = AnimationLoop::start(frame_ctx);

        Ok(Self {
            canvas,
            runtime,
            gpu,
            audio,
            animation,
            listeners,
            cancel,
        })
    }

    pub fn is_muted(&self) -> bool {
        self.audio.as_ref().map(|t| t.state().muted()).unwrap_or(false)
    }

    pub fn is_model_loaded(&self) -> bool {
        self.runtime.borrow().readiness().model_loaded()
    }

    pub fn toggle_mute(&self) -> bool {
        match &self.audio {
            Some(track) => track.toggle_mute(),
            None => false,
        }
    }

    /// Stop the loop, release scene and device resources, detach the canvas and
    /// every listener, and silence the track.
    pub fn unmount(mut self) {
        self.animation.stop();
        self.cancel.cancel();
        log::info!("[app] removing {} listeners", self.listeners.len());
        self.listeners.remove_all();

        let gpu = self.gpu.borrow_mut().take();
        match gpu {
            Some(mut gpu) => {
                self.runtime.borrow_mut().teardown(gpu.resources_mut());
                gpu.dispose();
            }
            None => {
                self.runtime.borrow_mut().teardown(&mut NoopDisposer);
            }
        }
        self.canvas.remove();

        if let Some(track) = self.audio.take() {
            track.teardown();
        }
        log::info!("[app] unmounted");
    }
}

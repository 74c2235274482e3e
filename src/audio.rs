//! Looping background track.
//!
//! Playback waits for the first user interaction after the track can play
//! through; browsers reject `play()` before that.

use crate::events::{FirstInteraction, ListenerSet};
use crate::playback::{self, MediaControl};
use crate::state::PlaybackState;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

impl MediaControl for web::HtmlAudioElement {
    fn is_paused(&self) -> bool {
        self.paused()
    }

    fn request_play(&self, reason: &str) {
        let promise = match self.play() {
            Ok(p) => p,
            Err(e) => {
                log::warn!("[audio] play() threw ({}): {:?}", reason, e);
                return;
            }
        };
        let reason = reason.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => log::info!("[audio] play started ({})", reason),
                Err(e) => log::warn!("[audio] playback blocked ({}): {:?}", reason, e),
            }
        });
    }

    fn set_muted(&self, muted: bool) {
        web::HtmlMediaElement::set_muted(self, muted);
    }
}

struct TrackInner {
    element: web::HtmlAudioElement,
    state: RefCell<PlaybackState>,
    listeners: RefCell<ListenerSet>,
    unlock: RefCell<Option<FirstInteraction>>,
    disposed: Cell<bool>,
    notify: Rc<dyn Fn()>,
}

pub struct BackgroundTrack {
    inner: Rc<TrackInner>,
}

impl BackgroundTrack {
    /// Build the element and its listeners. `notify` runs whenever the loaded
    /// flag changes so the banner can follow.
    pub fn new(src: &str, volume: f64, notify: Rc<dyn Fn()>) -> anyhow::Result<Self> {
        let element = web::HtmlAudioElement::new_with_src(src)
            .map_err(|e| anyhow::anyhow!("audio element: {:?}", e))?;
        element.set_loop(true);
        element.set_volume(volume);
        element.set_preload("auto");

        let inner = Rc::new(TrackInner {
            element,
            state: RefCell::new(PlaybackState::default()),
            listeners: RefCell::new(ListenerSet::new()),
            unlock: RefCell::new(None),
            disposed: Cell::new(false),
            notify,
        });

        {
            let target: web::EventTarget = inner.element.clone().into();
            let mut listeners = inner.listeners.borrow_mut();
            let weak = Rc::downgrade(&inner);
            listeners.add(&target, "canplaythrough", move |_| {
                if let Some(inner) = weak.upgrade() {
                    on_can_play_through(&inner);
                }
            });
            let weak = Rc::downgrade(&inner);
            listeners.add(&target, "playing", move |_| {
                if let Some(inner) = weak.upgrade() {
                    if inner.state.borrow_mut().mark_playing() {
                        log::info!("[audio] playing");
                    }
                }
            });
            listeners.add(&target, "error", |_| {
                log::error!("[audio] media element reported an error");
            });
        }

        log::info!("[audio] track created src={} volume={:.2}", src, volume);
        Ok(Self { inner })
    }

    pub fn state(&self) -> PlaybackState {
        *self.inner.state.borrow()
    }

    pub fn toggle_mute(&self) -> bool {
        let muted = playback::toggle_mute(&self.inner.element, &mut self.inner.state.borrow_mut());
        log::info!("[audio] muted={}", muted);
        muted
    }

    /// Pause, drop the source and detach every listener, including a pending
    /// first-interaction wait.
    pub fn teardown(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        if let Some(unlock) = self.inner.unlock.borrow_mut().take() {
            unlock.cancel();
        }
        self.inner.listeners.borrow_mut().remove_all();
        _ = self.inner.element.pause();
        self.inner.element.set_src("");
        log::info!("[audio] torn down");
    }
}

fn on_can_play_through(inner: &Rc<TrackInner>) {
    if inner.disposed.get() || !inner.state.borrow_mut().mark_loaded() {
        return;
    }
    log::info!("[audio] ready");
    (inner.notify)();

    let Some(window) = web::window() else {
        log::error!("[audio] no window to await interaction on");
        return;
    };
    let (gate, outcome) = FirstInteraction::arm(window.as_ref());
    *inner.unlock.borrow_mut() = Some(gate);

    let weak: Weak<TrackInner> = Rc::downgrade(inner);
    wasm_bindgen_futures::spawn_local(async move {
        let Some(kind) = outcome.await else {
            return;
        };
        let Some(inner) = weak.upgrade() else {
            return;
        };
        inner.unlock.borrow_mut().take();
        if inner.disposed.get() {
            return;
        }
        let state = *inner.state.borrow();
        playback::unlock_playback(&inner.element, &state, kind);
    });
}

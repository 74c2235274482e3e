//! Page state records.
//!
//! Each record is owned by the component that drives it and is only mutated
//! through the transition methods below; the web layer reads them to render
//! the status banner.

use crate::constants::{BANNER_ERROR_PREFIX, BANNER_LOADING_PREFIX};
use std::cell::Cell;
use std::rc::Rc;

/// Background track flags, driven by media events and the mute toggle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackState {
    muted: bool,
    playing: bool,
    loaded: bool,
}

impl PlaybackState {
    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Media reported it can play through. Returns true on the first report.
    pub fn mark_loaded(&mut self) -> bool {
        let changed = !self.loaded;
        self.loaded = true;
        changed
    }

    /// Media reported that playback started.
    pub fn mark_playing(&mut self) -> bool {
        let changed = !self.playing;
        self.playing = true;
        changed
    }

    /// Flip the muted flag and return the new value.
    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// An unlock gesture should start playback only once the media is ready and idle.
    pub fn wants_unlock(&self) -> bool {
        self.loaded && !self.playing
    }
}

/// Outcome of the model load. Set once, never reset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneReadiness {
    model_loaded: bool,
    error: Option<String>,
}

impl SceneReadiness {
    pub fn model_loaded(&self) -> bool {
        self.model_loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_settled(&self) -> bool {
        self.model_loaded || self.error.is_some()
    }

    /// Returns false if the load already settled one way or the other.
    pub fn mark_model_loaded(&mut self) -> bool {
        if self.is_settled() {
            return false;
        }
        self.model_loaded = true;
        true
    }

    /// Returns false if the load already settled one way or the other.
    pub fn mark_failed(&mut self, message: impl Into<String>) -> bool {
        if self.is_settled() {
            return false;
        }
        self.error = Some(message.into());
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Rendering,
    Disposed,
}

/// `Uninitialized -> Rendering -> Disposed`; no way back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneLifecycle {
    state: Lifecycle,
}

impl Default for SceneLifecycle {
    fn default() -> Self {
        Self {
            state: Lifecycle::Uninitialized,
        }
    }
}

impl SceneLifecycle {
    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn is_rendering(&self) -> bool {
        self.state == Lifecycle::Rendering
    }

    pub fn is_disposed(&self) -> bool {
        self.state == Lifecycle::Disposed
    }

    pub fn start(&mut self) -> bool {
        if self.state != Lifecycle::Uninitialized {
            return false;
        }
        self.state = Lifecycle::Rendering;
        true
    }

    /// Returns true only on the first call.
    pub fn dispose(&mut self) -> bool {
        if self.state == Lifecycle::Disposed {
            return false;
        }
        self.state = Lifecycle::Disposed;
        true
    }
}

/// Shared flag checked by async work before it touches torn-down state.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// What the bottom-left banner shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadingBanner {
    Hidden,
    Loading { model: bool, audio: bool },
    Error(String),
}

impl LoadingBanner {
    pub fn derive(scene: &SceneReadiness, audio_loaded: bool) -> Self {
        if let Some(err) = scene.error() {
            return LoadingBanner::Error(err.to_string());
        }
        let model = !scene.model_loaded();
        let audio = !audio_loaded;
        if model || audio {
            LoadingBanner::Loading { model, audio }
        } else {
            LoadingBanner::Hidden
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingBanner::Error(_))
    }

    /// Banner text, or `None` when the banner is hidden.
    pub fn text(&self) -> Option<String> {
        match self {
            LoadingBanner::Hidden => None,
            LoadingBanner::Error(msg) => Some(format!("{} {}", BANNER_ERROR_PREFIX, msg)),
            LoadingBanner::Loading { model, audio } => {
                let mut text = BANNER_LOADING_PREFIX.to_string();
                if *model {
                    text.push_str(" Model");
                }
                if *audio {
                    text.push_str(" Audio");
                }
                Some(text)
            }
        }
    }
}
